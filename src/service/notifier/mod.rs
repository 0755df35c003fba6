//! Push notification delivery.
//!
//! Dispatch is fire-and-forget: the caller hands over an alert and returns
//! at once. Delivery happens on a detached task whose outcome nobody observes.

pub mod pushover;

use std::{ops::Deref, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::base::types::AlertMessage;

// Traits.

/// Generic notifier trait that clients must implement.
#[async_trait]
pub trait GenericNotifier: Send + Sync + 'static {
    /// Submit an alert for delivery without waiting for it.
    ///
    /// Never blocks on network I/O and never reports success or failure.
    fn dispatch(&self, alert: AlertMessage);

    /// Number of dispatched alerts whose delivery task has not finished yet.
    fn in_flight(&self) -> usize;

    /// Wait up to `grace` for in-flight deliveries to finish.
    ///
    /// Returns `true` when nothing is left in flight. Only used at shutdown so
    /// the process does not exit under a running delivery.
    async fn settle(&self, grace: Duration) -> bool;
}

// Structs.

/// Notifier for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct NotifierClient {
    inner: Arc<dyn GenericNotifier>,
}

impl Deref for NotifierClient {
    type Target = dyn GenericNotifier;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl NotifierClient {
    pub fn new(inner: Arc<dyn GenericNotifier>) -> Self {
        Self { inner }
    }
}
