//! Sources of host events.
//!
//! The chat client that owns the IRC connection lives outside this crate. An
//! event source is whatever feeds its print events into the [`ChatHooks`].

pub mod lines;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{base::types::Void, interaction::hooks::ChatHooks};

// Traits.

/// Generic event source trait that hosts must implement.
#[async_trait]
pub trait GenericEventSource: Send + Sync {
    /// Feed events into `hooks` until the source is exhausted.
    async fn run(&self, hooks: Arc<dyn ChatHooks>) -> Void;
}
