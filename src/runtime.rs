//! Runtime services and shared state for irc-pushover.

use std::{sync::Arc, time::Duration};

use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::hooks::Alerter,
    service::{host::GenericEventSource, notifier::NotifierClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the notifier, and the alerter built
/// on top of them. It is trivially cloneable.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The notifier instance.
    pub notifier: NotifierClient,
    /// The hook handlers.
    pub alerter: Arc<Alerter>,
}

impl Runtime {
    /// Create a new runtime instance backed by Pushover.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        let notifier = NotifierClient::pushover(&config)?;

        Self::with_notifier(config, notifier)
    }

    /// Create a new runtime instance around an existing notifier.
    pub fn with_notifier(config: Config, notifier: NotifierClient) -> Res<Self> {
        let alerter = Arc::new(Alerter::new(&config, notifier.clone())?);

        Ok(Self { config, notifier, alerter })
    }

    /// Feed `source` into the hooks until it closes, then give in-flight
    /// alerts the configured grace period to leave the process.
    pub async fn start(&self, source: &dyn GenericEventSource) -> Void {
        let result = source.run(self.alerter.clone()).await;

        if let Err(err) = &result {
            warn!("Event feed failed: {}", err);
        }

        let grace = Duration::from_secs(self.config.shutdown_grace_secs);
        if !self.notifier.settle(grace).await {
            warn!("{} alerts still in flight after {:?}; exiting anyway.", self.notifier.in_flight(), grace);
        }

        info!("Shutting down.");

        result
    }
}
