//! Library root for `irc-pushover`.
//!
//! irc-pushover forwards two kinds of IRC events to Pushover:
//! - Highlights and private messages, always
//! - Quits of one watched nick, when the reason looks like a netsplit
//!
//! Events come from a host chat client through the [`interaction::hooks::ChatHooks`]
//! interface. Alerts leave through a fire-and-forget notifier that never
//! reports delivery success or failure.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use service::host::lines::LineEventSource;
use tracing::{info, warn};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the notifier and hook handlers
/// - Feeds host events from stdin until it closes
pub async fn start(config: Config) -> Void {
    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        warn!("A crypto provider was already installed.");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    info!(
        "Pushover alert plugin (v{}) loaded: Monitoring mentions and {}.",
        env!("CARGO_PKG_VERSION"),
        runtime.alerter.watched_nick()
    );

    // Start the runtime.
    runtime.start(&LineEventSource::stdin()).await?;

    Ok(())
}
