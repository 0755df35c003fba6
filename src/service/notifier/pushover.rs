//! Pushover implementation of the notifier.
//!
//! Each alert becomes one form-encoded POST to the messages endpoint, sent
//! from a detached tokio task. The response is never read.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde::Serialize;
use tokio::{runtime::Handle, sync::Notify, time::Instant};
use tracing::{Instrument, debug, instrument, trace};

use crate::base::{
    config::Config,
    types::{AlertMessage, Res},
};

use super::{GenericNotifier, NotifierClient};

// Extra methods on `NotifierClient` applied by the pushover implementation.

impl NotifierClient {
    /// Creates a new Pushover notifier.
    ///
    /// Must be called from within a tokio runtime; deliveries are spawned onto it.
    pub fn pushover(config: &Config) -> Res<Self> {
        let client = PushoverNotifier::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }
}

// Structs.

/// Form fields of a Pushover message request.
#[derive(Debug, Serialize)]
struct PushoverForm<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    sound: &'a str,
    priority: i8,
    retry: u32,
    expire: u32,
}

/// Tracks deliveries that have been spawned but not finished.
#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrements the in-flight count when the delivery task ends, however it ends.
struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl InFlightGuard {
    fn new(in_flight: Arc<InFlight>) -> Self {
        in_flight.count.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}

/// Pushover notifier implementation.
pub struct PushoverNotifier {
    client: reqwest::Client,
    config: Config,
    runtime: Handle,
    in_flight: Arc<InFlight>,
}

impl PushoverNotifier {
    /// Create a new Pushover notifier bound to the current tokio runtime.
    #[instrument(name = "PushoverNotifier::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let runtime = Handle::try_current()?;
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            config: config.clone(),
            runtime,
            in_flight: Arc::default(),
        })
    }

    fn form<'a>(&'a self, alert: &'a AlertMessage) -> PushoverForm<'a> {
        PushoverForm {
            token: &self.config.app_token,
            user: &self.config.user_token,
            message: alert.body(),
            sound: &self.config.sound,
            priority: self.config.priority,
            retry: self.config.retry,
            expire: self.config.expire,
        }
    }
}

#[async_trait]
impl GenericNotifier for PushoverNotifier {
    #[instrument(name = "PushoverNotifier::dispatch", skip_all)]
    fn dispatch(&self, alert: AlertMessage) {
        let request = self.client.post(&self.config.api_url).form(&self.form(&alert));
        let guard = InFlightGuard::new(self.in_flight.clone());

        trace!("Dispatching alert: {}", alert);

        // Detached; the handle is dropped and the outcome never observed.
        drop(self.runtime.spawn(
            async move {
                let _guard = guard;

                if let Err(err) = request.send().await {
                    debug!("Alert delivery did not go through: {}", err);
                }
            }
            .in_current_span(),
        ));
    }

    fn in_flight(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    async fn settle(&self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;

        loop {
            let idle = self.in_flight.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();

            if self.in_flight() == 0 {
                return true;
            }

            if tokio::time::timeout_at(deadline, idle).await.is_err() {
                return self.in_flight() == 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    use super::*;
    use crate::base::config::ConfigInner;

    fn create_test_config(api_url: String) -> Config {
        Config::from(ConfigInner {
            app_token: "app-token".to_string(),
            user_token: "user-token".to_string(),
            api_url,
            allow_insecure_api_url: true,
            ..Default::default()
        })
    }

    /// Accept one connection, hand back the raw request, and answer `200 OK`.
    async fn stub_endpoint() -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/1/messages.json", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&raw);
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|line| line.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap()))
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + length {
                        break;
                    }
                }
            }

            socket.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}").await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
        });

        (url, rx)
    }

    #[test]
    fn form_carries_fixed_parameters() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let _entered = runtime.enter();

        let notifier = PushoverNotifier::new(&create_test_config("https://api.pushover.net/1/messages.json".to_string())).unwrap();
        let alert = AlertMessage::new("#general: alice: hey");
        let form = notifier.form(&alert);

        assert_eq!(form.token, "app-token");
        assert_eq!(form.user, "user-token");
        assert_eq!(form.message, "#general: alice: hey");
        assert_eq!(form.sound, "echo");
        assert_eq!(form.priority, 2);
        assert_eq!(form.retry, 60);
        assert_eq!(form.expire, 1800);
    }

    #[test]
    fn construction_needs_a_runtime() {
        assert!(PushoverNotifier::new(&create_test_config("https://api.pushover.net/1/messages.json".to_string())).is_err());
    }

    #[tokio::test]
    async fn dispatch_posts_form_without_waiting() {
        let (url, request) = stub_endpoint().await;
        let notifier = NotifierClient::pushover(&create_test_config(url)).unwrap();

        notifier.dispatch(AlertMessage::new("Private: bob: a&b=c?"));

        assert!(notifier.settle(Duration::from_secs(10)).await);
        assert_eq!(notifier.in_flight(), 0);

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /1/messages.json "));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/x-www-form-urlencoded"));
        assert!(raw.contains("token=app-token"));
        assert!(raw.contains("user=user-token"));
        assert!(raw.contains("message=Private%3A+bob%3A+a%26b%3Dc%3F"));
        assert!(raw.contains("sound=echo"));
        assert!(raw.contains("priority=2"));
        assert!(raw.contains("retry=60"));
        assert!(raw.contains("expire=1800"));
    }

    #[tokio::test]
    async fn failed_delivery_is_absorbed() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/1/messages.json", listener.local_addr().unwrap());
        drop(listener);

        let notifier = NotifierClient::pushover(&create_test_config(url)).unwrap();
        notifier.dispatch(AlertMessage::new("nobody hears this"));

        assert!(notifier.settle(Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn settle_returns_immediately_when_idle() {
        let notifier = NotifierClient::pushover(&create_test_config("https://api.pushover.net/1/messages.json".to_string())).unwrap();

        assert_eq!(notifier.in_flight(), 0);
        assert!(notifier.settle(Duration::from_millis(1)).await);
    }
}
