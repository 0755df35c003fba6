//! Load configuration via `config` crate with env-override support.

use std::{fmt, ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default nick whose split quits we watch for.
fn default_watched_nick() -> String {
    "Gatekeeper".to_string()
}

/// Default Pushover message endpoint.
fn default_api_url() -> String {
    "https://api.pushover.net/1/messages.json".to_string()
}

/// Default alert sound.
fn default_sound() -> String {
    "echo".to_string()
}

/// Default priority: emergency, repeated until acknowledged.
fn default_priority() -> i8 {
    2
}

/// Default seconds between emergency re-deliveries.
fn default_retry() -> u32 {
    60
}

/// Default seconds before emergency re-delivery stops.
fn default_expire() -> u32 {
    1800
}

/// Default seconds to wait for in-flight alerts once the event feed ends.
fn default_shutdown_grace_secs() -> u64 {
    10
}

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Deserialize, Clone)]
pub struct ConfigInner {
    /// Pushover application token (`IRC_PUSHOVER_APP_TOKEN`).
    pub app_token: String,
    /// Pushover user key (`IRC_PUSHOVER_USER_TOKEN`).
    pub user_token: String,
    /// Nick whose split quits trigger an alert (`IRC_PUSHOVER_WATCHED_NICK`).
    #[serde(default = "default_watched_nick")]
    pub watched_nick: String,
    /// Message endpoint (`IRC_PUSHOVER_API_URL`).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Permit a plain `http://` endpoint (`IRC_PUSHOVER_ALLOW_INSECURE_API_URL`).
    #[serde(default)]
    pub allow_insecure_api_url: bool,
    /// Alert sound (`IRC_PUSHOVER_SOUND`).
    #[serde(default = "default_sound")]
    pub sound: String,
    /// Message priority, -2 through 2 (`IRC_PUSHOVER_PRIORITY`).
    #[serde(default = "default_priority")]
    pub priority: i8,
    /// Re-delivery interval in seconds for emergency priority (`IRC_PUSHOVER_RETRY`).
    #[serde(default = "default_retry")]
    pub retry: u32,
    /// Re-delivery cutoff in seconds for emergency priority (`IRC_PUSHOVER_EXPIRE`).
    #[serde(default = "default_expire")]
    pub expire: u32,
    /// Grace period for in-flight alerts after the event feed closes (`IRC_PUSHOVER_SHUTDOWN_GRACE_SECS`).
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            app_token: String::new(),
            user_token: String::new(),
            watched_nick: default_watched_nick(),
            api_url: default_api_url(),
            allow_insecure_api_url: false,
            sound: default_sound(),
            priority: default_priority(),
            retry: default_retry(),
            expire: default_expire(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for ConfigInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigInner")
            .field("app_token", &"<redacted>")
            .field("user_token", &"<redacted>")
            .field("watched_nick", &self.watched_nick)
            .field("api_url", &self.api_url)
            .field("allow_insecure_api_url", &self.allow_insecure_api_url)
            .field("sound", &self.sound)
            .field("priority", &self.priority)
            .field("retry", &self.retry)
            .field("expire", &self.expire)
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .finish()
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("IRC_PUSHOVER"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize::<ConfigInner>()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the values against what the Pushover API accepts.
    pub fn validate(&self) -> Void {
        if self.app_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Pushover application token must be set."));
        }

        if self.user_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Pushover user token must be set."));
        }

        if self.watched_nick.trim().is_empty() {
            return Err(anyhow::anyhow!("Watched nick must not be empty."));
        }

        if !self.api_url.starts_with("https://") && !(self.allow_insecure_api_url && self.api_url.starts_with("http://")) {
            return Err(anyhow::anyhow!("Pushover API URL must use https."));
        }

        if !(-2..=2).contains(&self.priority) {
            return Err(anyhow::anyhow!("Priority must be between -2 and 2."));
        }

        if self.priority == 2 {
            if self.retry < 30 {
                return Err(anyhow::anyhow!("Retry must be at least 30 seconds for emergency priority."));
            }

            if self.expire > 10800 {
                return Err(anyhow::anyhow!("Expire must be at most 10800 seconds for emergency priority."));
            }
        }

        Ok(())
    }
}
