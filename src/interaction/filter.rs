//! Decides which chat events are worth an alert, and words the alert.

use regex::{Regex, RegexBuilder};

use crate::base::{
    config::Config,
    types::{AlertMessage, ChatEvent, EventCategory, Res},
};

/// Quit reason left behind by a netsplit, e.g. `irc.example.net *.split`.
///
/// Searched anywhere in the reason, so surrounding noise still matches.
const SPLIT_PATTERN: &str = r".*\.net \*\.split";

/// Label used instead of the channel for direct messages.
const PRIVATE_LABEL: &str = "Private";

/// Filters chat events down to alerts.
///
/// Holds only the watched nick and the compiled split pattern, both fixed
/// at construction.
#[derive(Debug, Clone)]
pub struct EventFilter {
    watched_nick: String,
    split_pattern: Regex,
}

impl EventFilter {
    pub fn new(config: &Config) -> Res<Self> {
        Self::with_watched_nick(config.watched_nick.clone())
    }

    pub fn with_watched_nick(watched_nick: impl Into<String>) -> Res<Self> {
        let split_pattern = RegexBuilder::new(SPLIT_PATTERN).case_insensitive(true).build()?;

        Ok(Self {
            watched_nick: watched_nick.into(),
            split_pattern,
        })
    }

    pub fn watched_nick(&self) -> &str {
        &self.watched_nick
    }

    /// Returns the alert for `event`, or `None` if it does not qualify.
    pub fn evaluate(&self, event: &ChatEvent) -> Option<AlertMessage> {
        match event.event_category {
            EventCategory::Mention | EventCategory::PrivateMessage => Some(self.mention_alert(event)),
            EventCategory::Quit => self.quit_alert(event),
        }
    }

    fn mention_alert(&self, event: &ChatEvent) -> AlertMessage {
        let channel = if event.source_channel_or_nick == event.speaker_nick {
            PRIVATE_LABEL
        } else {
            event.source_channel_or_nick.as_str()
        };

        AlertMessage::new(format!("{}: {}: {}", channel, event.speaker_nick, event.message_or_reason))
    }

    fn quit_alert(&self, event: &ChatEvent) -> Option<AlertMessage> {
        if event.speaker_nick != self.watched_nick || !self.split_pattern.is_match(&event.message_or_reason) {
            return None;
        }

        Some(AlertMessage::new(format!("[QUIT MATCH] {} has quit ({})", event.speaker_nick, event.message_or_reason)))
    }
}
