//! Host-facing handlers, one per hooked print event.
//!
//! The host calls these with its `word` list: `word[0]` is the acting nick and
//! `word[1]` the message text or quit reason. Missing entries read as empty.

use tracing::{debug, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{ChatEvent, EventCategory, HookKind, Res},
    },
    interaction::filter::EventFilter,
    service::notifier::NotifierClient,
};

/// One method per print event the host delivers.
pub trait ChatHooks: Send + Sync {
    /// `Channel Msg Hilight`: our nick was mentioned in `channel`.
    fn channel_msg_hilight(&self, channel: &str, word: &[String]);
    /// `Channel Action Hilight`: our nick was mentioned in a `/me` in `channel`.
    fn channel_action_hilight(&self, channel: &str, word: &[String]);
    /// `Private Message to Dialog`: a query window received a message.
    fn private_message_to_dialog(&self, channel: &str, word: &[String]);
    /// `Private Action to Dialog`: a query window received a `/me`.
    fn private_action_to_dialog(&self, channel: &str, word: &[String]);
    /// `Quit`: somebody disconnected.
    fn quit(&self, word: &[String]);
}

/// Send a host event to the matching hook.
pub fn route(hooks: &dyn ChatHooks, kind: HookKind, channel: &str, word: &[String]) {
    match kind {
        HookKind::ChannelMsgHilight => hooks.channel_msg_hilight(channel, word),
        HookKind::ChannelActionHilight => hooks.channel_action_hilight(channel, word),
        HookKind::PrivateMessageToDialog => hooks.private_message_to_dialog(channel, word),
        HookKind::PrivateActionToDialog => hooks.private_action_to_dialog(channel, word),
        HookKind::Quit => hooks.quit(word),
    }
}

fn word_at(word: &[String], index: usize) -> &str {
    word.get(index).map(String::as_str).unwrap_or_default()
}

/// Connects the event filter to the notifier.
#[derive(Clone)]
pub struct Alerter {
    filter: EventFilter,
    notifier: NotifierClient,
}

impl Alerter {
    pub fn new(config: &Config, notifier: NotifierClient) -> Res<Self> {
        Ok(Self {
            filter: EventFilter::new(config)?,
            notifier,
        })
    }

    pub fn watched_nick(&self) -> &str {
        self.filter.watched_nick()
    }

    /// Filter the event and, if it qualifies, dispatch its alert.
    ///
    /// Returns as soon as the alert is handed off.
    #[instrument(skip_all, fields(category = ?event.event_category))]
    pub fn handle_event(&self, event: ChatEvent) {
        match self.filter.evaluate(&event) {
            Some(alert) => {
                info!("Alert-worthy event from {}", event.speaker_nick);
                self.notifier.dispatch(alert);
            }
            None => debug!("Event from {} does not qualify", event.speaker_nick),
        }
    }

    fn handle_message(&self, category: EventCategory, channel: &str, word: &[String]) {
        self.handle_event(ChatEvent::new(category, channel, word_at(word, 0), word_at(word, 1)));
    }
}

impl ChatHooks for Alerter {
    fn channel_msg_hilight(&self, channel: &str, word: &[String]) {
        self.handle_message(EventCategory::Mention, channel, word);
    }

    fn channel_action_hilight(&self, channel: &str, word: &[String]) {
        self.handle_message(EventCategory::Mention, channel, word);
    }

    fn private_message_to_dialog(&self, channel: &str, word: &[String]) {
        self.handle_message(EventCategory::PrivateMessage, channel, word);
    }

    fn private_action_to_dialog(&self, channel: &str, word: &[String]) {
        self.handle_message(EventCategory::PrivateMessage, channel, word);
    }

    fn quit(&self, word: &[String]) {
        self.handle_event(ChatEvent::quit(word_at(word, 0), word_at(word, 1)));
    }
}
