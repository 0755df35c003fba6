use std::{fmt, str::FromStr};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// The category an incoming chat event falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Our nick was highlighted in a channel message or action.
    Mention,
    /// A direct message or action arrived in a query window.
    PrivateMessage,
    /// Somebody quit.
    Quit,
}

/// A single chat event, built per callback and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// The channel (or, for a query window, the other party's nick).
    pub source_channel_or_nick: String,
    /// The nick that spoke or quit.
    pub speaker_nick: String,
    /// The message text, or the quit reason.
    pub message_or_reason: String,
    pub event_category: EventCategory,
}

impl ChatEvent {
    pub fn new(category: EventCategory, channel: impl Into<String>, nick: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_channel_or_nick: channel.into(),
            speaker_nick: nick.into(),
            message_or_reason: text.into(),
            event_category: category,
        }
    }

    /// Build a quit event; quits carry no channel.
    pub fn quit(nick: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(EventCategory::Quit, String::new(), nick, reason)
    }
}

/// The text pushed to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    body: String,
}

impl AlertMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for AlertMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

/// The host print events we hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    ChannelMsgHilight,
    ChannelActionHilight,
    PrivateMessageToDialog,
    PrivateActionToDialog,
    Quit,
}

impl HookKind {
    pub const ALL: [HookKind; 5] = [
        HookKind::ChannelMsgHilight,
        HookKind::ChannelActionHilight,
        HookKind::PrivateMessageToDialog,
        HookKind::PrivateActionToDialog,
        HookKind::Quit,
    ];

    /// The host's name for this print event.
    pub fn name(&self) -> &'static str {
        match self {
            HookKind::ChannelMsgHilight => "Channel Msg Hilight",
            HookKind::ChannelActionHilight => "Channel Action Hilight",
            HookKind::PrivateMessageToDialog => "Private Message to Dialog",
            HookKind::PrivateActionToDialog => "Private Action to Dialog",
            HookKind::Quit => "Quit",
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            HookKind::ChannelMsgHilight | HookKind::ChannelActionHilight => EventCategory::Mention,
            HookKind::PrivateMessageToDialog | HookKind::PrivateActionToDialog => EventCategory::PrivateMessage,
            HookKind::Quit => EventCategory::Quit,
        }
    }
}

impl FromStr for HookKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Res<Self> {
        HookKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unrecognized event `{s}`."))
    }
}
