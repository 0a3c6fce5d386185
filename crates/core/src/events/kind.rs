//! Event taxonomy
//!
//! The set of kinds is closed: adding one means recompiling the registry and
//! every plugin that matches on it.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Category of a bot notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EventKind {
    /// Sentinel meaning "no event". Never dispatched.
    #[default]
    None = 0,
    /// A plugin finished loading
    PluginLoaded = 1,
    /// A plugin's configuration was opened or changed
    PluginConfig = 2,
    /// The controlled player died
    PlayerDied = 3,
    /// The controlled player was found in the game world
    PlayerFound = 4,
    /// The bot started running
    BotStart = 5,
    /// The bot stopped running
    BotStop = 6,
    /// A chat message was received
    MessageReceived = 7,
    /// A whisper (private message) was received
    WhisperReceived = 8,
}

impl EventKind {
    /// Number of kinds, sentinel included
    pub const COUNT: usize = 9;

    /// Every dispatchable kind in ordinal order
    pub const ALL: [EventKind; 8] = [
        EventKind::PluginLoaded,
        EventKind::PluginConfig,
        EventKind::PlayerDied,
        EventKind::PlayerFound,
        EventKind::BotStart,
        EventKind::BotStop,
        EventKind::MessageReceived,
        EventKind::WhisperReceived,
    ];

    /// Ordinal position of this kind
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look up a kind by ordinal
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::None),
            1 => Some(Self::PluginLoaded),
            2 => Some(Self::PluginConfig),
            3 => Some(Self::PlayerDied),
            4 => Some(Self::PlayerFound),
            5 => Some(Self::BotStart),
            6 => Some(Self::BotStop),
            7 => Some(Self::MessageReceived),
            8 => Some(Self::WhisperReceived),
            _ => None,
        }
    }

    /// `true` for the `None` sentinel
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Snake-case name (e.g., "bot_start")
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PluginLoaded => "plugin_loaded",
            Self::PluginConfig => "plugin_config",
            Self::PlayerDied => "player_died",
            Self::PlayerFound => "player_found",
            Self::BotStart => "bot_start",
            Self::BotStop => "bot_stop",
            Self::MessageReceived => "message_received",
            Self::WhisperReceived => "whisper_received",
        }
    }

    /// Conventional handler name for this kind (e.g., "on_bot_start")
    ///
    /// Producers are free to pick another name per event; this is what
    /// [`Event::for_kind`](super::Event::for_kind) and typed listeners use.
    pub const fn default_handler(self) -> &'static str {
        match self {
            Self::None => "",
            Self::PluginLoaded => "on_plugin_loaded",
            Self::PluginConfig => "on_plugin_config",
            Self::PlayerDied => "on_player_died",
            Self::PlayerFound => "on_player_found",
            Self::BotStart => "on_bot_start",
            Self::BotStop => "on_bot_stop",
            Self::MessageReceived => "on_message_received",
            Self::WhisperReceived => "on_whisper_received",
        }
    }

    /// Mask bit for this kind, empty for `None`
    pub const fn mask(self) -> EventMask {
        match self {
            Self::None => EventMask::empty(),
            other => EventMask::from_bits_retain(1 << (other as u8 - 1)),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown event kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event kind: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(Self::None)
            .chain(Self::ALL)
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

bitflags! {
    /// Set of dispatchable event kinds
    ///
    /// Used to register one subscriber for several kinds at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventMask: u16 {
        const PLUGIN_LOADED = 1 << 0;
        const PLUGIN_CONFIG = 1 << 1;
        const PLAYER_DIED = 1 << 2;
        const PLAYER_FOUND = 1 << 3;
        const BOT_START = 1 << 4;
        const BOT_STOP = 1 << 5;
        const MESSAGE_RECEIVED = 1 << 6;
        const WHISPER_RECEIVED = 1 << 7;

        /// Bot start and stop
        const BOT = Self::BOT_START.bits() | Self::BOT_STOP.bits();
        /// Player died and found
        const PLAYER = Self::PLAYER_DIED.bits() | Self::PLAYER_FOUND.bits();
        /// Chat messages and whispers
        const CHAT = Self::MESSAGE_RECEIVED.bits() | Self::WHISPER_RECEIVED.bits();
    }
}

impl EventMask {
    /// Kinds contained in this mask, in ordinal order
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(kind.mask()))
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        kind.mask()
    }
}
