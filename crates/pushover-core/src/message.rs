//! One-shot push messages.
//!
//! A [`Message`] is delivered to `/1/messages.json`. Only the recipient key
//! and body are required; everything else is omitted from the wire form
//! when left at its default. The emergency-only fields (`retry_secs`,
//! `expire_secs`, `callback`) are ignored unless the priority is
//! [`Priority::Emergency`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Priority
// ─────────────────────────────────────────────────────────────────────────────

/// Delivery priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// No notification at all, message only shows up in the app.
    Lowest,
    /// Quiet notification without sound or vibration.
    Low,
    /// Service default.
    #[default]
    Normal,
    /// Bypasses the user's quiet hours.
    High,
    /// Repeats until acknowledged by the user.
    Emergency,
}

impl Priority {
    /// Wire value of this priority.
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Lowest => -2,
            Self::Low => -1,
            Self::Normal => 0,
            Self::High => 1,
            Self::Emergency => 2,
        }
    }

    /// Whether the emergency-only parameters apply.
    pub fn is_emergency(self) -> bool {
        self == Self::Emergency
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lowest => write!(f, "lowest"),
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

impl TryFrom<i8> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(Self::Lowest),
            -1 => Ok(Self::Low),
            0 => Ok(Self::Normal),
            1 => Ok(Self::High),
            2 => Ok(Self::Emergency),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    /// Accepts a priority name (`"high"`) or its wire value (`"1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i8>() {
            return Self::try_from(n);
        }
        match trimmed.to_lowercase().as_str() {
            "lowest" => Ok(Self::Lowest),
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "emergency" => Ok(Self::Emergency),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A priority name or number outside the known set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}' (expected lowest, low, normal, high, emergency or -2..=2)")]
pub struct ParsePriorityError(String);

// ─────────────────────────────────────────────────────────────────────────────
// Sound
// ─────────────────────────────────────────────────────────────────────────────

/// Notification sound.
///
/// Built-in sounds have their own variants; sounds uploaded to the account
/// go through [`Sound::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Service default sound.
    Pushover,
    /// Bike.
    Bike,
    /// Bugle.
    Bugle,
    /// Cash register.
    CashRegister,
    /// Classical.
    Classical,
    /// Cosmic.
    Cosmic,
    /// Falling.
    Falling,
    /// Gamelan.
    Gamelan,
    /// Incoming.
    Incoming,
    /// Intermission.
    Intermission,
    /// Magic.
    Magic,
    /// Mechanical.
    Mechanical,
    /// Piano bar.
    PianoBar,
    /// Siren.
    Siren,
    /// Space alarm.
    SpaceAlarm,
    /// Tug boat.
    Tugboat,
    /// Alien alarm (long).
    Alien,
    /// Climb (long).
    Climb,
    /// Persistent (long).
    Persistent,
    /// Pushover echo (long).
    Echo,
    /// Up down (long).
    UpDown,
    /// Vibrate only.
    Vibrate,
    /// Silent.
    None,
    /// Any other sound name, sent as-is.
    Custom(String),
}

impl Sound {
    /// Name used on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pushover => "pushover",
            Self::Bike => "bike",
            Self::Bugle => "bugle",
            Self::CashRegister => "cashregister",
            Self::Classical => "classical",
            Self::Cosmic => "cosmic",
            Self::Falling => "falling",
            Self::Gamelan => "gamelan",
            Self::Incoming => "incoming",
            Self::Intermission => "intermission",
            Self::Magic => "magic",
            Self::Mechanical => "mechanical",
            Self::PianoBar => "pianobar",
            Self::Siren => "siren",
            Self::SpaceAlarm => "spacealarm",
            Self::Tugboat => "tugboat",
            Self::Alien => "alien",
            Self::Climb => "climb",
            Self::Persistent => "persistent",
            Self::Echo => "echo",
            Self::UpDown => "updown",
            Self::Vibrate => "vibrate",
            Self::None => "none",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Sound {
    fn from(name: &str) -> Self {
        match name {
            "pushover" => Self::Pushover,
            "bike" => Self::Bike,
            "bugle" => Self::Bugle,
            "cashregister" => Self::CashRegister,
            "classical" => Self::Classical,
            "cosmic" => Self::Cosmic,
            "falling" => Self::Falling,
            "gamelan" => Self::Gamelan,
            "incoming" => Self::Incoming,
            "intermission" => Self::Intermission,
            "magic" => Self::Magic,
            "mechanical" => Self::Mechanical,
            "pianobar" => Self::PianoBar,
            "siren" => Self::Siren,
            "spacealarm" => Self::SpaceAlarm,
            "tugboat" => Self::Tugboat,
            "alien" => Self::Alien,
            "climb" => Self::Climb,
            "persistent" => Self::Persistent,
            "echo" => Self::Echo,
            "updown" => Self::UpDown,
            "vibrate" => Self::Vibrate,
            "none" => Self::None,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl FromStr for Sound {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────────────────────────────────────

/// A push message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    /// User or group key of the recipient.
    pub user: String,
    /// Message body.
    pub message: String,
    /// Target devices; empty means all of the user's devices.
    pub devices: Vec<String>,
    /// Title; the service falls back to the application name.
    pub title: Option<String>,
    /// Supplementary URL shown with the message.
    pub url: Option<String>,
    /// Title for the supplementary URL.
    pub url_title: Option<String>,
    /// Delivery priority.
    pub priority: Priority,
    /// Notification sound.
    pub sound: Option<Sound>,
    /// Time shown for the message instead of the time it was received.
    pub timestamp: Option<DateTime<Utc>>,
    /// Render the body as HTML.
    pub html: bool,
    /// Render the body in a monospace font.
    pub monospace: bool,
    /// Emergency only: seconds between repeated notifications.
    pub retry_secs: u32,
    /// Emergency only: seconds after which repetition stops.
    pub expire_secs: u32,
    /// Emergency only: URL the service calls once the message is acknowledged.
    pub callback: Option<String>,
}

impl Message {
    /// Create a message with only the required fields.
    pub fn new(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Add a target device.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.devices.push(device.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a supplementary URL and an optional title for it.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>, title: Option<String>) -> Self {
        self.url = Some(url.into());
        self.url_title = title;
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the sound.
    #[must_use]
    pub fn with_sound(mut self, sound: Sound) -> Self {
        self.sound = Some(sound);
        self
    }

    /// Set the displayed message time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Switch to emergency priority with the given repeat schedule.
    #[must_use]
    pub fn emergency(mut self, retry_secs: u32, expire_secs: u32) -> Self {
        self.priority = Priority::Emergency;
        self.retry_secs = retry_secs;
        self.expire_secs = expire_secs;
        self
    }

    /// Set the acknowledgement callback URL.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
