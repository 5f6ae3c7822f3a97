//! Command-line arguments and their resolution against loaded settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use pushover_core::{Glance, GlanceField, Message, Notification, Priority, RetryPolicy, Sound};
use pushover_settings::{
    PushoverSettings, load_required_settings_with_env, load_settings_with_env, parse_log_level,
    settings_path,
};

/// Repeat interval used for emergency messages when `--retry` is omitted.
pub const DEFAULT_EMERGENCY_RETRY_SECS: u32 = 60;
/// Expiry used for emergency messages when `--expire` is omitted.
pub const DEFAULT_EMERGENCY_EXPIRE_SECS: u32 = 3600;

/// Send Pushover messages and glance updates.
#[derive(Parser, Debug)]
#[command(name = "pushover", version, about = "Send Pushover messages and glance updates")]
pub struct Cli {
    /// Settings file (default `~/.pushover/settings.json`).
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Maximum attempts per dispatch, 0 for unlimited.
    #[arg(long, global = true, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Milliseconds to wait between attempts.
    #[arg(long, global = true, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error, off).
    #[arg(long, global = true, value_name = "LEVEL", value_parser = level_arg)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a push message.
    Send(SendArgs),
    /// Update a glance widget.
    Glance(GlanceArgs),
}

/// Application token and recipient.
#[derive(Args, Debug, Default)]
pub struct Credentials {
    /// Application token (default `PUSHOVER_APP`).
    #[arg(long, value_name = "TOKEN")]
    pub app: Option<String>,

    /// Recipient user or group key (default `PUSHOVER_USER`).
    #[arg(long, value_name = "KEY")]
    pub user: Option<String>,
}

/// `pushover send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub credentials: Credentials,

    /// Target device; repeat or separate with commas.
    #[arg(long = "device", value_name = "NAME", value_delimiter = ',')]
    pub devices: Vec<String>,

    /// Message title.
    #[arg(long)]
    pub title: Option<String>,

    /// Supplementary URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Title for the supplementary URL.
    #[arg(long, requires = "url")]
    pub url_title: Option<String>,

    /// Priority by name (lowest, low, normal, high, emergency) or number (-2..2).
    #[arg(long, allow_hyphen_values = true)]
    pub priority: Option<Priority>,

    /// Notification sound.
    #[arg(long)]
    pub sound: Option<Sound>,

    /// Message time as Unix seconds.
    #[arg(long, value_name = "EPOCH", allow_hyphen_values = true)]
    pub timestamp: Option<i64>,

    /// Render the message as HTML.
    #[arg(long, conflicts_with = "monospace")]
    pub html: bool,

    /// Render the message in a monospace font.
    #[arg(long)]
    pub monospace: bool,

    /// Emergency: seconds between repeats.
    #[arg(long, value_name = "SECS")]
    pub retry: Option<u32>,

    /// Emergency: seconds until repeats stop.
    #[arg(long, value_name = "SECS")]
    pub expire: Option<u32>,

    /// Emergency: URL called once the message is acknowledged.
    #[arg(long)]
    pub callback: Option<String>,

    /// Message text.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub message: Vec<String>,
}

/// `pushover glance`.
#[derive(Args, Debug)]
pub struct GlanceArgs {
    #[command(flatten)]
    pub credentials: Credentials,

    /// Target device.
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Set the title.
    #[arg(long, conflicts_with = "remove_title")]
    pub title: Option<String>,

    /// Set the main text line.
    #[arg(long, conflicts_with = "remove_text")]
    pub text: Option<String>,

    /// Set the second text line.
    #[arg(long, conflicts_with = "remove_subtext")]
    pub subtext: Option<String>,

    /// Set the counter.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "remove_count")]
    pub count: Option<i64>,

    /// Set the percentage.
    #[arg(
        long,
        value_parser = clap::value_parser!(i64).range(0..=100),
        conflicts_with = "remove_percent"
    )]
    pub percent: Option<i64>,

    /// Clear the title.
    #[arg(long)]
    pub remove_title: bool,

    /// Clear the main text line.
    #[arg(long)]
    pub remove_text: bool,

    /// Clear the second text line.
    #[arg(long)]
    pub remove_subtext: bool,

    /// Clear the counter.
    #[arg(long)]
    pub remove_count: bool,

    /// Clear the percentage.
    #[arg(long)]
    pub remove_percent: bool,
}

/// Everything needed to run one dispatch.
#[derive(Debug)]
pub struct Invocation {
    /// Application token.
    pub token: String,
    /// API base URL.
    pub base_url: String,
    /// What to deliver.
    pub notification: Notification,
    /// Attempt cap and delay.
    pub policy: RetryPolicy,
}

fn level_arg(raw: &str) -> std::result::Result<String, String> {
    parse_log_level(raw)
        .ok_or_else(|| format!("{raw:?} is not one of trace, debug, info, warn, error, off"))
}

impl Cli {
    /// Load settings from `--settings` or the default file, with `PUSHOVER_*`
    /// overrides from the process environment.
    pub fn load_settings(&self) -> Result<PushoverSettings> {
        self.load_settings_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`Cli::load_settings`], reading variables through `lookup`.
    ///
    /// A file named with `--settings` must exist; the default file may be
    /// absent.
    pub fn load_settings_with_env<F>(&self, lookup: F) -> Result<PushoverSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        match &self.settings {
            Some(path) => load_required_settings_with_env(path, lookup)
                .with_context(|| format!("failed to load settings from {}", path.display())),
            None => load_settings_with_env(&settings_path(), lookup)
                .context("failed to load settings"),
        }
    }

    /// Log level from the command line, else from settings.
    pub fn log_level<'a>(&'a self, settings: &'a PushoverSettings) -> &'a str {
        self.log_level.as_deref().unwrap_or(&settings.logging.level)
    }

    /// Retry policy from settings with command-line overrides.
    pub fn policy(&self, settings: &PushoverSettings) -> RetryPolicy {
        let mut policy = settings.retry.to_policy();
        if let Some(n) = self.max_attempts {
            policy.max_attempts = n;
        }
        if let Some(ms) = self.retry_delay_ms {
            policy.delay = Duration::from_millis(ms);
        }
        policy
    }

    /// Merge the command line over `settings` into a ready dispatch.
    pub fn resolve(&self, settings: &PushoverSettings) -> Result<Invocation> {
        let (credentials, notification): (&Credentials, Notification) = match &self.command {
            Command::Send(args) => (&args.credentials, args.to_message(settings)?.into()),
            Command::Glance(args) => (&args.credentials, args.to_glance(settings)?.into()),
        };

        Ok(Invocation {
            token: token(credentials, settings)?,
            base_url: settings.api.base_url.clone(),
            notification,
            policy: self.policy(settings),
        })
    }
}

fn token(credentials: &Credentials, settings: &PushoverSettings) -> Result<String> {
    match credentials.app.as_ref().or(settings.api.token.as_ref()) {
        Some(token) => Ok(token.clone()),
        None => bail!("no application token: pass --app or set PUSHOVER_APP"),
    }
}

fn recipient(credentials: &Credentials, settings: &PushoverSettings) -> Result<String> {
    match credentials.user.as_ref().or(settings.defaults.user.as_ref()) {
        Some(user) => Ok(user.clone()),
        None => bail!("no recipient: pass --user or set PUSHOVER_USER"),
    }
}

impl SendArgs {
    /// Build the message, filling gaps from settings.
    pub fn to_message(&self, settings: &PushoverSettings) -> Result<Message> {
        let user = recipient(&self.credentials, settings)?;
        let mut message = Message::new(user, self.message.join(" "));

        message.devices = self
            .devices
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from)
            .collect();
        if message.devices.is_empty() {
            message.devices = settings.defaults.devices();
        }

        message.title = self.title.clone().or_else(|| settings.defaults.title.clone());
        message.url.clone_from(&self.url);
        message.url_title.clone_from(&self.url_title);
        message.sound.clone_from(&self.sound);
        message.html = self.html;
        message.monospace = self.monospace;
        message.timestamp = self.timestamp.map(to_datetime).transpose()?;

        let priority = self.priority.unwrap_or_default();
        if priority.is_emergency() {
            message = message.emergency(
                self.retry.unwrap_or(DEFAULT_EMERGENCY_RETRY_SECS),
                self.expire.unwrap_or(DEFAULT_EMERGENCY_EXPIRE_SECS),
            );
            message.callback.clone_from(&self.callback);
        } else {
            if self.retry.is_some() || self.expire.is_some() || self.callback.is_some() {
                tracing::warn!(
                    %priority,
                    "--retry, --expire and --callback only apply to emergency priority"
                );
            }
            message = message.with_priority(priority);
        }

        Ok(message)
    }
}

fn to_datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).with_context(|| format!("timestamp {secs} is out of range"))
}

impl GlanceArgs {
    /// Build the glance update, filling gaps from settings.
    pub fn to_glance(&self, settings: &PushoverSettings) -> Result<Glance> {
        let title = self.title.clone().or_else(|| settings.defaults.title.clone());
        let mut glance = Glance::new(recipient(&self.credentials, settings)?)
            .title(field(title, self.remove_title))
            .text(field(self.text.clone(), self.remove_text))
            .subtext(field(self.subtext.clone(), self.remove_subtext))
            .count(field(self.count, self.remove_count))
            .percent(field(self.percent, self.remove_percent));

        // The glances endpoint takes one device; use the first configured one.
        let fallback = || settings.defaults.devices().into_iter().next();
        if let Some(device) = self.device.clone().or_else(fallback) {
            glance = glance.with_device(device);
        }

        Ok(glance)
    }
}

fn field<T>(value: Option<T>, remove: bool) -> GlanceField<T> {
    match (value, remove) {
        (_, true) => GlanceField::Remove,
        (Some(v), false) => GlanceField::Set(v),
        (None, false) => GlanceField::Unset,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
