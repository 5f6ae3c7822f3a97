//! Request encoder: notification → form parameters.
//!
//! Encoding is pure and cannot fail. Required keys (`token`, `user`, and
//! `message` for messages) are always present, even when empty; the service
//! rejects those requests and the rejection surfaces as a fatal outcome.
//!
//! Rules for optional keys:
//! - omitted unless present and non-empty
//! - `priority` omitted at [`Priority::Normal`](crate::Priority::Normal)
//! - `html` / `monospace` sent as `"1"` only when enabled
//! - `retry` / `expire` / `callback` only at emergency priority
//! - glance fields follow their tri-state ([`GlanceField`])

use std::collections::BTreeMap;
use std::fmt;

use crate::glance::{Glance, GlanceField};
use crate::message::Message;
use crate::notification::Notification;

/// Encoded request parameters, ordered by key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    params: BTreeMap<&'static str, String>,
}

impl FormParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let _ = self.params.insert(key, value.into());
    }

    fn set_non_empty(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.set(key, v);
        }
    }

    fn set_glance_field<T: ToString>(&mut self, key: &'static str, field: &GlanceField<T>) {
        if let Some(v) = field.wire_value() {
            self.set(key, v);
        }
    }

    /// Value for `key`, if emitted.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether `key` is emitted at all.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of emitted keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether nothing is emitted.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

// Keeps the application token out of logs.
impl fmt::Debug for FormParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            if key == "token" {
                let _ = map.entry(&key, &"<redacted>");
            } else {
                let _ = map.entry(&key, &value);
            }
        }
        map.finish()
    }
}

/// Encode any notification with the application token.
pub fn encode(token: &str, notification: &Notification) -> FormParams {
    match notification {
        Notification::Message(m) => encode_message(token, m),
        Notification::Glance(g) => encode_glance(token, g),
    }
}

/// Encode a push message.
pub fn encode_message(token: &str, message: &Message) -> FormParams {
    let mut form = FormParams::new();

    form.set("token", token);
    form.set("user", message.user.as_str());
    form.set("message", message.message.as_str());

    let devices: Vec<&str> = message
        .devices
        .iter()
        .map(String::as_str)
        .filter(|d| !d.is_empty())
        .collect();
    if !devices.is_empty() {
        form.set("device", devices.join(","));
    }
    form.set_non_empty("title", message.title.as_deref());
    form.set_non_empty("url", message.url.as_deref());
    form.set_non_empty("url_title", message.url_title.as_deref());
    if message.priority.as_i8() != 0 {
        form.set("priority", message.priority.as_i8().to_string());
    }
    form.set_non_empty("sound", message.sound.as_ref().map(|s| s.as_str()));
    if let Some(ts) = message.timestamp.map(|t| t.timestamp()).filter(|&t| t != 0) {
        form.set("timestamp", ts.to_string());
    }
    if message.html {
        form.set("html", "1");
    }
    if message.monospace {
        form.set("monospace", "1");
    }

    if message.priority.is_emergency() {
        form.set("retry", message.retry_secs.to_string());
        form.set("expire", message.expire_secs.to_string());
        form.set_non_empty("callback", message.callback.as_deref());
    }

    form
}

/// Encode a glance update.
pub fn encode_glance(token: &str, glance: &Glance) -> FormParams {
    let mut form = FormParams::new();

    form.set("token", token);
    form.set("user", glance.user.as_str());
    form.set_non_empty("device", glance.device.as_deref());

    form.set_glance_field("title", &glance.title);
    form.set_glance_field("text", &glance.text);
    form.set_glance_field("subtext", &glance.subtext);
    form.set_glance_field("count", &glance.count);
    form.set_glance_field("percent", &glance.percent);

    form
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Priority, Sound};
    use chrono::{TimeZone, Utc};

    const TOKEN: &str = "app-token";

    #[test]
    fn minimal_message_has_required_keys_only() {
        let form = encode_message(TOKEN, &Message::new("u1", "hello"));
        assert_eq!(form.len(), 3);
        assert_eq!(form.get("token"), Some(TOKEN));
        assert_eq!(form.get("user"), Some("u1"));
        assert_eq!(form.get("message"), Some("hello"));
    }

    #[test]
    fn normal_priority_omits_priority_and_emergency_fields() {
        let mut m = Message::new("u", "m");
        m.retry_secs = 30;
        m.expire_secs = 600;
        m.callback = Some("https://cb.example".to_string());

        let form = encode_message(TOKEN, &m);
        for key in ["priority", "retry", "expire", "callback"] {
            assert!(!form.contains(key), "{key} must be omitted");
        }
    }

    #[test]
    fn non_emergency_priority_omits_emergency_fields() {
        let mut m = Message::new("u", "m").with_priority(Priority::High);
        m.retry_secs = 30;
        m.expire_secs = 600;
        m.callback = Some("https://cb.example".to_string());

        let form = encode_message(TOKEN, &m);
        assert_eq!(form.get("priority"), Some("1"));
        assert!(!form.contains("retry"));
        assert!(!form.contains("expire"));
        assert!(!form.contains("callback"));
    }

    #[test]
    fn negative_priority_is_decimal() {
        let m = Message::new("u", "m").with_priority(Priority::Lowest);
        assert_eq!(encode_message(TOKEN, &m).get("priority"), Some("-2"));
    }

    #[test]
    fn emergency_includes_retry_and_expire() {
        let m = Message::new("u", "m").emergency(60, 3600);
        let form = encode_message(TOKEN, &m);
        assert_eq!(form.get("priority"), Some("2"));
        assert_eq!(form.get("retry"), Some("60"));
        assert_eq!(form.get("expire"), Some("3600"));
        assert!(!form.contains("callback"));
    }

    #[test]
    fn emergency_zero_schedule_still_emitted() {
        let m = Message::new("u", "m").with_priority(Priority::Emergency);
        let form = encode_message(TOKEN, &m);
        assert_eq!(form.get("retry"), Some("0"));
        assert_eq!(form.get("expire"), Some("0"));
    }

    #[test]
    fn emergency_callback_only_when_non_empty() {
        let with_cb = Message::new("u", "m")
            .emergency(60, 3600)
            .with_callback("https://cb.example/ack");
        assert_eq!(
            encode_message(TOKEN, &with_cb).get("callback"),
            Some("https://cb.example/ack")
        );

        let empty_cb = Message::new("u", "m").emergency(60, 3600).with_callback("");
        assert!(!encode_message(TOKEN, &empty_cb).contains("callback"));
    }

    #[test]
    fn devices_are_comma_joined_in_order() {
        let m = Message::new("u", "m")
            .with_device("phone")
            .with_device("tablet")
            .with_device("desktop");
        assert_eq!(
            encode_message(TOKEN, &m).get("device"),
            Some("phone,tablet,desktop")
        );
    }

    #[test]
    fn empty_optional_strings_are_omitted() {
        let mut m = Message::new("u", "m");
        m.title = Some(String::new());
        m.url = Some(String::new());
        m.url_title = Some(String::new());
        m.sound = Some(Sound::Custom(String::new()));
        m.devices = vec![String::new()];

        let form = encode_message(TOKEN, &m);
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn optional_fields_when_present() {
        let m = Message::new("u", "m")
            .with_title("Title")
            .with_url("https://example.com", Some("Example".to_string()))
            .with_sound(Sound::Siren);
        let form = encode_message(TOKEN, &m);
        assert_eq!(form.get("title"), Some("Title"));
        assert_eq!(form.get("url"), Some("https://example.com"));
        assert_eq!(form.get("url_title"), Some("Example"));
        assert_eq!(form.get("sound"), Some("siren"));
    }

    #[test]
    fn formatting_flags_emit_one_or_nothing() {
        let mut m = Message::new("u", "m");
        let form = encode_message(TOKEN, &m);
        assert!(!form.contains("html"));
        assert!(!form.contains("monospace"));

        m.html = true;
        m.monospace = true;
        let form = encode_message(TOKEN, &m);
        assert_eq!(form.get("html"), Some("1"));
        assert_eq!(form.get("monospace"), Some("1"));
    }

    #[test]
    fn timestamp_is_epoch_seconds() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let m = Message::new("u", "m").with_timestamp(ts);
        assert_eq!(
            encode_message(TOKEN, &m).get("timestamp"),
            Some("1704164645")
        );
    }

    #[test]
    fn zero_timestamp_is_omitted() {
        let m = Message::new("u", "m").with_timestamp(Utc.timestamp_opt(0, 0).unwrap());
        assert!(!encode_message(TOKEN, &m).contains("timestamp"));
    }

    #[test]
    fn glance_count_tri_state() {
        let removed = Glance::new("u").count(GlanceField::Remove);
        let form = encode_glance(TOKEN, &removed);
        assert!(form.contains("count"));
        assert_eq!(form.get("count"), Some(""));

        let unset = Glance::new("u");
        assert!(!encode_glance(TOKEN, &unset).contains("count"));

        let set = Glance::new("u").count(GlanceField::Set(5));
        assert_eq!(encode_glance(TOKEN, &set).get("count"), Some("5"));
    }

    #[test]
    fn glance_text_fields_tri_state() {
        let g = Glance::new("u")
            .title(GlanceField::Set("Build".to_string()))
            .text(GlanceField::Remove)
            .percent(GlanceField::Set(42));
        let form = encode_glance(TOKEN, &g);
        assert_eq!(form.get("title"), Some("Build"));
        assert_eq!(form.get("text"), Some(""));
        assert!(!form.contains("subtext"));
        assert_eq!(form.get("percent"), Some("42"));
        assert!(!form.contains("message"));
    }

    #[test]
    fn glance_device_only_when_non_empty() {
        let g = Glance::new("u").with_device("watch");
        assert_eq!(encode_glance(TOKEN, &g).get("device"), Some("watch"));

        let g = Glance::new("u").with_device("");
        assert!(!encode_glance(TOKEN, &g).contains("device"));
    }

    #[test]
    fn encode_dispatches_on_variant() {
        let form = encode(TOKEN, &Notification::from(Message::new("u", "m")));
        assert!(form.contains("message"));

        let form = encode(TOKEN, &Notification::from(Glance::new("u")));
        assert!(!form.contains("message"));
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn encoding_is_deterministic() {
        let m = Message::new("u", "m").with_title("t").with_device("d");
        assert_eq!(encode_message(TOKEN, &m), encode_message(TOKEN, &m));
    }

    #[test]
    fn urlencoded_body_is_sorted_and_escaped() {
        let m = Message::new("u 1", "a&b=c");
        let body = encode_message("tok", &m).to_urlencoded();
        assert_eq!(body, "message=a%26b%3Dc&token=tok&user=u+1");
    }

    #[test]
    fn debug_redacts_token() {
        let form = encode_message("secret-token", &Message::new("u", "m"));
        let dbg = format!("{form:?}");
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("<redacted>"));
        assert!(dbg.contains("\"user\""));
    }
}
