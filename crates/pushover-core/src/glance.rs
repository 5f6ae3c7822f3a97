//! Glance updates: small persistent status displays (watch faces, widgets).
//!
//! Every optional glance field has three states. Leaving a field
//! [`GlanceField::Unset`] keeps whatever the device currently shows;
//! [`GlanceField::Remove`] sends the key with an empty value, which tells
//! the service to clear it.

/// A glance field that can be left alone, set, or explicitly cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GlanceField<T> {
    /// Not part of this update.
    #[default]
    Unset,
    /// Replace the displayed value.
    Set(T),
    /// Clear the displayed value.
    Remove,
}

impl<T> GlanceField<T> {
    /// Whether the field is left out of the update.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The value, if set.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            Self::Unset | Self::Remove => None,
        }
    }
}

impl<T: ToString> GlanceField<T> {
    /// Wire value: `None` to omit the key, `Some("")` to clear it.
    pub fn wire_value(&self) -> Option<String> {
        match self {
            Self::Unset => None,
            Self::Set(v) => Some(v.to_string()),
            Self::Remove => Some(String::new()),
        }
    }
}

impl<T> From<T> for GlanceField<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

/// A glance update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glance {
    /// User key of the recipient.
    pub user: String,
    /// Target device; `None` updates all devices.
    pub device: Option<String>,
    /// Short title (up to 100 characters).
    pub title: GlanceField<String>,
    /// Main line of text (up to 100 characters).
    pub text: GlanceField<String>,
    /// Second line of text (up to 100 characters).
    pub subtext: GlanceField<String>,
    /// Integer counter.
    pub count: GlanceField<i64>,
    /// Progress bar or circle, 0 to 100.
    pub percent: GlanceField<i64>,
}

impl Glance {
    /// Create an update that touches no fields yet.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }

    /// Target a single device.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Set or clear the title.
    #[must_use]
    pub fn title(mut self, title: GlanceField<String>) -> Self {
        self.title = title;
        self
    }

    /// Set or clear the text line.
    #[must_use]
    pub fn text(mut self, text: GlanceField<String>) -> Self {
        self.text = text;
        self
    }

    /// Set or clear the subtext line.
    #[must_use]
    pub fn subtext(mut self, subtext: GlanceField<String>) -> Self {
        self.subtext = subtext;
        self
    }

    /// Set or clear the counter.
    #[must_use]
    pub fn count(mut self, count: GlanceField<i64>) -> Self {
        self.count = count;
        self
    }

    /// Set or clear the percentage.
    #[must_use]
    pub fn percent(mut self, percent: GlanceField<i64>) -> Self {
        self.percent = percent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_field_is_unset() {
        let field: GlanceField<i64> = GlanceField::default();
        assert!(field.is_unset());
        assert_eq!(field.wire_value(), None);
    }

    #[test]
    fn set_field_wire_value() {
        assert_eq!(GlanceField::Set(5).wire_value(), Some("5".to_string()));
        assert_eq!(GlanceField::Set(0).wire_value(), Some("0".to_string()));
        assert_eq!(GlanceField::from(7).as_set(), Some(&7));
    }

    #[test]
    fn remove_field_is_empty_not_absent() {
        let field: GlanceField<String> = GlanceField::Remove;
        assert!(!field.is_unset());
        assert_eq!(field.as_set(), None);
        assert_eq!(field.wire_value(), Some(String::new()));
    }

    #[test]
    fn set_to_zero_differs_from_remove() {
        assert_ne!(
            GlanceField::Set(0).wire_value(),
            GlanceField::<i64>::Remove.wire_value()
        );
    }

    #[test]
    fn builder_touches_only_named_fields() {
        let g = Glance::new("u1")
            .count(GlanceField::Set(3))
            .percent(GlanceField::Remove);
        assert_eq!(g.user, "u1");
        assert!(g.title.is_unset());
        assert!(g.text.is_unset());
        assert_eq!(g.count, GlanceField::Set(3));
        assert_eq!(g.percent, GlanceField::Remove);
    }
}
