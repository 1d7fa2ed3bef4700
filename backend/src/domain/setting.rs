//! Per-tenant settings.
//!
//! Settings are string key/value pairs unique per tenant. Three well-known
//! boolean toggles are seeded when a tenant is provisioned; any other key is
//! free-form.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::validation::FieldIssue;
use super::TenantId;

/// Longest accepted free-form value.
pub const SETTING_VALUE_MAX: usize = 255;
/// Longest accepted description.
pub const SETTING_DESCRIPTION_MAX: usize = 500;
/// Value reported for settings that have never been stored.
pub const DEFAULT_TOGGLE_VALUE: &str = "true";

/// Toggles every tenant starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownSetting {
    /// Reject registrations whose email already exists for the tenant.
    DuplicateEmailCheck,
    /// Seeded and editable for the dashboard; registration ignores it.
    DuplicatePhoneCheck,
    /// Require the gate video before the registration form unlocks.
    VideoRequirementEnabled,
}

impl WellKnownSetting {
    /// Every well-known toggle in seeding order.
    pub const ALL: [Self; 3] = [
        Self::DuplicateEmailCheck,
        Self::DuplicatePhoneCheck,
        Self::VideoRequirementEnabled,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DuplicateEmailCheck => "duplicate_email_check",
            Self::DuplicatePhoneCheck => "duplicate_phone_check",
            Self::VideoRequirementEnabled => "video_requirement_enabled",
        }
    }

    /// Description seeded alongside the default value.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DuplicateEmailCheck => {
                "Enable duplicate email checking to prevent multiple registrations with same email"
            }
            Self::DuplicatePhoneCheck => {
                "Enable duplicate phone checking to prevent multiple registrations with same phone"
            }
            Self::VideoRequirementEnabled => {
                "Require users to watch video before registration form unlocks"
            }
        }
    }

    /// Look up a well-known toggle by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|setting| setting.key() == key)
    }

    /// Validated key for this toggle.
    #[must_use]
    pub fn setting_key(self) -> SettingKey {
        SettingKey(self.key().to_owned())
    }
}

static KEY_RE: OnceLock<Regex> = OnceLock::new();

fn key_regex() -> &'static Regex {
    KEY_RE.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9_]{0,63}$")
            .unwrap_or_else(|error| panic!("setting key regex failed to compile: {error}"))
    })
}

/// Snake-case setting key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingKey(String);

impl SettingKey {
    /// Validate a key.
    ///
    /// # Errors
    /// Returns a `key` field issue unless the input matches
    /// `^[a-z][a-z0-9_]{0,63}$`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldIssue> {
        let raw = raw.as_ref();
        if key_regex().is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(FieldIssue::new(
                "key",
                "invalid_key",
                "Setting key may only contain lowercase letters, digits and underscores",
            ))
        }
    }

    /// The well-known toggle this key names, if any.
    #[must_use]
    pub fn well_known(&self) -> Option<WellKnownSetting> {
        WellKnownSetting::from_key(&self.0)
    }
}

impl AsRef<str> for SettingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated upsert request for one setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingUpdate {
    /// Target key.
    pub key: SettingKey,
    /// New value.
    pub value: String,
    /// New description; `None` keeps the stored one.
    pub description: Option<String>,
}

impl SettingUpdate {
    /// Validate an upsert. Well-known toggles only take `"true"`/`"false"`.
    ///
    /// # Errors
    /// Returns a field issue for an out-of-range value or description.
    pub fn new(
        key: SettingKey,
        value: &str,
        description: Option<&str>,
    ) -> Result<Self, FieldIssue> {
        let value = value.trim();
        if key.well_known().is_some() {
            if value != "true" && value != "false" {
                return Err(FieldIssue::new(
                    "value",
                    "invalid_toggle",
                    format!("{key} must be \"true\" or \"false\""),
                ));
            }
        } else if value.is_empty() || value.chars().count() > SETTING_VALUE_MAX {
            return Err(FieldIssue::new(
                "value",
                "invalid_value",
                format!("Setting value must be 1 to {SETTING_VALUE_MAX} characters"),
            ));
        }
        let description = description.map(str::trim);
        if description.is_some_and(|text| text.chars().count() > SETTING_DESCRIPTION_MAX) {
            return Err(FieldIssue::new(
                "description",
                "too_long",
                format!("Description must be at most {SETTING_DESCRIPTION_MAX} characters"),
            ));
        }
        Ok(Self {
            key,
            value: value.to_owned(),
            description: description.map(str::to_owned),
        })
    }

    /// Seed value for a well-known toggle.
    #[must_use]
    pub fn seed(setting: WellKnownSetting) -> Self {
        Self {
            key: setting.setting_key(),
            value: DEFAULT_TOGGLE_VALUE.to_owned(),
            description: Some(setting.description().to_owned()),
        }
    }

    /// Seeds for every well-known toggle.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        WellKnownSetting::ALL.into_iter().map(Self::seed).collect()
    }
}

/// Stored setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    /// Database identifier.
    pub id: i32,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Key, unique per tenant.
    pub key: SettingKey,
    /// Current value.
    pub value: String,
    /// Optional operator-facing description.
    pub description: Option<String>,
    /// Last write instant.
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Interpret the value as a toggle; only the exact string `"true"` is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.value == "true"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("duplicate_email_check", Some(WellKnownSetting::DuplicateEmailCheck))]
    #[case("video_requirement_enabled", Some(WellKnownSetting::VideoRequirementEnabled))]
    #[case("hero_headline", None)]
    fn recognises_well_known_keys(
        #[case] raw: &str,
        #[case] expected: Option<WellKnownSetting>,
    ) {
        let key = SettingKey::new(raw).expect("valid key");
        assert_eq!(key.well_known(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("Video")]
    #[case("1st")]
    #[case("video-requirement")]
    fn rejects_malformed_keys(#[case] raw: &str) {
        assert!(SettingKey::new(raw).is_err());
    }

    #[rstest]
    #[case("true", true)]
    #[case(" false ", true)]
    #[case("yes", false)]
    #[case("", false)]
    fn toggles_only_take_booleans(#[case] value: &str, #[case] valid: bool) {
        let key = WellKnownSetting::DuplicateEmailCheck.setting_key();
        assert_eq!(SettingUpdate::new(key, value, None).is_ok(), valid);
    }

    #[rstest]
    fn free_form_values_are_bounded() {
        let key = SettingKey::new("hero_headline").expect("valid key");
        assert!(SettingUpdate::new(key.clone(), "Win big", None).is_ok());
        assert!(SettingUpdate::new(key.clone(), "  ", None).is_err());
        let long = "x".repeat(SETTING_VALUE_MAX + 1);
        assert!(SettingUpdate::new(key, &long, None).is_err());
    }

    #[rstest]
    fn defaults_seed_three_enabled_toggles() {
        let defaults = SettingUpdate::defaults();
        let keys: Vec<_> = defaults.iter().map(|seed| seed.key.as_ref()).collect();
        assert_eq!(
            keys,
            [
                "duplicate_email_check",
                "duplicate_phone_check",
                "video_requirement_enabled"
            ]
        );
        assert!(defaults.iter().all(|seed| seed.value == "true"));
        assert!(defaults.iter().all(|seed| seed.description.is_some()));
    }
}
