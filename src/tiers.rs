//! Donation tiers and override resolution.
//!
//! The tier set is closed: three preset amounts plus the `custom` sentinel
//! whose value is supplied by the donor. A [`TierTable`] always holds all
//! four entries; callers customise it with a partial [`TierOverrides`] map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Key of a donation tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKey {
    SpareChange,
    HalfTank,
    FullTank,
    Custom,
}

impl TierKey {
    /// Canonical order, also the display order in the modal.
    pub const ALL: [TierKey; 4] = [
        TierKey::SpareChange,
        TierKey::HalfTank,
        TierKey::FullTank,
        TierKey::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierKey::SpareChange => "spare_change",
            TierKey::HalfTank => "half_tank",
            TierKey::FullTank => "full_tank",
            TierKey::Custom => "custom",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TierKey::Custom)
    }

    fn index(&self) -> usize {
        match self {
            TierKey::SpareChange => 0,
            TierKey::HalfTank => 1,
            TierKey::FullTank => 2,
            TierKey::Custom => 3,
        }
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the four tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTier(pub String);

impl FromStr for TierKey {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TierKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

/// Display metadata and amount of one tier.
///
/// `value` is in reference units (USDC-equivalent). The custom sentinel
/// carries `0`, meaning "user supplied".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DonationAmount {
    pub label: String,
    pub value: f64,
    pub description: String,
    #[serde(alias = "emoji")]
    pub icon: String,
}

impl DonationAmount {
    pub fn new(
        label: impl Into<String>,
        value: f64,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value,
            description: description.into(),
            icon: icon.into(),
        }
    }
}

/// A total map from every [`TierKey`] to its [`DonationAmount`].
#[derive(Clone, Debug, PartialEq)]
pub struct TierTable {
    entries: [DonationAmount; 4],
}

impl TierTable {
    /// The built-in tier table.
    pub fn defaults() -> Self {
        Self {
            entries: [
                DonationAmount::new("Spare Change", 5.0, "Send a small tip", "🪙"),
                DonationAmount::new("Half Tank", 10.0, "Send a moderate tip", "⛽"),
                DonationAmount::new("Full Tank", 20.0, "Generous support", "🚀"),
                DonationAmount::new("Custom", 0.0, "User-specified crypto amount", "⚙️"),
            ],
        }
    }

    /// Overlay `overrides` onto `self`, producing a new table.
    ///
    /// An override replaces the whole entry; there is no field-level merge.
    pub fn with_overrides(&self, overrides: &TierOverrides) -> Self {
        let mut entries = self.entries.clone();
        for key in TierKey::ALL {
            if let Some(amount) = overrides.get(key) {
                entries[key.index()] = amount.clone();
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: TierKey) -> &DonationAmount {
        &self.entries[key.index()]
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TierKey, &DonationAmount)> {
        TierKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Resolve the effective tier table for one widget instance.
pub fn resolve(overrides: &TierOverrides) -> TierTable {
    TierTable::defaults().with_overrides(overrides)
}

/// A partial map of tier overrides.
///
/// Deserializes from a string-keyed object. Keys that do not name a tier are
/// dropped before their values are looked at; a malformed value under a known
/// key is still an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, serde_json::Value>", into = "BTreeMap<String, DonationAmount>")]
pub struct TierOverrides {
    entries: BTreeMap<TierKey, DonationAmount>,
}

impl TierOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: TierKey, amount: DonationAmount) -> Self {
        self.entries.insert(key, amount);
        self
    }

    pub fn insert(&mut self, key: TierKey, amount: DonationAmount) {
        self.entries.insert(key, amount);
    }

    pub fn get(&self, key: TierKey) -> Option<&DonationAmount> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build overrides from a string-keyed map, ignoring unknown keys.
    pub fn from_raw(raw: BTreeMap<String, DonationAmount>) -> Self {
        let mut entries = BTreeMap::new();
        for (key, amount) in raw {
            match key.parse::<TierKey>() {
                Ok(tier) => {
                    entries.insert(tier, amount);
                }
                Err(UnknownTier(name)) => {
                    tracing::debug!("Ignoring unknown donation tier '{}'", name);
                }
            }
        }
        Self { entries }
    }
}

impl TryFrom<BTreeMap<String, serde_json::Value>> for TierOverrides {
    type Error = serde_json::Error;

    fn try_from(raw: BTreeMap<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut known = BTreeMap::new();
        for (key, value) in raw {
            if key.parse::<TierKey>().is_ok() {
                known.insert(key, serde_json::from_value::<DonationAmount>(value)?);
            } else {
                tracing::debug!("Ignoring unknown donation tier '{}'", key);
            }
        }
        Ok(Self::from_raw(known))
    }
}

impl From<TierOverrides> for BTreeMap<String, DonationAmount> {
    fn from(overrides: TierOverrides) -> Self {
        overrides
            .entries
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect()
    }
}

/// Named override sets shown on the examples page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Default,
    Coffee,
    Membership,
    Creator,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Default, Preset::Coffee, Preset::Membership, Preset::Creator];

    pub fn overrides(&self) -> TierOverrides {
        match self {
            Preset::Default => TierOverrides::new(),
            Preset::Coffee => TierOverrides::new()
                .with(TierKey::SpareChange, DonationAmount::new("Coffee", 3.0, "Buy me a coffee", "☕"))
                .with(TierKey::HalfTank, DonationAmount::new("Lunch", 15.0, "Buy me lunch", "🍔")),
            Preset::Membership => TierOverrides::new()
                .with(TierKey::SpareChange, DonationAmount::new("Bronze", 5.0, "Bronze supporter", "🥉"))
                .with(TierKey::HalfTank, DonationAmount::new("Silver", 10.0, "Silver supporter", "🥈"))
                .with(TierKey::FullTank, DonationAmount::new("Gold", 25.0, "Gold supporter", "🥇")),
            Preset::Creator => TierOverrides::new()
                .with(TierKey::SpareChange, DonationAmount::new("Like", 1.0, "Loved your content!", "👍"))
                .with(TierKey::HalfTank, DonationAmount::new("Super Like", 5.0, "Really enjoyed your work!", "❤️"))
                .with(TierKey::FullTank, DonationAmount::new("Superfan", 20.0, "I'm your biggest fan!", "⭐")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== TierKey tests ====================

    #[test]
    fn test_tier_key_round_trips_through_str() {
        for key in TierKey::ALL {
            assert_eq!(key.as_str().parse::<TierKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_tier_key_unknown() {
        let err = "big_tank".parse::<TierKey>().unwrap_err();
        assert_eq!(err, UnknownTier("big_tank".to_string()));
    }

    // ==================== defaults tests ====================

    #[test]
    fn test_defaults_concrete_tiers_positive() {
        let table = TierTable::defaults();
        for (key, amount) in table.iter() {
            if key.is_custom() {
                assert_eq!(amount.value, 0.0);
            } else {
                assert!(amount.value > 0.0, "{} should be positive", key);
            }
        }
    }

    #[test]
    fn test_defaults_values() {
        let table = TierTable::defaults();
        assert_eq!(table.get(TierKey::SpareChange).value, 5.0);
        assert_eq!(table.get(TierKey::HalfTank).value, 10.0);
        assert_eq!(table.get(TierKey::FullTank).value, 20.0);
        assert_eq!(table.get(TierKey::Custom).label, "Custom");
    }

    // ==================== resolve tests ====================

    #[test]
    fn test_resolve_empty_overrides_is_defaults() {
        assert_eq!(resolve(&TierOverrides::new()), TierTable::defaults());
    }

    #[test]
    fn test_resolve_override_wins_absent_keeps_default() {
        let coffee = DonationAmount::new("Coffee", 3.0, "Buy me a coffee", "☕");
        let overrides = TierOverrides::new().with(TierKey::SpareChange, coffee.clone());
        let table = resolve(&overrides);
        let defaults = TierTable::defaults();

        assert_eq!(table.get(TierKey::SpareChange), &coffee);
        assert_eq!(table.get(TierKey::HalfTank), defaults.get(TierKey::HalfTank));
        assert_eq!(table.get(TierKey::FullTank), defaults.get(TierKey::FullTank));
        assert_eq!(table.get(TierKey::Custom), defaults.get(TierKey::Custom));
        assert_eq!(table.iter().count(), 4);
    }

    #[test]
    fn test_resolve_replaces_whole_entry() {
        // No field merge: an empty icon stays empty.
        let plain = DonationAmount::new("Plain", 7.0, "", "");
        let table = resolve(&TierOverrides::new().with(TierKey::FullTank, plain.clone()));
        assert_eq!(table.get(TierKey::FullTank), &plain);
    }

    #[test]
    fn test_resolve_does_not_mutate_defaults() {
        let base = TierTable::defaults();
        let _ = base.with_overrides(&Preset::Membership.overrides());
        assert_eq!(base, TierTable::defaults());
    }

    #[test]
    fn test_custom_value_can_be_overridden() {
        let table = resolve(&TierOverrides::new().with(
            TierKey::Custom,
            DonationAmount::new("Anything", 1.0, "Pick", "✏"),
        ));
        assert_eq!(table.get(TierKey::Custom).value, 1.0);
    }

    // ==================== boundary tests ====================

    #[test]
    fn test_from_raw_ignores_unknown_keys() {
        let mut raw = BTreeMap::new();
        raw.insert("half_tank".to_string(), DonationAmount::new("Lunch", 15.0, "Buy me lunch", "🍔"));
        raw.insert("mega_tank".to_string(), DonationAmount::new("Mega", 99.0, "", ""));
        let overrides = TierOverrides::from_raw(raw);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get(TierKey::HalfTank).unwrap().label, "Lunch");
    }

    #[test]
    fn test_overrides_deserialize_from_json() {
        let json = r#"{
            "spare_change": {"label": "Coffee", "value": 3, "description": "Buy me a coffee", "emoji": "☕"},
            "unknown": {"label": "X", "value": 1, "description": "", "icon": ""}
        }"#;
        let overrides: TierOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(overrides.len(), 1);
        let coffee = overrides.get(TierKey::SpareChange).unwrap();
        assert_eq!(coffee.icon, "☕");
        assert_eq!(coffee.value, 3.0);
    }

    #[test]
    fn test_unknown_key_with_any_value_is_ignored() {
        let json = r#"{
            "mega_tank": 5,
            "full_tank": {"label": "Big", "value": 50, "description": "Fill it up", "icon": "🚀"},
            "tip_jar": "not a tier"
        }"#;
        let overrides: TierOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get(TierKey::FullTank).unwrap().value, 50.0);
    }

    #[test]
    fn test_malformed_known_key_is_an_error() {
        let result: Result<TierOverrides, _> = serde_json::from_str(r#"{"half_tank": 5}"#);
        assert!(result.is_err());
    }

    // ==================== preset tests ====================

    #[test]
    fn test_presets_leave_custom_untouched() {
        for preset in Preset::ALL {
            let table = resolve(&preset.overrides());
            assert_eq!(table.get(TierKey::Custom), TierTable::defaults().get(TierKey::Custom));
        }
    }

    #[test]
    fn test_coffee_preset_keeps_full_tank_default() {
        let table = resolve(&Preset::Coffee.overrides());
        assert_eq!(table.get(TierKey::SpareChange).label, "Coffee");
        assert_eq!(table.get(TierKey::HalfTank).value, 15.0);
        assert_eq!(table.get(TierKey::FullTank).label, "Full Tank");
    }
}
