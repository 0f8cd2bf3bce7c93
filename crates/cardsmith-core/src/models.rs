//! Domain models for the card-content pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A card ready to publish, built from one derived image.
///
/// Only the faction and description vary per card; the backend mutation
/// carries the remaining fields as fixed literals (see the associated
/// constants). Records are constructed per image at publish time, used for
/// exactly one network call, and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    /// Free-text category tag derived from the image filename prefix,
    /// lower-cased. Any token is accepted; there is no known-faction set.
    pub faction: String,
    /// Sidecar text when a `.txt` sibling exists, else a fixed placeholder.
    pub description: String,
}

impl CardRecord {
    /// Fixed name literal sent with every card.
    pub const NAME: &'static str = "card";
    /// Fixed cost sent with every card.
    pub const COST: u32 = 7;
    /// New cards start with zero plays.
    pub const FREQUENCY: u32 = 0;
    /// New cards start with zero favorites.
    pub const FAVORITED_COUNT: u32 = 0;

    pub fn new(faction: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            description: description.into(),
        }
    }
}

/// One option attached to a guild upgrade.
///
/// Input files carry arbitrary extra fields per option; everything other
/// than the tag bound is preserved verbatim through the flattened map and
/// forwarded to the backend untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildUpgradeOption {
    /// Upper bound on how many tags this option allows, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_tags_max: Option<f64>,
    /// All other fields from the input JSON (name, effects, ...).
    #[serde(flatten)]
    pub extras: serde_json::Map<String, Value>,
}

/// A guild upgrade definition, loaded from a JSON array.
///
/// `name` and `cost` are required; everything else defaults. The
/// record-level `allowsTagsMax` is always derived from the options via
/// [`GuildUpgrade::allows_tags_max`] - a value supplied at the top level of
/// the input JSON is ignored, never trusted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildUpgrade {
    pub name: String,
    pub cost: f64,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_exclusive_to_campaigns: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<GuildUpgradeOption>,
    #[serde(default)]
    pub allows_tags: Vec<String>,
}

impl GuildUpgrade {
    /// Maximum tag bound across all options, 0 when there are none.
    ///
    /// Options without a bound contribute 0, matching the backend's
    /// interpretation of an absent `allowsTagsMax`.
    pub fn allows_tags_max(&self) -> f64 {
        self.options
            .iter()
            .map(|option| option.allows_tags_max.unwrap_or(0.0))
            .fold(0.0, f64::max)
    }
}

/// Outcome of a single publish call: HTTP status plus the response body.
/// Used only for immediate logging, never persisted.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_record_defaults() {
        assert_eq!(CardRecord::NAME, "card");
        assert_eq!(CardRecord::COST, 7);
        assert_eq!(CardRecord::FREQUENCY, 0);
        assert_eq!(CardRecord::FAVORITED_COUNT, 0);
    }

    #[test]
    fn test_guild_upgrade_minimal_deserialization() {
        let json = r#"{"name": "Forge", "cost": 3}"#;
        let upgrade: GuildUpgrade = serde_json::from_str(json).unwrap();

        assert_eq!(upgrade.name, "Forge");
        assert_eq!(upgrade.cost, 3.0);
        assert!(!upgrade.is_unique);
        assert!(!upgrade.is_exclusive_to_campaigns);
        assert_eq!(upgrade.description, "");
        assert!(upgrade.options.is_empty());
        assert!(upgrade.allows_tags.is_empty());
    }

    #[test]
    fn test_allows_tags_max_empty_options() {
        let json = r#"{"name": "Forge", "cost": 3}"#;
        let upgrade: GuildUpgrade = serde_json::from_str(json).unwrap();
        assert_eq!(upgrade.allows_tags_max(), 0.0);
    }

    #[test]
    fn test_allows_tags_max_is_option_maximum() {
        let json = r#"{
            "name": "Armory",
            "cost": 5,
            "options": [
                {"name": "small", "allowsTagsMax": 2},
                {"name": "large", "allowsTagsMax": 4},
                {"name": "unbounded"}
            ]
        }"#;
        let upgrade: GuildUpgrade = serde_json::from_str(json).unwrap();
        assert_eq!(upgrade.allows_tags_max(), 4.0);
    }

    #[test]
    fn test_top_level_allows_tags_max_ignored() {
        // The derived bound always comes from the options, even when the
        // input carries a (stale) top-level value.
        let json = r#"{
            "name": "Armory",
            "cost": 5,
            "allowsTagsMax": 99,
            "options": [{"allowsTagsMax": 2}]
        }"#;
        let upgrade: GuildUpgrade = serde_json::from_str(json).unwrap();
        assert_eq!(upgrade.allows_tags_max(), 2.0);
    }

    #[test]
    fn test_option_extras_round_trip() {
        let json = r#"{"name": "small", "effect": "heal", "allowsTagsMax": 2}"#;
        let option: GuildUpgradeOption = serde_json::from_str(json).unwrap();

        assert_eq!(option.allows_tags_max, Some(2.0));
        assert_eq!(option.extras.get("name").unwrap(), "small");
        assert_eq!(option.extras.get("effect").unwrap(), "heal");

        let back = serde_json::to_value(&option).unwrap();
        assert_eq!(back.get("allowsTagsMax").unwrap(), 2.0);
        assert_eq!(back.get("effect").unwrap(), "heal");
    }

    #[test]
    fn test_option_without_bound_serializes_without_key() {
        let option = GuildUpgradeOption {
            allows_tags_max: None,
            extras: serde_json::Map::new(),
        };
        let value = serde_json::to_value(&option).unwrap();
        assert!(value.get("allowsTagsMax").is_none());
    }
}
