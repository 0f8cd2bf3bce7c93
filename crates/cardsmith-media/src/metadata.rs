use cardsmith_core::error::AppError;
use cardsmith_core::models::CardRecord;
use std::path::Path;
use tracing::debug;

use crate::resize::derived_suffix;

/// Description used when a derived image has no sidecar text file.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Derives per-card metadata from a derived image's filename.
///
/// The faction is the first underscore-delimited token of the file stem,
/// lower-cased. Any token is accepted as-is; there is no known-faction set
/// to validate against.
///
/// The description comes from a sibling `.txt` file sharing the source's
/// base name (the transform suffix stripped), or a fixed placeholder when
/// no sidecar exists. Sidecar text is passed through verbatim; the JSON
/// layer of the publisher handles all escaping.
pub struct MetadataResolver {
    suffix: String,
}

impl MetadataResolver {
    /// Creates a resolver for outputs of a transform with the given
    /// parameters.
    pub fn new(width: u32, quality: u8) -> Self {
        Self {
            suffix: derived_suffix(width, quality),
        }
    }

    /// Resolves the faction and description for one derived image.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SidecarRead` when a sidecar file exists but
    /// cannot be read. A missing sidecar is not an error.
    pub fn resolve(&self, derived: &Path) -> Result<CardRecord, AppError> {
        let stem = derived.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let faction = stem.split('_').next().unwrap_or("").to_lowercase();

        let base = stem.strip_suffix(self.suffix.as_str()).unwrap_or(stem);
        let sidecar = derived.with_file_name(format!("{}.txt", base));

        let description = if sidecar.exists() {
            debug!(sidecar = %sidecar.display(), "Reading sidecar description");
            std::fs::read_to_string(&sidecar).map_err(|e| AppError::SidecarRead {
                path: sidecar.clone(),
                source: e,
            })?
        } else {
            DEFAULT_DESCRIPTION.to_string()
        };

        Ok(CardRecord::new(faction, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_faction_is_lowercased_first_token() {
        let resolver = MetadataResolver::new(400, 50);
        let record = resolver
            .resolve(Path::new("cards/Wild_AG_Units059_card_1_1_resized_400_50.png"))
            .unwrap();
        assert_eq!(record.faction, "wild");
    }

    #[test]
    fn test_unknown_faction_token_accepted() {
        let resolver = MetadataResolver::new(400, 50);
        let record = resolver
            .resolve(Path::new("Banana_card_resized_400_50.png"))
            .unwrap();
        assert_eq!(record.faction, "banana");
    }

    #[test]
    fn test_missing_sidecar_uses_placeholder() {
        let dir = tempdir().unwrap();
        let derived = dir.path().join("Chaos_card_0_0_resized_400_50.png");

        let resolver = MetadataResolver::new(400, 50);
        let record = resolver.resolve(&derived).unwrap();
        assert_eq!(record.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_sidecar_text_passed_through_verbatim() {
        let dir = tempdir().unwrap();
        let derived = dir.path().join("Chaos_card_0_0_resized_400_50.png");
        let sidecar = dir.path().join("Chaos_card_0_0.txt");
        std::fs::write(&sidecar, "Deals 3 damage (\"burn\").\nCosts {X}.").unwrap();

        let resolver = MetadataResolver::new(400, 50);
        let record = resolver.resolve(&derived).unwrap();

        // Quotes, parens, braces, and newlines survive; JSON encoding at
        // the publish layer makes stripping unnecessary.
        assert_eq!(record.description, "Deals 3 damage (\"burn\").\nCosts {X}.");
    }

    #[test]
    fn test_sidecar_lookup_strips_transform_suffix() {
        let dir = tempdir().unwrap();
        let derived = dir.path().join("Order_hero_resized_320_60.png");
        std::fs::write(dir.path().join("Order_hero.txt"), "A noble hero").unwrap();

        let resolver = MetadataResolver::new(320, 60);
        let record = resolver.resolve(&derived).unwrap();
        assert_eq!(record.description, "A noble hero");
    }

    #[test]
    fn test_unreadable_sidecar_is_surfaced() {
        let dir = tempdir().unwrap();
        let derived = dir.path().join("Wild_card_resized_400_50.png");
        // A directory at the sidecar path forces a read error on an
        // existing entry.
        std::fs::create_dir(dir.path().join("Wild_card.txt")).unwrap();

        let resolver = MetadataResolver::new(400, 50);
        let err = resolver.resolve(&derived).unwrap_err();
        assert!(matches!(err, AppError::SidecarRead { .. }));
    }
}
