//! Sequential batch drivers for the three pipeline stages.
//!
//! Each driver enumerates its inputs, processes them strictly one at a
//! time, and records one outcome per item. A failing item is logged with
//! enough context to retry it manually and never aborts the rest of the
//! batch. Failures that make the whole batch impossible (unreadable
//! directory, malformed JSON file) propagate as errors instead.
//!
//! Directory enumeration follows the filesystem's listing order, which is
//! not guaranteed stable across runs or machines.

use cardsmith_client::GraphqlClient;
use cardsmith_core::batch::{BatchStats, ItemOutcome};
use cardsmith_core::error::AppError;
use cardsmith_core::models::GuildUpgrade;
use cardsmith_media::{derived_suffix, is_derived, ImageTransformer, MetadataResolver};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Cooperative cancellation flag, set by the Ctrl-C handler and checked at
/// the top of every loop iteration. The batch stops between items; an item
/// in flight always completes, so no record is left half-published.
pub type CancelFlag = Arc<AtomicBool>;

/// Creates an unset cancellation flag.
pub fn cancel_flag() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}

fn is_cancelled(cancel: &CancelFlag) -> bool {
    cancel.load(Ordering::Relaxed)
}

/// Raster extensions accepted as pipeline inputs.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Lists the raster images directly inside `dir`, in directory order.
fn list_raster_images(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_raster = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                RASTER_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if path.is_file() && is_raster {
            files.push(path);
        }
    }
    Ok(files)
}

/// Resizes every raw image in a directory.
///
/// Files already carrying a transform suffix are skipped so re-running the
/// stage does not resize its own outputs.
pub fn run_resize(
    dir: &Path,
    width: u32,
    quality: u8,
    cancel: &CancelFlag,
) -> Result<BatchStats, AppError> {
    let transformer = ImageTransformer::new(width, quality)?;

    let files: Vec<_> = list_raster_images(dir)?
        .into_iter()
        .filter(|path| !is_derived(path))
        .collect();
    let total = files.len();
    info!("Found {} images to resize in {}", total, dir.display());

    let mut stats = BatchStats::new();
    for (i, path) in files.iter().enumerate() {
        if is_cancelled(cancel) {
            warn!("Cancelled after {} of {} items", i, total);
            break;
        }
        match transformer.transform(path) {
            Ok(derived) => {
                info!(
                    "[{}/{}] Resized {} -> {}",
                    i + 1,
                    total,
                    path.display(),
                    derived.display()
                );
                stats.record(ItemOutcome::Succeeded);
            }
            Err(e) => {
                error!(
                    "[{}/{}] Failed to resize {}: {}",
                    i + 1,
                    total,
                    path.display(),
                    e.user_message()
                );
                stats.record(ItemOutcome::Failed);
            }
        }
    }
    Ok(stats)
}

/// Publishes every derived image in a directory as a card.
///
/// Only files named by a resize run with the same width/quality are
/// published; each gets its faction and description resolved first.
pub async fn run_publish_cards(
    dir: &Path,
    width: u32,
    quality: u8,
    client: &GraphqlClient,
    cancel: &CancelFlag,
) -> Result<BatchStats, AppError> {
    let suffix = derived_suffix(width, quality);
    let resolver = MetadataResolver::new(width, quality);

    let files: Vec<_> = list_raster_images(dir)?
        .into_iter()
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.ends_with(&suffix))
        })
        .collect();
    let total = files.len();
    info!("Found {} derived images to publish in {}", total, dir.display());

    let mut stats = BatchStats::new();
    for (i, path) in files.iter().enumerate() {
        if is_cancelled(cancel) {
            warn!("Cancelled after {} of {} items", i, total);
            break;
        }

        let card = match resolver.resolve(path) {
            Ok(card) => card,
            Err(e) => {
                error!(
                    "[{}/{}] Failed to resolve metadata for {}: {}",
                    i + 1,
                    total,
                    path.display(),
                    e.user_message()
                );
                stats.record(ItemOutcome::Failed);
                continue;
            }
        };

        match client.publish_card(&card, path).await {
            Ok(result) => {
                info!(
                    "[{}/{}] Published card for faction '{}' ({}): HTTP {}",
                    i + 1,
                    total,
                    card.faction,
                    path.display(),
                    result.status
                );
                stats.record(ItemOutcome::Succeeded);
            }
            Err(e) => {
                error!(
                    "[{}/{}] Failed to publish {} (faction '{}'): {}",
                    i + 1,
                    total,
                    path.display(),
                    card.faction,
                    e.user_message()
                );
                stats.record(ItemOutcome::Failed);
            }
        }
    }
    Ok(stats)
}

/// Publishes every guild upgrade defined in a JSON array file, in array
/// order.
pub async fn run_publish_upgrades(
    file: &Path,
    client: &GraphqlClient,
    cancel: &CancelFlag,
) -> Result<BatchStats, AppError> {
    let text = std::fs::read_to_string(file)?;
    let upgrades: Vec<GuildUpgrade> = serde_json::from_str(&text)?;
    let total = upgrades.len();
    info!("Loaded {} guild upgrades from {}", total, file.display());

    let mut stats = BatchStats::new();
    for (i, upgrade) in upgrades.iter().enumerate() {
        if is_cancelled(cancel) {
            warn!("Cancelled after {} of {} items", i, total);
            break;
        }
        match client.publish_guild_upgrade(upgrade).await {
            Ok(result) => {
                info!(
                    "[{}/{}] Published guild upgrade '{}': HTTP {}",
                    i + 1,
                    total,
                    upgrade.name,
                    result.status
                );
                stats.record(ItemOutcome::Succeeded);
            }
            Err(e) => {
                error!(
                    "[{}/{}] Failed to publish guild upgrade '{}': {}",
                    i + 1,
                    total,
                    upgrade.name,
                    e.user_message()
                );
                stats.record(ItemOutcome::Failed);
            }
        }
    }
    Ok(stats)
}
