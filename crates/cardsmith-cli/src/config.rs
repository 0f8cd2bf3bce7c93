use cardsmith_core::config::DEFAULT_ENDPOINT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "cardsmith")]
#[command(
    author,
    version,
    about = "Batch pipeline for card-game content: resize card images, publish cards and guild upgrades"
)]
#[command(after_help = "Examples:
  cardsmith resize ./cropped_cards --width 400 --quality 50
  cardsmith publish-cards ./cropped_cards
  cardsmith publish-upgrades ./guild_upgrades.json --endpoint http://localhost:4000/graphql")]
pub struct Config {
    /// GraphQL endpoint receiving card and guild-upgrade mutations
    #[arg(long, env = "CARDSMITH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resize cropped card images to a target width and quality
    #[command(after_help = "Example: cardsmith resize ./cropped_cards --width 400 --quality 50

Derived files land next to their sources, named <stem>_resized_<width>_<quality>.<ext>.
Files already carrying a transform suffix are skipped.")]
    Resize {
        /// Directory of raw card images
        dir: PathBuf,

        /// Target width in pixels; height follows the source aspect ratio
        #[arg(long, default_value_t = 400)]
        width: u32,

        /// Encoder quality for the lossy pass (1-100)
        #[arg(long, default_value_t = 50)]
        quality: u8,
    },
    /// Publish resized card images as card records
    #[command(after_help = "Example: cardsmith publish-cards ./cropped_cards --width 400 --quality 50

Only files named by a matching resize run are published. A sibling <stem>.txt
supplies the card description when present.")]
    PublishCards {
        /// Directory holding the derived images (and optional .txt sidecars)
        dir: PathBuf,

        /// Width used by the resize run to publish outputs of
        #[arg(long, default_value_t = 400)]
        width: u32,

        /// Quality used by the resize run to publish outputs of
        #[arg(long, default_value_t = 50)]
        quality: u8,
    },
    /// Publish guild upgrades from a JSON definition file
    #[command(after_help = "Example: cardsmith publish-upgrades ./guild_upgrades.json")]
    PublishUpgrades {
        /// JSON file holding an array of guild-upgrade definitions
        file: PathBuf,
    },
}
