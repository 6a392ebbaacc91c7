use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill missing translations of a stored record
    Translate {
        /// Directory holding the JSON records
        #[arg(short, long)]
        store: PathBuf,

        /// Record id (file name without .json)
        #[arg(short, long)]
        id: String,
    },

    /// Save a record into the store and fire the save hook on it
    Save {
        /// Directory holding the JSON records
        #[arg(short, long)]
        store: PathBuf,

        /// Record JSON file to save
        #[arg(short, long)]
        input: PathBuf,

        /// Save without triggering translation
        #[arg(long)]
        skip_translation: bool,
    },

    /// Check the API key and DeepL connectivity
    Check,

    /// Print the slug form of a text
    Slug {
        /// Text to normalize
        text: String,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Destination file
        #[arg(short, long, default_value = "auto-translate.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}
