//! confsync CLI
//!
//! Command-line tools for inspecting confsync data.
//!
//! # Commands
//!
//! - `diff` - Print the patch between two flat JSON documents
//! - `cache` - Read, write and purge a file-backed evicting cache
//! - `keymap` - Show or reset a stored keymap override document
//! - `templates` - Compute template proposals for a prefix

mod commands;

use clap::{Parser, Subcommand};
use commands::cache::CacheAction;
use commands::keymap::KeymapAction;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// confsync command-line tools.
#[derive(Parser)]
#[command(name = "confsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the patch turning BASE into TARGET
    Diff {
        /// Base document
        base: PathBuf,

        /// Target document
        target: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Operate a file-backed evicting cache
    Cache {
        /// Path to the cache file
        #[arg(short, long)]
        path: PathBuf,

        /// Simulated quota in bytes
        #[arg(short, long)]
        quota: Option<usize>,

        #[command(subcommand)]
        action: CacheCommand,
    },

    /// Inspect stored keymap overrides
    Keymap {
        /// Directory holding the remote config documents
        #[arg(short, long)]
        dir: PathBuf,

        /// Platform name (windows, mac, linux, ...); defaults to this machine
        #[arg(long)]
        platform: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        #[command(subcommand)]
        action: KeymapCommand,
    },

    /// Compute template proposals
    Templates {
        /// Template catalog JSON file
        #[arg(long)]
        file: PathBuf,

        /// Cache the catalog in this file
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Language scope
        #[arg(short, long, default_value = "js")]
        scope: String,

        /// Offset the prefix ends at (defaults to the prefix length)
        #[arg(short, long)]
        offset: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Word being typed
        #[arg(default_value = "")]
        prefix: String,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Print a value
    Get {
        /// Key to read
        key: String,
    },
    /// Store a value
    Put {
        /// Key to write
        key: String,
        /// Value to write
        value: String,
        /// Stamp the entry so it can be evicted
        #[arg(long)]
        stamp: bool,
    },
    /// Remove stale stamped entries
    Purge {
        /// Remove entries older than this many seconds
        #[arg(long, conflicts_with = "level")]
        max_age_secs: Option<u64>,
        /// Use this eviction ladder level (0 = oldest threshold)
        #[arg(long)]
        level: Option<usize>,
    },
    /// Print the serialized size
    Size,
    /// List keys
    Keys,
}

#[derive(Subcommand)]
enum KeymapCommand {
    /// Print the stored overrides
    Show,
    /// Clear the stored overrides
    Reset,
}

impl From<CacheCommand> for CacheAction {
    fn from(command: CacheCommand) -> Self {
        match command {
            CacheCommand::Get { key } => CacheAction::Get { key },
            CacheCommand::Put { key, value, stamp } => CacheAction::Put { key, value, stamp },
            CacheCommand::Purge {
                max_age_secs,
                level,
            } => CacheAction::Purge {
                max_age_secs,
                level,
            },
            CacheCommand::Size => CacheAction::Size,
            CacheCommand::Keys => CacheAction::Keys,
        }
    }
}

impl From<KeymapCommand> for KeymapAction {
    fn from(command: KeymapCommand) -> Self {
        match command {
            KeymapCommand::Show => KeymapAction::Show,
            KeymapCommand::Reset => KeymapAction::Reset,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Diff {
            base,
            target,
            format,
        } => {
            commands::diff::run(&base, &target, &format)?;
        }
        Commands::Cache {
            path,
            quota,
            action,
        } => {
            commands::cache::run(&path, quota, action.into())?;
        }
        Commands::Keymap {
            dir,
            platform,
            format,
            action,
        } => {
            commands::keymap::run(&dir, platform.as_deref(), action.into(), &format).await?;
        }
        Commands::Templates {
            file,
            cache,
            scope,
            offset,
            format,
            prefix,
        } => {
            commands::templates::run(&file, cache.as_deref(), &scope, &prefix, offset, &format)
                .await?;
        }
        Commands::Version => {
            println!("confsync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
