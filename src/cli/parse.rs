//! CLI parse: clap types for volconfig. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// volconfig - volume configuration for tenants and pools
#[derive(Parser)]
#[command(name = "volconfig")]
#[command(about = "Manage per-volume storage configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory searched for volconfig.toml
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage volumes
    Volume {
        #[command(subcommand)]
        command: VolumeCommands,
    },
    /// Inspect pools
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },
    /// Manage tenants and their default options
    Tenant {
        #[command(subcommand)]
        command: TenantCommands,
    },
    /// List the option keys accepted by `volume create -o`
    Keys,
}

#[derive(Subcommand)]
pub enum VolumeCommands {
    /// Create a volume from a tenant's defaults
    Create {
        /// Tenant whose defaults apply
        tenant: String,
        /// Volume as <pool>/<name>
        volume: String,
        /// Option override as key=value (repeatable)
        #[arg(short = 'o', long = "opt", value_parser = parse_key_value)]
        opts: Vec<(String, String)>,
    },
    /// Show a volume's configuration
    Get {
        /// Volume as <pool>/<name>
        volume: String,
    },
    /// Remove a volume's configuration
    Remove {
        /// Volume as <pool>/<name>
        volume: String,
    },
    /// List volumes in a pool
    List {
        pool: String,
    },
}

#[derive(Subcommand)]
pub enum PoolCommands {
    /// List pools with at least one volume
    List,
}

#[derive(Subcommand)]
pub enum TenantCommands {
    /// Store a tenant's configuration from a JSON or TOML file
    Upload {
        name: String,
        file: PathBuf,
    },
    /// Show a tenant's configuration
    Get {
        name: String,
    },
    /// Delete a tenant
    Delete {
        name: String,
    },
    /// List tenants
    List,
}

/// Parse `key=value`. The value may itself contain `=`.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {:?}", input)),
    }
}

/// Split `<pool>/<name>`.
pub fn parse_volume_ref(input: &str) -> Option<(&str, &str)> {
    input.split_once('/')
}
