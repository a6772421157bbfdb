use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arrlink")]
#[command(author, version, about = "Configure Prowlarr, the *arr apps and their download client")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Force update API keys even if old keys still work
    #[arg(long, global = true)]
    pub force_update: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register applications and download clients (default)
    Configure,

    /// List the applications configured in Prowlarr
    ListApps,

    /// Run Prowlarr's connection test for one application
    TestApp {
        /// Application name as shown in Prowlarr
        #[arg(required = true)]
        name: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
