use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "menunav")]
#[command(author, version, about = "Inspect DVD menu highlight packets")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a raw PCI packet and list its buttons
    Inspect {
        /// File holding the PCI packet
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which button a point falls on
    Hit {
        /// File holding the PCI packet
        file: PathBuf,

        /// Horizontal video coordinate
        #[arg(allow_negative_numbers = true)]
        x: i32,

        /// Vertical video coordinate
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },

    /// Show the action highlight of a button
    Highlight {
        /// File holding the PCI packet
        file: PathBuf,

        /// 1-based button number
        button: u16,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    CheckConfig {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
