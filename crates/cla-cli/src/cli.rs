//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Contest log analyzer.
///
/// Reconstructs operating sessions from ADIF contest logs and reports
/// per-operator rates, Run vs Search-and-Pounce breakdown, silent periods,
/// and data quality.
#[derive(Debug, Parser)]
#[command(name = "cla", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze an ADIF log file.
    Analyze {
        /// Path to the ADIF (.adi) log file.
        file: PathBuf,

        /// Emit the full analysis as JSON instead of the text report.
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Session break threshold in minutes.
        #[arg(long)]
        session_gap: Option<i64>,

        /// Silent-period reporting threshold in minutes.
        #[arg(long)]
        silence_gap: Option<i64>,

        /// Frequency tolerance for Run detection, in kHz.
        #[arg(long)]
        freq_tolerance: Option<f64>,
    },
}
