//! CLI commands using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// QRTrust - QR code phishing checker
///
/// Scans QR codes and checks the URLs they carry against PhishTank
/// before you open them.
#[derive(Parser)]
#[command(name = "qrtrust")]
#[command(version)]
#[command(about = "Check QR code URLs against a phishing database", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Print the outcome as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a URL without scanning
    Check {
        /// URL to check
        url: String,
    },

    /// Scan a recorded frame log, then check the accepted code
    Replay {
        /// Frame log to replay
        frames: PathBuf,

        /// Delay between frames in milliseconds
        #[arg(long, default_value = "0")]
        interval_ms: u64,

        /// Ideal frame width passed to the camera
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Ideal frame height passed to the camera
        #[arg(long, default_value = "720")]
        height: u32,
    },
}
