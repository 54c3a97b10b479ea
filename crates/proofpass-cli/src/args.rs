//! Command-line argument definitions for the ProofPass tools.
//!
//! Both tools run without arguments; everything here has a default.

use clap::Parser;

use proofpass_handbook::content::OUTPUT_FILE;

/// Generate the ProofPass developer handbook (PDF)
#[derive(Parser, Debug, Clone)]
#[command(name = "proofpass-handbook", author, version, about, long_about = None)]
pub struct HandbookArgs {
    /// Path of the generated PDF; diagram images are written next to it
    #[arg(short, long, default_value = OUTPUT_FILE)]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Create and fund a Stellar testnet account and store its keys
#[derive(Parser, Debug, Clone)]
#[command(name = "proofpass-account", author, version, about, long_about = None)]
pub struct AccountArgs {
    /// Env file holding the STELLAR_SECRET_KEY= and STELLAR_PUBLIC_KEY= lines
    ///
    /// Resolved against the working directory. The platform repository keeps
    /// its env file one level above `scripts/`; pass `--env-file ../.env`
    /// when running from there.
    #[arg(long, default_value = ".env")]
    pub env_file: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
