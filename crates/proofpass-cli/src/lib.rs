//! CLI logic for the ProofPass tools.
//!
//! Backs two binaries: `proofpass-handbook`, which renders the developer
//! handbook PDF, and `proofpass-account`, which provisions a funded Stellar
//! testnet account.

pub mod config;
pub mod error_adapter;

mod args;

pub use args::{AccountArgs, HandbookArgs};

use std::{io::Write, str::FromStr};

use log::{LevelFilter, info};
use thiserror::Error;

use proofpass_account::{
    Aborted, Provisioner, Summary,
    env_file::EnvFile,
    transport::{HttpGet, UreqTransport},
};
use proofpass_handbook::{BuildReport, HandbookBuilder, HandbookError, content};

use config::ConfigError;
use error_adapter::ErrorAdapter;

/// Any failure of a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Handbook(#[from] HandbookError),

    #[error(transparent)]
    Account(#[from] Aborted),
}

/// Initializes `env_logger` with `level`, falling back to `warn` for
/// unknown level names.
pub fn init_logger(level: &str) -> LevelFilter {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    log_level
}

/// Renders `err` as a miette report.
pub fn render_report(err: &CliError) -> String {
    let mut writer = String::new();
    let reporter = miette::GraphicalReportHandler::new();
    if reporter
        .render_report(&mut writer, &ErrorAdapter(err))
        .is_err()
    {
        writer = err.to_string();
    }
    writer
}

/// Generate the handbook PDF and its diagram images
///
/// # Errors
///
/// Returns `CliError` for configuration, layout, rendering or I/O errors.
pub fn run_handbook(args: &HandbookArgs) -> Result<BuildReport, CliError> {
    info!(output_path = args.output; "Generating handbook");

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = HandbookBuilder::new(app_config.handbook().clone());
    let report = builder.build(&content::proofpass_handbook(), &args.output)?;

    info!(
        output_file = args.output,
        pages = report.page_count;
        "Handbook exported successfully"
    );
    Ok(report)
}

/// Provision a testnet account over HTTP
///
/// # Errors
///
/// Returns `CliError` for configuration errors and aborted runs.
pub fn run_account(args: &AccountArgs, out: &mut dyn Write) -> Result<Summary, CliError> {
    run_account_with(args, UreqTransport::new(), out)
}

/// Provision a testnet account through `transport`
///
/// # Errors
///
/// Returns `CliError` for configuration errors and aborted runs.
pub fn run_account_with<T: HttpGet>(
    args: &AccountArgs,
    transport: T,
    out: &mut dyn Write,
) -> Result<Summary, CliError> {
    info!(env_file = args.env_file; "Provisioning testnet account");

    let app_config = config::load_config(args.config.as_ref())?;
    let provisioner = Provisioner::new(
        transport,
        app_config.account().clone(),
        EnvFile::new(&args.env_file),
    );
    Ok(provisioner.run(out)?)
}
