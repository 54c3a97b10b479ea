//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! Library errors carry no miette dependency; this adapter adds a stable
//! diagnostic code and, where one helps, a hint for the user.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use proofpass_account::{EnvFileError, FundingOutcome, ProvisionError};
use proofpass_handbook::HandbookError;

use crate::{CliError, config::ConfigError};

/// Adapter rendering a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Config(ConfigError::Parse { .. }) => "config::parse",
            CliError::Config(ConfigError::MissingFile(_)) => "config::missing_file",
            CliError::Config(ConfigError::Io { .. }) => "config::io",
            CliError::Handbook(HandbookError::Io { .. }) => "handbook::io",
            CliError::Handbook(HandbookError::Layout { .. }) => "handbook::layout",
            CliError::Handbook(HandbookError::Render { .. }) => "handbook::render",
            CliError::Handbook(HandbookError::Config(_)) => "handbook::config",
            CliError::Account(aborted) => match &aborted.error {
                ProvisionError::Keypair(_) => "account::keypair",
                ProvisionError::Funding(_) => "account::funding",
                ProvisionError::EnvFile(_) => "account::env_file",
                ProvisionError::Output(_) => "account::output",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Config(ConfigError::Parse { .. }) => {
                "check the [handbook] and [account] tables of the configuration file"
            }
            CliError::Config(ConfigError::MissingFile(_)) => {
                "pass an existing file to --config or omit the flag to use defaults"
            }
            CliError::Handbook(HandbookError::Config(_)) => {
                "background_color accepts any CSS color, e.g. \"white\" or \"#fafafa\""
            }
            CliError::Account(aborted) => match &aborted.error {
                ProvisionError::Funding(FundingOutcome::Unreachable { .. }) => {
                    "Friendbot could not be reached; check the network connection and try again"
                }
                ProvisionError::Funding(FundingOutcome::Rejected { .. }) => {
                    "Friendbot refused the request; testnet may be resetting, try again later"
                }
                ProvisionError::EnvFile(EnvFileError::MissingPlaceholder { .. }) => {
                    "add empty STELLAR_SECRET_KEY= and STELLAR_PUBLIC_KEY= lines to the env file"
                }
                ProvisionError::EnvFile(EnvFileError::Io { .. }) => {
                    "pass the env file location with --env-file"
                }
                _ => return None,
            },
            _ => return None,
        };
        Some(Box::new(help))
    }
}
