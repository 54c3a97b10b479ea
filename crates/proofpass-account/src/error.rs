//! Error types for account provisioning.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{faucet::FundingOutcome, provisioner::Stage};

/// Failure to create a keypair.
#[derive(Debug, Error)]
pub enum KeypairError {
    /// The operating system random source could not provide a seed.
    #[error("random source unavailable: {0}")]
    RandomSource(String),
}

/// Failure of a single HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to `{url}` timed out")]
    Timeout { url: String },

    #[error("request to `{url}` failed: {message}")]
    Network { url: String, message: String },

    #[error("could not read response from `{url}`: {message}")]
    Body { url: String, message: String },
}

/// Failure to read or update the env file.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("placeholder line `{key}=` not found")]
    MissingPlaceholder { key: String },
}

impl EnvFileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to read an account balance from Horizon.
#[derive(Debug, Error)]
pub enum HorizonError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Horizon responded with status {0}")]
    Status(u16),

    #[error("invalid account response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("account has no native balance")]
    NoNativeBalance,
}

/// A provisioning step that failed.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("keypair generation failed")]
    Keypair(#[source] KeypairError),

    #[error("Failed to fund account: {0}")]
    Funding(FundingOutcome),

    #[error("could not update env file")]
    EnvFile(#[source] EnvFileError),

    #[error("could not write status output")]
    Output(#[from] io::Error),
}

/// A provisioning run that stopped before completing.
#[derive(Debug, Error)]
#[error("provisioning aborted after stage `{stage}`: {error}")]
pub struct Aborted {
    /// The last stage the run reached.
    pub stage: Stage,
    #[source]
    pub error: ProvisionError,
}
