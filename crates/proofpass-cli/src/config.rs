//! Configuration file loading for the CLI
//!
//! One TOML file configures both tools: the `[handbook]` table for the
//! handbook generator and the `[account]` table for the account
//! provisioner. Unknown tables are ignored and every field has a default.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use proofpass_account::config::AccountConfig;
use proofpass_handbook::config::HandbookConfig;

/// Path of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "proofpass/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings of both tools.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    handbook: HandbookConfig,
    account: AccountConfig,
}

impl AppConfig {
    pub fn handbook(&self) -> &HandbookConfig {
        &self.handbook
    }

    pub fn account(&self) -> &AccountConfig {
        &self.account
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (`proofpass/config.toml`)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be read or parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "proofpass", "proofpass") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(&system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proofpass_account::reveal::RevealPolicy;

    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_full_config() {
        let (_dir, path) = write_config(
            r##"
            [handbook]
            keep_diagrams = false
            [handbook.style]
            background_color = "#fafafa"

            [account]
            friendbot_url = "http://localhost:8000/friendbot"
            timeout_secs = 5
            check_balance = false
            reveal = "redacted"
            "##,
        );

        let config = load_config(Some(&path)).unwrap();

        assert!(!config.handbook().keep_diagrams());
        assert!(config.handbook().style().background_color().unwrap().is_some());
        let account = config.account();
        assert_eq!(account.friendbot_url(), "http://localhost:8000/friendbot");
        assert_eq!(account.timeout(), Duration::from_secs(5));
        assert!(!account.check_balance());
        assert_eq!(account.reveal(), RevealPolicy::Redacted);
        assert_eq!(account.horizon_url(), "https://horizon-testnet.stellar.org");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (_dir, path) = write_config("");
        let config = load_config(Some(&path)).unwrap();
        assert!(config.handbook().keep_diagrams());
        assert_eq!(config.account().timeout(), Duration::from_secs(30));
        assert_eq!(config.account().reveal(), RevealPolicy::Full);
    }

    #[test]
    fn test_unknown_tables_are_ignored() {
        let (_dir, path) = write_config("[server]\nport = 3000\n");
        assert!(load_config(Some(&path)).is_ok());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/nonexistent/proofpass.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, path) = write_config("[account]\nreveal = \"everything\"\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
