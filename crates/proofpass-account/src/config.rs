//! Configuration for account provisioning.
//!
//! Loaded from the `[account]` table of the ProofPass configuration file.
//!
//! ```
//! # use proofpass_account::config::AccountConfig;
//! let config = AccountConfig::default();
//! assert_eq!(config.timeout().as_secs(), 30);
//! assert!(config.check_balance());
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::{
    faucet::{DEFAULT_TIMEOUT, FRIENDBOT_URL},
    horizon::HORIZON_TESTNET_URL,
    reveal::RevealPolicy,
};

/// Public testnet account explorer.
pub const EXPLORER_URL: &str = "https://stellar.expert/explorer/testnet/account";

/// Account provisioning settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    friendbot_url: String,
    horizon_url: String,
    explorer_url: String,
    timeout_secs: u64,
    /// Look up the native balance after funding.
    check_balance: bool,
    reveal: RevealPolicy,
}

impl AccountConfig {
    pub fn friendbot_url(&self) -> &str {
        &self.friendbot_url
    }

    pub fn horizon_url(&self) -> &str {
        &self.horizon_url
    }

    pub fn explorer_url(&self) -> &str {
        &self.explorer_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn check_balance(&self) -> bool {
        self.check_balance
    }

    pub fn reveal(&self) -> RevealPolicy {
        self.reveal
    }

    pub fn with_friendbot_url(mut self, url: impl Into<String>) -> Self {
        self.friendbot_url = url.into();
        self
    }

    pub fn with_check_balance(mut self, check_balance: bool) -> Self {
        self.check_balance = check_balance;
        self
    }

    pub fn with_reveal(mut self, reveal: RevealPolicy) -> Self {
        self.reveal = reveal;
        self
    }

    /// Explorer page of `public_key`.
    pub fn explorer_link(&self, public_key: &str) -> String {
        format!("{}/{public_key}", self.explorer_url.trim_end_matches('/'))
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            friendbot_url: FRIENDBOT_URL.to_string(),
            horizon_url: HORIZON_TESTNET_URL.to_string(),
            explorer_url: EXPLORER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            check_balance: true,
            reveal: RevealPolicy::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_link() {
        assert_eq!(
            AccountConfig::default().explorer_link("GABC"),
            "https://stellar.expert/explorer/testnet/account/GABC"
        );
    }

    #[test]
    fn test_builders() {
        let config = AccountConfig::default()
            .with_friendbot_url("http://localhost:8000")
            .with_check_balance(false)
            .with_reveal(RevealPolicy::Redacted);
        assert_eq!(config.friendbot_url(), "http://localhost:8000");
        assert!(!config.check_balance());
        assert_eq!(config.reveal(), RevealPolicy::Redacted);
        assert_eq!(config.horizon_url(), HORIZON_TESTNET_URL);
    }
}
