//! Read-only account lookups on a Horizon server.

use std::time::Duration;

use log::debug;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use crate::{error::HorizonError, faucet::DEFAULT_TIMEOUT, transport::HttpGet};

/// Public testnet Horizon endpoint.
pub const HORIZON_TESTNET_URL: &str = "https://horizon-testnet.stellar.org";

#[derive(Debug, Deserialize)]
struct AccountRecord {
    balances: Vec<BalanceRecord>,
}

#[derive(Debug, Deserialize)]
struct BalanceRecord {
    asset_type: String,
    balance: String,
}

/// Horizon API client.
#[derive(Debug)]
pub struct Horizon<T> {
    transport: T,
    base_url: String,
    timeout: Duration,
}

impl<T: HttpGet> Horizon<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: HORIZON_TESTNET_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the native (XLM) balance of `account_id` as Horizon prints it,
    /// e.g. `"10000.0000000"`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-200 answers, malformed JSON and
    /// accounts without a native balance entry.
    pub fn native_balance(&self, account_id: &str) -> Result<String, HorizonError> {
        let url = format!(
            "{}/accounts/{}",
            self.base_url.trim_end_matches('/'),
            utf8_percent_encode(account_id, NON_ALPHANUMERIC)
        );
        let response = self.transport.get(&url, self.timeout)?;
        if response.status != 200 {
            return Err(HorizonError::Status(response.status));
        }

        let account: AccountRecord = serde_json::from_str(&response.body)?;
        let balance = account
            .balances
            .into_iter()
            .find(|balance| balance.asset_type == "native")
            .map(|balance| balance.balance)
            .ok_or(HorizonError::NoNativeBalance)?;

        debug!(account_id = account_id, balance = balance.as_str(); "Native balance loaded");
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::TransportError, transport::HttpResponse};

    struct Canned(Result<HttpResponse, TransportError>);

    impl HttpGet for Canned {
        fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, TransportError> {
            assert_eq!(url, "https://horizon-testnet.stellar.org/accounts/GABC");
            self.0.clone()
        }
    }

    fn ok(body: &str) -> Canned {
        Canned(Ok(HttpResponse::new(200, body)))
    }

    #[test]
    fn test_native_balance() {
        let body = r#"{
            "id": "GABC",
            "balances": [
                {"balance": "5.0000000", "asset_type": "credit_alphanum4", "asset_code": "USDC"},
                {"balance": "10000.0000000", "asset_type": "native"}
            ]
        }"#;
        let balance = Horizon::new(ok(body)).native_balance("GABC").unwrap();
        assert_eq!(balance, "10000.0000000");
    }

    #[test]
    fn test_missing_native_balance() {
        let err = Horizon::new(ok(r#"{"balances": []}"#))
            .native_balance("GABC")
            .unwrap_err();
        assert!(matches!(err, HorizonError::NoNativeBalance));
    }

    #[test]
    fn test_not_found() {
        let canned = Canned(Ok(HttpResponse::new(404, "{}")));
        let err = Horizon::new(canned).native_balance("GABC").unwrap_err();
        assert!(matches!(err, HorizonError::Status(404)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Horizon::new(ok("not json")).native_balance("GABC").unwrap_err();
        assert!(matches!(err, HorizonError::Parse(_)));
    }

    #[test]
    fn test_transport_error() {
        let canned = Canned(Err(TransportError::Timeout {
            url: "u".to_string(),
        }));
        let err = Horizon::new(canned).native_balance("GABC").unwrap_err();
        assert!(matches!(err, HorizonError::Transport(_)));
    }
}
