//! Friendbot faucet client.
//!
//! Friendbot funds a testnet account with a single unauthenticated GET
//! request. There is no retry: one request, one outcome.

use std::{fmt, time::Duration};

use log::{info, warn};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::transport::HttpGet;

/// Public testnet Friendbot endpoint.
pub const FRIENDBOT_URL: &str = "https://friendbot.stellar.org";

/// Timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a funding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingOutcome {
    /// Friendbot answered 200.
    Funded,
    /// Friendbot answered with any other status.
    Rejected { status: u16 },
    /// No response: network failure, DNS failure or timeout.
    Unreachable { reason: String },
}

impl FundingOutcome {
    pub fn is_funded(&self) -> bool {
        matches!(self, Self::Funded)
    }
}

impl fmt::Display for FundingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funded => write!(f, "account funded"),
            Self::Rejected { status } => write!(f, "Friendbot responded with status {status}"),
            Self::Unreachable { reason } => write!(f, "Friendbot unreachable: {reason}"),
        }
    }
}

/// Requests testnet funding for an account.
#[derive(Debug)]
pub struct Faucet<T> {
    transport: T,
    base_url: String,
    timeout: Duration,
}

impl<T: HttpGet> Faucet<T> {
    /// Creates a faucet client for the public Friendbot.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: FRIENDBOT_URL.to_string(),
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

    /// The request URL for `public_key`, with the key percent encoded.
    pub fn funding_url(&self, public_key: &str) -> String {
        format!(
            "{}?addr={}",
            self.base_url.trim_end_matches('/'),
            utf8_percent_encode(public_key, NON_ALPHANUMERIC)
        )
    }

    /// Sends the funding request for `public_key`.
    pub fn fund(&self, public_key: &str) -> FundingOutcome {
        let url = self.funding_url(public_key);
        info!(public_key = public_key; "Requesting funding from Friendbot");

        let outcome = match self.transport.get(&url, self.timeout) {
            Ok(response) if response.status == 200 => FundingOutcome::Funded,
            Ok(response) => FundingOutcome::Rejected {
                status: response.status,
            },
            Err(err) => FundingOutcome::Unreachable {
                reason: err.to_string(),
            },
        };

        match &outcome {
            FundingOutcome::Funded => info!(public_key = public_key; "Account funded"),
            other => warn!(public_key = public_key, outcome:% = other; "Funding failed"),
        }
        outcome
    }
}

/// Funds `public_key` through the public Friendbot with a 30 second timeout.
///
/// Returns `true` only for an HTTP 200 answer; every other status and every
/// transport failure yields `false`.
pub fn fund_account(transport: impl HttpGet, public_key: &str) -> bool {
    Faucet::new(transport).fund(public_key).is_funded()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use proptest::prelude::*;

    use super::*;
    use crate::{error::TransportError, transport::HttpResponse};

    /// Answers every request with the same result and records the URLs.
    struct FixedTransport {
        result: Result<HttpResponse, TransportError>,
        requests: RefCell<Vec<(String, Duration)>>,
    }

    impl FixedTransport {
        fn status(status: u16) -> Self {
            Self::new(Ok(HttpResponse::new(status, "{}")))
        }

        fn new(result: Result<HttpResponse, TransportError>) -> Self {
            Self {
                result,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpGet for FixedTransport {
        fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push((url.to_string(), timeout));
            self.result.clone()
        }
    }

    #[test]
    fn test_funding_url() {
        let faucet = Faucet::new(FixedTransport::status(200));
        assert_eq!(
            faucet.funding_url("GABC"),
            "https://friendbot.stellar.org?addr=GABC"
        );
        assert_eq!(
            faucet.funding_url("G+/ ="),
            "https://friendbot.stellar.org?addr=G%2B%2F%20%3D"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let faucet =
            Faucet::new(FixedTransport::status(200)).with_base_url("http://localhost:8000/");
        assert_eq!(faucet.funding_url("GABC"), "http://localhost:8000?addr=GABC");
    }

    #[test]
    fn test_single_request_with_timeout() {
        let transport = FixedTransport::status(200);
        assert!(fund_account(&transport, "GABC"));
        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1, Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_is_unreachable() {
        let transport = FixedTransport::new(Err(TransportError::Timeout {
            url: "https://friendbot.stellar.org?addr=GABC".to_string(),
        }));
        let outcome = Faucet::new(&transport).fund("GABC");
        assert!(matches!(outcome, FundingOutcome::Unreachable { .. }));
        assert!(outcome.to_string().contains("timed out"));
        assert!(!fund_account(&transport, "GABC"));
        // No retry: one request per call.
        assert_eq!(transport.requests.borrow().len(), 2);
    }

    #[test]
    fn test_rejected_status() {
        let outcome = Faucet::new(FixedTransport::status(400)).fund("GABC");
        assert_eq!(outcome, FundingOutcome::Rejected { status: 400 });
        assert_eq!(outcome.to_string(), "Friendbot responded with status 400");
    }

    proptest! {
        #[test]
        fn test_only_200_funds(status in 100_u16..600) {
            let funded = fund_account(FixedTransport::status(status), "GABC");
            prop_assert_eq!(funded, status == 200);
        }

        #[test]
        fn test_transport_errors_never_fund(message in ".*") {
            let transport = FixedTransport::new(Err(TransportError::Network {
                url: "u".to_string(),
                message,
            }));
            prop_assert!(!fund_account(transport, "GABC"));
        }
    }
}
