//! Blocking HTTP transport.
//!
//! All network access goes through [`HttpGet`], so the faucet and Horizon
//! clients can be exercised against in-memory transports.

use std::{error::Error as _, io, time::Duration};

use log::{debug, trace};

use crate::error::TransportError;

/// A completed HTTP exchange. Any status code counts as a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues a single GET request.
pub trait HttpGet {
    /// Fetches `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response was received at all;
    /// non-success statuses are returned as regular responses.
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpGet + ?Sized> HttpGet for &T {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        (**self).get(url, timeout)
    }
}

/// [`HttpGet`] over a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("proofpass-account/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpGet for UreqTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        debug!(url = url, timeout_secs = timeout.as_secs(); "HTTP GET");

        let response = match self.agent.get(url).timeout(timeout).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                trace!(url = url, status = status; "HTTP error status");
                return Ok(HttpResponse::new(status, response.into_string().unwrap_or_default()));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(transport_error(url, &transport));
            }
        };

        let status = response.status();
        let body = response.into_string().map_err(|err| TransportError::Body {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        trace!(url = url, status = status, bytes = body.len(); "HTTP response");
        Ok(HttpResponse::new(status, body))
    }
}

fn transport_error(url: &str, transport: &ureq::Transport) -> TransportError {
    let timed_out = transport
        .source()
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|err| {
            matches!(
                err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            )
        });

    if timed_out {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Network {
            url: url.to_string(),
            message: transport.to_string(),
        }
    }
}
