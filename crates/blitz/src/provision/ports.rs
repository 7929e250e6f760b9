//! Host port allocation and readiness probes.

use std::net::{Ipv4Addr, TcpListener};
use std::thread;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Error, Result};

/// How many consecutive ports [`find_available_port`] tries.
pub const PORT_SEARCH_RANGE: u16 = 100;

/// Lower bound on the per-request timeout of [`wait_for_http`].
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Bounded polling schedule for readiness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Number of checks before giving up
    pub attempts: u32,
    /// Pause between checks
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            attempts: 200,
            interval: Duration::from_millis(300),
        }
    }
}

impl WaitPolicy {
    /// Call `check` until it returns `true` or the attempts run out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] naming `what`, or the first error `check`
    /// returns.
    pub fn poll(&self, what: &str, mut check: impl FnMut() -> Result<bool>) -> Result<()> {
        for attempt in 1..=self.attempts {
            if check()? {
                tracing::debug!(what, attempt, "Ready");
                return Ok(());
            }
            if attempt < self.attempts {
                thread::sleep(self.interval);
            }
        }
        Err(Error::Timeout(what.to_string()))
    }
}

/// First port at or above `start` that can be bound on 127.0.0.1.
///
/// # Errors
///
/// Returns [`Error::Config`] if none of the next [`PORT_SEARCH_RANGE`]
/// ports is free.
pub fn find_available_port(start: u16) -> Result<u16> {
    let end = start.saturating_add(PORT_SEARCH_RANGE - 1);
    (start..=end)
        .find(|&port| TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok())
        .ok_or_else(|| Error::Config(format!("no free port between {start} and {end}")))
}

/// Wait until an HTTP server on `port` of 127.0.0.1 answers `GET /` with
/// `200 OK`.
///
/// Redirects are followed. Connection failures and any other status count
/// as "not ready yet".
///
/// # Errors
///
/// Returns [`Error::Timeout`] when `policy` is exhausted, or
/// [`Error::Internal`] if the HTTP client cannot be built.
pub fn wait_for_http(port: u16, policy: &WaitPolicy) -> Result<()> {
    let url = format!("http://{}:{port}/", Ipv4Addr::LOCALHOST);
    let client = reqwest::blocking::Client::builder()
        .timeout(policy.interval.max(MIN_REQUEST_TIMEOUT))
        .build()
        .map_err(|e| Error::Internal(format!("cannot build HTTP client: {e}")))?;

    policy.poll(&url, || match client.get(&url).send() {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(%url, %status, "Readiness probe answered");
            Ok(status == StatusCode::OK)
        }
        Err(e) => {
            tracing::debug!(%url, error = %e, "Readiness probe failed");
            Ok(false)
        }
    })
}
