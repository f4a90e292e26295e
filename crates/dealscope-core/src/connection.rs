//! Connectivity status for the remote analysis endpoint.
//!
//! The manager is a synchronous state machine; issuing the actual health
//! probe is the caller's job (a spawned task in the TUI, an awaited call in
//! the CLI). `begin_probe` validates and normalizes the address, the caller
//! runs `AnalysisClient::health`, and `complete_probe` records the outcome.

use dealscope_client::ApiError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Untested,
    Testing,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Untested => "Untested",
            Self::Testing => "Testing...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

/// Owns the endpoint address and its connectivity status.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    state: ConnectionState,
    base_url: Option<String>,
}

impl ConnectionManager {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The normalized endpoint, once a probe has been started for it.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Validate and normalize a raw address and enter `Testing`.
    ///
    /// An empty address is a validation error and leaves the state (and any
    /// previously stored endpoint) unchanged; no probe must be issued.
    pub fn begin_probe(&mut self, raw_url: &str) -> Result<String, ApiError> {
        let base = dealscope_client::normalize_base_url(raw_url)?;
        self.base_url = Some(base.clone());
        self.state = ConnectionState::Testing;
        Ok(base)
    }

    /// Record the probe outcome.
    ///
    /// Ignored unless a probe is actually running, so a stale completion
    /// (e.g. after the user re-validated the address) cannot clobber state.
    pub fn complete_probe(&mut self, healthy: bool) {
        if self.state != ConnectionState::Testing {
            log::debug!("dropping stale probe completion (state {:?})", self.state);
            return;
        }
        self.state = if healthy {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
    }
}
