//! Session configuration.

use std::time::Duration;

use crate::state::SessionState;

/// Tunables for one preview connection.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Version string declared in the handshake
    pub protocol_version: String,
    /// Period between keep-alive pings
    pub ping_interval: Duration,
    /// Silence window after which the peer is considered gone
    pub ping_timeout: Duration,
    /// Silence window while the version handshake is outstanding
    pub handshake_timeout: Duration,
    /// Recovery behavior after version rejection or liveness loss
    pub reconnect: ReconnectPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protocol_version: "1.0".to_string(),
            ping_interval: Duration::from_secs(4),
            ping_timeout: Duration::from_secs(12),
            handshake_timeout: Duration::from_secs(10),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Silence window for the given state: the handshake window until the
    /// session is ready, the ping window afterwards.
    pub fn liveness_window(&self, state: SessionState) -> Duration {
        if state == SessionState::Ready {
            self.ping_timeout
        } else {
            self.handshake_timeout
        }
    }
}

/// Reconnect/backoff policy consulted by the embedding application after
/// a session closes.
///
/// The session itself never reconnects; it reports why it closed and the
/// application decides, so the signal and the recovery stay separate.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Maximum reconnect attempts; `None` retries forever
    pub max_retries: Option<u32>,
    /// Backoff before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for the backoff
    pub max_backoff: Duration,
    /// Backoff growth factor per attempt
    pub multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: Some(5),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl ReconnectPolicy {
    /// Backoff before retry `attempt` (zero-based), or `None` once the
    /// retry budget is spent.
    pub fn backoff_for(&self, attempt: u32) -> Option<Duration> {
        if let Some(max) = self.max_retries {
            if attempt >= max {
                return None;
            }
        }
        let factor = self.multiplier.powi(attempt as i32);
        Some(self.initial_backoff.mul_f64(factor).min(self.max_backoff))
    }
}
