use std::time::Duration;

/// User-visible line raised once when the event stream gives up.
pub const LOST_CONNECTION_MESSAGE: &str =
    "Lost connection to the server. Reload the client to reconnect.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Open,
    Retrying,
    /// Terminal for the session; only a restart reconnects.
    Failed,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "live",
            ConnectionState::Retrying => "reconnecting",
            ConnectionState::Failed => "disconnected",
        }
    }
}

/// Linear backoff: attempt `n` waits `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_attempts: 3,
        }
    }
}

impl ReconnectPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { attempt: u32, delay: Duration },
    GiveUp,
}

/// Connection state machine driven by the stream task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectTracker {
    policy: ReconnectPolicy,
    attempts: u32,
    state: ConnectionState,
}

impl ReconnectTracker {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            state: ConnectionState::Connecting,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn on_open(&mut self) {
        if self.state == ConnectionState::Failed {
            return;
        }
        self.attempts = 0;
        self.state = ConnectionState::Open;
    }

    /// Record a failed handshake or a dropped connection.
    pub fn on_failure(&mut self) -> RetryDecision {
        if self.state == ConnectionState::Failed {
            return RetryDecision::GiveUp;
        }
        self.attempts += 1;
        if self.attempts > self.policy.max_attempts {
            self.state = ConnectionState::Failed;
            return RetryDecision::GiveUp;
        }
        self.state = ConnectionState::Retrying;
        RetryDecision::Retry {
            attempt: self.attempts,
            delay: self.policy.delay_for(self.attempts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay: Duration::from_millis(100),
            max_attempts: 3,
        }
    }

    #[test]
    fn delays_grow_linearly_then_give_up() {
        let mut tracker = ReconnectTracker::new(policy());
        let decisions: Vec<_> = (0..4).map(|_| tracker.on_failure()).collect();
        assert_eq!(
            decisions,
            vec![
                RetryDecision::Retry {
                    attempt: 1,
                    delay: Duration::from_millis(100)
                },
                RetryDecision::Retry {
                    attempt: 2,
                    delay: Duration::from_millis(200)
                },
                RetryDecision::Retry {
                    attempt: 3,
                    delay: Duration::from_millis(300)
                },
                RetryDecision::GiveUp,
            ]
        );
        assert_eq!(tracker.state(), ConnectionState::Failed);
    }

    #[test]
    fn three_failures_then_open_ends_open() {
        let mut tracker = ReconnectTracker::new(policy());
        for _ in 0..3 {
            assert!(matches!(tracker.on_failure(), RetryDecision::Retry { .. }));
        }
        tracker.on_open();
        assert_eq!(tracker.state(), ConnectionState::Open);
        assert_eq!(tracker.attempts(), 0);
    }

    #[test]
    fn open_resets_the_counter() {
        let mut tracker = ReconnectTracker::new(policy());
        tracker.on_failure();
        tracker.on_failure();
        tracker.on_open();
        assert_eq!(
            tracker.on_failure(),
            RetryDecision::Retry {
                attempt: 1,
                delay: Duration::from_millis(100)
            }
        );
    }

    #[test]
    fn failed_is_terminal() {
        let mut tracker = ReconnectTracker::new(ReconnectPolicy {
            base_delay: Duration::from_millis(1),
            max_attempts: 0,
        });
        assert_eq!(tracker.on_failure(), RetryDecision::GiveUp);
        tracker.on_open();
        assert_eq!(tracker.state(), ConnectionState::Failed);
        assert_eq!(tracker.on_failure(), RetryDecision::GiveUp);
    }
}
