use std::time::Duration;

/// Configures the HTTP timeout of service clients.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Configures how [`crate::QueryRunner`] waits for an execution to finish.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollOptions {
    /// Delay between two status checks.
    pub interval: Duration,
    /// Upper bound on the total wait. `None` waits until a terminal state.
    pub max_wait: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_wait: None,
        }
    }
}

impl PollOptions {
    /// Polls at `interval` with no upper bound.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_wait: None,
        }
    }

    /// Gives up after `max_wait`.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}
