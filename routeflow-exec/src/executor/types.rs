use std::time::Duration;

use crate::executor::poller::PollConfig;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub poll: PollConfig,
    /// Pause after an approval/fee confirmation so downstream indexers
    /// catch up before the next leg is submitted.
    pub settle_delay: Duration,
    /// Pause before a deferred first start, letting the surrounding host
    /// settle before the first wallet prompt.
    pub auto_start_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            settle_delay: Duration::from_millis(2000),
            auto_start_delay: Duration::from_millis(1000),
        }
    }
}
