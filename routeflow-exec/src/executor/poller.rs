use std::future::Future;
use std::time::Duration;

use crate::executor::cancel::CancelToken;

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between polls.
    pub interval: Duration,
    /// Growth applied to the interval after each empty poll; 1.0 keeps it fixed.
    pub factor: f64,
    pub max_interval: Duration,
    /// Full jitter over the grown interval.
    pub jitter: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            factor: 1.0,
            max_interval: Duration::from_secs(30),
            jitter: false,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PollError<E> {
    #[error("polling aborted")]
    Aborted,
    #[error(transparent)]
    Task(E),
}

/// Repeatedly invokes `task` until it yields a value or the token cancels.
///
/// `Ok(Some(v))` ends polling with `v`; `Ok(None)` waits one interval and
/// retries. Task errors propagate immediately and are never retried here;
/// retry policy belongs to the caller.
pub async fn poll_until<T, E, F, Fut>(
    cfg: &PollConfig,
    cancel: &CancelToken,
    mut task: F,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let mut interval = cfg.interval;
    loop {
        if cancel.is_cancelled() {
            return Err(PollError::Aborted);
        }
        match task().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => return Err(PollError::Task(e)),
        }

        let wait = if cfg.jitter {
            let ms = interval.as_millis() as u64;
            Duration::from_millis(if ms == 0 { 0 } else { fastrand::u64(..=ms) })
        } else {
            interval
        };
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = cancel.cancelled() => return Err(PollError::Aborted),
        }

        if cfg.factor > 1.0 {
            let grown = interval.as_millis() as f64 * cfg.factor;
            interval = Duration::from_millis(grown.min(cfg.max_interval.as_millis() as f64) as u64);
        }
    }
}
