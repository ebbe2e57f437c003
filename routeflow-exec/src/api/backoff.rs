use std::time::{Duration, SystemTime};

use httpdate::parse_http_date;

/// Delay requested by a rate-limited response, from the standard
/// `Retry-After` header (delta-seconds or HTTP-date form).
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap, now: SystemTime) -> Option<Duration> {
    let v = headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?;
    parse_retry_after_value(v, now)
}

pub(crate) fn parse_retry_after_value(v: &str, now: SystemTime) -> Option<Duration> {
    let v = v.trim();
    if let Ok(secs) = v.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let dt = parse_http_date(v).ok()?;
    dt.duration_since(now).ok()
}

/// Exponential backoff with full jitter: base * 2^(attempt-1), capped, then
/// a uniform draw over the window.
pub fn retry_delay(attempt: usize, base: Duration, max: Duration) -> Duration {
    let exp = attempt.saturating_sub(1).min(16) as u32;
    let raw_ms = (base.as_millis() as u64)
        .saturating_mul(1u64 << exp)
        .min(max.as_millis() as u64);
    if raw_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(fastrand::u64(..=raw_ms))
}
