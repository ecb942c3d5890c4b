//! `Retry-After` parsing for the rate-limit retry loop.
//!
//! A 429 response is retried only on the server's explicit instruction: the
//! `Retry-After` header, in either of its two standard forms (RFC 9110
//! delay-seconds or HTTP-date). A 429 without a usable header is terminal.

use http::{header, HeaderMap};
use std::time::{Duration, SystemTime};

/// Computes the wait the server asked for, or `None` if it asked for none.
///
/// A value composed entirely of decimal digits is a delay in whole seconds.
/// Anything else is tried as an HTTP date, and the wait is the span from
/// `attempt_started` to that date, clamped at zero for dates already in the
/// past. An absent, non-ASCII, or unparseable header yields `None`.
pub(crate) fn retry_after_delay(
    headers: &HeaderMap,
    attempt_started: SystemTime,
) -> Option<Duration> {
    let value = headers.get(header::RETRY_AFTER)?.to_str().ok()?;

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok().map(Duration::from_secs);
    }

    let date = httpdate::parse_http_date(value).ok()?;
    Some(
        date.duration_since(attempt_started)
            .unwrap_or(Duration::ZERO),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_delay_seconds() {
        let headers = headers_with_retry_after("60");
        let delay = retry_after_delay(&headers, SystemTime::now());
        assert_eq!(delay, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_seconds() {
        let headers = headers_with_retry_after("0");
        let delay = retry_after_delay(&headers, SystemTime::now());
        assert_eq!(delay, Some(Duration::ZERO));
    }

    #[test]
    fn test_http_date_in_the_future() {
        let started = SystemTime::now();
        let headers = headers_with_retry_after(&httpdate::fmt_http_date(
            started + Duration::from_secs(90),
        ));

        let delay = retry_after_delay(&headers, started).unwrap();
        // fmt_http_date truncates to whole seconds
        assert!(
            delay >= Duration::from_secs(89) && delay <= Duration::from_secs(90),
            "delay should be ~90s, got {:?}",
            delay
        );
    }

    #[test]
    fn test_http_date_in_the_past_clamps_to_zero() {
        let started = SystemTime::now();
        let headers = headers_with_retry_after(&httpdate::fmt_http_date(
            started - Duration::from_secs(90),
        ));

        let delay = retry_after_delay(&headers, started);
        assert_eq!(delay, Some(Duration::ZERO));
    }

    #[test]
    fn test_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(retry_after_delay(&headers, SystemTime::now()), None);
    }

    #[test]
    fn test_unparseable_values() {
        for value in ["foo", "1.5", "-1", "+1", " 1", "1 ", ""] {
            let headers = headers_with_retry_after(value);
            assert_eq!(
                retry_after_delay(&headers, SystemTime::now()),
                None,
                "value {:?} should not be usable",
                value
            );
        }
    }
}
