//! Response header parsing: pagination, throttling and call-limit telemetry.

use std::time::Duration;

use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use url::Url;

/// `X-Shopify-Shop-Api-Call-Limit: 32/40`
pub const CALL_LIMIT_HEADER: &str = "X-Shopify-Shop-Api-Call-Limit";

/// Extract the `page_info` cursor from the `rel="next"` entry of a `Link` header.
///
/// ```text
/// Link: <https://shop.myshopify.com/admin/api/2024-10/products.json?limit=250&page_info=abc>; rel="next"
/// ```
pub fn next_page_cursor(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_cursor(link)
}

fn parse_next_cursor(link: &str) -> Option<String> {
    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        let is_next = params
            .split(';')
            .map(str::trim)
            .any(|p| p.eq_ignore_ascii_case(r#"rel="next""#) || p.eq_ignore_ascii_case("rel=next"));
        if !is_next {
            return None;
        }

        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page_info")
            .map(|(_, value)| value.into_owned())
    })
}

/// `Retry-After` as a delay. Shopify sends fractional seconds (`2.0`).
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let secs: f64 = raw.trim().parse().ok()?;
    // Negative, NaN and out-of-range values are unusable.
    Duration::try_from_secs_f64(secs).ok()
}

/// Platform call usage as `(used, limit)`.
pub fn call_limit(headers: &HeaderMap) -> Option<(u32, u32)> {
    let raw = headers.get(CALL_LIMIT_HEADER)?.to_str().ok()?;
    let (used, limit) = raw.trim().split_once('/')?;
    Some((used.trim().parse().ok()?, limit.trim().parse().ok()?))
}

/// Whole seconds to report in a rate-limit error, rounded up.
pub fn retry_after_secs(delay: Duration) -> u64 {
    let secs = delay.as_secs();
    if delay.subsec_nanos() > 0 { secs.saturating_add(1) } else { secs }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn test_next_cursor_from_link() {
        let map = headers(
            "link",
            r#"<https://shop.myshopify.com/admin/api/2024-10/products.json?page_info=prev123&limit=250>; rel="previous", <https://shop.myshopify.com/admin/api/2024-10/products.json?limit=250&page_info=next456>; rel="next""#,
        );
        assert_eq!(next_page_cursor(&map).as_deref(), Some("next456"));
    }

    #[test]
    fn test_no_next_on_last_page() {
        let map = headers(
            "link",
            r#"<https://shop.myshopify.com/admin/api/2024-10/products.json?limit=250&page_info=prev123>; rel="previous""#,
        );
        assert!(next_page_cursor(&map).is_none());
        assert!(next_page_cursor(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(
            retry_after(&headers("retry-after", "2.0")),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            retry_after(&headers("retry-after", "0.5")),
            Some(Duration::from_millis(500))
        );
        assert!(retry_after(&headers("retry-after", "soon")).is_none());
        assert!(retry_after(&headers("retry-after", "-1")).is_none());
        assert!(retry_after(&headers("retry-after", "NaN")).is_none());
        assert!(retry_after(&headers("retry-after", "1e300")).is_none());
    }

    #[test]
    fn test_call_limit() {
        assert_eq!(
            call_limit(&headers("x-shopify-shop-api-call-limit", "32/40")),
            Some((32, 40))
        );
        assert!(call_limit(&headers("x-shopify-shop-api-call-limit", "garbage")).is_none());
    }

    #[test]
    fn test_retry_after_secs_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(500)), 1);
        assert_eq!(retry_after_secs(Duration::from_secs(2)), 2);
        assert_eq!(retry_after_secs(Duration::MAX), u64::MAX);
    }
}
