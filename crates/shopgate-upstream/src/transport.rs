//! Header and cookie handling for the session-cookie proxy.
//!
//! The gateway sits between the browser and the accounts/reviews backends,
//! which authenticate with cookies. Outbound requests carry the browser's
//! headers minus hop-by-hop ones; upstream `Set-Cookie` headers come back one
//! cookie per header so the browser stores every one of them.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, SET_COOKIE};
use reqwest::{Client, Method, StatusCode};

use crate::error::UpstreamError;

/// Headers a proxy must not forward in either direction.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Dropped from the browser request in addition to [`HOP_BY_HOP`].
const REQUEST_ONLY: &[&str] = &["host", "content-length", "accept-encoding"];

/// Dropped from the upstream response in addition to [`HOP_BY_HOP`].
/// `set-cookie` is replayed separately through [`set_cookies`].
const RESPONSE_ONLY: &[&str] = &["content-encoding", "content-length", "set-cookie"];

/// A comma starts a new cookie only when a `name=` token follows it. This
/// keeps `Expires=Wed, 21 Oct 2026 07:28:00 GMT` intact.
static COOKIE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[^\s=;,]+=").expect("cookie-start regex is valid")
});

fn copy_except(source: &HeaderMap, skip: &[&str]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        let lower = name.as_str();
        if !HOP_BY_HOP.contains(&lower) && !skip.contains(&lower) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Browser headers to send upstream. Cookies and every end-to-end header pass
/// through; `accept-encoding` is forced to `identity` so the body can be
/// replayed without re-encoding.
#[must_use]
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = copy_except(inbound, REQUEST_ONLY);
    out.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    out
}

/// Upstream response headers to replay, excluding `Set-Cookie`.
#[must_use]
pub fn replay_headers(upstream: &HeaderMap) -> HeaderMap {
    copy_except(upstream, RESPONSE_ONLY)
}

/// Splits one possibly coalesced `Set-Cookie` value into individual cookies.
#[must_use]
pub fn split_set_cookie(value: &str) -> Vec<String> {
    let mut cookies = Vec::new();
    let mut start = 0;
    for (idx, _) in value.match_indices(',') {
        if COOKIE_START.is_match(&value[idx + 1..]) {
            push_cookie(&mut cookies, &value[start..idx]);
            start = idx + 1;
        }
    }
    push_cookie(&mut cookies, &value[start..]);
    cookies
}

fn push_cookie(cookies: &mut Vec<String>, part: &str) {
    let part = part.trim();
    if !part.is_empty() {
        cookies.push(part.to_string());
    }
}

/// Every cookie set by `upstream`, one value per cookie, in header order.
///
/// Values that are not valid UTF-8 are kept whole.
#[must_use]
pub fn set_cookies(upstream: &HeaderMap) -> Vec<HeaderValue> {
    let mut out = Vec::new();
    for value in upstream.get_all(SET_COOKIE) {
        match value.to_str() {
            Ok(text) => out.extend(
                split_set_cookie(text)
                    .iter()
                    .filter_map(|c| HeaderValue::from_str(c).ok()),
            ),
            Err(_) => out.push(value.clone()),
        }
    }
    out
}

/// Joins a backend base URL, a request path, and a raw query string.
#[must_use]
pub fn target_url(base: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// An upstream response ready to be replayed to the browser.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub cookies: Vec<HeaderValue>,
    pub body: Vec<u8>,
}

impl ProxiedResponse {
    /// Response headers with every cookie appended as its own `Set-Cookie`.
    #[must_use]
    pub fn replay_header_map(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        for cookie in &self.cookies {
            headers.append(SET_COOKIE, cookie.clone());
        }
        headers
    }
}

/// Forwards browser requests to cookie-authenticated backends.
///
/// Non-2xx upstream statuses are not errors here; they are replayed to the
/// browser as-is.
#[derive(Debug, Clone)]
pub struct SessionProxy {
    client: Client,
}

impl SessionProxy {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Sends `body` to `url` with sanitized copies of `headers`.
    ///
    /// `extra` headers are inserted after sanitizing and replace any browser
    /// value of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Http`] on network failure.
    pub async fn forward(
        &self,
        method: Method,
        url: &str,
        headers: &HeaderMap,
        extra: &[(HeaderName, HeaderValue)],
        body: Vec<u8>,
    ) -> Result<ProxiedResponse, UpstreamError> {
        let mut outbound = outbound_headers(headers);
        for (name, value) in extra {
            outbound.insert(name.clone(), value.clone());
        }

        tracing::debug!(%method, url, "forwarding session request");
        let response = self
            .client
            .request(method, url)
            .headers(outbound)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let upstream_headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ProxiedResponse {
            status,
            headers: replay_headers(&upstream_headers),
            cookies: set_cookies(&upstream_headers),
            body,
        })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
