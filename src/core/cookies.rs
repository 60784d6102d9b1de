//! Cookie jar that tolerates the portal's colon-bearing cookie names.
//!
//! Some of the provider's `Set-Cookie` headers use names like `TS01:a1b2`.
//! A colon is not a legal token character, so a conforming jar discards those
//! cookies and the login never sticks. [`SanitizingJar`] rewrites the colon to
//! [`COLON_PLACEHOLDER`] before storing and restores it on the way out, so the
//! provider sees exactly the names it issued.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;

pub const COLON_PLACEHOLDER: &str = "__colon__";

/// Rewrites colons in the cookie name of a `Set-Cookie` header value.
/// Attributes and the cookie value are left alone.
pub fn sanitize(set_cookie: &str) -> String {
    match set_cookie.split_once('=') {
        Some((name, rest)) if name.contains(':') && !name.contains(';') => {
            format!("{}={}", name.replace(':', COLON_PLACEHOLDER), rest)
        }
        _ => set_cookie.to_string(),
    }
}

/// Restores colons in every cookie name of a `Cookie` (or `Set-Cookie`) header value.
pub fn desanitize(cookie_header: &str) -> String {
    if !cookie_header.contains(COLON_PLACEHOLDER) {
        return cookie_header.to_string();
    }

    cookie_header
        .split(';')
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => format!("{}={}", name.replace(COLON_PLACEHOLDER, ":"), value),
            None => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Per-run cookie store keyed by domain and path. Never persisted.
#[derive(Debug, Default)]
pub struct SanitizingJar {
    inner: Jar,
}

impl SanitizingJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for SanitizingJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let sanitized: Vec<HeaderValue> = cookie_headers
            .map(|header| {
                let Ok(text) = header.to_str() else {
                    return header.clone();
                };
                let clean = sanitize(text);
                if clean == text {
                    return header.clone();
                }
                tracing::debug!("Sanitized cookie name from {}", url);
                HeaderValue::from_str(&clean).unwrap_or_else(|_| header.clone())
            })
            .collect();

        self.inner.set_cookies(&mut sanitized.iter(), url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self.inner.cookies(url)?;
        match header.to_str() {
            Ok(text) if text.contains(COLON_PLACEHOLDER) => {
                HeaderValue::from_str(&desanitize(text)).ok().or(Some(header))
            }
            _ => Some(header),
        }
    }
}
