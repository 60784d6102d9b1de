//! Cookie-backed HTTP session against the provider's portals.
//!
//! Redirects are followed here rather than by reqwest so that the hop count is
//! exact: the portal answers some errors with a redirect cycle, and after
//! [`MAX_REDIRECTS`] hops the last response is handed back unchanged.

use crate::config::provider::ProviderConfig;
use crate::core::cookies::SanitizingJar;
use crate::utils::error::{Result, UsageError};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, Method, Response, StatusCode, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const MAX_REDIRECTS: usize = 10;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Payload<'a> {
    Empty,
    Form(&'a [(&'a str, &'a str)]),
    Text(&'a str),
}

/// One retrieval run's HTTP state. The cookie jar lives and dies with it.
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_provider(Arc::new(SanitizingJar::new()))
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(UsageError::Client)?;

        Ok(Self { client })
    }

    /// Opens a session and logs in: landing page for context cookies, then the
    /// login form. Anything but a final 200 on either step fails the login.
    pub async fn login(config: &ProviderConfig, credentials: &Credentials) -> Result<Self> {
        let session = Self::new(config)?;

        tracing::info!("🔐 Opening portal session at {}", config.home_url);
        session.get(&config.home_url).await?;

        tracing::info!("🔐 Submitting login form to {}", config.login_url);
        let form = config.login_form(&credentials.username, &credentials.password);
        session.post_form(&config.login_url, &form).await?;

        tracing::debug!("Login completed");
        Ok(session)
    }

    pub async fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.send(Method::GET, url, Payload::Empty).await
    }

    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.send(Method::POST, url, Payload::Form(form)).await
    }

    /// POSTs a plain text body, as the DWR endpoint expects.
    pub async fn post_text(&self, url: &str, body: &str) -> Result<Vec<u8>> {
        self.send(Method::POST, url, Payload::Text(body)).await
    }

    async fn send(&self, method: Method, url: &str, payload: Payload<'_>) -> Result<Vec<u8>> {
        let response = self.follow_redirects(method, url, payload).await?;

        let final_url = response.url().to_string();
        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("{} answered {}", final_url, status);
            return Err(UsageError::Status {
                url: final_url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| UsageError::Request {
            url: final_url.clone(),
            source,
        })?;
        tracing::debug!("Read {} bytes from {}", body.len(), final_url);
        Ok(body.to_vec())
    }

    async fn follow_redirects(
        &self,
        mut method: Method,
        url: &str,
        mut payload: Payload<'_>,
    ) -> Result<Response> {
        let mut current = Url::parse(url).map_err(|e| UsageError::InvalidConfigValue {
            field: "url".to_string(),
            value: url.to_string(),
            reason: e.to_string(),
        })?;
        let mut hops = 0;

        loop {
            let response = self
                .build_request(method.clone(), current.clone(), payload)
                .send()
                .await
                .map_err(|source| UsageError::Request {
                    url: current.to_string(),
                    source,
                })?;

            let status = response.status();
            tracing::debug!("{} {} -> {}", method, current, status);

            if !status.is_redirection() {
                return Ok(response);
            }
            let Some(next) = redirect_target(&current, &response) else {
                return Ok(response);
            };
            if hops == MAX_REDIRECTS {
                tracing::warn!(
                    "Stopped following redirects after {} hops at {}",
                    MAX_REDIRECTS,
                    current
                );
                return Ok(response);
            }
            hops += 1;

            // 301/302/303 turn a POST into a GET, 307/308 replay it
            let replays_body = matches!(
                status,
                StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
            );
            if !replays_body && method != Method::GET && method != Method::HEAD {
                method = Method::GET;
                payload = Payload::Empty;
            }
            current = next;
        }
    }

    fn build_request(&self, method: Method, url: Url, payload: Payload<'_>) -> reqwest::RequestBuilder {
        let request = self.client.request(method, url);
        match payload {
            Payload::Empty => request,
            Payload::Form(form) => request.form(form),
            Payload::Text(text) => request
                .header(CONTENT_TYPE, "text/plain")
                .body(text.to_string()),
        }
    }
}

fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn credentials() -> Credentials {
        Credentials::new("user@example.com", "secret")
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn test_login_posts_credentials_and_fixed_params() {
        let server = MockServer::start();
        let config = ProviderConfig::with_base_url(&server.base_url());

        let home = server.mock(|when, then| {
            when.method(GET).path("/today/");
            then.status(200).body("<html>home</html>");
        });
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/sso/SSOLogin")
                .x_www_form_urlencoded_tuple("username", "user@example.com")
                .x_www_form_urlencoded_tuple("password", "secret")
                .x_www_form_urlencoded_tuple("locale", "en_ZA")
                .x_www_form_urlencoded_key_exists("challengeUrl")
                .x_www_form_urlencoded_key_exists("resourceUrl");
            then.status(200).body("ok");
        });

        Session::login(&config, &credentials()).await.unwrap();

        home.assert();
        login.assert();
    }

    #[tokio::test]
    async fn test_non_200_home_fails_with_url_and_status() {
        let server = MockServer::start();
        let config = ProviderConfig::with_base_url(&server.base_url());

        server.mock(|when, then| {
            when.method(GET).path("/today/");
            then.status(503);
        });
        let login = server.mock(|when, then| {
            when.method(POST).path("/sso/SSOLogin");
            then.status(200);
        });

        let err = Session::login(&config, &credentials()).await.err().unwrap();

        match err {
            UsageError::Status { url, status } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/today/"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        login.assert_hits(0);
    }

    #[tokio::test]
    async fn test_post_redirect_becomes_get() {
        let server = MockServer::start();
        let config = ProviderConfig::with_base_url(&server.base_url());
        let session = Session::new(&config).unwrap();

        server.mock(|when, then| {
            when.method(POST).path("/submit");
            then.status(302).header("Location", "/done");
        });
        let done = server.mock(|when, then| {
            when.method(GET).path("/done");
            then.status(200).body("finished");
        });

        let body = session
            .post_form(&server.url("/submit"), &[("a", "b")])
            .await
            .unwrap();

        done.assert();
        assert_eq!(body, b"finished");
    }

    #[tokio::test]
    async fn test_redirect_chain_stops_after_max_hops() {
        let server = MockServer::start();
        let config = ProviderConfig::with_base_url(&server.base_url());
        let session = Session::new(&config).unwrap();

        let hops: Vec<_> = (0..15)
            .map(|i| {
                server.mock(|when, then| {
                    when.method(GET).path(format!("/hop/{}", i));
                    then.status(302).header("Location", format!("/hop/{}", i + 1));
                })
            })
            .collect();
        let end = server.mock(|when, then| {
            when.method(GET).path("/hop/15");
            then.status(200);
        });

        let err = session.get(&server.url("/hop/0")).await.unwrap_err();

        assert!(matches!(err, UsageError::Status { status: 302, .. }));
        for hop in &hops[..=MAX_REDIRECTS] {
            hop.assert_hits(1);
        }
        for hop in &hops[MAX_REDIRECTS + 1..] {
            hop.assert_hits(0);
        }
        end.assert_hits(0);
    }

    #[tokio::test]
    async fn test_redirect_cycle_terminates() {
        let server = MockServer::start();
        let config = ProviderConfig::with_base_url(&server.base_url());
        let session = Session::new(&config).unwrap();

        let ping = server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(302).header("Location", "/pong");
        });
        let pong = server.mock(|when, then| {
            when.method(GET).path("/pong");
            then.status(302).header("Location", "/ping");
        });

        let err = session.get(&server.url("/ping")).await.unwrap_err();

        assert!(matches!(err, UsageError::Status { status: 302, .. }));
        assert_eq!(ping.hits() + pong.hits(), MAX_REDIRECTS + 1);
    }

    #[tokio::test]
    async fn test_colon_cookie_survives_redirect_and_is_replayed() {
        let server = MockServer::start();
        let config = ProviderConfig::with_base_url(&server.base_url());

        server.mock(|when, then| {
            when.method(GET).path("/today/");
            then.status(302)
                .header("Set-Cookie", "TS01:a1b2=0123abcd; Path=/")
                .header("Location", "/today/landing");
        });
        let landing = server.mock(|when, then| {
            when.method(GET)
                .path("/today/landing")
                .header("cookie", "TS01:a1b2=0123abcd");
            then.status(200);
        });
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/sso/SSOLogin")
                .header("cookie", "TS01:a1b2=0123abcd");
            then.status(200);
        });

        Session::login(&config, &credentials()).await.unwrap();

        landing.assert();
        login.assert();
    }
}
