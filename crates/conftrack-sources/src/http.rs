//! Blocking HTTP client shared by the adapters
//!
//! One request per call, no retries. Timeouts, status codes and GitHub's
//! rate-limit responses map to [`SourceError`] variants.

use crate::error::{SourceError, SourceResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// User agent for scraped HTML pages
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (+academic use)";

/// User agent for API calls
pub const TOOL_USER_AGENT: &str = concat!("conftrack/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout: Duration,

    /// `User-Agent` header
    pub user_agent: String,

    /// Optional `Accept` header
    pub accept: Option<String>,

    /// Optional bearer token
    pub bearer_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: None,
            bearer_token: None,
        }
    }
}

impl HttpConfig {
    /// Browser-like settings with the given timeout
    #[must_use]
    pub fn browser(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set `Accept` header
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Set bearer token; blank tokens are ignored
    #[must_use]
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

/// Blocking HTTP client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    bearer_token: Option<String>,
}

impl HttpClient {
    /// Build a client
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if a header value is invalid or the
    /// TLS backend cannot be initialized.
    pub fn new(config: HttpConfig) -> SourceResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(accept) = &config.accept {
            let value = HeaderValue::from_str(accept)
                .map_err(|e| SourceError::Config(format!("Accept header {accept:?}: {e}")))?;
            headers.insert(ACCEPT, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            bearer_token: config.bearer_token,
        })
    }

    /// GET a page as text
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and rate limits.
    pub fn get_text(&self, url: &str) -> SourceResult<String> {
        debug!(url, "GET");
        let mut request = self.client.get(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| SourceError::http(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| SourceError::http(url, e))?;
        check_status(url, status, &body)?;
        Ok(body)
    }

    /// GET and decode a JSON document
    ///
    /// # Errors
    ///
    /// As [`get_text`](Self::get_text), plus [`SourceError::Json`].
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body).map_err(|e| SourceError::json(url, e))
    }
}

/// Classify a response status
pub(crate) fn check_status(url: &str, status: u16, body: &str) -> SourceResult<()> {
    if status == 403 && body.to_lowercase().contains("rate limit") {
        return Err(SourceError::RateLimited {
            url: url.to_string(),
        });
    }
    if !(200..300).contains(&status) {
        return Err(SourceError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(check_status("u", 200, "").is_ok());
        assert!(matches!(
            check_status("u", 404, "missing"),
            Err(SourceError::Status { status: 404, .. })
        ));
        assert!(check_status("u", 403, "API Rate Limit exceeded")
            .unwrap_err()
            .is_rate_limited());
        assert!(matches!(
            check_status("u", 403, "forbidden"),
            Err(SourceError::Status { status: 403, .. })
        ));
    }

    #[test]
    fn blank_token_is_dropped() {
        let config = HttpConfig::default().with_bearer_token(Some("  ".to_string()));
        assert!(config.bearer_token.is_none());
        let config = HttpConfig::default().with_bearer_token(Some("ghp_x".to_string()));
        assert_eq!(config.bearer_token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn invalid_accept_header_is_config_error() {
        let err = HttpClient::new(HttpConfig::default().with_accept("bad\nvalue")).unwrap_err();
        assert!(matches!(err, SourceError::Config(_)));
    }
}
