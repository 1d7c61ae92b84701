//! HTTP client for the SPACE audit-log API.
//!
//! Wraps a reqwest [`Client`] with the endpoint, the `space-token` header
//! and a per-request timeout, and implements [`PageTransport`] so the
//! pagination loop can drive it.

use crate::audit::fetch::{FetchError, PageTransport};
use crate::audit::types::{PageRequest, RawRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::env;
use std::fs;
use std::time::Duration;
use thiserror::Error;

/// Audit-log endpoint of the SPACE planning analytics API
pub const DEFAULT_API_URL: &str = "https://api.succeedium.com/api/pa/4/auditlog";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix marking a token that was never filled in
const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "SPACE token is not set. Provide a token via:\n \
         - Command-line: --token <TOKEN>\n \
         - Environment variable: export SPACE_TOKEN=<TOKEN>\n \
         - Token file: export SPACE_TOKEN_FILE=/path/to/token"
    )]
    MissingToken,

    #[error("Failed to read token from file {path}: {source}")]
    TokenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Whether a token is absent or still a placeholder.
pub fn is_placeholder_token(token: &str) -> bool {
    let token = token.trim();
    token.is_empty() || token.starts_with(PLACEHOLDER_PREFIX)
}

/// Resolve the API token: explicit value, then `SPACE_TOKEN`, then
/// `SPACE_TOKEN_FILE`.
pub fn resolve_token(explicit: Option<&str>) -> Result<String, ConfigError> {
    resolve_token_from(
        explicit,
        env::var("SPACE_TOKEN").ok(),
        env::var("SPACE_TOKEN_FILE").ok(),
    )
}

/// Token resolution with the environment passed in.
pub fn resolve_token_from(
    explicit: Option<&str>,
    env_token: Option<String>,
    token_file: Option<String>,
) -> Result<String, ConfigError> {
    let token = if let Some(t) = explicit {
        t.to_string()
    } else if let Some(t) = env_token {
        t
    } else if let Some(path) = token_file {
        fs::read_to_string(&path).map_err(|source| ConfigError::TokenFile {
            path: path.clone(),
            source,
        })?
    } else {
        String::new()
    };

    let token = token.trim().to_string();
    if is_placeholder_token(&token) {
        return Err(ConfigError::MissingToken);
    }
    Ok(token)
}

/// SPACE API client configuration
#[derive(Debug, Clone)]
pub struct SpaceClient {
    url: String,
    token: String,
    client: Client,
}

impl SpaceClient {
    /// Create a client for `url` with the default timeout
    pub fn new(url: String, token: String) -> Result<Self> {
        Self::with_timeout(url, token, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout
    pub fn with_timeout(url: String, token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Create a client with optional parameters (for CLI)
    ///
    /// The URL falls back to `$SPACE_API_URL`, then [`DEFAULT_API_URL`].
    pub fn from_options(
        api_url: Option<&str>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let url = api_url
            .map(|s| s.to_string())
            .or_else(|| env::var("SPACE_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = resolve_token(token)?;
        Self::with_timeout(url, token, timeout)
    }

    /// Get the endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one page request and return the raw response body
    async fn post_page(&self, request: &PageRequest) -> Result<String, FetchError> {
        let response = self
            .client
            .post(&self.url)
            .header("space-token", &self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16(), body));
        }

        Ok(body)
    }
}

/// Parse a page body into its records.
///
/// The body must be a JSON object whose `data` field is an array of
/// objects. Anything else is a [`FetchError::ResponseShape`].
pub fn parse_page(body: &str) -> Result<Vec<RawRecord>, FetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::ResponseShape(format!("invalid JSON: {}", e)))?;

    let Value::Object(mut object) = value else {
        return Err(FetchError::ResponseShape(
            "body is not a JSON object".to_string(),
        ));
    };

    let items = match object.remove("data") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(FetchError::ResponseShape(
                "'data' is not a list".to_string(),
            ))
        }
        None => return Err(FetchError::ResponseShape("missing 'data'".to_string())),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(RawRecord(map)),
            _ => Err(FetchError::ResponseShape(format!(
                "data[{}] is not an object",
                i
            ))),
        })
        .collect()
}

#[async_trait]
impl PageTransport for SpaceClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawRecord>, FetchError> {
        let body = self.post_page(request).await?;
        parse_page(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SpaceClient::new(DEFAULT_API_URL.to_string(), "test-token".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_trimming() {
        let client = SpaceClient::new(
            "https://api.example.com/api/pa/4/auditlog/".to_string(),
            "test-token".to_string(),
        )
        .unwrap();
        assert_eq!(client.url(), "https://api.example.com/api/pa/4/auditlog");
    }

    #[test]
    fn test_placeholder_tokens() {
        assert!(is_placeholder_token(""));
        assert!(is_placeholder_token("   "));
        assert!(is_placeholder_token("YOUR_SPACE_TOKEN"));
        assert!(!is_placeholder_token("6e260a9c5ee95e27"));
    }

    #[test]
    fn test_explicit_token_wins() {
        assert_eq!(resolve_token(Some("  abc123 \n")).unwrap(), "abc123");
        assert!(matches!(
            resolve_token(Some("YOUR_TOKEN_HERE")),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_token_precedence() {
        let token = resolve_token_from(
            Some("flag"),
            Some("env".to_string()),
            Some("/nonexistent".to_string()),
        )
        .unwrap();
        assert_eq!(token, "flag");

        let token = resolve_token_from(
            None,
            Some("env".to_string()),
            Some("/nonexistent".to_string()),
        )
        .unwrap();
        assert_eq!(token, "env");

        assert!(matches!(
            resolve_token_from(None, None, None),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_token_file_fallback() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-token-123  ").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let token = resolve_token_from(None, None, Some(path)).unwrap();
        assert_eq!(token, "file-token-123");
    }

    #[test]
    fn test_token_file_placeholder_is_missing() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "YOUR_SPACE_TOKEN").unwrap();
        let path = file.path().to_string_lossy().to_string();

        assert!(matches!(
            resolve_token_from(None, None, Some(path)),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_token_file_unreadable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing-token").to_string_lossy().to_string();

        match resolve_token_from(None, None, Some(path.clone())) {
            Err(ConfigError::TokenFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected TokenFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_page() {
        let records = parse_page(
            r#"{"data":[{"UserName":"Alice","TimeStamp":"2025-08-16 05:43:12"}],"total":1}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_name(), Some("Alice"));

        assert!(parse_page(r#"{"data":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_page_bad_shapes() {
        for body in [
            r#"{"data":{}}"#,
            r#"{"data":"nope"}"#,
            r#"{"items":[]}"#,
            r#"[]"#,
            "[[]]",
            r#"[[{"UserName":"a"}]]"#,
            r#"{"data":[{"UserName":"a"}, 7]}"#,
            r#"{"data":null}"#,
            "<html>Bad Gateway</html>",
        ] {
            assert!(
                matches!(parse_page(body), Err(FetchError::ResponseShape(_))),
                "expected shape error for {}",
                body
            );
        }
    }
}
