//! Google Calendar provider configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

/// How requests are authorized.
///
/// Obtaining a token is out of scope: an access token must come from
/// elsewhere (e.g. `gcloud auth print-access-token`).
#[derive(Clone, PartialEq, Eq)]
pub enum GoogleCredentials {
    /// API key for public calendars, sent as the `key` query parameter.
    ApiKey(String),
    /// OAuth 2.0 bearer token.
    AccessToken(String),
}

impl GoogleCredentials {
    fn secret(&self) -> &str {
        match self {
            Self::ApiKey(s) | Self::AccessToken(s) => s,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::AccessToken(_) => "access_token",
        }
    }
}

impl fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GoogleCredentials::{}(<redacted>)", self.kind())
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub credentials: GoogleCredentials,
    /// Calendar API root, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    /// `maxResults` per page; Google's default applies when unset.
    pub page_size: Option<u32>,
}

impl GoogleConfig {
    /// Base URL for Google Calendar API v3.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(credentials: GoogleCredentials) -> Self {
        Self {
            credentials,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            page_size: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Checks that the configuration can be used for requests.
    pub fn validate(&self) -> Result<(), String> {
        if self.credentials.secret().trim().is_empty() {
            return Err(format!("{} must not be empty", self.credentials.kind()));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("invalid base_url {:?}: {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("base_url must be http(s), got {}", url.scheme()));
        }
        if self.timeout.is_zero() {
            return Err("timeout must be positive".to_string());
        }
        if self.page_size == Some(0) {
            return Err("page_size must be positive".to_string());
        }
        Ok(())
    }
}
