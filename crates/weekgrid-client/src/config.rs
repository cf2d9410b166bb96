//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/weekgrid/config.toml` by default.
//!
//! Credential values (`api_key`, `access_token`) support secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment
//! - plain text used as-is

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use weekgrid_core::{CalendarRegistry, ColorConfig, ColorResolver, LayoutConfig};
use weekgrid_providers::CalendarSource;

use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the weekgrid client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Google Calendar settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleSettings>,

    /// Grid geometry, all-day lane and timezone.
    pub layout: LayoutConfig,

    /// Event color strategy.
    pub colors: ColorConfig,

    /// Calendars to show, in display order.
    pub calendars: Vec<CalendarSource>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            google: None,
            layout: LayoutConfig::default(),
            colors: ColorConfig::default(),
            calendars: vec![CalendarSource::new("primary")],
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weekgrid")
    }

    /// Checks layout, colors and calendars. Credentials are only checked
    /// for presence; references are resolved when a provider is built.
    pub fn validate(&self) -> ClientResult<()> {
        self.layout.validate()?;

        if self.calendars.is_empty() {
            return Err(ClientError::Config(
                "at least one [[calendars]] entry is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for calendar in &self.calendars {
            if calendar.id.trim().is_empty() {
                return Err(ClientError::Config("calendar id must not be empty".to_string()));
            }
            if !seen.insert(calendar.id.as_str()) {
                return Err(ClientError::Config(format!(
                    "calendar {:?} is listed twice",
                    calendar.id
                )));
            }
        }

        if let Some(ref google) = self.google {
            google.check_credentials()?;
        }
        Ok(())
    }

    /// Calendar colors keyed by calendar id.
    pub fn registry(&self) -> CalendarRegistry {
        CalendarSource::registry(&self.calendars)
    }

    /// Builds the color resolver selected by `[colors]`.
    pub fn color_resolver(&self) -> ColorResolver {
        ColorResolver::from_config(&self.colors, self.registry())
    }
}

// ---------------------------------------------------------------------------
// GoogleSettings (in config.toml, including credentials)
// ---------------------------------------------------------------------------

/// Google Calendar provider settings.
///
/// Exactly one of `api_key` (public calendars) or `access_token` must be
/// set. Both support secret references (`pass::…`, `env::…`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Calendar API root, for proxies and tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Events per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl GoogleSettings {
    /// True when the configured credential is read from `pass` or the
    /// environment rather than written in the file.
    pub fn uses_secret_reference(&self) -> bool {
        self.api_key
            .as_deref()
            .or(self.access_token.as_deref())
            .is_some_and(crate::secret::is_reference)
    }

    fn check_credentials(&self) -> ClientResult<()> {
        match (&self.api_key, &self.access_token) {
            (Some(_), Some(_)) => Err(ClientError::Config(
                "[google] accepts either api_key or access_token, not both".to_string(),
            )),
            (None, None) => Err(ClientError::Config(format!(
                "Google credentials not found. Add to {}:\n  \
                 [google]\n  \
                 api_key = \"env::GOOGLE_API_KEY\"\n\n  \
                 or access_token = \"pass::google/calendar-token\"",
                ClientConfig::default_path().display()
            ))),
            _ => Ok(()),
        }
    }

    /// Converts to provider configuration.
    ///
    /// Resolves credentials (expanding `pass::` / `env::` references) and
    /// applies the optional overrides.
    #[cfg(feature = "google")]
    pub fn to_provider_config(&self) -> ClientResult<weekgrid_providers::google::GoogleConfig> {
        use std::time::Duration;
        use weekgrid_providers::google::GoogleConfig;

        let mut config = GoogleConfig::new(self.resolve_credentials()?);
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(size) = self.page_size {
            config = config.with_page_size(size);
        }
        config.validate().map_err(ClientError::Config)?;
        Ok(config)
    }

    #[cfg(feature = "google")]
    pub(crate) fn resolve_credentials(
        &self,
    ) -> ClientResult<weekgrid_providers::google::GoogleCredentials> {
        use weekgrid_providers::google::GoogleCredentials;

        self.check_credentials()?;
        let resolve = |field: &str, raw: &str| {
            crate::secret::resolve(raw)
                .map_err(|e| ClientError::Config(format!("failed to resolve {field}: {e}")))
        };
        match (&self.api_key, &self.access_token) {
            (Some(key), _) => Ok(GoogleCredentials::ApiKey(resolve("api_key", key.as_str())?)),
            (_, Some(token)) => Ok(GoogleCredentials::AccessToken(resolve(
                "access_token",
                token.as_str(),
            )?)),
            (None, None) => Err(ClientError::Config("Google credentials not found".to_string())),
        }
    }
}
