//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Renders the current configuration as TOML.
pub fn dump(config: &ClientConfig) -> ClientResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {e}")))?;
    Ok(format!(
        "# config.toml ({})\n{toml_str}",
        ClientConfig::default_path().display()
    ))
}

/// Validates the configuration, resolving credentials when Google is
/// configured.
pub fn validate(config: &ClientConfig) -> ClientResult<String> {
    config.validate()?;

    let mut report = String::new();
    #[cfg(feature = "google")]
    if let Some(ref google) = config.google {
        google.to_provider_config()?;
        if google.uses_secret_reference() {
            report.push_str("Google credentials are valid (secret reference).\n");
        } else {
            report.push_str("Google credentials are valid.\n");
        }
    }
    report.push_str(&format!(
        "Configuration is valid ({} calendar(s), timezone {}).",
        config.calendars.len(),
        config.layout.timezone
    ));
    Ok(report)
}

/// Shows the configuration file path.
pub fn path() -> String {
    format!("config: {}", ClientConfig::default_path().display())
}
