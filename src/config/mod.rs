//! Optional TOML configuration

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{MixerError, MixerResult};

/// External tool binary used when neither flag, environment, nor config
/// names one.
pub const DEFAULT_TOOL: &str = "ffmpeg";

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "trackmix.toml";

/// Settings read from `trackmix.toml` when present.
///
/// The CLI flag and environment variable take precedence over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// External tool binary
    pub ffmpeg: Option<String>,
    /// Default log filter when neither RUST_LOG nor --log-level is set
    pub log_level: Option<String>,
}

impl MixerConfig {
    /// Load configuration from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> MixerResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MixerError::ConfigError {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MixerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(config.ffmpeg.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn parses_known_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackmix.toml");
        std::fs::write(&path, "ffmpeg = \"/opt/ffmpeg/bin/ffmpeg\"\nlog_level = \"debug\"\n")
            .unwrap();
        let config = MixerConfig::load(&path).unwrap();
        assert_eq!(config.ffmpeg.as_deref(), Some("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackmix.toml");
        std::fs::write(&path, "ffmpeg = [broken").unwrap();
        let err = MixerConfig::load(&path).unwrap_err();
        assert!(matches!(err, MixerError::ConfigError { .. }));
    }
}
