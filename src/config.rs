use crate::defaults;
use crate::error::{ChunkscribeError, Result};
use crate::transcript::stitcher::StitcherConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub capture: CaptureConfig,
    pub provider: ProviderConfig,
}

/// Silence segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Minimum silence gap in milliseconds that closes an utterance.
    pub silence_threshold_ms: u64,
    /// Close utterances by wall clock on silent chunks instead of waiting
    /// for the next word.
    pub live: bool,
}

/// Chunk capture configuration
///
/// Capture itself is external; these values describe the chunk windows it
/// produces and where the provider response cache lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub chunk_length_ms: u64,
    pub margin_ms: u64,
    /// Cache directory for provider responses; None disables caching.
    pub cache_dir: Option<PathBuf>,
}

/// Transcription provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    pub language: String,
    pub api_base: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_threshold_ms: defaults::SILENCE_THRESHOLD_MS,
            live: false,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            chunk_length_ms: defaults::CHUNK_LENGTH_MS,
            margin_ms: defaults::MARGIN_MS,
            cache_dir: None,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            api_base: defaults::DEFAULT_API_BASE.to_string(),
        }
    }
}

impl SegmenterConfig {
    /// The stitcher configuration this section describes.
    pub fn stitcher_config(&self) -> StitcherConfig {
        StitcherConfig {
            silence_threshold_ms: self.silence_threshold_ms,
            live: self.live,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing, contains invalid TOML, or
    /// fails validation. Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ChunkscribeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ChunkscribeError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing. Invalid TOML or
    /// invalid values still surface as errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ChunkscribeError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Default config file location: `$XDG_CONFIG_HOME/chunkscribe/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chunkscribe").join("config.toml"))
    }

    /// Validates value ranges across sections.
    pub fn validate(&self) -> Result<()> {
        self.segmenter.stitcher_config().validate()?;
        if self.capture.chunk_length_ms == 0 {
            return Err(ChunkscribeError::ConfigInvalidValue {
                key: "chunk_length_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.capture.margin_ms >= self.capture.chunk_length_ms {
            return Err(ChunkscribeError::ConfigInvalidValue {
                key: "margin_ms".to_string(),
                message: "must be smaller than chunk_length_ms".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let result = Config::load(Path::new("/nonexistent/config.toml"));
        assert!(matches!(
            result,
            Err(ChunkscribeError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[segmenter]\nsilence_threshold_ms = 250").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.segmenter.silence_threshold_ms, 250);
        assert!(!config.segmenter.live);
        assert_eq!(config.capture.chunk_length_ms, defaults::CHUNK_LENGTH_MS);
        assert_eq!(config.provider.model, defaults::DEFAULT_MODEL);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "segmenter = not valid").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = Config::default();
        config.segmenter.silence_threshold_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ChunkscribeError::ConfigInvalidValue { key, .. }) if key == "silence_threshold_ms"
        ));
    }

    #[test]
    fn test_validate_rejects_margin_not_below_chunk_length() {
        let mut config = Config::default();
        config.capture.margin_ms = config.capture.chunk_length_ms;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_segmenter_to_stitcher_config() {
        let section = SegmenterConfig {
            silence_threshold_ms: 300,
            live: true,
        };
        let stitcher = section.stitcher_config();
        assert_eq!(stitcher.silence_threshold_ms, 300);
        assert!(stitcher.live);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
