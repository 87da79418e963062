//! Configuration loader
//!
//! Merges defaults, an optional TOML file and `CCX_`-prefixed environment
//! variables with Figment, then validates the result.

use crate::config::IndexerConfig;
use ccx_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for configuration overrides
const CONFIG_ENV_PREFIX: &str = "CCX";

/// Configuration loader service
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Optional TOML configuration file path
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader that reads defaults and environment only
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from all sources.
    ///
    /// Later sources override earlier ones: defaults, then the TOML file
    /// (when present), then `CCX_*` environment variables.
    pub fn load(&self) -> Result<IndexerConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(IndexerConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                debug!(config = %config_path.display(), "merging configuration file");
                figment = figment.merge(Toml::file(config_path));
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{CONFIG_ENV_PREFIX}_")));

        let config: IndexerConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("failed to extract configuration: {e}")))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Save a configuration as TOML, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &IndexerConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("failed to serialize config: {e}")))?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), toml_string)?;
        Ok(())
    }

    /// Reject configurations the pipeline cannot run with
    fn validate(config: &IndexerConfig) -> Result<()> {
        if config.embedding_batch_size == 0 {
            return Err(Error::config("embedding_batch_size must be at least 1"));
        }
        if config.max_chunk_size == 0 {
            return Err(Error::config("max_chunk_size must be positive"));
        }
        if config.chunk_overlap >= config.max_chunk_size {
            return Err(Error::config(
                "chunk_overlap must be smaller than max_chunk_size",
            ));
        }
        if config.chunk_limit == 0 {
            return Err(Error::config("chunk_limit must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_load_without_sources() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, IndexerConfig::default());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ccx.toml");
        fs::write(
            &path,
            "embedding_batch_size = 25\nhybrid_mode = false\ncustom_extensions = [\".zig\"]\n",
        )
        .unwrap();

        let config = ConfigLoader::new().with_config_path(&path).load().unwrap();
        assert_eq!(config.embedding_batch_size, 25);
        assert!(!config.hybrid_mode);
        assert_eq!(config.custom_extensions, vec![".zig".to_string()]);
        assert_eq!(config.max_chunk_size, 2500);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ccx.toml");
        let config = IndexerConfig {
            embedding_batch_size: 7,
            custom_ignore_patterns: vec!["vendor/**".into()],
            ..IndexerConfig::default()
        };

        let loader = ConfigLoader::new();
        loader.save_to_file(&config, &path).unwrap();
        let loaded = loader.with_config_path(&path).load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ccx.toml");
        fs::write(&path, "embedding_batch_size = 0\n").unwrap();

        let err = ConfigLoader::new().with_config_path(&path).load().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ccx.toml");
        fs::write(&path, "max_chunk_size = 100\nchunk_overlap = 100\n").unwrap();

        assert!(ConfigLoader::new().with_config_path(&path).load().is_err());
    }
}
