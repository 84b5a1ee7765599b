use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::inference::engine::{InputLayout, OutputKind};

const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub input_size: u32,
    pub input_layout: InputLayout,
    pub output_kind: OutputKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached results; 0 disables the cache.
    pub capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let frontend_dir = match std::env::var("CARGO_MANIFEST_DIR") {
            Ok(manifest_dir) => PathBuf::from(format!("{}/../frontend/dist", manifest_dir)),
            Err(_) => PathBuf::from("/usr/src/app/frontend/dist"),
        };
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            frontend_dir,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/mri_model.onnx"),
            input_size: shared::INPUT_SIZE,
            input_layout: InputLayout::default(),
            output_kind: OutputKind::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl AppConfig {
    /// Reads the YAML config (if present) and applies environment overrides.
    ///
    /// The file path comes from `MRI_CONFIG`, falling back to `config/app.yaml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MRI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            log::info!("Loading configuration from {}", path);
            Self::from_file(Path::new(&path))?
        } else {
            log::info!("No configuration file at {}, using defaults", path);
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, ConfigError> {
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(config_str)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", port)?;
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = parse_env("MAX_UPLOAD_BYTES", limit)?;
        }
        if let Some(path) = lookup("MODEL_PATH") {
            self.model.path = PathBuf::from(path);
        }
        if let Some(capacity) = lookup("CACHE_CAPACITY") {
            self.cache.capacity = parse_env("CACHE_CAPACITY", capacity)?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_model_input() {
        let config = AppConfig::default();
        assert_eq!(config.model.input_size, 128);
        assert_eq!(config.model.input_layout, InputLayout::Nhwc);
        assert_eq!(config.model.output_kind, OutputKind::Probabilities);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
model:
  path: models/brain.pt
  input_layout: nchw
  output_kind: logits
cache:
  capacity: 0
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.model.path, PathBuf::from("models/brain.pt"));
        assert_eq!(config.model.input_layout, InputLayout::Nchw);
        assert_eq!(config.model.output_kind, OutputKind::Logits);
        assert_eq!(config.model.input_size, 128);
        assert_eq!(config.cache.capacity, 0);
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = AppConfig::from_yaml_str("  \n").unwrap();
        assert_eq!(config.cache.capacity, 256);
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err = AppConfig::from_yaml_str("model:\n  input_layout: chwn\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("MODEL_PATH", "/srv/models/mri.onnx"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_upload_bytes, 1024);
        assert_eq!(config.model.path, PathBuf::from("/srv/models/mri.onnx"));
    }

    #[test]
    fn malformed_override_names_the_variable() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|name| (name == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
