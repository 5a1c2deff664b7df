use anyhow::Context;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub cors: CorsSettings,
    pub classifier: ClassifierSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Request body cap in bytes. Unlimited when absent.
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// `"*"` allows every origin.
    pub allow_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self { allow_origins: vec!["*".to_string()] }
    }
}

impl CorsSettings {
    pub fn layer(&self) -> anyhow::Result<CorsLayer> {
        if self.allow_origins.is_empty() || self.allow_origins.iter().any(|o| o == "*") {
            return Ok(CorsLayer::permissive());
        }

        let origins = self
            .allow_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    #[default]
    Stub,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub kind: ClassifierKind,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.max_body_bytes, None);
        assert_eq!(config.cors.allow_origins, vec!["*".to_string()]);
        assert_eq!(config.classifier.kind, ClassifierKind::Stub);
    }

    #[test]
    fn test_from_file_partial() {
        let file = write_config("server:\n  max_body_bytes: 1048576\n");
        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.max_body_bytes, Some(1048576));
        assert_eq!(config.cors.allow_origins, vec!["*".to_string()]);
        assert_eq!(config.classifier.kind, ClassifierKind::Stub);
    }

    #[test]
    fn test_from_file_full() {
        let file = write_config(
            "cors:\n  allow_origins:\n    - http://localhost:5173\n    - https://plants.example.com\nclassifier:\n  kind: stub\n",
        );
        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.cors.allow_origins.len(), 2);
        assert!(config.cors.layer().is_ok());
    }

    #[test]
    fn test_unknown_classifier_is_rejected() {
        let file = write_config("classifier:\n  kind: resnet50\n");
        let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::from_file("/nonexistent/pddd.yaml").is_err());
    }

    #[test]
    fn test_invalid_origin() {
        let cors = CorsSettings { allow_origins: vec!["http://bad\norigin".to_string()] };
        assert!(cors.layer().is_err());
    }
}
