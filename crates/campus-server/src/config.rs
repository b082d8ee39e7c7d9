//! Configuration loading and validation

use anyhow::{Context, Result};
use campus_core::LocationManifest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for web server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding the built web frontend
    #[serde(default = "default_web_dir")]
    pub web_dir: String,
    /// TLS configuration (optional - enables HTTPS when present)
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            web_dir: default_web_dir(),
            tls: None,
        }
    }
}

/// TLS/HTTPS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM format)
    pub cert: String,
    /// Path to private key file (PEM format)
    pub key: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_web_dir() -> String {
    "web".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory served under /models
    #[serde(default = "default_models_path")]
    pub path: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            path: default_models_path(),
        }
    }
}

fn default_models_path() -> String {
    "./models".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Location manifest file; the built-in campus is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Config {
    /// On-disk path of a manifest model, if it is served from the models dir
    pub fn model_file(&self, model: &str) -> Option<PathBuf> {
        let relative = model.strip_prefix('/').unwrap_or(model);
        let relative = relative.strip_prefix("models/")?;
        Some(Path::new(&self.models.path).join(relative))
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file, with the built-in campus manifest beside it
pub fn save_default_config(path: &Path) -> Result<()> {
    let manifest_path = path.with_file_name("locations.toml");
    if !manifest_path.exists() {
        LocationManifest::campus().to_file(&manifest_path)?;
        info!(path = %manifest_path.display(), "Wrote default location manifest");
    }

    let config = Config {
        manifest: ManifestConfig {
            path: Some(manifest_path.display().to_string()),
        },
        ..Default::default()
    };
    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load the configured manifest, or the built-in campus
pub fn load_manifest(config: &Config) -> Result<LocationManifest> {
    match &config.manifest.path {
        Some(path) => {
            let manifest = LocationManifest::from_file(Path::new(path))
                .with_context(|| format!("Loading location manifest {}", path))?;
            info!(path = %path, locations = manifest.location.len(), "Loaded location manifest");
            Ok(manifest)
        }
        None => {
            info!("No manifest configured, using built-in campus");
            Ok(LocationManifest::campus())
        }
    }
}

/// Labels whose model file is missing from the models dir
pub fn missing_models(config: &Config, manifest: &LocationManifest) -> Vec<String> {
    manifest
        .location
        .iter()
        .filter(|location| {
            config
                .model_file(&location.model)
                .is_some_and(|file| !file.exists())
        })
        .map(|location| location.label.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("campus.toml")).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.web_dir, "web");
        assert_eq!(config.models.path, "./models");
        assert!(config.manifest.path.is_none());
        assert!(config.server.tls.is_none());
    }

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "127.0.0.1:9000"

[server.tls]
cert = "cert.pem"
key = "key.pem"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.web_dir, "web");
        assert_eq!(config.server.tls.unwrap().cert, "cert.pem");
    }

    #[test]
    fn test_default_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus.toml");
        save_default_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        let manifest_path = dir.path().join("locations.toml");
        assert_eq!(config.manifest.path, Some(manifest_path.display().to_string()));
        assert_eq!(config.models.path, "./models");
        assert_eq!(load_manifest(&config).unwrap(), LocationManifest::campus());
    }

    #[test]
    fn test_builtin_manifest_when_unset() {
        let manifest = load_manifest(&Config::default()).unwrap();
        assert_eq!(manifest, LocationManifest::campus());
    }

    #[test]
    fn test_invalid_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.toml");
        std::fs::write(&path, "[[location]]\nlabel = \"Quad\"\nmodel = \"models/quad.glb\"\n")
            .unwrap();

        let config = Config {
            manifest: ManifestConfig {
                path: Some(path.display().to_string()),
            },
            ..Default::default()
        };
        assert!(load_manifest(&config).is_err());
    }

    #[test]
    fn test_missing_models_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("campus_map.glb"), b"glTF").unwrap();
        std::fs::write(dir.path().join("clinic_map.glb"), b"glTF").unwrap();

        let config = Config {
            models: ModelsConfig {
                path: dir.path().display().to_string(),
            },
            ..Default::default()
        };
        let missing = missing_models(&config, &LocationManifest::campus());
        assert_eq!(
            missing,
            vec!["SHS Building", "Teachers Faculty", "Principal Office"]
        );
    }

    #[test]
    fn test_model_file_mapping() {
        let config = Config::default();
        assert_eq!(
            config.model_file("models/clinic_map.glb"),
            Some(Path::new("./models").join("clinic_map.glb"))
        );
        assert_eq!(
            config.model_file("/models/clinic_map.glb"),
            Some(Path::new("./models").join("clinic_map.glb"))
        );
        assert_eq!(config.model_file("https://cdn.example.com/clinic.glb"), None);
    }
}
