//! Location manifest - maps sidebar labels to campus model files
//!
//! The manifest is plain TOML:
//!
//! ```toml
//! version = "1.0"
//!
//! [framing]
//! offset = [0.4, 0.6, 0.4]
//!
//! [[location]]
//! label = "Campus Map"
//! model = "models/campus_map.glb"
//! default = true
//!
//! [[location]]
//! label = "Clinic"
//! model = "models/clinic_map.glb"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::framing::FramingConfig;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read location manifest: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse location manifest: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse location manifest JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to serialize location manifest: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Location manifest has no locations")]
    Empty,
    #[error("Location #{0} has an empty label")]
    EmptyLabel(usize),
    #[error("Location '{0}' has an empty model path")]
    EmptyModel(String),
    #[error("Duplicate location label '{0}'")]
    DuplicateLabel(String),
    #[error("No default location (set `default = true` on exactly one location)")]
    NoDefault,
    #[error("Multiple default locations: '{0}' and '{1}'")]
    MultipleDefaults(String, String),
}

/// A named campus location backed by one model file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Label shown in the sidebar and used for selection
    pub label: String,
    /// Model path, relative to the asset root
    pub model: String,
    /// Shown before any user interaction
    #[serde(default)]
    pub default: bool,
    /// Listed in the sidebar menu
    #[serde(default = "default_true")]
    pub menu: bool,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Location {
    pub fn new(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            model: model.into(),
            default: false,
            menu: true,
            description: None,
        }
    }

    fn with_default(mut self) -> Self {
        self.default = true;
        self
    }

    fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// The full set of campus locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationManifest {
    /// Version of the manifest format
    #[serde(default = "default_version")]
    pub version: String,
    /// Display name for the sidebar heading
    #[serde(default = "default_title")]
    pub title: String,
    /// How the camera frames a selected location
    #[serde(default)]
    pub framing: FramingConfig,
    /// Locations in menu order
    #[serde(default)]
    pub location: Vec<Location>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_title() -> String {
    "Campus Map".to_string()
}

impl Default for LocationManifest {
    fn default() -> Self {
        Self {
            version: default_version(),
            title: default_title(),
            framing: FramingConfig::default(),
            location: Vec::new(),
        }
    }
}

impl LocationManifest {
    /// Built-in campus: the home map plus four buildings
    pub fn campus() -> Self {
        Self {
            location: vec![
                Location::new("Campus Map", "models/campus_map.glb")
                    .with_default()
                    .with_description("Overview of the whole campus"),
                Location::new("Clinic", "models/clinic_map.glb"),
                Location::new("SHS Building", "models/shsbuilding.glb")
                    .with_description("Senior High School building"),
                Location::new("Teachers Faculty", "models/teachersfaculty.glb"),
                Location::new("Principal Office", "models/principaloffice.glb"),
            ],
            ..Default::default()
        }
    }

    /// Load and validate a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a manifest from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        let manifest: LocationManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse and validate a manifest from JSON (the `/api/locations` payload)
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        let manifest: LocationManifest = serde_json::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn to_toml(&self) -> Result<String, ManifestError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the manifest to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), ManifestError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Check labels are unique and non-empty, every model has a path,
    /// and exactly one location is the default
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.location.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut seen = HashSet::new();
        let mut default: Option<&str> = None;
        for (index, location) in self.location.iter().enumerate() {
            if location.label.trim().is_empty() {
                return Err(ManifestError::EmptyLabel(index));
            }
            if location.model.trim().is_empty() {
                return Err(ManifestError::EmptyModel(location.label.clone()));
            }
            if !seen.insert(location.label.as_str()) {
                return Err(ManifestError::DuplicateLabel(location.label.clone()));
            }
            if location.default {
                if let Some(first) = default {
                    return Err(ManifestError::MultipleDefaults(
                        first.to_string(),
                        location.label.clone(),
                    ));
                }
                default = Some(location.label.as_str());
            }
        }

        if default.is_none() {
            return Err(ManifestError::NoDefault);
        }
        Ok(())
    }

    /// The home location
    pub fn default_location(&self) -> Option<&Location> {
        self.location.iter().find(|l| l.default)
    }

    /// Locations listed in the sidebar, in manifest order
    pub fn menu_locations(&self) -> impl Iterator<Item = &Location> {
        self.location.iter().filter(|l| l.menu)
    }

    pub fn find(&self, label: &str) -> Option<&Location> {
        self.location.iter().find(|l| l.label == label)
    }
}
