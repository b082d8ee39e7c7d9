//! Application state management

use anyhow::Result;
use campus_core::LocationManifest;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{self, Config};

/// Shared application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Validated location manifest served to the browser
    pub manifest: LocationManifest,
}

impl AppState {
    /// Load the manifest and check its model files
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let manifest = config::load_manifest(&config)?;

        let missing = config::missing_models(&config, &manifest);
        for label in &missing {
            if let Some(location) = manifest.find(label) {
                warn!(label = %label, model = %location.model, "Model file not found");
            }
        }
        info!(
            locations = manifest.location.len(),
            missing = missing.len(),
            "Location manifest ready"
        );

        Ok(Arc::new(Self { config, manifest }))
    }
}
