//! Fetches the location manifest and hands it to the scene

use bevy::prelude::*;
use campus_core::LocationManifest;
use campus_scene::CampusManifest;
use std::sync::{Arc, Mutex};

/// Same-origin endpoint served by campus-server
pub const DEFAULT_MANIFEST_URL: &str = "/api/locations";

pub struct ManifestPlugin;

impl Plugin for ManifestPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ManifestSource::from_browser())
            .init_resource::<PendingManifest>()
            .add_systems(Startup, fetch_manifest)
            .add_systems(Update, apply_pending_manifest);
    }
}

/// Where the manifest is fetched from
#[derive(Resource, Debug, Clone)]
pub struct ManifestSource {
    pub url: String,
}

impl Default for ManifestSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_MANIFEST_URL.to_string(),
        }
    }
}

impl ManifestSource {
    /// Use the `?locations=` query parameter, else the same-origin API
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        let search = web_sys::window().and_then(|window| window.location().search().ok());
        match search.as_deref().and_then(|s| parse_query_param(s, "locations")) {
            Some(url) => {
                tracing::info!("Using manifest from URL parameter: {}", url);
                Self { url }
            }
            None => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_browser() -> Self {
        Self::default()
    }
}

/// Parse a query parameter from a search string
fn parse_query_param(search: &str, param: &str) -> Option<String> {
    let search = search.trim_start_matches('?');
    for pair in search.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if key == param && !value.is_empty() {
                return Some(value.replace("%3A", ":").replace("%2F", "/"));
            }
        }
    }
    None
}

/// Parse a fetched manifest, falling back to the built-in campus on any problem
fn manifest_or_builtin(body: Result<String, String>) -> LocationManifest {
    let parsed = body.and_then(|text| LocationManifest::from_json(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(manifest) => {
            tracing::info!("Loaded manifest with {} locations", manifest.location.len());
            manifest
        }
        Err(e) => {
            tracing::warn!("Using built-in campus manifest: {}", e);
            LocationManifest::campus()
        }
    }
}

/// Manifest delivered by the async fetch, waiting to be inserted
#[derive(Resource, Default)]
pub struct PendingManifest(pub Arc<Mutex<Option<LocationManifest>>>);

#[cfg(target_arch = "wasm32")]
fn fetch_manifest(source: Res<ManifestSource>, pending: Res<PendingManifest>) {
    use wasm_bindgen_futures::spawn_local;

    let pending_clone = pending.0.clone();
    let url = source.url.clone();

    spawn_local(async move {
        tracing::info!("Fetching manifest from: {}", url);

        let body = match gloo_net::http::Request::get(&url).send().await {
            Ok(response) if response.ok() => response.text().await.map_err(|e| e.to_string()),
            Ok(response) => Err(format!("HTTP {} from {}", response.status(), url)),
            Err(e) => Err(e.to_string()),
        };

        let manifest = manifest_or_builtin(body);
        if let Ok(mut slot) = pending_clone.lock() {
            *slot = Some(manifest);
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_manifest(pending: Res<PendingManifest>) {
    if let Ok(mut slot) = pending.0.lock() {
        *slot = Some(LocationManifest::campus());
    }
}

/// Insert the manifest once the fetch has delivered it
fn apply_pending_manifest(mut commands: Commands, pending: Res<PendingManifest>) {
    let manifest = match pending.0.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => return,
    };
    if let Some(manifest) = manifest {
        commands.insert_resource(CampusManifest(manifest));
    }
}
