//! Shared resources and messages

use bevy::prelude::*;
use campus_core::{LocationManifest, ModelLoaded};
use std::collections::HashMap;

/// The active location manifest.
///
/// Inserted by the host once the manifest is known; model loading starts
/// when this resource appears.
#[derive(Debug, Clone, Resource)]
pub struct CampusManifest(pub LocationManifest);

/// User asked to show a location (sidebar click)
#[derive(Debug, Clone, Message)]
pub struct SelectLocation(pub String);

impl SelectLocation {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

/// A campus model finished loading and its scene is spawned
#[derive(Debug, Clone, Message)]
pub struct CampusModelLoaded(pub ModelLoaded<Entity>);

/// Load progress of one location's model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed,
}

/// Per-label load status, for the sidebar
#[derive(Debug, Clone, Default, Resource)]
pub struct ModelStatuses {
    pub status: HashMap<String, ModelStatus>,
}

impl ModelStatuses {
    pub fn get(&self, label: &str) -> Option<ModelStatus> {
        self.status.get(label).copied()
    }

    pub fn set(&mut self, label: &str, status: ModelStatus) {
        self.status.insert(label.to_string(), status);
    }

    pub fn count(&self, status: ModelStatus) -> usize {
        self.status.values().filter(|s| **s == status).count()
    }
}

/// UI layout settings for responsive design
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    /// Whether the sidebar menu is visible
    pub show_panel: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Whether we're on a small screen (mobile/tablet)
    pub is_mobile: bool,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            show_panel: true,
            screen_width: 1920.0,
            screen_height: 1080.0,
            is_mobile: false,
        }
    }
}

impl UiLayout {
    /// Update layout based on screen dimensions
    pub fn update_for_screen(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;

        // Mobile if narrow, or a narrow portrait screen
        let was_mobile = self.is_mobile;
        self.is_mobile = width < 800.0 || (width < height && width < 600.0);

        // Close the sidebar on first switch to mobile
        if self.is_mobile && !was_mobile {
            self.show_panel = false;
        }
    }

    /// Width of the sidebar menu
    pub fn panel_width(&self) -> f32 {
        if self.is_mobile {
            (self.screen_width * 0.6).min(240.0)
        } else {
            260.0
        }
    }
}
