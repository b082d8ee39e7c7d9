//! Sidebar menu of campus locations using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::selection::Coordinator;
use crate::types::{CampusManifest, ModelStatus, ModelStatuses, SelectLocation, UiLayout};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiLayout>()
            .add_systems(Update, update_ui_layout)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// Update UI layout based on window size
fn update_ui_layout(windows: Query<&Window>, mut ui_layout: ResMut<UiLayout>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        if (ui_layout.screen_width - width).abs() > 1.0
            || (ui_layout.screen_height - height).abs() > 1.0
        {
            ui_layout.update_for_screen(width, height);
        }
    }
}

/// Text shown for a location in the menu
fn menu_text(label: &str, status: Option<ModelStatus>) -> String {
    match status {
        Some(ModelStatus::Loading) | None => format!("{} (loading…)", label),
        Some(ModelStatus::Failed) => format!("{} (unavailable)", label),
        Some(ModelStatus::Ready) => label.to_string(),
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    manifest: Option<Res<CampusManifest>>,
    coordinator: Res<Coordinator>,
    statuses: Res<ModelStatuses>,
    mut ui_layout: ResMut<UiLayout>,
    mut selections: MessageWriter<SelectLocation>,
) {
    let is_mobile = ui_layout.is_mobile;
    let panel_width = ui_layout.panel_width();

    let Ok(ctx) = contexts.ctx_mut() else { return };

    // Larger touch targets on small screens
    if is_mobile {
        let mut style = (*ctx.style()).clone();
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
    }

    let title = manifest
        .as_ref()
        .map(|manifest| manifest.0.title.clone())
        .unwrap_or_else(|| "Campus Map".to_string());

    if is_mobile {
        egui::TopBottomPanel::top("mobile_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let toggle_text = if ui_layout.show_panel { "☰ Locations" } else { "☰" };
                if ui.button(egui::RichText::new(toggle_text).size(16.0)).clicked() {
                    ui_layout.show_panel = !ui_layout.show_panel;
                }
                ui.separator();
                if let Some(label) = coordinator.0.registry().selected_label() {
                    ui.label(label);
                }
            });
        });
    }

    if is_mobile && !ui_layout.show_panel {
        return;
    }

    egui::SidePanel::left("locations_panel")
        .default_width(panel_width)
        .resizable(!is_mobile)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&title);
                if is_mobile {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(egui::RichText::new("✕").size(18.0)).clicked() {
                            ui_layout.show_panel = false;
                        }
                    });
                }
            });
            ui.separator();

            let Some(manifest) = manifest.as_ref() else {
                ui.label("Loading locations...");
                return;
            };

            let registry = coordinator.0.registry();
            for location in manifest.0.menu_locations() {
                let status = statuses.get(&location.label);
                let is_visible = registry.is_visible(&location.label);
                let text = menu_text(&location.label, status);

                let response = ui
                    .add_enabled_ui(status != Some(ModelStatus::Failed), |ui| {
                        ui.selectable_label(is_visible, text)
                    })
                    .inner;
                let response = match &location.description {
                    Some(description) => response.on_hover_text(description),
                    None => response,
                };
                if response.clicked() {
                    selections.write(SelectLocation::new(location.label.clone()));
                    // Get the menu out of the way of the model
                    if is_mobile {
                        ui_layout.show_panel = false;
                    }
                }
            }

            ui.separator();
            let ready = statuses.count(ModelStatus::Ready);
            ui.small(format!("{} of {} models loaded", ready, manifest.0.location.len()));
        });
}
