//! Campus Web - browser entry point for the 3D campus map
//!
//! Builds the Bevy app into the page's `#map3d` canvas and feeds it the
//! location manifest served alongside it.

mod app;
mod manifest;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // wgpu is chatty below WARN
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    app::run();
}
