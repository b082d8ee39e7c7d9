//! Campus Core - Scene registry, camera framing, and location manifest
//!
//! This crate holds the engine-independent logic of the campus map:
//! - Scene registry tracking which named model is visible
//! - Camera framing from a model's bounding volume
//! - Orbit state math used by the camera controller
//! - Selection coordinator gluing registry and framer together
//! - Location manifest mapping menu labels to model files

pub mod bounds;
pub mod coordinator;
pub mod framing;
pub mod manifest;
pub mod orbit;
pub mod registry;

pub use bounds::BoundingVolume;
pub use coordinator::{BoundsProvider, ModelLoaded, SelectionCoordinator};
pub use framing::{CameraFramer, CameraPose, CameraRig, FramingConfig};
pub use manifest::{Location, LocationManifest, ManifestError};
pub use orbit::OrbitState;
pub use registry::{ModelEntry, Registration, SceneRegistry};

pub use glam::Vec3;
