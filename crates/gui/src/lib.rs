// Library crate: exposes testable modules for integration tests and the headless harness.
// GUI-specific modules (app, ui, viewport rendering) remain in the binary crate.

pub mod assets;
pub mod clock;
pub mod harness;
pub mod haunted;
pub mod particles;
pub mod scene;
pub mod scroll;
pub mod state;
pub mod trainer;

/// Viewport math shared with the binary: camera, target geometry, picking.
/// The GL renderer stays in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
}
