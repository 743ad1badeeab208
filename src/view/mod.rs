use egui::Pos2;

use crate::error::ViewError;
use crate::geometry::Point3D;

mod camera;
pub use camera::Camera;

/// Camera operations driven by pointer gestures.
///
/// All positions are in viewport-local pixels, origin at the top-left corner
/// of the viewport, y growing downwards.
pub trait ViewControl {
    /// Maps a viewport position onto the view plane
    fn convert(&self, pos: Pos2) -> Result<Point3D, ViewError>;

    /// Moves the scene by a pointer delta
    fn pan(&mut self, dx: f32, dy: f32);

    /// Records the reference position of a rotation
    fn rotate_start(&mut self, pos: Pos2);

    /// Rotates relative to the position given to `rotate_start`
    fn rotate(&mut self, pos: Pos2);

    /// Rolls the camera about the view axis
    fn turn(&mut self, angle: f64);

    /// Zooms around `anchor` by the amount implied by dragging from `anchor` to `target`
    fn zoom_at(&mut self, anchor: Pos2, target: Pos2);
}
