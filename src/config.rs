use egui::Color32;
use serde::{Deserialize, Serialize};

/// Tunables of the viewer, persisted with the rest of the app state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ViewerConfig {
    /// Edge length of boxes placed in cube mode
    pub cube_size: f64,
    /// Roll angle per pixel of horizontal drag while shift-rotating
    pub roll_radians_per_pixel: f64,
    /// Wheel delta of one notch
    pub wheel_notch: i32,
    /// Vertical offset of the zoom target per wheel step, in pixels
    pub zoom_pixels_per_step: f32,
    /// Scroll distance (in points) reported by touchpads for one notch
    pub wheel_points_per_notch: f32,
    /// Wireframe segments per full circle
    pub arc_segments: usize,
    pub show_triad: bool,
    pub background: Color32,
    pub shape_color: Color32,
    pub line_width: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cube_size: 50.0,
            roll_radians_per_pixel: 0.01,
            wheel_notch: 120,
            zoom_pixels_per_step: 10.0,
            wheel_points_per_notch: 40.0,
            arc_segments: 64,
            show_triad: true,
            background: Color32::BLACK,
            shape_color: Color32::from_rgb(230, 200, 60),
            line_width: 1.5,
        }
    }
}
