// src/renderer.rs
use eframe::egui::{self, Color32, Pos2, Rect, Stroke};
use glam::DVec3;

use crate::config::ViewerConfig;
use crate::geometry::Point3D;
use crate::scene::{ShapeDisplay, ShapeId, ShapeRef};
use crate::view::Camera;

const PENDING_POINT_RADIUS: f32 = 3.5;
const PENDING_POINT_COLOR: Color32 = Color32::from_rgb(90, 200, 255);

/// Visual settings taken from the viewer config
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Color32,
    pub shape_color: Color32,
    pub line_width: f32,
    pub arc_segments: usize,
    pub show_triad: bool,
    /// Triad axis length as a fraction of the smaller viewport side
    pub triad_scale: f32,
}

impl From<&ViewerConfig> for RenderStyle {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            background: config.background,
            shape_color: config.shape_color,
            line_width: config.line_width,
            arc_segments: config.arc_segments.max(8),
            show_triad: config.show_triad,
            triad_scale: 0.08,
        }
    }
}

/// Display list of the viewport and the code that paints it
#[derive(Debug)]
pub struct Renderer {
    displayed: Vec<(ShapeId, ShapeRef)>,
    preview: Vec<Point3D>,
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            displayed: Vec::new(),
            preview: Vec::new(),
            style,
        }
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.len()
    }

    pub fn is_displayed(&self, id: ShapeId) -> bool {
        self.displayed.iter().any(|(shown, _)| *shown == id)
    }

    /// Points clicked for the shape under construction
    pub fn set_preview_points(&mut self, points: &[Point3D]) {
        self.preview.clear();
        self.preview.extend_from_slice(points);
    }

    /// Paints the scene into `rect` as seen through `camera`
    pub fn render(&self, painter: &egui::Painter, rect: Rect, camera: &Camera) {
        painter.rect_filled(rect, 0.0, self.style.background);

        let to_screen = |p: DVec3| rect.min + camera.project(p).to_vec2();
        let stroke = Stroke::new(self.style.line_width, self.style.shape_color);

        for (_, shape) in &self.displayed {
            for polyline in shape.polylines(self.style.arc_segments) {
                let points: Vec<Pos2> = polyline.into_iter().map(to_screen).collect();
                painter.add(egui::Shape::line(points, stroke));
            }
        }

        for point in &self.preview {
            painter.circle_filled(
                to_screen((*point).into()),
                PENDING_POINT_RADIUS,
                PENDING_POINT_COLOR,
            );
        }

        if self.style.show_triad {
            self.render_triad(painter, rect, camera);
        }
    }

    /// Axis indicator in the lower-left corner
    fn render_triad(&self, painter: &egui::Painter, rect: Rect, camera: &Camera) {
        let length = rect.width().min(rect.height()) * self.style.triad_scale;
        let origin = egui::pos2(rect.left() + length * 1.5, rect.bottom() - length * 1.5);
        let axes = [
            (DVec3::X, Color32::RED, "X"),
            (DVec3::Y, Color32::GREEN, "Y"),
            (DVec3::Z, Color32::from_rgb(80, 120, 255), "Z"),
        ];

        for (axis, color, label) in axes {
            let dir = egui::vec2(axis.dot(camera.right()) as f32, -axis.dot(camera.up()) as f32);
            let tip = origin + dir * length;
            painter.line_segment([origin, tip], Stroke::new(1.5, color));
            painter.text(
                tip + dir * 8.0,
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(11.0),
                Color32::WHITE,
            );
        }
    }
}

impl ShapeDisplay for Renderer {
    fn display(&mut self, id: ShapeId, shape: ShapeRef) {
        self.displayed.push((id, shape));
    }

    fn erase(&mut self, id: ShapeId) {
        self.displayed.retain(|(shown, _)| *shown != id);
    }
}
