use std::f64::consts::PI;

use egui::{Pos2, Vec2, pos2};
use glam::{DMat3, DQuat, DVec3};

use super::ViewControl;
use crate::error::ViewError;
use crate::geometry::{Bounds, Point3D};

const MIN_SCALE: f64 = 1e-6;
const MAX_SCALE: f64 = 1e6;
/// Fraction of the viewport left around fitted geometry
const FIT_MARGIN: f64 = 1.1;

/// Orthographic trackball camera.
///
/// The camera looks at `target` along `-back`, where `right`, `up` and `back`
/// are the columns of `orientation`. `scale` is the size of one pixel in world units.
#[derive(Debug, Clone)]
pub struct Camera {
    target: DVec3,
    orientation: DQuat,
    scale: f64,
    size: Vec2,
    rotation_origin: Option<(Pos2, DQuat)>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Isometric camera looking from +X+Y+Z towards the origin, Z up
    pub fn new() -> Self {
        let back = DVec3::ONE.normalize();
        let right = DVec3::Z.cross(back).normalize();
        let up = back.cross(right);
        Self {
            target: DVec3::ZERO,
            orientation: DQuat::from_mat3(&DMat3::from_cols(right, up, back)),
            scale: 0.25,
            size: Vec2::ZERO,
            rotation_origin: None,
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_ready(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    pub fn target(&self) -> DVec3 {
        self.target
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn right(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    pub fn up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// Unit vector pointing from the target towards the viewer
    pub fn back(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    /// Maps a world point to viewport pixels
    pub fn project(&self, point: DVec3) -> Pos2 {
        let d = point - self.target;
        pos2(
            (self.size.x as f64 / 2.0 + d.dot(self.right()) / self.scale) as f32,
            (self.size.y as f64 / 2.0 - d.dot(self.up()) / self.scale) as f32,
        )
    }

    /// World offset from the target to the view-plane point under `pos`
    fn offset(&self, pos: Pos2, scale: f64) -> DVec3 {
        let x = (pos.x as f64 - self.size.x as f64 / 2.0) * scale;
        let y = (self.size.y as f64 / 2.0 - pos.y as f64) * scale;
        self.right() * x + self.up() * y
    }

    /// Centers the view on `bounds` and scales it to fit. Returns false when there is nothing to fit.
    pub fn fit_all(&mut self, bounds: Option<Bounds>) -> bool {
        let Some(bounds) = bounds else {
            return false;
        };
        self.target = bounds.center();

        if self.is_ready() {
            let (right, up) = (self.right(), self.up());
            let (mut half_x, mut half_y) = (0.0f64, 0.0f64);
            for corner in bounds.corners() {
                let d = corner - self.target;
                half_x = half_x.max(d.dot(right).abs());
                half_y = half_y.max(d.dot(up).abs());
            }
            let scale = (2.0 * half_x / self.size.x as f64).max(2.0 * half_y / self.size.y as f64)
                * FIT_MARGIN;
            if scale > MIN_SCALE {
                self.scale = scale.min(MAX_SCALE);
            }
        }
        true
    }
}

impl ViewControl for Camera {
    fn convert(&self, pos: Pos2) -> Result<Point3D, ViewError> {
        if !self.is_ready() {
            return Err(ViewError::NotReady {
                width: self.size.x,
                height: self.size.y,
            });
        }
        Ok((self.target + self.offset(pos, self.scale)).into())
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        self.target -= self.right() * (dx as f64 * self.scale);
        self.target += self.up() * (dy as f64 * self.scale);
    }

    fn rotate_start(&mut self, pos: Pos2) {
        self.rotation_origin = Some((pos, self.orientation));
    }

    fn rotate(&mut self, pos: Pos2) {
        let Some((origin, start)) = self.rotation_origin else {
            return;
        };
        // half a turn per viewport
        let per_pixel = PI / (self.size.x.min(self.size.y).max(1.0) as f64);
        let yaw = DQuat::from_axis_angle(DVec3::Z, -(pos.x - origin.x) as f64 * per_pixel);
        let pitch = DQuat::from_axis_angle(start * DVec3::X, -(pos.y - origin.y) as f64 * per_pixel);
        self.orientation = (yaw * pitch * start).normalize();
    }

    fn turn(&mut self, angle: f64) {
        let roll = DQuat::from_axis_angle(self.back(), angle);
        self.orientation = (roll * self.orientation).normalize();
    }

    fn zoom_at(&mut self, anchor: Pos2, target: Pos2) {
        let delta = ((target.x + target.y) - (anchor.x + anchor.y)) as f64;
        if delta == 0.0 {
            return;
        }
        let mut factor = 1.0 + delta.abs() / 100.0;
        if delta < 0.0 {
            factor = 1.0 / factor;
        }

        let fixed = self.target + self.offset(anchor, self.scale);
        self.scale = (self.scale / factor).clamp(MIN_SCALE, MAX_SCALE);
        self.target = fixed - self.offset(anchor, self.scale);
    }
}
