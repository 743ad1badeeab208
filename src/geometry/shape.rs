use std::f64::consts::TAU;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{Bounds, Point3D};
use crate::error::GeometryError;

/// Distance below which two points are treated as the same point
pub const TOLERANCE: f64 = 1e-9;

/// Relative bound on sin² of the angle between the two chords of an arc
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Relative slack when checking that stored arc points sit on their circle
const ON_CIRCLE_EPSILON: f64 = 1e-6;

/// Constructed topology owned by the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Straight edge between two vertices
    Edge { start: Point3D, end: Point3D },
    /// Edge lying on a circle
    Arc(CircularArc),
    /// Axis-aligned solid box
    Block {
        corner: Point3D,
        dx: f64,
        dy: f64,
        dz: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Edge,
    Arc,
    Block,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Arc => "arc",
            Self::Block => "box",
        }
    }
}

/// A circular arc running counter-clockwise about `normal` from `start` to `end`.
///
/// The arc parameter is the angle measured from the direction of `start`
/// around `normal`; it ranges over `[0, sweep]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularArc {
    pub center: Point3D,
    /// Unit axis of the supporting circle
    pub normal: Point3D,
    pub radius: f64,
    pub start: Point3D,
    pub end: Point3D,
    /// Swept angle in radians, in `(0, 2π)`
    pub sweep: f64,
}

impl CircularArc {
    /// Circle through three points, trimmed from `p1` to `p3` on the side containing `p2`.
    pub fn through(p1: Point3D, p2: Point3D, p3: Point3D) -> Result<Self, GeometryError> {
        let (a, b, c) = (DVec3::from(p1), DVec3::from(p2), DVec3::from(p3));

        if a.distance(b) <= TOLERANCE || b.distance(c) <= TOLERANCE || a.distance(c) <= TOLERANCE {
            return Err(GeometryError::CollinearPoints);
        }

        let u = a - c;
        let v = b - c;
        let w = u.cross(v);
        let w2 = w.length_squared();
        if w2 <= COLLINEAR_EPSILON * u.length_squared() * v.length_squared() {
            return Err(GeometryError::CollinearPoints);
        }

        let center = c + (v * u.length_squared() - u * v.length_squared()).cross(w) / (2.0 * w2);
        let radius = a.distance(center);
        let normal = (b - a).cross(c - a).normalize();

        let mut arc = Self {
            center: center.into(),
            normal: normal.into(),
            radius,
            start: p1,
            end: p3,
            sweep: 0.0,
        };
        arc.sweep = arc.angle_of(c);
        if !arc.sweep.is_finite() || arc.sweep <= 0.0 {
            return Err(GeometryError::CollinearPoints);
        }
        Ok(arc)
    }

    /// True when the stored fields describe one arc: both ends on the circle,
    /// the axis perpendicular to its plane and `sweep` reaching `end`.
    pub fn is_consistent(&self) -> bool {
        let finite = self.center.is_finite()
            && self.normal.is_finite()
            && self.start.is_finite()
            && self.end.is_finite()
            && self.radius.is_finite()
            && self.sweep.is_finite();
        if !finite || self.radius <= TOLERANCE || self.sweep <= 0.0 || self.sweep >= TAU {
            return false;
        }

        let center = DVec3::from(self.center);
        let normal = DVec3::from(self.normal);
        if (normal.length() - 1.0).abs() > 1e-6 {
            return false;
        }

        let tolerance = ON_CIRCLE_EPSILON * self.radius;
        let on_circle = |p: Point3D| {
            let d = DVec3::from(p) - center;
            (d.length() - self.radius).abs() <= tolerance && d.dot(normal).abs() <= tolerance
        };
        if !(on_circle(self.start) && on_circle(self.end)) {
            return false;
        }

        let angle = self.angle_of(self.end.into());
        (angle - self.sweep).abs() <= ON_CIRCLE_EPSILON * TAU
    }

    fn frame(&self) -> (DVec3, DVec3, DVec3) {
        let center = DVec3::from(self.center);
        let x_axis = (DVec3::from(self.start) - center).normalize();
        let y_axis = DVec3::from(self.normal).cross(x_axis);
        (center, x_axis, y_axis)
    }

    /// Angle of `p` around the arc axis, in `[0, 2π)`
    pub fn angle_of(&self, p: DVec3) -> f64 {
        let (center, x_axis, y_axis) = self.frame();
        let d = p - center;
        d.dot(y_axis).atan2(d.dot(x_axis)).rem_euclid(TAU)
    }

    pub fn point_at(&self, t: f64) -> DVec3 {
        let (center, x_axis, y_axis) = self.frame();
        center + (x_axis * t.cos() + y_axis * t.sin()) * self.radius
    }

    /// Points along the arc, `segments` per full turn
    pub fn sample(&self, segments: usize) -> Vec<DVec3> {
        let n = ((segments as f64 * self.sweep / TAU).ceil() as usize).max(2);
        let mut points: Vec<DVec3> = (0..n)
            .map(|i| self.point_at(self.sweep * i as f64 / n as f64))
            .collect();
        points.push(self.end.into());
        points
    }
}

impl Shape {
    /// Straight edge from `start` to `end`
    pub fn edge(start: Point3D, end: Point3D) -> Result<Self, GeometryError> {
        if start.distance(end) <= TOLERANCE {
            return Err(GeometryError::CoincidentPoints);
        }
        Ok(Self::Edge { start, end })
    }

    /// Arc through three points, from the first to the last
    pub fn arc_through(p1: Point3D, p2: Point3D, p3: Point3D) -> Result<Self, GeometryError> {
        CircularArc::through(p1, p2, p3).map(Self::Arc)
    }

    /// Box with one corner at `corner` extending along +X, +Y and +Z
    pub fn block(corner: Point3D, dx: f64, dy: f64, dz: f64) -> Result<Self, GeometryError> {
        let valid = |d: f64| d.is_finite() && d > TOLERANCE;
        if !(valid(dx) && valid(dy) && valid(dz)) {
            return Err(GeometryError::InvalidDimensions { dx, dy, dz });
        }
        Ok(Self::Block { corner, dx, dy, dz })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Edge { .. } => ShapeKind::Edge,
            Self::Arc(_) => ShapeKind::Arc,
            Self::Block { .. } => ShapeKind::Block,
        }
    }

    /// Re-checks the constructor invariants, used when shapes come from disk
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Edge { start, end } => Self::edge(*start, *end).map(|_| ()),
            Self::Arc(arc) => {
                if arc.is_consistent() {
                    Ok(())
                } else {
                    Err(GeometryError::CollinearPoints)
                }
            }
            Self::Block { corner, dx, dy, dz } => Self::block(*corner, *dx, *dy, *dz).map(|_| ()),
        }
    }

    /// Corner points of the block, indexed by bits (1 = +dx, 2 = +dy, 4 = +dz)
    pub(crate) fn block_vertices(corner: Point3D, dx: f64, dy: f64, dz: f64) -> [Point3D; 8] {
        std::array::from_fn(|i| {
            Point3D::new(
                corner.x + if i & 1 == 0 { 0.0 } else { dx },
                corner.y + if i & 2 == 0 { 0.0 } else { dy },
                corner.z + if i & 4 == 0 { 0.0 } else { dz },
            )
        })
    }

    /// Vertex index pairs of the twelve block edges
    pub(crate) fn block_edges() -> impl Iterator<Item = [usize; 2]> {
        (0..8usize).flat_map(|a| {
            [1usize, 2, 4]
                .into_iter()
                .filter(move |bit| a & bit == 0)
                .map(move |bit| [a, a | bit])
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Edge { start, end } => Bounds::from_points([(*start).into(), (*end).into()]),
            Self::Arc(arc) => Bounds::from_points(arc.sample(64)),
            Self::Block { corner, dx, dy, dz } => {
                let min = DVec3::from(*corner);
                Some(Bounds { min, max: min + DVec3::new(*dx, *dy, *dz) })
            }
        }
    }

    /// Wireframe of the shape as a list of polylines
    pub fn polylines(&self, arc_segments: usize) -> Vec<Vec<DVec3>> {
        match self {
            Self::Edge { start, end } => vec![vec![(*start).into(), (*end).into()]],
            Self::Arc(arc) => vec![arc.sample(arc_segments)],
            Self::Block { corner, dx, dy, dz } => {
                let vertices = Self::block_vertices(*corner, *dx, *dy, *dz);
                Self::block_edges()
                    .map(|[a, b]| vec![vertices[a].into(), vertices[b].into()])
                    .collect()
            }
        }
    }
}
