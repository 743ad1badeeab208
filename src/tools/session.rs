use super::DrawMode;
use crate::error::GeometryError;
use crate::geometry::{Point3D, Shape};

/// Result of feeding one point to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Point buffered; holds the buffer length
    Pending(usize),
    /// Enough points were collected and the shape was built
    Built(Shape),
    /// Enough points were collected but they describe no valid shape
    Rejected(GeometryError),
    /// No drawing mode is active
    Discarded,
}

/// Collects clicked points for the active mode and builds shapes from them
#[derive(Debug, Clone)]
pub struct ConstructionSession {
    mode: DrawMode,
    pending: Vec<Point3D>,
    cube_size: f64,
}

impl Default for ConstructionSession {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl ConstructionSession {
    pub fn new(cube_size: f64) -> Self {
        Self {
            mode: DrawMode::None,
            pending: Vec::new(),
            cube_size,
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Switches mode; buffered points of the previous mode are dropped
    pub fn set_mode(&mut self, mode: DrawMode) {
        if !self.pending.is_empty() {
            log::debug!(
                "discarding {} pending point(s) of {} mode",
                self.pending.len(),
                self.mode.name()
            );
        }
        self.mode = mode;
        self.pending.clear();
    }

    pub fn pending(&self) -> &[Point3D] {
        &self.pending
    }

    pub fn set_cube_size(&mut self, size: f64) {
        self.cube_size = size;
    }

    pub fn push_point(&mut self, point: Point3D) -> Construction {
        let required = self.mode.required_points();
        if required == 0 {
            return Construction::Discarded;
        }

        self.pending.push(point);
        if self.pending.len() < required {
            return Construction::Pending(self.pending.len());
        }

        // buffer is consumed whatever the construction result
        let points = std::mem::take(&mut self.pending);
        let result = match self.mode {
            DrawMode::DrawLine => Shape::edge(points[0], points[1]),
            DrawMode::DrawArc => Shape::arc_through(points[0], points[1], points[2]),
            DrawMode::DrawCube => {
                Shape::block(points[0], self.cube_size, self.cube_size, self.cube_size)
            }
            DrawMode::None => return Construction::Discarded,
        };

        match result {
            Ok(shape) => Construction::Built(shape),
            Err(err) => Construction::Rejected(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3D {
        Point3D::new(x, y, 0.0)
    }

    #[test]
    fn test_line_needs_two_points() {
        let mut session = ConstructionSession::default();
        session.set_mode(DrawMode::DrawLine);

        assert_eq!(session.push_point(p(0.0, 0.0)), Construction::Pending(1));
        assert!(matches!(
            session.push_point(p(1.0, 0.0)),
            Construction::Built(Shape::Edge { .. })
        ));
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_degenerate_line_is_rejected_and_cleared() {
        let mut session = ConstructionSession::default();
        session.set_mode(DrawMode::DrawLine);

        session.push_point(p(2.0, 2.0));
        assert_eq!(
            session.push_point(p(2.0, 2.0)),
            Construction::Rejected(GeometryError::CoincidentPoints)
        );
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_cube_uses_configured_size() {
        let mut session = ConstructionSession::new(12.5);
        session.set_mode(DrawMode::DrawCube);

        match session.push_point(p(1.0, 2.0)) {
            Construction::Built(Shape::Block { corner, dx, dy, dz }) => {
                assert_eq!(corner, p(1.0, 2.0));
                assert_eq!((dx, dy, dz), (12.5, 12.5, 12.5));
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn test_no_mode_discards_points() {
        let mut session = ConstructionSession::default();
        assert_eq!(session.push_point(p(0.0, 0.0)), Construction::Discarded);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_mode_switch_drops_pending_points() {
        let mut session = ConstructionSession::default();
        session.set_mode(DrawMode::DrawArc);
        session.push_point(p(0.0, 0.0));
        session.push_point(p(1.0, 1.0));

        session.set_mode(DrawMode::DrawLine);
        assert_eq!(session.push_point(p(5.0, 0.0)), Construction::Pending(1));
    }
}
