use serde::{Deserialize, Serialize};

mod session;
pub use session::{Construction, ConstructionSession};

/// Drawing mode selected from the Draw menu. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    None,
    DrawLine,
    DrawArc,
    DrawCube,
}

impl DrawMode {
    pub const ALL: [DrawMode; 4] = [Self::None, Self::DrawLine, Self::DrawArc, Self::DrawCube];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::DrawLine => "Line",
            Self::DrawArc => "Arc",
            Self::DrawCube => "Cube",
        }
    }

    /// Clicks needed before a shape is built; zero when the mode builds nothing
    pub fn required_points(&self) -> usize {
        match self {
            Self::None => 0,
            Self::DrawLine => 2,
            Self::DrawArc => 3,
            Self::DrawCube => 1,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::None => "Pick a tool from the Draw menu.",
            Self::DrawLine => "Click the start and end of the line.",
            Self::DrawArc => "Click the start, a point on the arc, and the end.",
            Self::DrawCube => "Click to place a cube corner.",
        }
    }
}
