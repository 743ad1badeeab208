use thiserror::Error;

/// Errors raised by the shape constructors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The two endpoints of an edge are the same point
    #[error("edge endpoints coincide")]
    CoincidentPoints,
    /// No circle passes through the given points
    #[error("arc points are collinear or coincide")]
    CollinearPoints,
    /// A block dimension is zero, negative or not finite
    #[error("invalid block dimensions {dx} x {dy} x {dz}")]
    InvalidDimensions { dx: f64, dy: f64, dz: f64 },
}

/// Errors raised by the camera when it cannot map screen positions
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewError {
    /// The viewport has no area yet
    #[error("view is not ready (viewport is {width}x{height})")]
    NotReady { width: f32, height: f32 },
}

/// Errors that keep the viewer in its uninitialized phase
#[derive(Debug, Error)]
pub enum InitError {
    #[error("native window handle is not available: {0}")]
    InvalidWindowHandle(#[from] raw_window_handle::HandleError),
}
