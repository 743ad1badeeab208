#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod tools;
pub mod view;
pub mod viewer;

pub use app::CadApp;
pub use config::ViewerConfig;
pub use geometry::{Point3D, Shape};
pub use input::{InputEvent, InputHandler};
pub use renderer::Renderer;
pub use scene::Scene;
pub use tools::DrawMode;
pub use viewer::CadViewer;
