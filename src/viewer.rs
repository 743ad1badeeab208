use std::path::Path;

use egui::{CursorIcon, Vec2};
use raw_window_handle::{HandleError, RawWindowHandle};

use crate::config::ViewerConfig;
use crate::error::InitError;
use crate::geometry::Point3D;
use crate::input::{GestureClassifier, GestureConfig, GestureOutcome, InputEvent};
use crate::renderer::{RenderStyle, Renderer};
use crate::scene::Scene;
use crate::scene::persistence::{self, LoadReport, PersistenceError, PersistenceResult, SaveReport};
use crate::tools::{Construction, ConstructionSession, DrawMode};
use crate::view::{Camera, ViewControl};

/// Rendering resources that exist once the native window is available
#[derive(Debug)]
pub struct Viewport {
    pub camera: Camera,
    pub renderer: Renderer,
}

/// Two-phase startup: only `initialize` does anything until the viewer is `Ready`
#[derive(Debug, Default)]
pub enum ViewerState {
    #[default]
    NotReady,
    Ready(Viewport),
}

/// The 3D CAD viewport: camera navigation, shape construction and the scene
#[derive(Debug)]
pub struct CadViewer {
    config: ViewerConfig,
    state: ViewerState,
    scene: Scene,
    session: ConstructionSession,
    classifier: GestureClassifier,
    redraw_requested: bool,
    notice: Option<String>,
}

impl Default for CadViewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

fn gesture_config(config: &ViewerConfig) -> GestureConfig {
    GestureConfig {
        roll_radians_per_pixel: config.roll_radians_per_pixel,
        wheel_notch: config.wheel_notch,
        zoom_pixels_per_step: config.zoom_pixels_per_step,
    }
}

impl CadViewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            session: ConstructionSession::new(config.cube_size),
            classifier: GestureClassifier::new(gesture_config(&config)),
            config,
            state: ViewerState::NotReady,
            scene: Scene::new(),
            redraw_requested: false,
            notice: None,
        }
    }

    pub fn set_config(&mut self, config: ViewerConfig) {
        self.session.set_cube_size(config.cube_size);
        if !self.classifier.is_navigating() {
            self.classifier = GestureClassifier::new(gesture_config(&config));
        }
        if let ViewerState::Ready(viewport) = &mut self.state {
            viewport.renderer.set_style(RenderStyle::from(&config));
        }
        self.config = config;
        self.redraw_requested = true;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ViewerState::Ready(_))
    }

    /// Creates the camera and renderer.
    ///
    /// `window` is the host's native window handle, only checked for presence.
    /// Returns `Ok(false)` when already initialized. Without a native window the
    /// viewer stays uninitialized and the call can simply be repeated later.
    pub fn initialize(
        &mut self,
        window: Result<RawWindowHandle, HandleError>,
        size: Vec2,
    ) -> Result<bool, InitError> {
        if self.is_ready() {
            return Ok(false);
        }

        let handle = window.map_err(|err| {
            log::warn!("Invalid window handle: {err}");
            InitError::from(err)
        })?;
        log::debug!("Attaching viewer to {handle:?}");

        let mut camera = Camera::new();
        camera.resize(size);
        let mut renderer = Renderer::new(RenderStyle::from(&self.config));
        self.scene.redisplay(&mut renderer);
        renderer.set_preview_points(self.session.pending());

        self.state = ViewerState::Ready(Viewport { camera, renderer });
        self.redraw_requested = true;
        log::info!("Viewer initialized ({}x{})", size.x, size.y);
        Ok(true)
    }

    pub fn resize(&mut self, size: Vec2) {
        if let ViewerState::Ready(viewport) = &mut self.state {
            if viewport.camera.size() != size {
                viewport.camera.resize(size);
                self.redraw_requested = true;
            }
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.session.mode()
    }

    /// Switches the drawing mode, dropping any partly clicked shape
    pub fn set_mode(&mut self, mode: DrawMode) {
        log::debug!("Draw mode {} -> {}", self.session.mode().name(), mode.name());
        self.session.set_mode(mode);
        if let ViewerState::Ready(viewport) = &mut self.state {
            viewport.renderer.set_preview_points(&[]);
        }
        self.redraw_requested = true;
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        let ViewerState::Ready(viewport) = &mut self.state else {
            if matches!(event, InputEvent::PointerDown { .. }) {
                log::warn!("View not initialized, ignoring pointer input");
            }
            return;
        };

        let pick = match self.classifier.handle(event, &mut viewport.camera) {
            GestureOutcome::Ignored | GestureOutcome::Updated => return,
            GestureOutcome::Redraw => {
                self.redraw_requested = true;
                return;
            }
            GestureOutcome::Pick(pos) => pos,
        };

        if self.session.mode() == DrawMode::None {
            return;
        }

        match viewport.camera.convert(pick) {
            Ok(point) => self.add_point(point),
            Err(err) => {
                log::warn!("Convert error: {err}");
                self.notice = Some(format!("Click ignored: {err}"));
            }
        }
    }

    /// Feeds a construction point to the active drawing mode
    pub fn add_point(&mut self, point: Point3D) {
        let ViewerState::Ready(viewport) = &mut self.state else {
            log::warn!("View not initialized, dropping construction point");
            return;
        };
        let mode = self.session.mode();
        let outcome = self.session.push_point(point);

        match outcome {
            Construction::Pending(count) => {
                log::debug!(
                    "{} point {}/{}",
                    mode.name(),
                    count,
                    mode.required_points()
                );
            }
            Construction::Built(shape) => {
                let kind = shape.kind();
                self.scene.add(shape, &mut viewport.renderer);
                log::info!("Created {} ({} shapes in scene)", kind.name(), self.scene.len());
                self.notice = None;
            }
            Construction::Rejected(err) => {
                log::warn!("Failed to create {}: {}", mode.name().to_lowercase(), err);
                self.notice = Some(format!("{} not created: {}", mode.name(), err));
            }
            Construction::Discarded => {}
        }

        viewport.renderer.set_preview_points(self.session.pending());
        self.redraw_requested = true;
    }

    /// Frames every shape of the scene
    pub fn fit_all(&mut self) {
        if let ViewerState::Ready(viewport) = &mut self.state {
            if viewport.camera.fit_all(self.scene.bounds()) {
                self.redraw_requested = true;
            }
        }
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        if let ViewerState::Ready(viewport) = &self.state {
            viewport.renderer.render(painter, rect, &viewport.camera);
        }
    }

    /// Writes every shape to `dir`. Does not touch the scene.
    pub fn save_to_directory(&self, dir: &Path) -> PersistenceResult<SaveReport> {
        persistence::save_to_directory(&self.scene, dir)
    }

    /// Replaces the scene with the shapes stored in `dir` and frames them
    pub fn load_from_directory(&mut self, dir: &Path) -> PersistenceResult<LoadReport> {
        let ViewerState::Ready(viewport) = &mut self.state else {
            return Err(PersistenceError::NotReady);
        };

        let report = persistence::load_from_directory(&mut self.scene, dir, &mut viewport.renderer)?;
        viewport.camera.fit_all(self.scene.bounds());
        self.redraw_requested = true;
        Ok(report)
    }

    /// True once after any change that needs a repaint
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn pending_points(&self) -> &[Point3D] {
        self.session.pending()
    }

    pub fn is_navigating(&self) -> bool {
        self.classifier.is_navigating()
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        self.classifier.cursor_icon()
    }

    pub fn camera(&self) -> Option<&Camera> {
        match &self.state {
            ViewerState::Ready(viewport) => Some(&viewport.camera),
            ViewerState::NotReady => None,
        }
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        match &self.state {
            ViewerState::Ready(viewport) => Some(&viewport.renderer),
            ViewerState::NotReady => None,
        }
    }

    /// Last construction or conversion problem, cleared by the next built shape
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}
