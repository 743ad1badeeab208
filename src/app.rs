use std::path::PathBuf;

use raw_window_handle::HasWindowHandle;

use crate::config::ViewerConfig;
use crate::input::InputHandler;
use crate::scene::persistence::PersistenceError;
use crate::tools::DrawMode;
use crate::viewer::CadViewer;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct CadApp {
    config: ViewerConfig,
    last_directory: Option<PathBuf>,

    // The viewer holds the session's shapes and GPU-side state; shapes are persisted
    // explicitly through File > Save shapes.
    #[serde(skip)]
    viewer: CadViewer,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    status: String,
}

impl Default for CadApp {
    fn default() -> Self {
        Self {
            config: ViewerConfig::default(),
            last_directory: None,
            viewer: CadViewer::default(),
            input: InputHandler::default(),
            status: String::new(),
        }
    }
}

impl CadApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.viewer = CadViewer::new(app.config.clone());
        app.input = InputHandler::new(app.config.wheel_notch, app.config.wheel_points_per_notch);
        app
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.viewer.set_mode(mode);
        self.status = mode.hint().to_owned();
    }

    fn pick_directory(&self, title: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(title);
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }

    /// Asks for a directory and writes the scene into it
    pub fn save_to_directory(&mut self) -> bool {
        let Some(dir) = self.pick_directory("Select directory to save BREP files") else {
            return false;
        };

        let saved = match self.viewer.save_to_directory(&dir) {
            Ok(report) => {
                self.status = if report.failed == 0 {
                    format!("Saved {} shapes to {}", report.written, dir.display())
                } else {
                    format!(
                        "Saved {} shapes to {} ({} failed)",
                        report.written,
                        dir.display(),
                        report.failed
                    )
                };
                true
            }
            Err(err) => {
                log::warn!("Save failed: {err}");
                self.status = err.to_string();
                false
            }
        };
        self.last_directory = Some(dir);
        saved
    }

    /// Asks for a directory and replaces the scene with its shapes
    pub fn load_from_directory(&mut self) -> bool {
        let Some(dir) = self.pick_directory("Select directory to load BREP files") else {
            return false;
        };

        let loaded = match self.viewer.load_from_directory(&dir) {
            Ok(report) => {
                self.status = if report.failed == 0 {
                    format!("Loaded {} shapes from {}", report.loaded, dir.display())
                } else {
                    format!(
                        "Loaded {} shapes from {} ({} unreadable)",
                        report.loaded,
                        dir.display(),
                        report.failed
                    )
                };
                true
            }
            Err(PersistenceError::NothingToLoad(_)) => {
                self.status = format!("Nothing to load in {}", dir.display());
                false
            }
            Err(err) => {
                log::warn!("Load failed: {err}");
                self.status = err.to_string();
                false
            }
        };
        self.last_directory = Some(dir);
        loaded
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save shapes…").clicked() {
                        ui.close_menu();
                        self.save_to_directory();
                    }
                    if ui.button("Load shapes…").clicked() {
                        ui.close_menu();
                        self.load_from_directory();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Draw", |ui| {
                    let current = self.viewer.mode();
                    for mode in DrawMode::ALL {
                        if ui.selectable_label(current == mode, mode.name()).clicked() {
                            ui.close_menu();
                            self.set_mode(mode);
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Fit all").clicked() {
                        ui.close_menu();
                        self.viewer.fit_all();
                    }
                    let mut config = self.config.clone();
                    ui.checkbox(&mut config.show_triad, "Axis triad");
                    if config != self.config {
                        self.viewer.set_config(config.clone());
                        self.config = config;
                    }
                });
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mode = self.viewer.mode();
                ui.label(format!("Mode: {}", mode.name()));
                if mode.required_points() > 1 {
                    ui.label(format!(
                        "Points: {}/{}",
                        self.viewer.pending_points().len(),
                        mode.required_points()
                    ));
                }
                ui.separator();
                ui.label(format!("Shapes: {}", self.viewer.scene().len()));
                ui.separator();
                match self.viewer.notice() {
                    Some(notice) => ui.colored_label(ui.visuals().warn_fg_color, notice),
                    None => ui.label(&self.status),
                };
            });
        });
    }
}

impl eframe::App for CadApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.menu_bar(ctx);
        self.status_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;

                // Deferred until the viewport is first shown; retried every frame until it succeeds
                if !self.viewer.is_ready() {
                    let window = frame.window_handle().map(|handle| handle.as_raw());
                    if let Err(err) = self.viewer.initialize(window, rect.size()) {
                        self.status = format!("Viewer initialization failed: {err}");
                    }
                }
                self.viewer.resize(rect.size());

                let navigating = self.viewer.is_navigating();
                for event in self.input.process_input(ctx, rect, response.hovered() || navigating) {
                    self.viewer.handle_event(&event);
                }
                if response.hovered() || self.viewer.is_navigating() {
                    ctx.set_cursor_icon(self.viewer.cursor_icon());
                }

                self.viewer.paint(&painter, rect);
            });

        if self.viewer.take_redraw_request() {
            ctx.request_repaint();
        }
    }
}
