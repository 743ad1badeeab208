#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use eframe_cad::{CadViewer, InputEvent};
use egui::{Modifiers, PointerButton, pos2};
use raw_window_handle::{RawWindowHandle, WebWindowHandle};

/// Scratch directory removed on drop
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("eframe-cad-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.0)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Viewer attached to a fake window with an 800x600 viewport
pub fn ready_viewer() -> CadViewer {
    let mut viewer = CadViewer::default();
    let handle = RawWindowHandle::Web(WebWindowHandle::new(1));
    assert!(viewer.initialize(Ok(handle), egui::vec2(800.0, 600.0)).unwrap());
    viewer.take_redraw_request();
    viewer
}

pub fn press(viewer: &mut CadViewer, x: f32, y: f32, button: PointerButton) {
    viewer.handle_event(&InputEvent::PointerDown {
        pos: pos2(x, y),
        button,
        modifiers: Modifiers::NONE,
    });
}

pub fn release(viewer: &mut CadViewer, x: f32, y: f32, button: PointerButton) {
    viewer.handle_event(&InputEvent::PointerUp {
        pos: pos2(x, y),
        button,
    });
}

/// Primary button click
pub fn click(viewer: &mut CadViewer, x: f32, y: f32) {
    press(viewer, x, y, PointerButton::Primary);
    release(viewer, x, y, PointerButton::Primary);
}
