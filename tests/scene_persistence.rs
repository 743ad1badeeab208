mod common;

use std::fs;

use common::{TempDir, click, ready_viewer};
use eframe_cad::geometry::brep;
use eframe_cad::scene::persistence::PersistenceError;
use eframe_cad::{CadViewer, DrawMode, Point3D};

/// Viewer holding one line, one arc and one box
fn viewer_with_shapes() -> CadViewer {
    let mut viewer = ready_viewer();
    viewer.set_mode(DrawMode::DrawLine);
    click(&mut viewer, 100.0, 100.0);
    click(&mut viewer, 300.0, 180.0);
    viewer.set_mode(DrawMode::DrawArc);
    click(&mut viewer, 100.0, 400.0);
    click(&mut viewer, 250.0, 300.0);
    click(&mut viewer, 400.0, 420.0);
    viewer.set_mode(DrawMode::DrawCube);
    click(&mut viewer, 600.0, 200.0);
    assert_eq!(viewer.scene().len(), 3);
    viewer
}

fn serialized(viewer: &CadViewer) -> Vec<String> {
    viewer
        .scene()
        .shapes()
        .map(|shape| brep::to_brep_string(shape).unwrap())
        .collect()
}

#[test]
fn test_save_writes_one_file_per_shape() {
    let viewer = viewer_with_shapes();
    let dir = TempDir::new();

    let report = viewer.save_to_directory(dir.path()).unwrap();
    assert_eq!(report.written, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(dir.file_names(), ["shape_0001.brep", "shape_0002.brep", "shape_0003.brep"]);
    assert_eq!(viewer.scene().len(), 3);
}

#[test]
fn test_round_trip_is_byte_identical() {
    let original = viewer_with_shapes();
    let dir = TempDir::new();
    original.save_to_directory(dir.path()).unwrap();

    let mut restored = ready_viewer();
    let report = restored.load_from_directory(dir.path()).unwrap();
    assert_eq!(report.loaded, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(serialized(&restored), serialized(&original));

    for (i, text) in serialized(&original).iter().enumerate() {
        let on_disk = fs::read_to_string(dir.path().join(format!("shape_{:04}.brep", i + 1))).unwrap();
        assert_eq!(&on_disk, text);
    }
    assert_eq!(restored.renderer().unwrap().displayed_count(), 3);
    assert!(restored.take_redraw_request());
}

#[test]
fn test_load_order_survives_ten_or_more_shapes() {
    let mut viewer = ready_viewer();
    viewer.set_mode(DrawMode::DrawLine);
    for i in 0..12 {
        let x = i as f64 * 10.0;
        viewer.add_point(Point3D::new(x, 0.0, 0.0));
        viewer.add_point(Point3D::new(x, 5.0, 0.0));
    }
    assert_eq!(viewer.scene().len(), 12);

    let dir = TempDir::new();
    viewer.save_to_directory(dir.path()).unwrap();
    assert_eq!(dir.file_names()[0], "shape_0001.brep");
    assert_eq!(dir.file_names()[11], "shape_0012.brep");

    let mut restored = ready_viewer();
    restored.load_from_directory(dir.path()).unwrap();
    assert_eq!(serialized(&restored), serialized(&viewer));
}

#[test]
fn test_load_without_shape_files_keeps_scene() {
    let mut viewer = viewer_with_shapes();
    let before = serialized(&viewer);
    let dir = TempDir::new();
    fs::write(dir.path().join("notes.txt"), "not a shape").unwrap();

    let result = viewer.load_from_directory(dir.path());
    assert!(matches!(result, Err(PersistenceError::NothingToLoad(_))));
    assert_eq!(serialized(&viewer), before);
    assert_eq!(viewer.renderer().unwrap().displayed_count(), 3);
}

#[test]
fn test_load_skips_unreadable_files() {
    let source = viewer_with_shapes();
    let dir = TempDir::new();
    source.save_to_directory(dir.path()).unwrap();
    fs::write(dir.path().join("shape_0002.brep"), "{ broken").unwrap();
    fs::write(dir.path().join("shape_0004.brep.gz"), [0x1f, 0x8b, 0x08]).unwrap();
    fs::rename(dir.path().join("shape_0003.brep"), dir.path().join("SHAPE_0003.BREP")).unwrap();

    let mut viewer = ready_viewer();
    let report = viewer.load_from_directory(dir.path()).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.failed, 2);

    let kinds: Vec<&str> = viewer.scene().shapes().map(|s| s.kind().name()).collect();
    // "SHAPE_0003.BREP" sorts before the lowercase names
    assert_eq!(kinds, ["box", "edge"]);
}

#[test]
fn test_load_replaces_existing_scene() {
    let source = viewer_with_shapes();
    let dir = TempDir::new();
    source.save_to_directory(dir.path()).unwrap();
    fs::remove_file(dir.path().join("shape_0001.brep")).unwrap();
    fs::remove_file(dir.path().join("shape_0002.brep")).unwrap();

    let mut viewer = viewer_with_shapes();
    let report = viewer.load_from_directory(dir.path()).unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(viewer.scene().len(), 1);
    assert_eq!(viewer.renderer().unwrap().displayed_count(), 1);
}

#[test]
fn test_load_from_missing_directory() {
    let mut viewer = viewer_with_shapes();
    let missing = std::env::temp_dir().join(format!("eframe-cad-missing-{}", uuid::Uuid::new_v4()));

    let result = viewer.load_from_directory(&missing);
    assert!(matches!(result, Err(PersistenceError::DirectoryNotFound(_))));
    assert_eq!(viewer.scene().len(), 3);
}

#[test]
fn test_saving_again_overwrites_previous_files() {
    let dir = TempDir::new();
    let mut viewer = ready_viewer();
    viewer.set_mode(DrawMode::DrawCube);
    for i in 0..9 {
        viewer.add_point(Point3D::new(i as f64 * 100.0, 0.0, 0.0));
    }
    viewer.save_to_directory(dir.path()).unwrap();
    assert_eq!(dir.file_names().len(), 9);

    for i in 9..12 {
        viewer.add_point(Point3D::new(i as f64 * 100.0, 0.0, 0.0));
    }
    viewer.save_to_directory(dir.path()).unwrap();
    assert_eq!(dir.file_names().len(), 12);

    let mut restored = ready_viewer();
    let report = restored.load_from_directory(dir.path()).unwrap();
    assert_eq!(report.loaded, 12);
    assert_eq!(serialized(&restored), serialized(&viewer));
}

#[test]
fn test_load_skips_arc_that_leaves_its_circle() {
    let source = viewer_with_shapes();
    let dir = TempDir::new();
    source.save_to_directory(dir.path()).unwrap();

    // Move the arc start onto its center, keeping shape and boundary in agreement
    let arc_path = dir.path().join("shape_0002.brep");
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&arc_path).unwrap()).unwrap();
    let center = value["shape"]["center"].clone();
    value["shape"]["start"] = center.clone();
    value["topology"]["vertices"][0] = center;
    fs::write(&arc_path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let mut viewer = ready_viewer();
    let report = viewer.load_from_directory(dir.path()).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.failed, 1);

    let camera = viewer.camera().unwrap();
    assert!(camera.target().is_finite());
    assert!(camera.scale().is_finite());
}
