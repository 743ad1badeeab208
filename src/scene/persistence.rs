//! Saving the scene to, and restoring it from, a directory of shape files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Scene, ShapeDisplay};
use crate::geometry::brep::{self, BREP_EXTENSION};

/// Errors that stop a whole save or load
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no shape files found in {0}")]
    NothingToLoad(PathBuf),

    #[error("viewer is not initialized")]
    NotReady,
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveReport {
    pub written: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failed: usize,
}

/// Minimum digits of a file ordinal
const ORDINAL_WIDTH: usize = 4;

/// File name of the `ordinal`-th shape (1-based).
///
/// The width does not depend on the scene size, so saving again into the same
/// directory overwrites the previous files and name order stays save order.
pub fn shape_file_name(ordinal: usize) -> String {
    format!("shape_{ordinal:0width$}.{BREP_EXTENSION}", width = ORDINAL_WIDTH)
}

/// Writes every shape of `scene` into `dir`, which must exist.
///
/// A shape that fails to write is logged and skipped.
pub fn save_to_directory(scene: &Scene, dir: &Path) -> PersistenceResult<SaveReport> {
    if !dir.is_dir() {
        return Err(PersistenceError::DirectoryNotFound(dir.to_path_buf()));
    }

    let total = scene.len();
    let mut report = SaveReport::default();
    for (index, shape) in scene.shapes().enumerate() {
        let path = dir.join(shape_file_name(index + 1));
        match brep::write_shape(shape, &path) {
            Ok(()) => report.written += 1,
            Err(err) => {
                log::warn!("Failed to write {}: {}", path.display(), err);
                report.failed += 1;
            }
        }
    }

    log::info!("Saved {} of {} shapes to {}", report.written, total, dir.display());
    Ok(report)
}

/// Shape files in `dir`, sorted by file name
pub fn find_shape_files(dir: &Path) -> PersistenceResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PersistenceError::DirectoryNotFound(dir.to_path_buf()));
    }
    let read_dir_error = |source| PersistenceError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && brep::is_shape_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Replaces the content of `scene` with the shapes stored in `dir`.
///
/// When `dir` holds no shape file the scene is left untouched and
/// `NothingToLoad` is returned. Otherwise the scene is cleared first and each
/// file that cannot be read is logged and skipped.
pub fn load_from_directory(
    scene: &mut Scene,
    dir: &Path,
    display: &mut impl ShapeDisplay,
) -> PersistenceResult<LoadReport> {
    let files = find_shape_files(dir)?;
    if files.is_empty() {
        log::warn!("No shape files found in {}", dir.display());
        return Err(PersistenceError::NothingToLoad(dir.to_path_buf()));
    }

    scene.clear(display);

    let mut report = LoadReport::default();
    for path in &files {
        match brep::read_shape(path) {
            Ok(shape) => {
                scene.add(shape, display);
                report.loaded += 1;
            }
            Err(err) => {
                log::warn!("Failed to read {}: {}", path.display(), err);
                report.failed += 1;
            }
        }
    }

    log::info!("Loaded {} shapes from {}", report.loaded, dir.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_file_names_have_fixed_width() {
        assert_eq!(shape_file_name(1), "shape_0001.brep");
        assert_eq!(shape_file_name(12), "shape_0012.brep");
        assert_eq!(shape_file_name(9999), "shape_9999.brep");
        assert_eq!(shape_file_name(12345), "shape_12345.brep");
        assert!(shape_file_name(9) < shape_file_name(10));
    }

    #[test]
    fn test_missing_directory() {
        let dir = std::env::temp_dir().join(format!("cad-missing-{}", uuid::Uuid::new_v4()));
        let scene = Scene::new();
        assert!(matches!(
            save_to_directory(&scene, &dir),
            Err(PersistenceError::DirectoryNotFound(_))
        ));
        assert!(matches!(
            find_shape_files(&dir),
            Err(PersistenceError::DirectoryNotFound(_))
        ));
    }
}
