//! Boundary-representation files.
//!
//! Each file holds a single shape: its exact parametric definition followed by
//! the boundary derived from it (vertices, edges with their supporting curves,
//! and faces as vertex loops). Reading checks that the stored boundary is the one
//! the parameters generate, so a file edited by hand into an inconsistent state is
//! rejected instead of silently displayed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Point3D, Shape};
use crate::error::GeometryError;

/// Native extension of shape files
pub const BREP_EXTENSION: &str = "brep";
/// Compressed variant recognized when enumerating a directory
pub const COMPRESSED_EXTENSION: &str = "brep.gz";

const FORMAT_TAG: &str = "cadview-brep";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum BrepError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed shape file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown format tag {0:?}")]
    UnknownFormat(String),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error("stored boundary does not match the shape parameters")]
    Inconsistent,

    #[error("compressed shape files are not supported: {0}")]
    Compressed(PathBuf),

    #[error("invalid shape: {0}")]
    Geometry(#[from] GeometryError),
}

/// Curve supporting a boundary edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    Line,
    Circle {
        center: Point3D,
        normal: Point3D,
        radius: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEdge {
    pub curve: Curve,
    pub vertices: [usize; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFace {
    /// Outward unit normal
    pub normal: Point3D,
    /// Vertex loop, counter-clockwise seen from outside
    pub vertices: [usize; 4],
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Topology {
    pub vertices: Vec<Point3D>,
    pub edges: Vec<BoundaryEdge>,
    pub faces: Vec<BoundaryFace>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BrepDocument {
    format: String,
    version: u32,
    shape: Shape,
    topology: Topology,
}

impl Shape {
    /// Boundary description of the shape
    pub fn topology(&self) -> Topology {
        match self {
            Shape::Edge { start, end } => Topology {
                vertices: vec![*start, *end],
                edges: vec![BoundaryEdge {
                    curve: Curve::Line,
                    vertices: [0, 1],
                }],
                faces: Vec::new(),
            },
            Shape::Arc(arc) => Topology {
                vertices: vec![arc.start, arc.end],
                edges: vec![BoundaryEdge {
                    curve: Curve::Circle {
                        center: arc.center,
                        normal: arc.normal,
                        radius: arc.radius,
                    },
                    vertices: [0, 1],
                }],
                faces: Vec::new(),
            },
            Shape::Block { corner, dx, dy, dz } => {
                let vertices = Shape::block_vertices(*corner, *dx, *dy, *dz).to_vec();
                let edges = Shape::block_edges()
                    .map(|vertices| BoundaryEdge {
                        curve: Curve::Line,
                        vertices,
                    })
                    .collect();
                let mut faces = Vec::with_capacity(6);
                for (axis, u, v) in [(1usize, 2usize, 4usize), (2, 4, 1), (4, 1, 2)] {
                    let unit = |sign: f64| {
                        Point3D::new(
                            if axis == 1 { sign } else { 0.0 },
                            if axis == 2 { sign } else { 0.0 },
                            if axis == 4 { sign } else { 0.0 },
                        )
                    };
                    faces.push(BoundaryFace {
                        normal: unit(-1.0),
                        vertices: [0, v, u | v, u],
                    });
                    faces.push(BoundaryFace {
                        normal: unit(1.0),
                        vertices: [axis, axis | u, axis | u | v, axis | v],
                    });
                }
                Topology {
                    vertices,
                    edges,
                    faces,
                }
            }
        }
    }
}

/// Serializes a shape into the text stored in a shape file
pub fn to_brep_string(shape: &Shape) -> Result<String, BrepError> {
    shape.validate()?;
    let document = BrepDocument {
        format: FORMAT_TAG.to_owned(),
        version: FORMAT_VERSION,
        shape: shape.clone(),
        topology: shape.topology(),
    };
    let mut text = serde_json::to_string_pretty(&document)?;
    text.push('\n');
    Ok(text)
}

/// Parses the text of a shape file
pub fn from_brep_str(text: &str) -> Result<Shape, BrepError> {
    let document: BrepDocument = serde_json::from_str(text)?;
    if document.format != FORMAT_TAG {
        return Err(BrepError::UnknownFormat(document.format));
    }
    if document.version != FORMAT_VERSION {
        return Err(BrepError::UnsupportedVersion(document.version));
    }
    document.shape.validate()?;
    if document.shape.topology() != document.topology {
        return Err(BrepError::Inconsistent);
    }
    Ok(document.shape)
}

/// Writes `shape` to `path`, replacing any existing file
pub fn write_shape(shape: &Shape, path: &Path) -> Result<(), BrepError> {
    let text = to_brep_string(shape)?;
    fs::write(path, text).map_err(|source| BrepError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the shape stored in `path`
pub fn read_shape(path: &Path) -> Result<Shape, BrepError> {
    if has_suffix(path, COMPRESSED_EXTENSION) {
        return Err(BrepError::Compressed(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| BrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_brep_str(&text)
}

/// True for `*.brep` and `*.brep.gz`, ignoring case
pub fn is_shape_file(path: &Path) -> bool {
    has_suffix(path, BREP_EXTENSION) || has_suffix(path, COMPRESSED_EXTENSION)
}

fn has_suffix(path: &Path, extension: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| {
            name.strip_suffix(extension)
                .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CircularArc;

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Shape::edge(Point3D::new(0.1, 0.2, 0.3), Point3D::new(-7.5, 1e-3, 42.0)).unwrap(),
            Shape::arc_through(
                Point3D::new(1.0, 0.0, 0.0),
                Point3D::new(0.3, 0.7, 0.1),
                Point3D::new(-1.0, 0.0, 0.25),
            )
            .unwrap(),
            Shape::block(Point3D::new(-3.3, 12.1, 0.7), 50.0, 50.0, 50.0).unwrap(),
        ]
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        for shape in sample_shapes() {
            let first = to_brep_string(&shape).unwrap();
            let read = from_brep_str(&first).unwrap();
            assert_eq!(read, shape);
            assert_eq!(to_brep_string(&read).unwrap(), first);
        }
    }

    #[test]
    fn test_block_topology_counts() {
        let topology = sample_shapes()[2].topology();
        assert_eq!(topology.vertices.len(), 8);
        assert_eq!(topology.edges.len(), 12);
        assert_eq!(topology.faces.len(), 6);
        // every vertex is shared by three edges
        for v in 0..8 {
            let degree = topology
                .edges
                .iter()
                .filter(|edge| edge.vertices.contains(&v))
                .count();
            assert_eq!(degree, 3);
        }
    }

    #[test]
    fn test_rejects_tampered_boundary() {
        let text = to_brep_string(&sample_shapes()[0]).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
        value["topology"]["vertices"][0]["x"] = serde_json::json!(99.0);
        let tampered = serde_json::to_string(&value).unwrap();
        assert!(matches!(from_brep_str(&tampered), Err(BrepError::Inconsistent)));
    }

    #[test]
    fn test_rejects_arc_off_its_circle() {
        // Shape and boundary agree with each other, but the start point is the center
        let center = Point3D::new(2.0, 3.0, 0.0);
        let shape = Shape::Arc(CircularArc {
            center,
            normal: Point3D::new(0.0, 0.0, 1.0),
            radius: 5.0,
            start: center,
            end: Point3D::new(7.0, 3.0, 0.0),
            sweep: 1.0,
        });
        let document = BrepDocument {
            format: FORMAT_TAG.to_owned(),
            version: FORMAT_VERSION,
            topology: shape.topology(),
            shape: shape.clone(),
        };
        let text = serde_json::to_string_pretty(&document).unwrap();

        assert!(matches!(from_brep_str(&text), Err(BrepError::Geometry(_))));
        assert!(matches!(to_brep_string(&shape), Err(BrepError::Geometry(_))));
    }

    #[test]
    fn test_rejects_arc_with_wrong_sweep() {
        let Shape::Arc(mut arc) = sample_shapes()[1].clone() else {
            panic!("expected an arc");
        };
        arc.sweep /= 2.0;
        let shape = Shape::Arc(arc);
        let document = BrepDocument {
            format: FORMAT_TAG.to_owned(),
            version: FORMAT_VERSION,
            topology: shape.topology(),
            shape,
        };
        let text = serde_json::to_string(&document).unwrap();
        assert!(matches!(from_brep_str(&text), Err(BrepError::Geometry(_))));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let text = to_brep_string(&sample_shapes()[0]).unwrap().replace(FORMAT_TAG, "other");
        assert!(matches!(from_brep_str(&text), Err(BrepError::UnknownFormat(_))));
        assert!(matches!(from_brep_str("not json"), Err(BrepError::Json(_))));
    }

    #[test]
    fn test_shape_file_names() {
        assert!(is_shape_file(Path::new("shape_1.brep")));
        assert!(is_shape_file(Path::new("/tmp/SHAPE_2.BREP")));
        assert!(is_shape_file(Path::new("part.Brep.GZ")));
        assert!(!is_shape_file(Path::new("notes.txt")));
        assert!(!is_shape_file(Path::new("shape.brepx")));
        assert!(!is_shape_file(Path::new(".brep")));
    }

    #[test]
    fn test_compressed_files_are_reported() {
        let result = read_shape(Path::new("missing.brep.gz"));
        assert!(matches!(result, Err(BrepError::Compressed(_))));
    }
}
