use std::sync::Arc;

use uuid::Uuid;

use crate::geometry::{Bounds, Shape};

pub mod persistence;

/// Shared handle to a constructed shape. The scene and the display list both hold one.
pub type ShapeRef = Arc<Shape>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that shows shapes on screen, typically the renderer's display list
pub trait ShapeDisplay {
    fn display(&mut self, id: ShapeId, shape: ShapeRef);
    fn erase(&mut self, id: ShapeId);
}

#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub id: ShapeId,
    pub shape: ShapeRef,
}

/// All shapes of the session in creation order.
///
/// The scene decides when a shape goes away: removing entries always erases them
/// from the display it was given, so the display never keeps a shape alive on its own.
#[derive(Debug, Default)]
pub struct Scene {
    entries: Vec<SceneEntry>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shape and shows it
    pub fn add(&mut self, shape: Shape, display: &mut impl ShapeDisplay) -> ShapeId {
        let id = ShapeId::new();
        let shape = Arc::new(shape);
        display.display(id, Arc::clone(&shape));
        self.entries.push(SceneEntry { id, shape });
        id
    }

    /// Removes every shape from the scene and the display.
    ///
    /// Only the scene's own entries are erased.
    pub fn clear(&mut self, display: &mut impl ShapeDisplay) {
        for entry in self.entries.drain(..) {
            display.erase(entry.id);
        }
    }

    /// Shows every shape again, e.g. on a display created after the shapes
    pub fn redisplay(&self, display: &mut impl ShapeDisplay) {
        for entry in &self.entries {
            display.erase(entry.id);
            display.display(entry.id, Arc::clone(&entry.shape));
        }
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.entries.iter().map(|entry| entry.shape.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.shapes()
            .filter_map(Shape::bounds)
            .reduce(Bounds::union)
    }
}
