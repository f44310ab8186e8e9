//! Turtle pose and identifiers

use crate::core::types::DVec3;
use crate::math::vector;

/// Index of a turtle inside a [`super::TurtleForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurtleId(pub usize);

/// A drawing cursor: pose, segment dimensions and lineage links.
#[derive(Clone, Debug, PartialEq)]
pub struct Turtle {
    pub position: DVec3,
    /// Unit heading
    pub orientation: DVec3,
    /// Secondary rotation axis, kept perpendicular to the heading
    pub l_vector: DVec3,
    pub width: f64,
    /// Distance covered by the next move
    pub length: f64,
    /// Set once the segment is retired
    pub complete: bool,
    pub(crate) parent: Option<TurtleId>,
    pub(crate) children: Vec<TurtleId>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::with_frame(DVec3::ZERO, vector::VERTICAL, vector::orthogonal(vector::VERTICAL))
    }
}

impl Turtle {
    /// A detached turtle at `position` with the given frame and zero dimensions.
    pub fn with_frame(position: DVec3, orientation: DVec3, l_vector: DVec3) -> Self {
        Self {
            position,
            orientation,
            l_vector,
            width: 0.0,
            length: 0.0,
            complete: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// A detached copy of this pose; lineage and completion are not carried.
    pub fn detached(&self) -> Self {
        Self {
            complete: false,
            parent: None,
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Advance along the heading by `length`.
    pub fn move_forward(&mut self) {
        self.position += vector::with_magnitude(self.orientation, self.length);
    }

    /// Translate by an arbitrary displacement.
    pub fn move_along(&mut self, displacement: DVec3) {
        self.position += displacement;
    }

    /// Where the next move would end.
    pub fn end_point(&self) -> DVec3 {
        self.position + vector::with_magnitude(self.orientation, self.length)
    }

    pub fn parent(&self) -> Option<TurtleId> {
        self.parent
    }

    pub fn children(&self) -> &[TurtleId] {
        &self.children
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}
