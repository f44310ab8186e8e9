//! Arena of turtles linked into a forest.
//!
//! Removing a turtle splices its children onto its own parent so lineage is
//! never lost; a removed root leaves its children as new roots.

use super::node::{Turtle, TurtleId};

/// Owns every turtle of one interpretation run.
#[derive(Clone, Debug, Default)]
pub struct TurtleForest {
    slots: Vec<Option<Turtle>>,
}

impl TurtleForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached turtle. Returns its ID.
    pub fn spawn(&mut self, turtle: Turtle) -> TurtleId {
        let id = TurtleId(self.slots.len());
        self.slots.push(Some(turtle.detached()));
        id
    }

    /// Clone the pose of `source` into a new turtle.
    ///
    /// The clone becomes a child of the nearest complete turtle found by
    /// walking up from `source` itself; with none found it stays a root.
    pub fn spawn_from(&mut self, source: TurtleId) -> Option<TurtleId> {
        let turtle = self.get(source)?.detached();
        let id = TurtleId(self.slots.len());
        self.slots.push(Some(turtle));

        let mut current = Some(source);
        while let Some(candidate) = current {
            let Some(node) = self.get(candidate) else { break };
            let (complete, parent) = (node.complete, node.parent);
            if complete {
                self.link(candidate, id);
                break;
            }
            current = parent;
        }
        Some(id)
    }

    /// Remove a turtle, handing its children to its parent in order.
    pub fn remove(&mut self, id: TurtleId) -> Option<Turtle> {
        let mut turtle = self.slots.get_mut(id.0)?.take()?;
        let children = std::mem::take(&mut turtle.children);

        match turtle.parent.take() {
            Some(parent_id) => {
                for &child in &children {
                    if let Some(child) = self.get_mut(child) {
                        child.parent = Some(parent_id);
                    }
                }
                if let Some(parent) = self.get_mut(parent_id) {
                    parent.children.retain(|c| *c != id);
                    parent.children.extend_from_slice(&children);
                }
            }
            None => {
                for &child in &children {
                    if let Some(child) = self.get_mut(child) {
                        child.parent = None;
                    }
                }
            }
        }
        Some(turtle)
    }

    /// Attach `child` under `parent`.
    pub fn link(&mut self, parent: TurtleId, child: TurtleId) {
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn get(&self, id: TurtleId) -> Option<&Turtle> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TurtleId) -> Option<&mut Turtle> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn parent(&self, id: TurtleId) -> Option<TurtleId> {
        self.get(id).and_then(|t| t.parent)
    }

    /// Iterate over the children of a turtle.
    pub fn children(&self, id: TurtleId) -> impl Iterator<Item = TurtleId> + '_ {
        self.get(id)
            .map(|t| t.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Live turtles without a parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = TurtleId> + '_ {
        self.iter().filter(|(_, t)| t.parent.is_none()).map(|(id, _)| id)
    }

    /// Live turtles in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (TurtleId, &Turtle)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (TurtleId(i), t)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
