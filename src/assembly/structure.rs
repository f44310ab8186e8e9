//! The assembled plant: placed volumes, their materials and summary metrics.

use std::collections::BTreeMap;

use crate::solid::{Shape, Solid};

/// A solid with a name and material, possibly holding nested volumes.
#[derive(Clone, Debug)]
pub struct Volume {
    pub name: String,
    pub material: String,
    pub shape: Shape,
    pub children: Vec<Volume>,
}

impl Volume {
    pub fn new(name: &str, material: &str, shape: impl Into<Shape>) -> Self {
        Self {
            name: name.to_string(),
            material: material.to_string(),
            shape: shape.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Volume>) -> Self {
        self.children = children;
        self
    }

    /// This volume and all nested ones, breadth first.
    pub fn walk(&self) -> Vec<&Volume> {
        let mut out = vec![self];
        let mut index = 0;
        while index < out.len() {
            let volume = out[index];
            out.extend(volume.children.iter());
            index += 1;
        }
        out
    }
}

/// Aggregate figures for an assembled structure. Lengths in meters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    /// Summed sensitive area of accepted leaves (m²)
    pub sensitive_area: f64,
    pub leaf_count: usize,
    pub rejected_leaf_count: usize,
    pub branch_count: usize,
    /// Largest absolute coordinate reached along each axis
    pub x_size: f64,
    pub y_size: f64,
    pub z_size: f64,
    pub world_radius: f64,
}

impl Metrics {
    pub fn candidate_leaf_count(&self) -> usize {
        self.leaf_count + self.rejected_leaf_count
    }
}

/// Receives placed volumes, parents before children.
pub trait GeometrySink {
    type Handle;

    fn place(&mut self, volume: &Volume, parent: Option<&Self::Handle>) -> Self::Handle;
}

/// World volume with everything placed in it.
#[derive(Clone, Debug)]
pub struct Structure {
    pub world: Volume,
    pub metrics: Metrics,
}

impl Structure {
    pub fn new(world: Volume) -> Self {
        let world_radius = match &world.shape {
            Shape::Orb(orb) => orb.radius,
            other => other.bounds().max_abs().max_element(),
        };
        Self { world, metrics: Metrics { world_radius, ..Metrics::default() } }
    }

    /// Volumes placed directly in the world.
    pub fn daughters(&self) -> &[Volume] {
        &self.world.children
    }

    /// Place a daughter of the world and return its index.
    pub fn add(&mut self, volume: Volume) -> usize {
        self.world.children.push(volume);
        self.world.children.len() - 1
    }

    /// Daughters whose name matches.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Volume> + 'a {
        self.world.children.iter().filter(move |v| v.name == name)
    }

    /// Hand every volume to `sink`, world first.
    pub fn emit<S: GeometrySink>(&self, sink: &mut S) -> Vec<S::Handle> {
        let mut handles = Vec::new();
        let world = sink.place(&self.world, None);
        for daughter in &self.world.children {
            emit_into(daughter, &world, sink, &mut handles);
        }
        handles.insert(0, world);
        handles
    }
}

fn emit_into<S: GeometrySink>(volume: &Volume, parent: &S::Handle, sink: &mut S, handles: &mut Vec<S::Handle>) {
    let handle = sink.place(volume, Some(parent));
    for child in &volume.children {
        emit_into(child, &handle, sink, handles);
    }
    handles.push(handle);
}

/// Per-material volume counts and surface areas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialSummary {
    pub volumes: BTreeMap<String, usize>,
    pub surface_area: BTreeMap<String, f64>,
    pub facets: usize,
}

impl GeometrySink for MaterialSummary {
    type Handle = usize;

    fn place(&mut self, volume: &Volume, _parent: Option<&usize>) -> usize {
        *self.volumes.entry(volume.material.clone()).or_default() += 1;
        *self.surface_area.entry(volume.material.clone()).or_default() += volume.shape.surface_area();
        if let Shape::Tessellated(solid) = &volume.shape {
            self.facets += solid.facets().len();
        }
        self.volumes.values().sum::<usize>() - 1
    }
}
