//! Runtime body state, built once from the catalog.

use std::collections::HashMap;
use std::f32::consts::TAU;
use glam::Vec3;
use orrery_engine::EntityId;

use crate::catalog::{BodyData, Catalog};

/// Index of a body in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Glow shell around the star, created the first time ground mode needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub radius: f32,
    pub opacity: f32,
    pub visible: bool,
}

/// Point light attached to the star, created the first time ground mode needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarLight {
    pub intensity: f32,
    pub range: f32,
    pub visible: bool,
}

/// One simulated body.
#[derive(Debug, Clone)]
pub struct Body {
    pub data: BodyData,
    /// Body this one orbits; None for the star and planets.
    pub parent: Option<BodyId>,
    /// Orbital phase in radians, kept in [0, 2π).
    pub orbit_angle: f32,
    /// Accumulated self-rotation in radians.
    pub rotation_angle: f32,
    /// Position relative to the parent (world position for root bodies).
    pub position: Vec3,
    /// Uniform visual scale.
    pub scale: f32,
    pub visible: bool,
    pub emissive_color: u32,
    pub emissive_intensity: f32,
    pub glow: Option<Glow>,
    pub light: Option<StarLight>,
    /// Scene entity carrying this body's mesh, once spawned.
    pub entity: Option<EntityId>,
}

impl Body {
    fn new(data: BodyData, parent: Option<BodyId>, orbit_angle: f32) -> Self {
        let position = orbit_position(data.distance, orbit_angle);
        Self {
            data,
            parent,
            orbit_angle,
            rotation_angle: 0.0,
            position,
            scale: 1.0,
            visible: true,
            emissive_color: 0x000000,
            emissive_intensity: 1.0,
            glow: None,
            light: None,
            entity: None,
        }
    }
}

/// Planar circular orbit position: (d·cos θ, 0, d·sin θ).
pub fn orbit_position(distance: f32, angle: f32) -> Vec3 {
    Vec3::new(distance * angle.cos(), 0.0, distance * angle.sin())
}

/// Deterministic integer hash (no external rand crate).
pub fn phase_hash(seed: u32) -> u32 {
    let mut n = seed;
    n = n.wrapping_mul(2654435761);
    n ^= n >> 16;
    n = n.wrapping_mul(2246822519);
    n ^= n >> 13;
    n
}

/// Initial orbital phase in [0, 2π) for body `index` under `seed`.
pub fn initial_phase(seed: u32, index: usize) -> f32 {
    let h = phase_hash(seed.wrapping_add((index as u32).wrapping_mul(7919)));
    let frac = (h as f64 / (u32::MAX as f64 + 1.0)) as f32;
    (frac * TAU).rem_euclid(TAU)
}

/// All bodies plus key/entity lookup.
pub struct Registry {
    bodies: Vec<Body>,
    by_key: HashMap<String, BodyId>,
    star: BodyId,
}

impl Registry {
    pub fn from_catalog(catalog: &Catalog, seed: u32) -> Self {
        let star = BodyId(catalog.star_index());
        let mut by_key = HashMap::with_capacity(catalog.len());
        for (i, data) in catalog.bodies().iter().enumerate() {
            by_key.insert(data.key.clone(), BodyId(i));
        }

        let bodies = catalog
            .bodies()
            .iter()
            .enumerate()
            .map(|(i, data)| {
                let parent = data.orbits.as_deref().and_then(|k| catalog.index_of(k)).map(BodyId);
                let phase = if BodyId(i) == star { 0.0 } else { initial_phase(seed, i) };
                Body::new(data.clone(), parent, phase)
            })
            .collect();

        Self { bodies, by_key, star }
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    pub fn by_key(&self, key: &str) -> Option<BodyId> {
        self.by_key.get(key).copied()
    }

    /// Body owning the given scene entity. Non-body entities give None.
    pub fn by_entity(&self, entity: EntityId) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.entity == Some(entity))
            .map(BodyId)
    }

    pub fn star(&self) -> BodyId {
        self.star
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> {
        self.bodies.iter_mut().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// World position: own position plus the parent's (one level deep).
    /// Unknown ids resolve to the origin.
    pub fn world_position(&self, id: BodyId) -> Vec3 {
        let Some(body) = self.get(id) else {
            return Vec3::ZERO;
        };
        let parent = body
            .parent
            .and_then(|p| self.get(p))
            .map(|p| p.position)
            .unwrap_or(Vec3::ZERO);
        parent + body.position
    }

    /// Largest orbit distance among bodies orbiting the star.
    pub fn max_distance(&self) -> f32 {
        self.bodies
            .iter()
            .filter(|b| b.parent.is_none())
            .map(|b| b.data.distance)
            .fold(0.0, f32::max)
    }
}
