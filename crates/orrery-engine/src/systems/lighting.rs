//! Point lights for the 3D scene.
//!
//! Lights are persistent and addressed by `LightId`. A light may follow an
//! entity, in which case `sync` copies the entity's world position into it.
//! Disabled lights stay registered but are left out of the packed buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::api::types::{EntityId, LightId};
use crate::core::scene::Scene;

/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, r, g, b, intensity, range]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    /// Falloff distance in world units (0 = infinite).
    pub range: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(pos: Vec3, color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color[0],
            g: color[1],
            b: color[2],
            intensity,
            range,
        }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.x = pos.x;
        self.y = pos.y;
        self.z = pos.z;
    }
}

#[derive(Debug, Clone)]
struct LightSlot {
    id: LightId,
    light: PointLight,
    enabled: bool,
    follow: Option<EntityId>,
}

/// Manages point lights and ambient color for the scene.
pub struct LightState {
    slots: Vec<LightSlot>,
    packed: Vec<PointLight>,
    ambient: [f32; 3],
    next_id: u32,
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_lights),
            packed: Vec::with_capacity(max_lights),
            ambient: [0.2, 0.2, 0.2],
            next_id: 1,
        }
    }

    /// Register a light (enabled). Returns its handle.
    pub fn add(&mut self, light: PointLight) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;
        self.slots.push(LightSlot {
            id,
            light,
            enabled: true,
            follow: None,
        });
        id
    }

    pub fn remove(&mut self, id: LightId) -> Option<PointLight> {
        let idx = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(idx).light)
    }

    pub fn get(&self, id: LightId) -> Option<&PointLight> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.light)
    }

    pub fn get_mut(&mut self, id: LightId) -> Option<&mut PointLight> {
        self.slots.iter_mut().find(|s| s.id == id).map(|s| &mut s.light)
    }

    pub fn is_enabled(&self, id: LightId) -> bool {
        self.slots.iter().any(|s| s.id == id && s.enabled)
    }

    pub fn set_enabled(&mut self, id: LightId, enabled: bool) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.enabled = enabled;
        }
    }

    /// Attach the light to an entity's world position (or detach with None).
    pub fn set_follow(&mut self, id: LightId, entity: Option<EntityId>) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.follow = entity;
        }
    }

    /// Copy followed entity positions into lights and repack enabled lights.
    pub fn sync(&mut self, scene: &Scene) {
        self.packed.clear();
        for slot in &mut self.slots {
            if let Some(pos) = slot.follow.and_then(|e| scene.world_position(e)) {
                slot.light.set_pos(pos);
            }
            if slot.enabled {
                self.packed.push(slot.light);
            }
        }
    }

    /// Total registered lights, enabled or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of lights in the packed buffer after the last `sync`.
    pub fn count(&self) -> usize {
        self.packed.len()
    }

    pub fn set_ambient(&mut self, r: f32, g: f32, b: f32) {
        self.ambient = [r, g, b];
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    /// Pointer to the packed lights for SharedArrayBuffer reads.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.packed.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    #[test]
    fn point_light_is_8_floats() {
        assert_eq!(std::mem::size_of::<PointLight>(), PointLight::FLOATS * 4);
    }

    #[test]
    fn disabled_lights_are_not_packed() {
        let mut state = LightState::new();
        let a = state.add(PointLight::new(Vec3::ZERO, [1.0; 3], 1.0, 0.0));
        let _b = state.add(PointLight::new(Vec3::X, [1.0; 3], 2.0, 100.0));
        state.set_enabled(a, false);
        state.sync(&Scene::new());
        assert_eq!(state.len(), 2);
        assert_eq!(state.count(), 1);
        assert!(!state.is_enabled(a));
    }

    #[test]
    fn follow_copies_entity_world_position() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec3::new(10.0, 0.0, 0.0)));
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(0.0, 5.0, 0.0))
                .with_parent(EntityId(1)),
        );
        let mut state = LightState::new();
        let id = state.add(PointLight::new(Vec3::ZERO, [1.0; 3], 1.0, 0.0));
        state.set_follow(id, Some(EntityId(2)));
        state.sync(&scene);
        assert_eq!(state.get(id).unwrap().pos(), Vec3::new(10.0, 5.0, 0.0));
    }

    #[test]
    fn remove_drops_slot() {
        let mut state = LightState::new();
        let id = state.add(PointLight::new(Vec3::ZERO, [1.0; 3], 1.0, 0.0));
        assert!(state.remove(id).is_some());
        assert!(state.is_empty());
        assert!(state.remove(id).is_none());
    }

    #[test]
    fn set_ambient() {
        let mut state = LightState::new();
        state.set_ambient(0.05, 0.05, 0.1);
        assert_eq!(state.ambient(), [0.05, 0.05, 0.1]);
    }
}
