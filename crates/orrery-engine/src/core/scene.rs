use glam::Vec3;
use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Parent chains deeper than this are treated as cycles and cut.
const MAX_PARENT_DEPTH: usize = 16;

/// A ray in world space. `dir` is expected to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir: dir.normalize_or_zero() }
    }

    /// Distance along the ray to the nearest intersection with a sphere,
    /// or None if the sphere is missed or entirely behind the origin.
    pub fn hit_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere
        let far = -b + sqrt_disc;
        (far >= 0.0).then_some(far)
    }
}

/// One entry of a raycast result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: EntityId,
    pub distance: f32,
}

/// Simple entity storage using a flat Vec.
/// Designed for small entity counts (dozens to hundreds).
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    /// Children keep their (now dangling) parent link and resolve as roots.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Set visibility on every entity carrying `tag`. Returns how many changed.
    pub fn set_visible_by_tag(&mut self, tag: &str, visible: bool) -> usize {
        let mut changed = 0;
        for entity in self.entities.iter_mut().filter(|e| e.tag == tag) {
            if entity.visible != visible {
                entity.visible = visible;
                changed += 1;
            }
        }
        changed
    }

    /// World-space position: local position plus every ancestor's position.
    /// Only translation propagates; parent rotation and scale do not.
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        let mut entity = self.get(id)?;
        let mut pos = entity.pos;
        for _ in 0..MAX_PARENT_DEPTH {
            match entity.parent.and_then(|p| self.get(p)) {
                Some(parent) => {
                    pos += parent.pos;
                    entity = parent;
                }
                None => break,
            }
        }
        Some(pos)
    }

    /// Intersect a ray with every visible sphere mesh.
    /// Hits are ordered nearest first.
    pub fn raycast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .entities
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| {
                let radius = e.mesh.as_ref()?.shape.pick_radius()? * e.scale.max_element();
                let center = self.world_position(e.id)?;
                let distance = ray.hit_sphere(center, radius)?;
                Some(RayHit { id: e.id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clear all entities.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::{MeshColor, MeshComponent};

    fn ball(id: u32, pos: Vec3, radius: f32) -> Entity {
        Entity::new(EntityId(id))
            .with_pos(pos)
            .with_mesh(MeshComponent::sphere(radius, MeshColor::WHITE))
    }

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec3::new(10.0, 20.0, 30.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.pos, Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn despawn_removes_entity() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id));
        assert_eq!(scene.len(), 1);
        scene.despawn(id);
        assert!(scene.is_empty());
    }

    #[test]
    fn world_position_follows_parent_chain() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec3::new(50.0, 0.0, 0.0)));
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(4.0, 0.0, 0.0))
                .with_parent(EntityId(1)),
        );
        assert_eq!(scene.world_position(EntityId(2)), Some(Vec3::new(54.0, 0.0, 0.0)));
        assert_eq!(scene.world_position(EntityId(9)), None);
    }

    #[test]
    fn world_position_survives_parent_cycle() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_parent(EntityId(2)));
        scene.spawn(Entity::new(EntityId(2)).with_parent(EntityId(1)));
        assert!(scene.world_position(EntityId(1)).is_some());
    }

    #[test]
    fn raycast_orders_hits_by_distance() {
        let mut scene = Scene::new();
        scene.spawn(ball(1, Vec3::new(0.0, 0.0, -50.0), 2.0));
        scene.spawn(ball(2, Vec3::new(0.0, 0.0, -10.0), 2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hits = scene.raycast(&ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, EntityId(2));
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
        assert_eq!(hits[1].id, EntityId(1));
    }

    #[test]
    fn raycast_skips_hidden_entities() {
        let mut scene = Scene::new();
        scene.spawn(ball(1, Vec3::new(0.0, 0.0, -10.0), 2.0).with_visible(false));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(scene.raycast(&ray).is_empty());
    }

    #[test]
    fn raycast_respects_scale() {
        let mut scene = Scene::new();
        scene.spawn(ball(1, Vec3::new(5.0, 0.0, -10.0), 1.0).with_scale(Vec3::splat(6.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(scene.raycast(&ray).len(), 1);
    }

    #[test]
    fn set_visible_by_tag_counts_changes() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("guide"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("guide").with_visible(false));
        scene.spawn(Entity::new(EntityId(3)).with_tag("body"));
        assert_eq!(scene.set_visible_by_tag("guide", false), 1);
        assert!(scene.iter().filter(|e| e.tag == "guide").all(|e| !e.visible));
        assert!(scene.get(EntityId(3)).unwrap().visible);
    }
}
