use glam::Vec2;
use orrery_engine::{Camera3D, Scene};

use crate::registry::{BodyId, Registry};

/// Body under a tap at normalized device coordinates.
///
/// Hits on non-body meshes (glow, rings, guides) are passed over, so a tap
/// through the star's glow still reaches a body behind it. Hidden entities
/// are never hit.
pub fn pick(scene: &Scene, camera: &Camera3D, registry: &Registry, ndc: Vec2) -> Option<BodyId> {
    if !ndc.is_finite() {
        return None;
    }
    let ray = camera.ray_from_ndc(ndc);
    scene
        .raycast(&ray)
        .iter()
        .find_map(|hit| registry.by_entity(hit.id))
}
