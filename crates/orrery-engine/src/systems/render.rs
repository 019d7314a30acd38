use crate::components::entity::Entity;
use crate::components::mesh::{MeshComponent, MeshShape};
use crate::core::scene::Scene;
use crate::renderer::instance::{MeshInstance, RenderBuffer};

/// Build the render buffer from the scene.
/// Hidden entities and entities without meshes are skipped. Opaque meshes
/// come first, then translucent ones; `translucent_split` marks the boundary.
/// At most `max_instances` records are written.
pub fn build_render_buffer(scene: &Scene, buffer: &mut RenderBuffer, max_instances: usize) {
    buffer.clear();

    let mut opaque: Vec<MeshInstance> = Vec::new();
    let mut translucent: Vec<MeshInstance> = Vec::new();

    for entity in scene.iter() {
        if !entity.visible {
            continue;
        }
        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };
        let world = match scene.world_position(entity.id) {
            Some(p) => p,
            None => continue,
        };

        let instance = to_instance(entity, mesh, world);
        if mesh.opacity < 1.0 {
            translucent.push(instance);
        } else {
            opaque.push(instance);
        }
    }

    let total = opaque.len() + translucent.len();
    if total > max_instances {
        log::warn!("render buffer full: {} meshes, {} written", total, max_instances);
    }

    let split = opaque.len().min(max_instances);
    for inst in opaque.into_iter().chain(translucent).take(max_instances) {
        buffer.push(inst);
    }
    buffer.set_translucent_split(split as u32);
}

fn to_instance(entity: &Entity, mesh: &MeshComponent, world: glam::Vec3) -> MeshInstance {
    let (size_a, size_b) = match mesh.shape {
        MeshShape::Sphere { radius } => (radius, 0.0),
        MeshShape::Ring { inner, outer } => (inner, outer),
        MeshShape::Circle { radius } => (radius, 0.0),
    };
    let mut flags = 0;
    if mesh.unlit {
        flags |= MeshInstance::FLAG_UNLIT;
    }
    if mesh.back_side {
        flags |= MeshInstance::FLAG_BACK_SIDE;
    }

    MeshInstance {
        x: world.x,
        y: world.y,
        z: world.z,
        sx: entity.scale.x,
        sy: entity.scale.y,
        sz: entity.scale.z,
        spin: entity.rotation.y,
        tilt: entity.rotation.z,
        r: mesh.color.r,
        g: mesh.color.g,
        b: mesh.color.b,
        opacity: mesh.opacity,
        er: mesh.emissive.r,
        eg: mesh.emissive.g,
        eb: mesh.emissive.b,
        emissive_intensity: mesh.emissive_intensity,
        shape: mesh.shape_tag(),
        size_a,
        size_b,
        flags: flags as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::mesh::MeshColor;
    use glam::Vec3;

    fn scene_with_three() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(
            Entity::new(EntityId(1))
                .with_pos(Vec3::new(10.0, 0.0, 0.0))
                .with_mesh(MeshComponent::sphere(2.0, MeshColor::WHITE).with_opacity(0.4)),
        );
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(5.0, 0.0, 0.0))
                .with_parent(EntityId(1))
                .with_mesh(MeshComponent::sphere(1.0, MeshColor::WHITE)),
        );
        scene.spawn(
            Entity::new(EntityId(3))
                .with_mesh(MeshComponent::sphere(1.0, MeshColor::WHITE).unlit().back_side()),
        );
        scene
    }

    #[test]
    fn opaque_before_translucent() {
        let scene = scene_with_three();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&scene, &mut buffer, 64);
        assert_eq!(buffer.instance_count(), 3);
        assert_eq!(buffer.translucent_split, 2);
        assert_eq!(buffer.instances[2].opacity, 0.4);
    }

    #[test]
    fn children_use_world_position() {
        let scene = scene_with_three();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&scene, &mut buffer, 64);
        assert!(buffer.instances.iter().any(|i| i.x == 15.0));
    }

    #[test]
    fn flags_are_packed() {
        let scene = scene_with_three();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&scene, &mut buffer, 64);
        assert!(buffer.instances.iter().any(|i| i.flags == 3.0));
    }

    #[test]
    fn hidden_entities_are_skipped() {
        let mut scene = scene_with_three();
        scene.get_mut(EntityId(3)).unwrap().visible = false;
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&scene, &mut buffer, 64);
        assert_eq!(buffer.instance_count(), 2);
    }

    #[test]
    fn capacity_is_respected() {
        let scene = scene_with_three();
        let mut buffer = RenderBuffer::new();
        build_render_buffer(&scene, &mut buffer, 1);
        assert_eq!(buffer.instance_count(), 1);
        assert_eq!(buffer.translucent_split, 1);
    }
}
