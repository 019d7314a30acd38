use bytemuck::{Pod, Zeroable};

/// Per-instance mesh data written to SharedArrayBuffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 20 floats = 80 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    /// World-space position.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Per-axis scale.
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    /// Spin about local Y, radians.
    pub spin: f32,
    /// Tilt about local Z, radians.
    pub tilt: f32,
    /// Base color.
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    /// Emissive color, scaled by `emissive_intensity`.
    pub er: f32,
    pub eg: f32,
    pub eb: f32,
    pub emissive_intensity: f32,
    /// 0 = sphere, 1 = ring, 2 = circle line.
    pub shape: f32,
    /// Sphere/circle radius, or ring inner radius.
    pub size_a: f32,
    /// Ring outer radius (0 otherwise).
    pub size_b: f32,
    /// Bit 0 = unlit, bit 1 = back-side only.
    pub flags: f32,
}

impl MeshInstance {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const FLAG_UNLIT: u32 = 1;
    pub const FLAG_BACK_SIDE: u32 = 2;
}

/// Render buffer containing all mesh instances.
pub struct RenderBuffer {
    /// Opaque instances first, then translucent ones after `translucent_split`.
    pub instances: Vec<MeshInstance>,
    /// Index of the first translucent instance.
    pub translucent_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            translucent_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.translucent_split = 0;
    }

    pub fn push(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    pub fn set_translucent_split(&mut self, split: u32) {
        self.translucent_split = split;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
