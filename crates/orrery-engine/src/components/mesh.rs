/// Linear RGB color for mesh materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MeshColor {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

impl Default for MeshColor {
    fn default() -> Self {
        Self { r: 0.6, g: 0.6, b: 0.8 }
    }
}

/// Geometry primitive. Sizes are in local (unscaled) world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Sphere { radius: f32 },
    /// Flat annulus in the local XZ plane.
    Ring { inner: f32, outer: f32 },
    /// Circular line loop in the local XZ plane (orbit guides).
    Circle { radius: f32 },
}

impl MeshShape {
    /// Radius used by ray picking. Only spheres are solid.
    pub fn pick_radius(&self) -> Option<f32> {
        match self {
            MeshShape::Sphere { radius } => Some(*radius),
            _ => None,
        }
    }
}

/// Renderable mesh + material attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: MeshShape,
    pub color: MeshColor,
    /// Emissive tint added on top of lighting.
    pub emissive: MeshColor,
    /// Multiplier for `emissive` (values > 1 push into HDR range).
    pub emissive_intensity: f32,
    /// 1.0 = opaque.
    pub opacity: f32,
    /// Unlit meshes ignore scene lights (stars, halos, guides).
    pub unlit: bool,
    /// Render inside faces only (halo shells seen from outside).
    pub back_side: bool,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: MeshShape::Sphere { radius: 1.0 },
            color: MeshColor::default(),
            emissive: MeshColor::BLACK,
            emissive_intensity: 1.0,
            opacity: 1.0,
            unlit: false,
            back_side: false,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: MeshShape, color: MeshColor) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    pub fn sphere(radius: f32, color: MeshColor) -> Self {
        Self::new(MeshShape::Sphere { radius }, color)
    }

    pub fn with_emissive(mut self, emissive: MeshColor, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    pub fn back_side(mut self) -> Self {
        self.back_side = true;
        self
    }

    /// Numeric shape tag written into the render buffer.
    pub fn shape_tag(&self) -> f32 {
        match self.shape {
            MeshShape::Sphere { .. } => 0.0,
            MeshShape::Ring { .. } => 1.0,
            MeshShape::Circle { .. } => 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_unpacks_channels() {
        let c = MeshColor::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn only_spheres_are_pickable() {
        assert_eq!(MeshShape::Sphere { radius: 2.0 }.pick_radius(), Some(2.0));
        assert_eq!(MeshShape::Circle { radius: 50.0 }.pick_radius(), None);
        assert_eq!(MeshShape::Ring { inner: 1.0, outer: 2.0 }.pick_radius(), None);
    }
}
