//! Orbital simulator: advances spin and orbital phase once per tick.

use std::f32::consts::TAU;

use crate::registry::{orbit_position, BodyId, Registry};

/// Global speed multipliers, clamped to a configured range at the setter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedMultipliers {
    rotation: f32,
    revolution: f32,
    min: f32,
    max: f32,
}

impl SpeedMultipliers {
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            rotation: 1.0f32.clamp(min, max),
            revolution: 1.0f32.clamp(min, max),
            min,
            max,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn revolution(&self) -> f32 {
        self.revolution
    }

    /// Non-finite values are ignored.
    pub fn set_rotation(&mut self, value: f32) {
        if value.is_finite() {
            self.rotation = value.clamp(self.min, self.max);
        }
    }

    pub fn set_revolution(&mut self, value: f32) {
        if value.is_finite() {
            self.revolution = value.clamp(self.min, self.max);
        }
    }
}

impl Default for SpeedMultipliers {
    fn default() -> Self {
        Self::new(0.0, 5.0)
    }
}

/// Advance every body by one tick.
///
/// The suppressed body keeps its angles and position. The star spins but
/// never moves. Satellites move in their parent's frame and are not affected
/// by their parent being suppressed.
pub fn advance(registry: &mut Registry, speeds: &SpeedMultipliers, suppressed: Option<BodyId>) {
    let star = registry.star();
    for (id, body) in registry.iter_mut() {
        if Some(id) == suppressed {
            continue;
        }

        body.rotation_angle += body.data.rotation_speed * speeds.rotation();

        if id == star {
            continue;
        }

        body.orbit_angle = (body.orbit_angle + body.data.orbital_speed * speeds.revolution()).rem_euclid(TAU);
        let y = body.position.y;
        body.position = orbit_position(body.data.distance, body.orbit_angle);
        body.position.y = y;
    }
}
