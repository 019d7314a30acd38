//! Top-down overview: body markers plus an indicator for the main camera.
//!
//! Markers are world X/Z; the host draws them with an orthographic view of
//! half-extent `overview_extent`. The indicator is already in panel pixels.

use glam::Vec3;

use crate::config::SessionConfig;
use crate::registry::{BodyId, Registry};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverviewMarker {
    pub body: BodyId,
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Indicator {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct Overview {
    enabled: bool,
    constrained: bool,
    markers: Vec<OverviewMarker>,
    indicator: Indicator,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            enabled: true,
            constrained: false,
            markers: Vec::new(),
            indicator: Indicator::default(),
        }
    }
}

impl Overview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// A constrained display hides the overview regardless of the toggle.
    pub fn set_constrained(&mut self, constrained: bool) {
        self.constrained = constrained;
    }

    pub fn is_visible(&self) -> bool {
        self.enabled && !self.constrained
    }

    pub fn markers(&self) -> &[OverviewMarker] {
        &self.markers
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Recompute markers and the indicator. Skipped while hidden.
    pub fn update(&mut self, registry: &Registry, camera_position: Vec3, config: &SessionConfig) {
        if !self.is_visible() {
            return;
        }

        let star = registry.star();
        self.markers.clear();
        self.markers.extend(
            registry
                .iter()
                .filter(|(id, body)| *id != star && !body.data.is_satellite())
                .map(|(id, _)| {
                    let world = registry.world_position(id);
                    OverviewMarker { body: id, x: world.x, z: world.z }
                }),
        );

        let half = config.overview_size / 2.0;
        let max_distance = registry.max_distance() + config.overview_margin;
        if max_distance > 0.0 {
            self.indicator = Indicator {
                x: camera_position.x / max_distance * half + half,
                y: camera_position.z / max_distance * half + half,
            };
        }
    }
}
