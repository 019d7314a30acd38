//! SharedArrayBuffer layout.
//! Must stay in sync with TypeScript `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Camera: 20 floats]
//! [Instances: max_instances × 20 floats]
//! [Lights: max_lights × 8 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written once into the header at init.
//! TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::MeshInstance;
use crate::systems::lighting::PointLight;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_INSTANCES: usize = 3;
pub const HEADER_INSTANCE_COUNT: usize = 4;
pub const HEADER_TRANSLUCENT_SPLIT: usize = 5;
pub const HEADER_MAX_LIGHTS: usize = 6;
pub const HEADER_LIGHT_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_AMBIENT_R: usize = 10;
pub const HEADER_AMBIENT_G: usize = 11;
pub const HEADER_AMBIENT_B: usize = 12;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_lights: usize,
    pub max_events: usize,

    pub camera_offset: usize,
    pub instance_data_offset: usize,
    pub light_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_lights: usize, max_events: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CameraUniform::FLOATS;
        let light_data_offset = instance_data_offset + max_instances * MeshInstance::FLOATS;
        let event_data_offset = light_data_offset + max_lights * PointLight::FLOATS;
        let buffer_total_floats = event_data_offset + max_events * GameEvent::FLOATS;

        Self {
            max_instances,
            max_lights,
            max_events,
            camera_offset,
            instance_data_offset,
            light_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_lights, config.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 4, 20);
        assert_eq!(layout.camera_offset, HEADER_FLOATS);
        assert_eq!(layout.instance_data_offset, HEADER_FLOATS + 20);
        assert_eq!(layout.light_data_offset, layout.instance_data_offset + 100 * 20);
        assert_eq!(layout.event_data_offset, layout.light_data_offset + 4 * 8);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + 20 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn from_default_config() {
        let config = GameConfig::default();
        let layout = ProtocolLayout::from_config(&config);
        assert_eq!(layout.max_instances, config.max_instances);
        assert_eq!(layout.max_lights, config.max_lights);
        assert_eq!(layout.max_events, config.max_events);
    }
}
