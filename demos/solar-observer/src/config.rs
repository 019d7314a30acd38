//! Session configuration, loaded from JSON at runtime.
//! Every field has a default, so a partial (or empty) document is valid.

use serde::Deserialize;

/// Tunables for the simulation, camera and presentation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for initial orbital phases.
    pub seed: u32,
    /// Allowed range for both speed multipliers.
    pub speed_min: f32,
    pub speed_max: f32,
    /// Seconds of simulated clock per tick, used by the day-night cycle.
    pub frame_delta: f32,

    // ── Free-orbit camera ────────────────────────────────────────────
    pub default_camera: [f32; 3],
    pub min_zoom: f32,
    pub max_zoom: f32,

    // ── Ground observer ──────────────────────────────────────────────
    /// Catalog key of the body the observer stands on.
    pub observed_body: String,
    /// Ground zoom range as multiples of the observed body's radius.
    pub ground_min_zoom_factor: f32,
    pub ground_max_zoom_factor: f32,
    /// Offset above the surface per axis.
    pub surface_offset: [f32; 3],
    pub star_distance: f32,
    pub latitude: f32,
    pub longitude: f32,
    pub time_of_day: f32,
    pub cycle_enabled: bool,
    pub cycle_speed: f32,
    pub cycle_speed_max: f32,

    // ── Star presentation in ground mode ─────────────────────────────
    /// Multiplied by the star's `earth_view_scale`.
    pub star_scale_factor: f32,
    pub star_emissive_intensity: f32,
    /// Glow radius as a multiple of the star's radius.
    pub glow_radius_factor: f32,
    pub glow_opacity: f32,
    pub star_light_intensity: f32,
    pub star_light_range: f32,

    // ── Overview ─────────────────────────────────────────────────────
    /// Overview panel size in pixels (square).
    pub overview_size: f32,
    /// Half-extent of the overview's orthographic view, in world units.
    pub overview_extent: f32,
    /// Added to the largest orbit distance when scaling the camera indicator.
    pub overview_margin: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            speed_min: 0.0,
            speed_max: 5.0,
            frame_delta: 0.016,

            default_camera: [0.0, 70.0, 150.0],
            min_zoom: 30.0,
            max_zoom: 300.0,

            observed_body: "earth".to_string(),
            ground_min_zoom_factor: 1.2,
            ground_max_zoom_factor: 10.0,
            surface_offset: [0.2, 0.1, 0.2],
            star_distance: 300.0,
            latitude: 45.0,
            longitude: 0.0,
            time_of_day: 0.0,
            cycle_enabled: true,
            cycle_speed: 0.1,
            cycle_speed_max: 2.0,

            star_scale_factor: 15.0,
            star_emissive_intensity: 3.0,
            glow_radius_factor: 6.0,
            glow_opacity: 0.4,
            star_light_intensity: 2.0,
            star_light_range: 1000.0,

            overview_size: 200.0,
            overview_extent: 100.0,
            overview_margin: 10.0,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Repair inverted ranges so later clamps never panic.
    fn sanitized(mut self) -> Self {
        if self.speed_min > self.speed_max {
            std::mem::swap(&mut self.speed_min, &mut self.speed_max);
        }
        if self.min_zoom > self.max_zoom {
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        if self.ground_min_zoom_factor > self.ground_max_zoom_factor {
            std::mem::swap(&mut self.ground_min_zoom_factor, &mut self.ground_max_zoom_factor);
        }
        self.cycle_speed_max = self.cycle_speed_max.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = SessionConfig::from_json(r#"{"latitude": -30.0, "seed": 99, "unknown": 1}"#).unwrap();
        assert_eq!(config.latitude, -30.0);
        assert_eq!(config.seed, 99);
        assert_eq!(config.longitude, 0.0);
        assert_eq!(config.min_zoom, 30.0);
    }

    #[test]
    fn inverted_ranges_are_repaired() {
        let config = SessionConfig::from_json(r#"{"min_zoom": 500.0, "max_zoom": 20.0, "speed_min": 3.0, "speed_max": 1.0}"#).unwrap();
        assert_eq!((config.min_zoom, config.max_zoom), (20.0, 500.0));
        assert_eq!((config.speed_min, config.speed_max), (1.0, 3.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SessionConfig::from_json("{").is_err());
        assert!(SessionConfig::from_json(r#"{"latitude": "north"}"#).is_err());
    }
}
