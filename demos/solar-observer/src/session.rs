//! One explicit session context: everything a tick or a UI command touches.

use orrery_engine::Camera3D;

use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::overview::Overview;
use crate::registry::{BodyId, Registry};
use crate::simulator::{self, SpeedMultipliers};
use crate::view::{self, ViewController, ViewMode};

pub struct Session {
    config: SessionConfig,
    registry: Registry,
    speeds: SpeedMultipliers,
    view: ViewController,
    camera: Camera3D,
    overview: Overview,
    selected: Option<BodyId>,
}

impl Session {
    pub fn new(catalog: &Catalog, config: SessionConfig) -> Self {
        let mut camera = Camera3D::default();
        view::reset_camera_free(&mut camera, &config);
        Self {
            registry: Registry::from_catalog(catalog, config.seed),
            speeds: SpeedMultipliers::new(config.speed_min, config.speed_max),
            view: ViewController::new(&config),
            overview: Overview::new(),
            selected: None,
            camera,
            config,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn speeds(&self) -> &SpeedMultipliers {
        &self.speeds
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// Simulation step, then ground-mode camera work, then the overview.
    pub fn tick(&mut self) {
        simulator::advance(&mut self.registry, &self.speeds, self.view.suppressed());
        self.view.tick(&mut self.registry, &mut self.camera, &self.config);
        self.overview.update(&self.registry, self.camera.position, &self.config);
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle_ground(&mut self) {
        let entered = self.view.toggle_ground(&mut self.registry, &mut self.camera, &self.config);
        if entered.is_some() {
            self.selected = entered;
        }
    }

    pub fn reset_view(&mut self) {
        let entered = self.view.reset_view(&mut self.registry, &mut self.camera, &self.config);
        if entered.is_some() {
            self.selected = entered;
        }
    }

    pub fn toggle_overview(&mut self) {
        self.overview.toggle();
    }

    pub fn set_constrained_display(&mut self, constrained: bool) {
        self.overview.set_constrained(constrained);
    }

    pub fn toggle_guides(&mut self) {
        self.view.toggle_guides();
    }

    pub fn set_rotation_speed(&mut self, value: f32) {
        self.speeds.set_rotation(value);
    }

    pub fn set_revolution_speed(&mut self, value: f32) {
        self.speeds.set_revolution(value);
    }

    pub fn set_latitude(&mut self, degrees: f32) {
        self.view.set_latitude(degrees, &mut self.registry, &mut self.camera, &self.config);
    }

    pub fn set_longitude(&mut self, degrees: f32) {
        self.view.set_longitude(degrees, &mut self.registry, &mut self.camera, &self.config);
    }

    pub fn set_time_of_day(&mut self, hours: f32) {
        self.view.set_time_of_day(hours, &mut self.registry, &mut self.camera, &self.config);
    }

    pub fn set_cycle_enabled(&mut self, enabled: bool) {
        self.view.set_cycle_enabled(enabled);
    }

    pub fn set_cycle_speed(&mut self, speed: f32) {
        self.view.set_cycle_speed(speed, &self.config);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
    }

    // ── Gestures ─────────────────────────────────────────────────────

    pub fn gesture_start(&mut self) {
        self.view.gesture_start();
    }

    pub fn gesture_end(&mut self) {
        self.view.gesture_end();
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.view.drag(&mut self.camera, dx, dy);
    }

    pub fn pinch(&mut self, scale: f32) {
        self.view.pinch(&mut self.camera, scale);
    }

    /// Apply a pick result. A miss leaves the current selection alone.
    pub fn select(&mut self, picked: Option<BodyId>) {
        if let Some(id) = picked {
            log::debug!(
                "selected '{}'",
                self.registry.get(id).map(|b| b.data.key.as_str()).unwrap_or("?")
            );
            self.selected = Some(id);
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.view.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn star_position(s: &Session) -> Vec3 {
        s.registry().world_position(s.registry().star())
    }

    fn session() -> Session {
        Session::new(&Catalog::load().unwrap(), SessionConfig::default())
    }

    #[test]
    fn starts_in_free_orbit_with_default_camera() {
        let s = session();
        assert_eq!(s.mode(), ViewMode::FreeOrbit);
        assert_eq!(s.camera().position, Vec3::new(0.0, 70.0, 150.0));
        assert_eq!(s.camera().distance_range(), (30.0, 300.0));
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn tick_moves_planets_but_not_observed_body() {
        let mut s = session();
        let earth = s.registry().by_key("earth").unwrap();
        let mars = s.registry().by_key("mars").unwrap();
        s.toggle_ground();
        assert_eq!(s.selected(), Some(earth));

        let earth_before = s.registry().get(earth).unwrap().orbit_angle;
        let mars_before = s.registry().get(mars).unwrap().orbit_angle;
        for _ in 0..10 {
            s.tick();
        }
        assert_eq!(s.registry().get(earth).unwrap().orbit_angle, earth_before);
        assert_ne!(s.registry().get(mars).unwrap().orbit_angle, mars_before);
    }

    #[test]
    fn star_returns_to_origin_after_round_trip() {
        let mut s = session();
        s.toggle_ground();
        for _ in 0..5 {
            s.tick();
        }
        assert_ne!(star_position(&s), Vec3::ZERO);
        s.toggle_ground();
        assert_eq!(star_position(&s), Vec3::ZERO);
        s.tick();
        assert_eq!(star_position(&s), Vec3::ZERO);
    }

    #[test]
    fn overview_tracks_camera_each_tick() {
        let mut s = session();
        s.tick();
        assert_eq!(s.overview().markers().len(), 8);
        let before = s.overview().indicator();
        s.drag(200.0, 0.0);
        s.tick();
        assert_ne!(s.overview().indicator(), before);
    }

    #[test]
    fn drag_sets_sticky_flag() {
        let mut s = session();
        s.gesture_start();
        s.drag(5.0, 5.0);
        s.gesture_end();
        assert!(s.view().interaction().has_interacted);
        s.reset_view();
        assert!(!s.view().interaction().has_interacted);
    }

    #[test]
    fn speed_setters_clamp() {
        let mut s = session();
        s.set_rotation_speed(100.0);
        s.set_revolution_speed(-3.0);
        assert_eq!(s.speeds().rotation(), 5.0);
        assert_eq!(s.speeds().revolution(), 0.0);
    }

    #[test]
    fn miss_keeps_selection() {
        let mut s = session();
        let venus = s.registry().by_key("venus").unwrap();
        s.select(Some(venus));
        s.select(None);
        assert_eq!(s.selected(), Some(venus));
    }
}
