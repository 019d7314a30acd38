//! View controller: free orbit vs. ground observer.
//!
//! The mode and both interaction flags live in one `ViewState` value and are
//! only changed through the methods on `ViewController`. Each method takes the
//! registry and camera it acts on, so a controller can be driven headless.

use glam::Vec3;
use orrery_engine::Camera3D;

use crate::config::SessionConfig;
use crate::registry::{Body, BodyId, Glow, Registry, StarLight};
use crate::solar::{place_observer, star_position, ObserverParams};

/// The two flags set by user camera gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFlags {
    /// True between gesture start and gesture end.
    pub user_interacting: bool,
    /// Sticky: set by any gesture, cleared only by a transition or reset.
    pub has_interacted: bool,
}

impl InteractionFlags {
    pub fn gesture_start(&mut self) {
        self.user_interacting = true;
        self.has_interacted = true;
    }

    pub fn gesture_end(&mut self) {
        self.user_interacting = false;
    }

    /// Automatic camera placement is suppressed while this holds.
    pub fn locked(&self) -> bool {
        self.user_interacting || self.has_interacted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    FreeOrbit,
    GroundObserver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState {
    FreeOrbit {
        interaction: InteractionFlags,
    },
    GroundObserver {
        observed: BodyId,
        interaction: InteractionFlags,
        /// Camera position minus the observed body's world position,
        /// recorded at the last automatic placement.
        camera_offset: Vec3,
    },
}

impl ViewState {
    fn interaction_mut(&mut self) -> &mut InteractionFlags {
        match self {
            ViewState::FreeOrbit { interaction } => interaction,
            ViewState::GroundObserver { interaction, .. } => interaction,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::FreeOrbit { interaction: InteractionFlags::default() }
    }
}

pub struct ViewController {
    state: ViewState,
    observer: ObserverParams,
    guides_visible: bool,
}

impl ViewController {
    pub fn new(config: &SessionConfig) -> Self {
        let mut observer = ObserverParams {
            cycle_enabled: config.cycle_enabled,
            ..Default::default()
        };
        observer.set_latitude(config.latitude);
        observer.set_longitude(config.longitude);
        observer.set_time_of_day(config.time_of_day);
        observer.set_cycle_speed(config.cycle_speed, config.cycle_speed_max);
        Self {
            state: ViewState::default(),
            observer,
            guides_visible: true,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mode(&self) -> ViewMode {
        match self.state {
            ViewState::FreeOrbit { .. } => ViewMode::FreeOrbit,
            ViewState::GroundObserver { .. } => ViewMode::GroundObserver,
        }
    }

    pub fn interaction(&self) -> InteractionFlags {
        match self.state {
            ViewState::FreeOrbit { interaction } => interaction,
            ViewState::GroundObserver { interaction, .. } => interaction,
        }
    }

    /// Body the observer stands on, in ground mode.
    pub fn observed(&self) -> Option<BodyId> {
        match self.state {
            ViewState::GroundObserver { observed, .. } => Some(observed),
            ViewState::FreeOrbit { .. } => None,
        }
    }

    /// Body the simulator must not advance this tick.
    pub fn suppressed(&self) -> Option<BodyId> {
        self.observed()
    }

    pub fn observer(&self) -> &ObserverParams {
        &self.observer
    }

    pub fn guides_visible(&self) -> bool {
        self.guides_visible
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Flip between the two modes. Returns the body to select, if any.
    pub fn toggle_ground(
        &mut self,
        registry: &mut Registry,
        camera: &mut Camera3D,
        config: &SessionConfig,
    ) -> Option<BodyId> {
        match self.mode() {
            ViewMode::FreeOrbit => self.enter_ground(registry, camera, config),
            ViewMode::GroundObserver => {
                self.exit_ground(registry, camera, config);
                None
            }
        }
    }

    /// Stand on the configured body. Stays in free orbit if it is missing or is the star.
    pub fn enter_ground(
        &mut self,
        registry: &mut Registry,
        camera: &mut Camera3D,
        config: &SessionConfig,
    ) -> Option<BodyId> {
        let Some(observed) = registry.by_key(&config.observed_body) else {
            log::warn!("observed body '{}' not in catalog, staying in free orbit", config.observed_body);
            return None;
        };
        if observed == registry.star() {
            log::warn!("cannot observe from the star '{}', staying in free orbit", config.observed_body);
            return None;
        }
        let radius = registry.get(observed).map(|b| b.data.radius).unwrap_or(1.0);

        self.guides_visible = false;
        camera.set_distance_range(
            radius * config.ground_min_zoom_factor,
            radius * config.ground_max_zoom_factor,
        );
        camera.look_at(registry.world_position(observed));

        update_star(registry, observed, &self.observer, config);
        let camera_offset = place_camera(registry, observed, &self.observer, config, camera);
        update_star(registry, observed, &self.observer, config);

        if let Some(body) = registry.get_mut(observed) {
            body.visible = false;
        }
        self.state = ViewState::GroundObserver {
            observed,
            interaction: InteractionFlags::default(),
            camera_offset,
        };
        log::info!("ground observer on '{}'", config.observed_body);
        Some(observed)
    }

    /// Return to free orbit with the default overview camera.
    pub fn exit_ground(&mut self, registry: &mut Registry, camera: &mut Camera3D, config: &SessionConfig) {
        let observed = self.observed();
        restore_star(registry, config);
        self.guides_visible = true;
        reset_camera_free(camera, config);
        if let Some(body) = observed.and_then(|id| registry.get_mut(id)) {
            body.visible = true;
        }
        self.state = ViewState::default();
        log::info!("free orbit");
    }

    /// Return to the current mode's entry view.
    pub fn reset_view(
        &mut self,
        registry: &mut Registry,
        camera: &mut Camera3D,
        config: &SessionConfig,
    ) -> Option<BodyId> {
        log::info!("reset view ({:?})", self.mode());
        match self.mode() {
            ViewMode::GroundObserver => {
                let entered = self.enter_ground(registry, camera, config);
                if entered.is_none() {
                    self.exit_ground(registry, camera, config);
                }
                entered
            }
            ViewMode::FreeOrbit => {
                restore_star(registry, config);
                for (_, body) in registry.iter_mut() {
                    body.visible = true;
                }
                self.guides_visible = true;
                reset_camera_free(camera, config);
                self.state = ViewState::default();
                None
            }
        }
    }

    // ── Per tick ─────────────────────────────────────────────────────

    /// Ground-mode bookkeeping. No-op in free orbit.
    pub fn tick(&mut self, registry: &mut Registry, camera: &mut Camera3D, config: &SessionConfig) {
        let ViewState::GroundObserver { observed, interaction, camera_offset } = &mut self.state else {
            return;
        };
        let observed = *observed;

        if let Some(body) = registry.get_mut(observed) {
            body.visible = false;
        }

        if self.observer.cycle_enabled {
            self.observer.advance_clock(config.frame_delta);
            if !interaction.locked() {
                *camera_offset = place_camera(registry, observed, &self.observer, config, camera);
            }
        }

        update_star(registry, observed, &self.observer, config);

        if !interaction.locked() {
            let body_world = registry.world_position(observed);
            camera.set_position(body_world + *camera_offset);
            camera.look_at(body_world);
        }
    }

    // ── Gestures ─────────────────────────────────────────────────────

    pub fn gesture_start(&mut self) {
        self.state.interaction_mut().gesture_start();
    }

    pub fn gesture_end(&mut self) {
        self.state.interaction_mut().gesture_end();
    }

    /// Drag orbits the camera and counts as manual placement.
    pub fn drag(&mut self, camera: &mut Camera3D, dx: f32, dy: f32) {
        self.state.interaction_mut().has_interacted = true;
        camera.orbit(dx, dy);
    }

    pub fn pinch(&mut self, camera: &mut Camera3D, scale: f32) {
        self.state.interaction_mut().has_interacted = true;
        camera.zoom(scale);
    }

    // ── Observer setters ─────────────────────────────────────────────

    pub fn set_latitude(&mut self, degrees: f32, registry: &mut Registry, camera: &mut Camera3D, config: &SessionConfig) {
        self.observer.set_latitude(degrees);
        self.replace_observer(registry, camera, config);
    }

    pub fn set_longitude(&mut self, degrees: f32, registry: &mut Registry, camera: &mut Camera3D, config: &SessionConfig) {
        self.observer.set_longitude(degrees);
        self.replace_observer(registry, camera, config);
    }

    pub fn set_time_of_day(&mut self, hours: f32, registry: &mut Registry, camera: &mut Camera3D, config: &SessionConfig) {
        self.observer.set_time_of_day(hours);
        self.replace_observer(registry, camera, config);
    }

    pub fn set_cycle_enabled(&mut self, enabled: bool) {
        self.observer.cycle_enabled = enabled;
    }

    pub fn set_cycle_speed(&mut self, speed: f32, config: &SessionConfig) {
        self.observer.set_cycle_speed(speed, config.cycle_speed_max);
    }

    pub fn toggle_guides(&mut self) {
        self.guides_visible = !self.guides_visible;
    }

    /// Re-derive camera and star after an observer change. Sticky flag untouched.
    fn replace_observer(&mut self, registry: &mut Registry, camera: &mut Camera3D, config: &SessionConfig) {
        let ViewState::GroundObserver { observed, camera_offset, .. } = &mut self.state else {
            return;
        };
        *camera_offset = place_camera(registry, *observed, &self.observer, config, camera);
        update_star(registry, *observed, &self.observer, config);
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Enlarge and light the star for ground mode, or restore it.
/// Glow and light are created on first use and only toggled afterwards.
pub fn apply_star_presentation(body: &mut Body, config: &SessionConfig, on: bool) {
    if on {
        body.scale = body.data.earth_view_scale.unwrap_or(1.0) * config.star_scale_factor;
        body.emissive_color = body.data.color;
        body.emissive_intensity = config.star_emissive_intensity;
        let radius = body.data.radius * config.glow_radius_factor;
        body.glow
            .get_or_insert(Glow { radius, opacity: config.glow_opacity, visible: true })
            .visible = true;
        body.light
            .get_or_insert(StarLight {
                intensity: config.star_light_intensity,
                range: config.star_light_range,
                visible: true,
            })
            .visible = true;
    } else {
        body.scale = 1.0;
        body.emissive_color = 0x000000;
        body.emissive_intensity = 1.0;
        if let Some(glow) = body.glow.as_mut() {
            glow.visible = false;
        }
        if let Some(light) = body.light.as_mut() {
            light.visible = false;
        }
    }
}

/// Move the star to its simulated sky position around the observed body.
fn update_star(registry: &mut Registry, observed: BodyId, params: &ObserverParams, config: &SessionConfig) {
    let position = star_position(registry.world_position(observed), params.time_of_day, config.star_distance);
    let star = registry.star();
    if let Some(body) = registry.get_mut(star) {
        body.position = position;
        apply_star_presentation(body, config, true);
    }
}

fn restore_star(registry: &mut Registry, config: &SessionConfig) {
    let star = registry.star();
    if let Some(body) = registry.get_mut(star) {
        body.position = Vec3::ZERO;
        apply_star_presentation(body, config, false);
    }
}

/// Put the camera on the observed body's surface. Returns the offset from the body.
fn place_camera(
    registry: &Registry,
    observed: BodyId,
    params: &ObserverParams,
    config: &SessionConfig,
    camera: &mut Camera3D,
) -> Vec3 {
    let body_world = registry.world_position(observed);
    let radius = registry.get(observed).map(|b| b.data.radius).unwrap_or(1.0);
    let star = registry.get(registry.star()).map(|_| registry.world_position(registry.star()));
    let placement = place_observer(params, body_world, radius, Vec3::from(config.surface_offset), star);
    camera.set_position(placement.position);
    camera.look_at(placement.target);
    placement.position - body_world
}

/// Default overview camera: elevated, looking at the origin, wide zoom range.
pub fn reset_camera_free(camera: &mut Camera3D, config: &SessionConfig) {
    camera.set_distance_range(config.min_zoom, config.max_zoom);
    camera.set_position(Vec3::from(config.default_camera));
    camera.look_at(Vec3::ZERO);
}
