/// Solar Observer: a 3D orrery with a free orbit camera and a ground observer
/// view that stands on a planet and watches the star cross the sky.
///
/// All simulation state lives in `Session`; this type mirrors it into the
/// engine scene every tick and reports state back to the UI as game events.

use orrery_engine::*;
use glam::{Vec2, Vec3};

use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::picking;
use crate::registry::Registry;
use crate::session::Session;
use crate::view::ViewMode;

// ── Custom event kinds from the UI ───────────────────────────────────

const CUSTOM_TOGGLE_GROUND: u32 = 1;
const CUSTOM_RESET_VIEW: u32 = 2;
const CUSTOM_TOGGLE_OVERVIEW: u32 = 3;
const CUSTOM_SET_ROTATION_SPEED: u32 = 4;
const CUSTOM_SET_REVOLUTION_SPEED: u32 = 5;
const CUSTOM_SET_LATITUDE: u32 = 6;
const CUSTOM_SET_LONGITUDE: u32 = 7;
const CUSTOM_SET_TIME: u32 = 8;
const CUSTOM_SET_CYCLE_ENABLED: u32 = 9;
const CUSTOM_SET_CYCLE_SPEED: u32 = 10;
const CUSTOM_SET_CONSTRAINED: u32 = 11;
const CUSTOM_TOGGLE_GUIDES: u32 = 12;
/// Viewport resize (sent by worker as kind=99).
const CUSTOM_RESIZE: u32 = 99;

// ── Game event kinds to the UI ───────────────────────────────────────

/// a = mode (0 free, 1 ground), b = user interacting, c = has interacted
const EVENT_MODE: f32 = 1.0;
/// a = latitude, b = longitude, c = time of day
const EVENT_OBSERVER: f32 = 2.0;
/// a = cycle enabled, b = cycle speed, c = guides visible
const EVENT_CYCLE: f32 = 3.0;
/// a = rotation multiplier, b = revolution multiplier
const EVENT_SPEEDS: f32 = 4.0;
/// a = catalog index or -1
const EVENT_SELECTION: f32 = 5.0;
/// a = visible, b/c = indicator pixels
const EVENT_OVERVIEW: f32 = 6.0;
/// a = catalog index, b/c = world x/z. One per marker, only while visible.
const EVENT_OVERVIEW_MARKER: f32 = 7.0;

// ── Scene decoration ─────────────────────────────────────────────────

const ORBIT_GUIDE_TAG: &str = "orbit-guide";
const ORBIT_GUIDE_COLOR: u32 = 0x444444;
const ORBIT_GUIDE_OPACITY: f32 = 0.3;

const RING_TAG: &str = "ring";
const RING_COLOR: u32 = 0xf8e8a0;
const RING_OPACITY: f32 = 0.7;
const RING_INNER: f32 = 1.4;
const RING_OUTER: f32 = 2.5;

const STAR_GLOW_TAG: &str = "star-glow";
/// 0xffcc00 as linear RGB for the ground-mode star light.
const STAR_LIGHT_COLOR: [f32; 3] = [1.0, 0.8, 0.0];

/// Fixed white light at the origin, present in both modes.
const SUN_LIGHT_INTENSITY: f32 = 1.5;
const SUN_LIGHT_RANGE: f32 = 300.0;
const AMBIENT: f32 = 0.2;

const MAX_LIGHTS: usize = 4;

fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

pub struct SolarObserver {
    catalog: Option<Catalog>,
    config: SessionConfig,
    session: Option<Session>,
    /// Set by `configure` after init; the scene is rebuilt on the next tick.
    needs_rebuild: bool,

    // Lazily created ground-mode presentation handles
    star_glow: Option<EntityId>,
    star_light: Option<LightId>,
}

impl SolarObserver {
    pub fn new() -> Self {
        let catalog = match Catalog::load() {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                log::error!("body catalog failed to load: {}", e);
                None
            }
        };
        Self {
            catalog,
            config: SessionConfig::default(),
            session: None,
            needs_rebuild: false,
            star_glow: None,
            star_light: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    // ── Scene construction ─────────────────────────────────────────

    /// (Re)create the session and every scene entity from the catalog.
    fn build(&mut self, ctx: &mut EngineContext) {
        ctx.scene.clear();
        ctx.lights = LightState::with_capacity(MAX_LIGHTS);
        ctx.lights.set_ambient(AMBIENT, AMBIENT, AMBIENT);
        ctx.lights.add(PointLight::new(Vec3::ZERO, [1.0, 1.0, 1.0], SUN_LIGHT_INTENSITY, SUN_LIGHT_RANGE));
        self.star_glow = None;
        self.star_light = None;
        self.needs_rebuild = false;

        let Some(catalog) = &self.catalog else {
            self.session = None;
            return;
        };
        let mut session = Session::new(catalog, self.config.clone());

        for (_, body) in session.registry_mut().iter_mut() {
            body.entity = Some(ctx.next_id());
        }
        spawn_bodies(session.registry(), ctx);

        ctx.camera = session.camera().clone();
        log::info!(
            "solar observer: {} bodies, {} entities",
            session.registry().len(),
            ctx.scene.len()
        );
        self.session = Some(session);
    }

    // ── Input ──────────────────────────────────────────────────────

    fn handle_input(session: &mut Session, ctx: &EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerTap { x, y } => {
                    let picked = picking::pick(&ctx.scene, session.camera(), session.registry(), Vec2::new(x, y));
                    session.select(picked);
                }
                InputEvent::DragRotate { dx, dy } => session.drag(dx, dy),
                InputEvent::PinchScale { scale } => session.pinch(scale),
                InputEvent::GestureStart => session.gesture_start(),
                InputEvent::GestureEnd => session.gesture_end(),
                InputEvent::Custom { kind, a, b, .. } => match kind {
                    CUSTOM_TOGGLE_GROUND => session.toggle_ground(),
                    CUSTOM_RESET_VIEW => session.reset_view(),
                    CUSTOM_TOGGLE_OVERVIEW => session.toggle_overview(),
                    CUSTOM_SET_ROTATION_SPEED => session.set_rotation_speed(a),
                    CUSTOM_SET_REVOLUTION_SPEED => session.set_revolution_speed(a),
                    CUSTOM_SET_LATITUDE => session.set_latitude(a),
                    CUSTOM_SET_LONGITUDE => session.set_longitude(a),
                    CUSTOM_SET_TIME => session.set_time_of_day(a),
                    CUSTOM_SET_CYCLE_ENABLED => session.set_cycle_enabled(a != 0.0),
                    CUSTOM_SET_CYCLE_SPEED => session.set_cycle_speed(a),
                    CUSTOM_SET_CONSTRAINED => session.set_constrained_display(a != 0.0),
                    CUSTOM_TOGGLE_GUIDES => session.toggle_guides(),
                    CUSTOM_RESIZE => session.resize(a, b),
                    other => log::debug!("unknown custom event kind {}", other),
                },
            }
        }
    }

    // ── Scene sync ─────────────────────────────────────────────────

    /// Copy body state onto entities, creating the star glow and light on first need.
    fn sync_scene(&mut self, ctx: &mut EngineContext) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let registry = session.registry();

        for (_, body) in registry.iter() {
            let Some(entity) = body.entity.and_then(|id| ctx.scene.get_mut(id)) else {
                continue;
            };
            entity.pos = body.position;
            entity.rotation.y = body.rotation_angle;
            entity.scale = Vec3::splat(body.scale);
            entity.visible = body.visible;
            if let Some(mesh) = entity.mesh.as_mut() {
                mesh.emissive = MeshColor::from_hex(body.emissive_color);
                mesh.emissive_intensity = body.emissive_intensity;
            }
        }

        let star = registry.get(registry.star());
        let star_entity = star.and_then(|s| s.entity);

        if let (Some(glow), Some(parent)) = (star.and_then(|s| s.glow), star_entity) {
            let id = match self.star_glow {
                Some(id) => id,
                None => {
                    let id = ctx.next_id();
                    let color = star.map(|s| s.data.color).unwrap_or(0xffcc00);
                    ctx.scene.spawn(
                        Entity::new(id)
                            .with_tag(STAR_GLOW_TAG)
                            .with_parent(parent)
                            .with_mesh(
                                MeshComponent::sphere(glow.radius, MeshColor::from_hex(color))
                                    .with_opacity(glow.opacity)
                                    .unlit()
                                    .back_side(),
                            ),
                    );
                    self.star_glow = Some(id);
                    id
                }
            };
            if let Some(entity) = ctx.scene.get_mut(id) {
                entity.visible = glow.visible;
            }
        }

        if let (Some(light), Some(parent)) = (star.and_then(|s| s.light), star_entity) {
            let id = *self.star_light.get_or_insert_with(|| {
                let id = ctx.lights.add(PointLight::new(
                    Vec3::ZERO,
                    STAR_LIGHT_COLOR,
                    light.intensity,
                    light.range,
                ));
                ctx.lights.set_follow(id, Some(parent));
                id
            });
            ctx.lights.set_enabled(id, light.visible);
        }

        ctx.scene.set_visible_by_tag(ORBIT_GUIDE_TAG, session.view().guides_visible());
        ctx.camera = session.camera().clone();
    }

    // ── UI events ──────────────────────────────────────────────────

    fn emit_events(session: &Session, ctx: &mut EngineContext) {
        // State snapshots: only the last tick of a frame needs to reach the UI.
        ctx.events.clear();

        let view = session.view();
        let flags = view.interaction();
        ctx.emit_event(GameEvent::new(
            EVENT_MODE,
            flag(session.mode() == ViewMode::GroundObserver),
            flag(flags.user_interacting),
            flag(flags.has_interacted),
        ));

        let observer = view.observer();
        ctx.emit_event(GameEvent::new(
            EVENT_OBSERVER,
            observer.latitude,
            observer.longitude,
            observer.time_of_day,
        ));
        ctx.emit_event(GameEvent::new(
            EVENT_CYCLE,
            flag(observer.cycle_enabled),
            observer.cycle_speed,
            flag(view.guides_visible()),
        ));

        let speeds = session.speeds();
        ctx.emit_event(GameEvent::new(EVENT_SPEEDS, speeds.rotation(), speeds.revolution(), 0.0));

        let selected = session.selected().map(|id| id.0 as f32).unwrap_or(-1.0);
        ctx.emit_event(GameEvent::new(EVENT_SELECTION, selected, 0.0, 0.0));

        let overview = session.overview();
        let indicator = overview.indicator();
        ctx.emit_event(GameEvent::new(
            EVENT_OVERVIEW,
            flag(overview.is_visible()),
            indicator.x,
            indicator.y,
        ));
        if overview.is_visible() {
            for marker in overview.markers() {
                ctx.emit_event(GameEvent::new(EVENT_OVERVIEW_MARKER, marker.body.0 as f32, marker.x, marker.z));
            }
        }
    }
}

impl Default for SolarObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Body spheres, rings and orbit guides. Body entity ids must already be assigned.
fn spawn_bodies(registry: &Registry, ctx: &mut EngineContext) {
    let star = registry.star();
    for (id, body) in registry.iter() {
        let Some(entity_id) = body.entity else { continue };
        let parent_entity = body.parent.and_then(|p| registry.get(p)).and_then(|p| p.entity);
        let tilt = body.data.tilt_radians();

        let mut mesh = MeshComponent::sphere(body.data.radius, MeshColor::from_hex(body.data.color));
        if id == star {
            mesh = mesh.unlit();
        }
        let mut entity = Entity::new(entity_id)
            .with_tag(body.data.key.clone())
            .with_pos(body.position)
            .with_rotation(Vec3::new(0.0, body.rotation_angle, tilt))
            .with_mesh(mesh);
        if let Some(parent) = parent_entity {
            entity = entity.with_parent(parent);
        }
        ctx.scene.spawn(entity);

        if body.data.has_ring {
            let r = body.data.radius;
            let ring_id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(ring_id)
                    .with_tag(RING_TAG)
                    .with_parent(entity_id)
                    .with_rotation(Vec3::new(0.0, 0.0, tilt))
                    .with_mesh(
                        MeshComponent::new(
                            MeshShape::Ring { inner: r * RING_INNER, outer: r * RING_OUTER },
                            MeshColor::from_hex(RING_COLOR),
                        )
                        .with_opacity(RING_OPACITY),
                    ),
            );
        }

        if body.data.distance > 0.0 {
            let guide_id = ctx.next_id();
            let mut guide = Entity::new(guide_id).with_tag(ORBIT_GUIDE_TAG).with_mesh(
                MeshComponent::new(
                    MeshShape::Circle { radius: body.data.distance },
                    MeshColor::from_hex(ORBIT_GUIDE_COLOR),
                )
                .with_opacity(ORBIT_GUIDE_OPACITY)
                .unlit(),
            );
            if let Some(parent) = parent_entity {
                guide = guide.with_parent(parent);
            }
            ctx.scene.spawn(guide);
        }
    }
}

impl Game for SolarObserver {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            max_instances: 64,
            max_events: 64,
            max_lights: MAX_LIGHTS,
        }
    }

    /// Replace the session configuration. Applied by rebuilding the session.
    fn configure(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.config = SessionConfig::from_json(json)?;
        self.needs_rebuild = self.session.is_some();
        Ok(())
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.build(ctx);
        self.sync_scene(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if self.needs_rebuild {
            self.build(ctx);
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        Self::handle_input(session, ctx, input);
        session.tick();

        self.sync_scene(ctx);
        if let Some(session) = self.session.as_ref() {
            Self::emit_events(session, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (SolarObserver, EngineContext) {
        let mut game = SolarObserver::new();
        let mut ctx = EngineContext::with_config(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    fn custom(kind: u32, a: f32) -> InputQueue {
        let mut input = InputQueue::new();
        input.push(InputEvent::Custom { kind, a, b: 0.0, c: 0.0 });
        input
    }

    fn event(ctx: &EngineContext, kind: f32) -> Option<GameEvent> {
        ctx.events.iter().copied().find(|e| e.kind == kind)
    }

    #[test]
    fn init_spawns_bodies_rings_and_guides() {
        let (game, ctx) = started();
        let registry = game.session().unwrap().registry();
        // 10 bodies, 1 ring, 9 guides
        assert_eq!(ctx.scene.len(), 20);
        for (_, body) in registry.iter() {
            assert!(ctx.scene.get(body.entity.unwrap()).is_some());
        }
        let moon = registry.get(registry.by_key("moon").unwrap()).unwrap();
        let earth = registry.get(registry.by_key("earth").unwrap()).unwrap();
        assert_eq!(ctx.scene.get(moon.entity.unwrap()).unwrap().parent, earth.entity);
        assert!(ctx.scene.find_by_tag(RING_TAG).is_some());
    }

    #[test]
    fn update_emits_state_events() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &InputQueue::new());
        assert_eq!(event(&ctx, EVENT_MODE).unwrap().a, 0.0);
        assert_eq!(event(&ctx, EVENT_SELECTION).unwrap().a, -1.0);
        assert_eq!(ctx.events.iter().filter(|e| e.kind == EVENT_OVERVIEW_MARKER).count(), 8);

        // a second tick in the same frame replaces the snapshot
        game.update(&mut ctx, &InputQueue::new());
        assert_eq!(ctx.events.iter().filter(|e| e.kind == EVENT_MODE).count(), 1);
    }

    #[test]
    fn ground_mode_creates_glow_and_light_once() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &custom(CUSTOM_TOGGLE_GROUND, 0.0));
        assert_eq!(event(&ctx, EVENT_MODE).unwrap().a, 1.0);

        let glow = game.star_glow.unwrap();
        assert!(ctx.scene.get(glow).unwrap().visible);
        assert!(ctx.lights.is_enabled(game.star_light.unwrap()));
        assert_eq!(ctx.scene.find_by_tag(ORBIT_GUIDE_TAG).map(|e| e.visible), Some(false));

        let earth = game.session().unwrap().registry().by_key("earth").unwrap();
        assert_eq!(event(&ctx, EVENT_SELECTION).unwrap().a, earth.0 as f32);

        game.update(&mut ctx, &custom(CUSTOM_TOGGLE_GROUND, 0.0));
        assert!(!ctx.scene.get(glow).unwrap().visible);
        assert!(!ctx.lights.is_enabled(game.star_light.unwrap()));
        assert_eq!(ctx.scene.find_by_tag(ORBIT_GUIDE_TAG).map(|e| e.visible), Some(true));

        let entities = ctx.scene.len();
        game.update(&mut ctx, &custom(CUSTOM_TOGGLE_GROUND, 0.0));
        assert_eq!(ctx.scene.len(), entities);
    }

    #[test]
    fn hidden_observed_body_is_hidden_in_scene() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &custom(CUSTOM_TOGGLE_GROUND, 0.0));
        let registry = game.session().unwrap().registry();
        let earth = registry.get(registry.by_key("earth").unwrap()).unwrap();
        assert!(!ctx.scene.get(earth.entity.unwrap()).unwrap().visible);
        assert_eq!(ctx.camera.position, game.session().unwrap().camera().position);
    }

    #[test]
    fn synced_scene_is_pickable() {
        let (mut game, mut ctx) = started();
        game.update(&mut ctx, &InputQueue::new());

        // look straight down at jupiter
        let session = game.session.as_mut().unwrap();
        let jupiter = session.registry().by_key("jupiter").unwrap();
        let world = session.registry().world_position(jupiter);
        let mut camera = session.camera().clone();
        camera.set_position(world + Vec3::new(0.0, 40.0, 0.1));
        camera.look_at(world);
        let picked = picking::pick(&ctx.scene, &camera, session.registry(), Vec2::ZERO);
        assert_eq!(picked, Some(jupiter));
    }

    #[test]
    fn configure_rebuilds_session() {
        let (mut game, mut ctx) = started();
        assert!(game.configure(r#"{"latitude": -20.0}"#).is_ok());
        game.update(&mut ctx, &InputQueue::new());
        assert_eq!(event(&ctx, EVENT_OBSERVER).unwrap().a, -20.0);

        assert!(game.configure("{ broken").is_err());
        assert_eq!(game.config.latitude, -20.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let (mut game, mut ctx) = started();
        let mut input = InputQueue::new();
        input.push(InputEvent::Custom { kind: CUSTOM_RESIZE, a: 800.0, b: 400.0, c: 0.0 });
        game.update(&mut ctx, &input);
        assert_eq!(ctx.camera.aspect, 2.0);
    }
}
