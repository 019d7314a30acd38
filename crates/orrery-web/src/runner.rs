use orrery_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue, RenderBuffer,
    FrameClock, ProtocolLayout, CameraUniform,
};
use orrery_engine::bridge::protocol::{
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_PROTOCOL_VERSION, PROTOCOL_VERSION,
    HEADER_MAX_INSTANCES, HEADER_INSTANCE_COUNT, HEADER_TRANSLUCENT_SPLIT,
    HEADER_MAX_LIGHTS, HEADER_LIGHT_COUNT, HEADER_MAX_EVENTS, HEADER_EVENT_COUNT,
    HEADER_AMBIENT_R, HEADER_AMBIENT_G, HEADER_AMBIENT_B,
};
use orrery_engine::systems::render::build_render_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    camera: CameraUniform,
    frame: u32,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let clock = FrameClock::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::with_config(&config);
        let camera = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            clock,
            layout,
            config,
            header: [0.0; HEADER_FLOATS],
            camera,
            frame: 0,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Forward runtime configuration JSON to the game.
    /// A rejected document is logged and the previous configuration stays.
    pub fn load_config(&mut self, json: &str) {
        match self.game.configure(json) {
            Ok(()) => log::info!("configuration applied"),
            Err(e) => log::warn!("configuration rejected: {}", e),
        }
    }

    /// Run one frame: fixed ticks, then rebuild the buffers the renderer reads.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.clock.accumulate(dt);
        if steps > 0 {
            // Input is delivered to the first tick only, so one gesture is applied once
            let pending = std::mem::take(&mut self.input);
            let empty = InputQueue::new();
            for step in 0..steps {
                let input = if step == 0 { &pending } else { &empty };
                self.game.update(&mut self.ctx, input);
            }
        }

        if self.ctx.events.len() > self.config.max_events {
            log::warn!(
                "dropping {} game events over capacity",
                self.ctx.events.len() - self.config.max_events
            );
            self.ctx.events.truncate(self.config.max_events);
        }

        self.publish();
    }

    fn publish(&mut self) {
        build_render_buffer(&self.ctx.scene, &mut self.render_buffer, self.config.max_instances);
        self.ctx.lights.sync(&self.ctx.scene);
        self.camera = self.ctx.camera.uniform();

        self.frame = self.frame.wrapping_add(1);
        let ambient = self.ctx.lights.ambient();
        let light_count = self.light_count();
        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.frame as f32;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_MAX_INSTANCES] = self.layout.max_instances as f32;
        h[HEADER_INSTANCE_COUNT] = self.render_buffer.instance_count() as f32;
        h[HEADER_TRANSLUCENT_SPLIT] = self.render_buffer.translucent_split as f32;
        h[HEADER_MAX_LIGHTS] = self.layout.max_lights as f32;
        h[HEADER_LIGHT_COUNT] = light_count as f32;
        h[HEADER_MAX_EVENTS] = self.layout.max_events as f32;
        h[HEADER_EVENT_COUNT] = self.ctx.events.len() as f32;
        h[HEADER_AMBIENT_R] = ambient[0];
        h[HEADER_AMBIENT_G] = ambient[1];
        h[HEADER_AMBIENT_B] = ambient[2];
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn translucent_split(&self) -> u32 {
        self.render_buffer.translucent_split
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights.buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.ctx.lights.count().min(self.layout.max_lights) as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_engine::{Entity, GameEvent, MeshColor, MeshComponent, PointLight};

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        taps: u32,
        configured: bool,
    }

    impl Game for Counter {
        fn configure(&mut self, json: &str) -> Result<(), serde_json::Error> {
            let _: serde_json::Value = serde_json::from_str(json)?;
            self.configured = true;
            Ok(())
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id).with_mesh(MeshComponent::sphere(1.0, MeshColor::WHITE)),
            );
            ctx.lights.add(PointLight::new(Vec3::ZERO, [1.0, 1.0, 1.0], 1.0, 10.0));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.ticks += 1;
            for event in input.iter() {
                if let InputEvent::PointerTap { .. } = event {
                    self.taps += 1;
                }
            }
            for _ in 0..100 {
                ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
            }
        }
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut runner = GameRunner::new(Counter::default());
        runner.tick(1.0);
        assert_eq!(runner.game().ticks, 0);
    }

    #[test]
    fn input_reaches_only_first_tick() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.push_input(InputEvent::PointerTap { x: 0.0, y: 0.0 });
        runner.tick(3.0 / 60.0 + 0.001);
        assert_eq!(runner.game().ticks, 3);
        assert_eq!(runner.game().taps, 1);
    }

    #[test]
    fn input_waits_for_a_tick() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.push_input(InputEvent::PointerTap { x: 0.0, y: 0.0 });
        runner.tick(0.001);
        assert_eq!(runner.game().taps, 0);
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().taps, 1);
    }

    #[test]
    fn events_are_capped() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.tick(1.0 / 60.0 + 0.001);
        assert_eq!(runner.game_events_len(), runner.max_events());
    }

    #[test]
    fn render_buffer_built_on_init() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        assert_eq!(runner.instance_count(), 1);
    }

    #[test]
    fn bad_config_is_rejected() {
        let mut runner = GameRunner::new(Counter::default());
        runner.load_config("{ not json");
        assert!(!runner.game().configured);
        runner.load_config("{}");
        assert!(runner.game().configured);
    }

    #[test]
    fn header_reports_lights_and_frame() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        let frame = runner.header[HEADER_FRAME_COUNTER];
        runner.tick(1.0 / 60.0 + 0.001);
        assert_eq!(runner.light_count(), 1);
        assert_eq!(runner.header[HEADER_LIGHT_COUNT], 1.0);
        assert_eq!(runner.header[HEADER_FRAME_COUNTER], frame + 1.0);
    }
}
