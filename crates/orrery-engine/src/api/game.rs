use serde::Deserialize;

use crate::api::types::{EntityId, GameEvent};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
use crate::systems::lighting::LightState;

/// Configuration for the engine, provided by the game.
/// Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum number of mesh instances written per frame (default: 256).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 64).
    pub max_events: usize,
    /// Maximum number of enabled point lights (default: 8).
    pub max_lights: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_instances: 256,
            max_events: 64,
            max_lights: 8,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Apply game-specific runtime configuration from JSON.
    /// On error the game must keep its previous configuration.
    fn configure(&mut self, _json: &str) -> Result<(), serde_json::Error> {
        Ok(())
    }

    /// Setup initial state, spawn entities, place the camera.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed simulation tick. Input accumulated since the last frame is
    /// handed to the first tick of the frame only; later ticks see an empty queue.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: Camera3D,
    pub lights: LightState,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera3D::default(),
            lights: LightState::with_capacity(config.max_lights),
            events: Vec::with_capacity(config.max_events),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_is_unique() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn config_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{"max_lights": 2}"#).unwrap();
        assert_eq!(config.max_lights, 2);
        assert_eq!(config.max_instances, GameConfig::default().max_instances);
        assert!(GameConfig::from_json("42").is_err());
        assert!(GameConfig::from_json(r#"{"max_lights": "two"}"#).is_err());
    }

    #[test]
    fn clear_frame_data_drops_events() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(ctx.events.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }
}
