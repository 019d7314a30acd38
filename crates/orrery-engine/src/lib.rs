pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, LightId, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, MeshShape, MeshColor};
pub use core::scene::{Scene, Ray, RayHit};
pub use core::time::FrameClock;
pub use renderer::instance::{MeshInstance, RenderBuffer};
pub use renderer::camera::{Camera3D, CameraUniform};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::lighting::{PointLight, LightState};
