//! ECS Components module
//! 
//! Components shipped with the engine. Game-specific components live in
//! the game crate and implement [`crate::ecs::Component`] the same way.

pub mod transform;
pub mod movement;
pub mod lifetime;

pub use transform::TransformComponent;
pub use movement::MovementComponent;
pub use lifetime::Lifetime;

/// 2D vector used by the built-in components
pub type Vec2 = nalgebra::Vector2<f32>;
