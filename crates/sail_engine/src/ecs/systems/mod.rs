//! ECS Systems module

pub mod movement_system;
pub mod lifetime_system;

pub use movement_system::MovementSystem;
pub use lifetime_system::LifetimeSystem;
