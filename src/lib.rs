//! Runtime core of a 2D arcade shoot-'em-up: entities and components,
//! projectiles, enemy formations, boss patterns and per-stage scenes.

pub mod assets;
pub mod boss;
pub mod campaign;
pub mod clock;
pub mod component;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod player;
pub mod projectile;
pub mod render;
pub mod scene;
pub mod script;
pub mod transform;
