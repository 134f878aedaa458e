//! Particle life: colored particle groups pushing and pulling on each other
//! under a fixed, ordered rule table.

pub mod config;
pub mod core;
pub mod error;
pub mod headless;
pub mod render;
pub mod rules;
pub mod types;
pub mod ui;

pub use crate::config::WorldConfig;
pub use crate::core::World;
pub use crate::error::{ConfigError, Error, Result};
