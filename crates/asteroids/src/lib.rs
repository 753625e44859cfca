//! # Asteroids
//!
//! Gameplay feature modules for the simulation kernel: the asteroid field
//! and its split behaviour, weapons, score keeping and the difficulty ramp.
//!
//! ```rust,no_run
//! use asteroids::{install, GameplayConfig};
//! use sim_kernel::Simulation;
//!
//! let mut simulation = Simulation::builder().with_default_systems().build().unwrap();
//! let score = install(&mut simulation, GameplayConfig::default());
//! simulation.start();
//! simulation.frame(1.0 / 60.0);
//! println!("score: {}", score.total());
//! ```

#![warn(missing_docs)]

pub mod components;
pub mod config;
pub mod difficulty;
pub mod field;
pub mod score;
pub mod weapon;

pub use components::{Asteroid, AsteroidSize, Projectile};
pub use config::{DifficultyConfig, FieldConfig, GameplayConfig};
pub use difficulty::DifficultySystem;
pub use field::{AsteroidFactory, AsteroidFieldPlugin, AsteroidSpawn};
pub use score::ScoreKeeper;
pub use weapon::{WeaponConfig, WeaponConfigBuilder};

use sim_kernel::ecs::SystemPhase;
use sim_kernel::Simulation;
use std::sync::Arc;

/// Register the field plugin, the difficulty system and a score keeper
pub fn install(simulation: &mut Simulation, config: GameplayConfig) -> Arc<ScoreKeeper> {
    simulation.add_plugin(Box::new(AsteroidFieldPlugin::new(config.field)));
    simulation.add_system(SystemPhase::Update, Box::new(DifficultySystem::new(config.difficulty)));
    ScoreKeeper::attach(simulation.events())
}
