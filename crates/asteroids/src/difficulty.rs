//! Difficulty ramp

use crate::config::DifficultyConfig;
use sim_kernel::ecs::{System, SystemContext, SystemError};
use sim_kernel::events::{DifficultyChanged, DifficultySnapshot};

/// Update system raising the difficulty level as play time accumulates
///
/// Publishes [`DifficultyChanged`] whenever the level moves.
#[derive(Debug)]
pub struct DifficultySystem {
    config: DifficultyConfig,
    current: DifficultySnapshot,
}

impl DifficultySystem {
    /// Runs after the kernel's motion pass
    pub const PRIORITY: i32 = 50;

    /// Create the system at level 1
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            current: config.snapshot(1),
            config,
        }
    }

    /// Parameters currently in force
    pub fn current(&self) -> DifficultySnapshot {
        self.current
    }
}

impl System for DifficultySystem {
    fn name(&self) -> &str {
        "difficulty"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let level = self.config.level_at(ctx.state.elapsed());
        if level == self.current.level {
            return Ok(());
        }

        let previous = self.current;
        self.current = self.config.snapshot(level);
        log::info!("Difficulty {} -> {}", previous.level, level);
        ctx.events.publish(DifficultyChanged {
            source: None,
            previous,
            current: self.current,
        });
        Ok(())
    }
}
