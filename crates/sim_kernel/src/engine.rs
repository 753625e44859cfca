//! Simulation root
//!
//! [`Simulation`] owns the world, the shared state, the event bus and the
//! scheduler, and drives one frame at a time:
//!
//! 1. Update systems with the raw frame delta
//! 2. FixedUpdate systems once per fixed step owed by the accumulator
//! 3. LateUpdate systems with the raw frame delta
//!
//! The host owns the clock and calls [`Simulation::frame`]; there is no loop
//! in here.

use crate::config::{Config, ConfigError, KernelConfig};
use crate::ecs::systems::LifetimeSystem;
use crate::ecs::{PhaseReport, Scheduler, System, SystemError, SystemPhase, World};
use crate::events::EventBus;
use crate::foundation::time::FixedTimestep;
use crate::physics::{
    BoundarySystem, CollisionSystem, InteractionMatrix, MotionSystem, PhysicsIntegrationSystem,
};
use crate::plugin::Plugin;
use crate::state::SimulationState;
use thiserror::Error;

/// Simulation-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Fixed steps executed this frame
    pub fixed_steps: u32,
    /// System runs that completed
    pub succeeded: usize,
    /// Failures caught and skipped
    pub failures: Vec<SystemError>,
}

impl FrameStats {
    fn absorb(&mut self, report: PhaseReport) {
        self.succeeded += report.succeeded;
        self.failures.extend(report.failures);
    }
}

/// The simulation kernel
pub struct Simulation {
    world: World,
    state: SimulationState,
    events: EventBus,
    scheduler: Scheduler,
    timestep: FixedTimestep,
    config: KernelConfig,
    running: bool,
}

impl Simulation {
    /// Create an empty simulation (no systems) from a validated config
    pub fn new(config: KernelConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing simulation ({}x{}, fixed step {:.4}s)",
            config.display.width,
            config.display.height,
            config.timestep.fixed_step
        );

        Ok(Self {
            world: World::new(),
            state: SimulationState::new(&config),
            events: EventBus::new(),
            scheduler: Scheduler::new(),
            timestep: FixedTimestep::new(config.timestep.fixed_step, config.timestep.max_steps_per_frame),
            config,
            running: false,
        })
    }

    /// Load a `.toml` or `.ron` config and create a simulation from it
    pub fn from_config_file(path: &str) -> Result<Self, EngineError> {
        let config = KernelConfig::load_from_file(path)?;
        Self::new(config)
    }

    /// Start a builder
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Register a system in a phase
    pub fn add_system(&mut self, phase: SystemPhase, system: Box<dyn System>) {
        self.scheduler.add_system(phase, system);
    }

    /// Register a plugin; it is started on the next [`Simulation::start`]
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.scheduler.add_plugin(plugin);
    }

    /// Register the built-in motion, physics, collision, boundary and
    /// lifetime systems
    pub fn add_default_systems(&mut self, matrix: InteractionMatrix) {
        self.add_system(SystemPhase::Update, Box::new(MotionSystem::new()));
        self.add_system(
            SystemPhase::FixedUpdate,
            Box::new(PhysicsIntegrationSystem::new(self.config.physics)),
        );
        self.add_system(SystemPhase::LateUpdate, Box::new(CollisionSystem::new(matrix)));
        self.add_system(SystemPhase::LateUpdate, Box::new(BoundarySystem::new()));
        self.add_system(SystemPhase::LateUpdate, Box::new(LifetimeSystem::new()));
    }

    /// Run every plugin's start hook; no-op while already running
    pub fn start(&mut self) -> PhaseReport {
        if self.running {
            return PhaseReport::default();
        }
        self.running = true;
        self.scheduler
            .start_plugins(Some(&self.state), Some(&mut self.world))
    }

    /// Run every plugin's stop hook; no-op while stopped
    pub fn stop(&mut self) -> PhaseReport {
        if !self.running {
            return PhaseReport::default();
        }
        self.running = false;
        self.scheduler
            .stop_plugins(Some(&self.state), Some(&mut self.world))
    }

    /// Run one frame with the host's measured delta in seconds
    pub fn frame(&mut self, raw_delta: f32) -> FrameStats {
        self.state.begin_frame(raw_delta);
        let delta = self.state.delta_time();
        let mut stats = FrameStats::default();

        stats.absorb(self.run(SystemPhase::Update, delta));

        let steps = self.timestep.advance(delta);
        let fixed = self.timestep.step();
        for _ in 0..steps {
            stats.absorb(self.run(SystemPhase::FixedUpdate, fixed));
        }
        stats.fixed_steps = steps;

        stats.absorb(self.run(SystemPhase::LateUpdate, delta));

        if self.state.debug() && !stats.failures.is_empty() {
            log::debug!(
                "Frame {}: {} failures",
                self.state.frame(),
                stats.failures.len()
            );
        }
        stats
    }

    fn run(&mut self, phase: SystemPhase, delta: f32) -> PhaseReport {
        self.scheduler
            .run_phase(phase, &self.state, &mut self.world, &self.events, delta)
    }

    /// Resize the playfield
    pub fn set_display_size(&mut self, width: f32, height: f32) -> Result<(), EngineError> {
        self.state.set_display_size(width, height)?;
        Ok(())
    }

    /// Toggle debug mode
    pub fn set_debug(&mut self, debug: bool) {
        self.state.set_debug(debug);
    }

    /// Whether plugins have been started
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Entity store
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable entity store
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Shared scalar state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// System registry
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Mutable system registry
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Fixed-step accumulator
    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Configuration the simulation was built from
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

/// Explicit registration list for a [`Simulation`]
#[derive(Default)]
pub struct SimulationBuilder {
    config: KernelConfig,
    systems: Vec<(SystemPhase, Box<dyn System>)>,
    plugins: Vec<Box<dyn Plugin>>,
    default_systems: bool,
    matrix: InteractionMatrix,
}

impl SimulationBuilder {
    /// Builder with default config and nothing registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an Update system
    pub fn with_update(self, system: impl System + 'static) -> Self {
        self.with_system(SystemPhase::Update, system)
    }

    /// Register a FixedUpdate system
    pub fn with_fixed_update(self, system: impl System + 'static) -> Self {
        self.with_system(SystemPhase::FixedUpdate, system)
    }

    /// Register a LateUpdate system
    pub fn with_late_update(self, system: impl System + 'static) -> Self {
        self.with_system(SystemPhase::LateUpdate, system)
    }

    /// Register a system in any phase
    pub fn with_system(mut self, phase: SystemPhase, system: impl System + 'static) -> Self {
        self.systems.push((phase, Box::new(system)));
        self
    }

    /// Register a plugin
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Include the built-in systems
    pub fn with_default_systems(mut self) -> Self {
        self.default_systems = true;
        self
    }

    /// Layer matrix for the built-in collision system
    pub fn with_interaction_matrix(mut self, matrix: InteractionMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Validate the config and assemble the simulation
    pub fn build(self) -> Result<Simulation, EngineError> {
        let mut simulation = Simulation::new(self.config)?;
        if self.default_systems {
            simulation.add_default_systems(self.matrix);
        }
        for (phase, system) in self.systems {
            simulation.add_system(phase, system);
        }
        for plugin in self.plugins {
            simulation.add_plugin(plugin);
        }
        Ok(simulation)
    }
}
