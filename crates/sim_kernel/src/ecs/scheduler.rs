//! System Scheduling
//! 
//! Systems are registered explicitly per phase (the host builds the list at
//! startup). Each phase's systems are sorted by ascending priority once and the
//! order is cached until [`Scheduler::clear_cache`] is called or the phase
//! gains a system. Ties keep registration order.
//!
//! A failing or panicking system is logged and skipped; the remaining systems
//! of the phase, and later phases, still run.

use crate::ecs::{System, SystemContext, SystemError, SystemPhase, World};
use crate::events::EventBus;
use crate::plugin::Plugin;
use crate::state::SimulationState;
use log::{debug, error, info};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Result of running one phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseReport {
    /// Systems that completed successfully
    pub succeeded: usize,
    /// Failures caught during the phase
    pub failures: Vec<SystemError>,
}

impl PhaseReport {
    /// Fold another report into this one
    pub fn merge(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
    }
}

/// Systems of one phase plus their cached execution order
#[derive(Default)]
struct PhaseSlot {
    systems: Vec<Box<dyn System>>,
    order: Option<Vec<usize>>,
}

impl PhaseSlot {
    fn order(&mut self) -> Vec<usize> {
        if let Some(order) = &self.order {
            return order.clone();
        }
        let mut order: Vec<usize> = (0..self.systems.len()).collect();
        // sort_by_key is stable: equal priorities keep registration order
        order.sort_by_key(|&i| self.systems[i].priority());
        self.order = Some(order.clone());
        order
    }
}

/// Priority-ordered registry of systems and plugins
#[derive(Default)]
pub struct Scheduler {
    update: PhaseSlot,
    fixed_update: PhaseSlot,
    late_update: PhaseSlot,
    plugins: Vec<Box<dyn Plugin>>,
    plugin_order: Option<Vec<usize>>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system to a phase
    pub fn add_system(&mut self, phase: SystemPhase, system: Box<dyn System>) {
        debug!("Registering {} system '{}' (priority {})", phase, system.name(), system.priority());
        let slot = self.slot_mut(phase);
        slot.systems.push(system);
        slot.order = None;
    }

    /// Add a plugin
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) {
        debug!("Registering plugin '{}' (priority {})", plugin.name(), plugin.priority());
        self.plugins.push(plugin);
        self.plugin_order = None;
    }

    /// Forget every cached execution order; the next run re-sorts
    pub fn clear_cache(&mut self) {
        for phase in SystemPhase::ORDER {
            self.slot_mut(phase).order = None;
        }
        self.plugin_order = None;
    }

    /// Number of systems registered for a phase
    pub fn system_count(&self, phase: SystemPhase) -> usize {
        self.slot(phase).systems.len()
    }

    /// Number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// System names of a phase in execution order
    pub fn execution_order(&mut self, phase: SystemPhase) -> Vec<String> {
        let slot = self.slot_mut(phase);
        slot.order()
            .into_iter()
            .map(|i| slot.systems[i].name().to_string())
            .collect()
    }

    /// Run every system of a phase once, in priority order
    pub fn run_phase(
        &mut self,
        phase: SystemPhase,
        state: &SimulationState,
        world: &mut World,
        events: &EventBus,
        delta_time: f32,
    ) -> PhaseReport {
        let slot = self.slot_mut(phase);
        let mut report = PhaseReport::default();

        for index in slot.order() {
            let system = &mut slot.systems[index];
            let mut ctx = SystemContext {
                state,
                world: &mut *world,
                events,
                delta_time,
            };

            let outcome = catch_unwind(AssertUnwindSafe(|| system.run(&mut ctx)));
            match outcome {
                Ok(Ok(())) => report.succeeded += 1,
                Ok(Err(err)) => {
                    error!("{} system error: {}", phase, err);
                    report.failures.push(err);
                }
                Err(payload) => {
                    let err = SystemError::from_panic(system.name(), payload.as_ref());
                    error!("{} system error: {}", phase, err);
                    report.failures.push(err);
                }
            }
        }

        report
    }

    /// Start every plugin in priority order
    pub fn start_plugins(&mut self, state: Option<&SimulationState>, mut world: Option<&mut World>) -> PhaseReport {
        let mut report = PhaseReport::default();
        for index in self.plugin_order() {
            let plugin = &mut self.plugins[index];
            info!("Starting plugin '{}'", plugin.name());
            let outcome = catch_unwind(AssertUnwindSafe(|| plugin.start(state, world.as_deref_mut())));
            report.merge(Self::plugin_outcome(plugin.name(), outcome));
        }
        report
    }

    /// Stop every plugin in priority order
    pub fn stop_plugins(&mut self, state: Option<&SimulationState>, mut world: Option<&mut World>) -> PhaseReport {
        let mut report = PhaseReport::default();
        for index in self.plugin_order() {
            let plugin = &mut self.plugins[index];
            info!("Stopping plugin '{}'", plugin.name());
            let outcome = catch_unwind(AssertUnwindSafe(|| plugin.stop(state, world.as_deref_mut())));
            report.merge(Self::plugin_outcome(plugin.name(), outcome));
        }
        report
    }

    fn plugin_outcome(
        name: &str,
        outcome: std::thread::Result<Result<(), SystemError>>,
    ) -> PhaseReport {
        let mut report = PhaseReport::default();
        match outcome {
            Ok(Ok(())) => report.succeeded += 1,
            Ok(Err(err)) => {
                error!("Plugin error: {}", err);
                report.failures.push(err);
            }
            Err(payload) => {
                let err = SystemError::from_panic(name, payload.as_ref());
                error!("Plugin error: {}", err);
                report.failures.push(err);
            }
        }
        report
    }

    fn plugin_order(&mut self) -> Vec<usize> {
        if let Some(order) = &self.plugin_order {
            return order.clone();
        }
        let mut order: Vec<usize> = (0..self.plugins.len()).collect();
        order.sort_by_key(|&i| self.plugins[i].priority());
        self.plugin_order = Some(order.clone());
        order
    }

    fn slot(&self, phase: SystemPhase) -> &PhaseSlot {
        match phase {
            SystemPhase::Update => &self.update,
            SystemPhase::FixedUpdate => &self.fixed_update,
            SystemPhase::LateUpdate => &self.late_update,
        }
    }

    fn slot_mut(&mut self, phase: SystemPhase) -> &mut PhaseSlot {
        match phase {
            SystemPhase::Update => &mut self.update,
            SystemPhase::FixedUpdate => &mut self.fixed_update,
            SystemPhase::LateUpdate => &mut self.late_update,
        }
    }
}
