//! System trait and execution context

use crate::ecs::World;
use crate::events::EventBus;
use crate::state::SimulationState;
use std::fmt;
use thiserror::Error;

/// Per-frame loop stage a system runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemPhase {
    /// Once per frame with the raw frame delta
    Update,
    /// Zero or more times per frame with the fixed step
    FixedUpdate,
    /// Once per frame after physics: collisions, boundaries, cleanup
    LateUpdate,
}

impl SystemPhase {
    /// Phases in execution order
    pub const ORDER: [Self; 3] = [Self::Update, Self::FixedUpdate, Self::LateUpdate];
}

impl fmt::Display for SystemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Update => "Update",
            Self::FixedUpdate => "FixedUpdate",
            Self::LateUpdate => "LateUpdate",
        };
        f.write_str(name)
    }
}

/// Failure raised by a system or plugin
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    /// The system reported an error
    #[error("{system} failed: {message}")]
    Failed {
        /// Name of the failing system
        system: String,
        /// What went wrong
        message: String,
    },

    /// The system panicked
    #[error("{system} panicked: {message}")]
    Panicked {
        /// Name of the failing system
        system: String,
        /// Panic payload, if it was a string
        message: String,
    },
}

impl SystemError {
    /// Build a failure for the named system
    pub fn failed(system: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Failed {
            system: system.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn from_panic(system: &str, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked {
            system: system.to_string(),
            message,
        }
    }
}

/// Everything a system sees while it runs
pub struct SystemContext<'a> {
    /// Shared scalar state (read-only to systems)
    pub state: &'a SimulationState,
    /// Entity store
    pub world: &'a mut World,
    /// Event bus
    pub events: &'a EventBus,
    /// Delta time for this invocation: the raw frame delta in Update and
    /// LateUpdate, the fixed step in FixedUpdate
    pub delta_time: f32,
}

/// A unit of behavior invoked once per run of its phase
pub trait System: Send {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Execution order within the phase; lower runs earlier
    fn priority(&self) -> i32 {
        0
    }

    /// Execute the system
    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError>;
}
