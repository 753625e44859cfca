//! Configuration system
//!
//! Kernel tunables are plain serde structs. Any of them can be loaded from or
//! saved to `.toml` and `.ron` files through the [`Config`] trait.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;
        
        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
    
    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    
    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its permitted range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level kernel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Playfield dimensions
    pub display: DisplayConfig,
    /// Fixed-timestep settings
    pub timestep: TimestepConfig,
    /// Physics constants
    pub physics: PhysicsSettings,
    /// Debug flag exposed to systems through the simulation state
    pub debug: bool,
}

impl Config for KernelConfig {}

impl KernelConfig {
    /// Check that every value is usable by the integrator and scheduler
    ///
    /// NaN and infinite values are rejected along with out-of-range ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display.validate()?;
        positive("fixed_step", self.timestep.fixed_step)?;
        self.physics.validate()
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")))
    }
}

/// Display (playfield) dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Playfield width
    pub width: f32,
    /// Playfield height
    pub height: f32,
}

impl DisplayConfig {
    /// Both dimensions must be finite and positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("display width", self.width)?;
        positive("display height", self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Fixed-timestep accumulator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepConfig {
    /// Size of one physics step in seconds
    pub fixed_step: f32,
    /// Cap on catch-up steps per frame
    pub max_steps_per_frame: u32,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 60.0,
            max_steps_per_frame: 5,
        }
    }
}

/// Constants used by the physics integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Frame rate drag coefficients are expressed against
    pub reference_frame_rate: f32,
    /// Linear speed below which a body is considered at rest
    pub sleep_velocity_threshold: f32,
    /// Angular speed below which a body is considered at rest
    pub sleep_angular_threshold: f32,
    /// Seconds a body must stay at rest before it falls asleep
    pub sleep_time: f32,
    /// Linear speeds below this snap to exactly zero
    pub velocity_epsilon: f32,
    /// Angular speeds below this snap to exactly zero
    pub angular_epsilon: f32,
}

impl PhysicsSettings {
    /// Reject values that would turn integrated velocities into NaN
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("reference_frame_rate", self.reference_frame_rate)?;
        non_negative("sleep_velocity_threshold", self.sleep_velocity_threshold)?;
        non_negative("sleep_angular_threshold", self.sleep_angular_threshold)?;
        non_negative("sleep_time", self.sleep_time)?;
        non_negative("velocity_epsilon", self.velocity_epsilon)?;
        non_negative("angular_epsilon", self.angular_epsilon)
    }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            reference_frame_rate: 60.0,
            sleep_velocity_threshold: 0.5,
            sleep_angular_threshold: 0.05,
            sleep_time: 0.5,
            velocity_epsilon: 0.01,
            angular_epsilon: 0.001,
        }
    }
}
