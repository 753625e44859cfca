//! Process-wide scalar simulation state
//!
//! Passed by reference to every system each frame. Timing fields are written
//! only by the frame driver; dimensions and the debug flag only through
//! explicit configuration calls.

use crate::config::{ConfigError, DisplayConfig, KernelConfig};

/// Scalar state shared by all systems
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    width: f32,
    height: f32,
    delta_time: f32,
    fixed_delta_time: f32,
    elapsed: f32,
    frame: u64,
    debug: bool,
}

impl SimulationState {
    /// Create state from configuration
    pub fn new(config: &KernelConfig) -> Self {
        Self {
            width: config.display.width,
            height: config.display.height,
            delta_time: 0.0,
            fixed_delta_time: config.timestep.fixed_step,
            elapsed: 0.0,
            frame: 0,
            debug: config.debug,
        }
    }

    /// Playfield width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Playfield height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Raw delta time of the current frame (seconds)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Size of one fixed physics step (seconds)
    pub fn fixed_delta_time(&self) -> f32 {
        self.fixed_delta_time
    }

    /// Simulated time since the first frame (seconds)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of frames started so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Debug flag
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Change the playfield dimensions; rejects non-positive or non-finite sizes
    pub fn set_display_size(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        DisplayConfig { width, height }.validate()?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Toggle the debug flag
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Record the start of a new frame
    pub(crate) fn begin_frame(&mut self, raw_delta: f32) {
        let delta = if raw_delta.is_finite() { raw_delta.max(0.0) } else { 0.0 };
        self.delta_time = delta;
        self.elapsed += delta;
        self.frame += 1;
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(&KernelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame() {
        let mut state = SimulationState::default();
        state.begin_frame(0.25);
        state.begin_frame(-1.0);
        state.begin_frame(0.5);
        assert_eq!(state.frame(), 3);
        assert_eq!(state.delta_time(), 0.5);
        assert_eq!(state.elapsed(), 0.75);
    }

    #[test]
    fn test_configuration_calls() {
        let mut state = SimulationState::default();
        state.set_display_size(320.0, 200.0).unwrap();
        state.set_debug(true);
        assert_eq!((state.width(), state.height()), (320.0, 200.0));
        assert!(state.debug());
    }

    #[test]
    fn test_bad_display_size_keeps_previous() {
        let mut state = SimulationState::default();
        assert!(state.set_display_size(f32::NAN, 200.0).is_err());
        assert!(state.set_display_size(320.0, -1.0).is_err());
        assert!(state.set_display_size(0.0, 200.0).is_err());
        assert_eq!((state.width(), state.height()), (1024.0, 768.0));
    }
}
