//! Time management utilities

use log::warn;

/// Fixed-timestep accumulator
///
/// Raw frame deltas are added to an accumulator and drained in whole
/// `step`-sized slices, so physics integration is independent of the host's
/// frame rate and deterministic for a given sequence of raw deltas.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create an accumulator with the given step size and catch-up cap
    ///
    /// A `max_steps` of zero is treated as one.
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            total_steps: 0,
        }
    }

    /// Add a raw frame delta and return how many fixed steps are due
    ///
    /// When more than `max_steps` steps are owed (a frame-time spike), the
    /// surplus time is discarded instead of being carried into later frames.
    pub fn advance(&mut self, raw_delta: f32) -> u32 {
        if raw_delta.is_finite() && raw_delta > 0.0 {
            self.accumulator += raw_delta;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            warn!(
                "Fixed timestep fell behind: dropping {:.4}s after {} catch-up steps",
                self.accumulator - self.accumulator % self.step,
                steps
            );
            self.accumulator %= self.step;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Size of one fixed step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Maximum number of catch-up steps per frame
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Time currently owed but not yet simulated
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Fraction of a step currently accumulated, useful for interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total fixed steps consumed since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Drop any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_step() {
        let mut timestep = FixedTimestep::new(1.0 / 60.0, 5);
        assert_eq!(timestep.advance(1.0 / 60.0), 1);
        assert_relative_eq!(timestep.accumulator(), 0.0);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut timestep = FixedTimestep::new(0.1, 5);
        assert_eq!(timestep.advance(0.04), 0);
        assert_eq!(timestep.advance(0.04), 0);
        assert_eq!(timestep.advance(0.04), 1);
        assert_relative_eq!(timestep.accumulator(), 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_multiple_steps_in_one_frame() {
        let mut timestep = FixedTimestep::new(0.25, 10);
        assert_eq!(timestep.advance(1.0), 4);
        assert_eq!(timestep.total_steps(), 4);
    }

    #[test]
    fn test_spiral_of_death_is_capped() {
        let mut timestep = FixedTimestep::new(0.01, 3);
        assert_eq!(timestep.advance(1.0), 3);
        assert!(timestep.accumulator() < 0.01);
        // Nothing left over to catch up on
        assert_eq!(timestep.advance(0.0), 0);
    }

    #[test]
    fn test_deterministic_for_same_deltas() {
        let deltas = [0.016, 0.017, 0.033, 0.001, 0.05];
        let mut a = FixedTimestep::new(1.0 / 60.0, 5);
        let mut b = FixedTimestep::new(1.0 / 60.0, 5);
        let steps_a: Vec<u32> = deltas.iter().map(|&d| a.advance(d)).collect();
        let steps_b: Vec<u32> = deltas.iter().map(|&d| b.advance(d)).collect();
        assert_eq!(steps_a, steps_b);
    }

    #[test]
    fn test_ignores_invalid_deltas() {
        let mut timestep = FixedTimestep::new(0.1, 5);
        assert_eq!(timestep.advance(-1.0), 0);
        assert_eq!(timestep.advance(f32::NAN), 0);
        assert_relative_eq!(timestep.accumulator(), 0.0);
    }
}
