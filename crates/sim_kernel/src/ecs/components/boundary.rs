//! Playfield boundary policy

use crate::ecs::Component;

/// What happens when an entity leaves the display rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoundaryPolicy {
    /// Reappear on the opposite edge once fully off-screen
    #[default]
    Wrap,
    /// Stay inside the rectangle; velocity into the wall is cancelled
    Clamp,
    /// Remove the entity once it is more than `margin` outside
    Destroy {
        /// Distance past the edge tolerated before removal
        margin: f32,
    },
}

impl Component for BoundaryPolicy {}
