//! Collision detection and response
//!
//! Detection is split into the usual two phases: the broad phase gathers
//! enabled colliders and keeps the pairs whose layers interact, the narrow
//! phase keeps the pairs whose circles overlap. The broad phase is a plain
//! pairwise sweep; the playfield holds tens of bodies, not thousands.
//!
//! Resolution runs the matching response handlers for both entities of a
//! pair. Handlers that report destruction only mark the entity; removal
//! happens once the whole pass has been resolved, and an entity marked by an
//! earlier pair takes part in no further pairs.

use crate::ecs::components::{
    ColliderComponent, CollisionResponseComponent, Owner, ResponseHandler, ScoreValue,
    TransformComponent,
};
use crate::ecs::{EntityId, System, SystemContext, SystemError, World};
use crate::events::{DestructionCause, EntityDestroyed, EventBus};
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::{CollisionGroups, CollisionLayer, InteractionMatrix};
use std::collections::HashSet;

/// Circle overlap test; touching circles overlap
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    (a - b).magnitude_squared() <= reach * reach
}

/// Unordered pair of colliding entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Entity with the smaller id
    pub entity_a: EntityId,
    /// Entity with the larger id
    pub entity_b: EntityId,
}

impl CollisionPair {
    /// Create a pair; `(a, b)` and `(b, a)` produce the same value
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b {
            Self { entity_a: a, entity_b: b }
        } else {
            Self { entity_a: b, entity_b: a }
        }
    }

    /// Whether the pair contains `entity`
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    entity: EntityId,
    layer: CollisionLayer,
    position: Vec2,
    radius: f32,
}

/// A destruction decided during resolution, applied after the pass
#[derive(Debug, Clone, Copy)]
struct PendingDestruction {
    entity: EntityId,
    cause: DestructionCause,
    instigator: Option<EntityId>,
    score_value: u32,
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Overlapping pairs found by the narrow phase
    pub pairs: Vec<CollisionPair>,
    /// Entities removed at the end of the pass, in destruction order
    pub destroyed: Vec<EntityId>,
}

/// LateUpdate system detecting overlaps and dispatching responses
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    matrix: InteractionMatrix,
    priority: i32,
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(InteractionMatrix::default())
    }
}

impl CollisionSystem {
    /// Default priority within LateUpdate
    pub const PRIORITY: i32 = 100;

    /// Create the system with a layer interaction matrix
    pub fn new(matrix: InteractionMatrix) -> Self {
        Self {
            matrix,
            priority: Self::PRIORITY,
        }
    }

    /// Override the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Layer interaction matrix in use
    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    /// Find every overlapping pair whose layers interact
    pub fn detect(&self, world: &World) -> Vec<CollisionPair> {
        let candidates = Self::broad_phase(world);
        let mut pairs = Vec::new();

        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if self.matrix.interacts(a.layer, b.layer) && Self::narrow_phase(a, b) {
                    pairs.push(CollisionPair::new(a.entity, b.entity));
                }
            }
        }
        pairs
    }

    /// Detect, resolve and apply removals, publishing a destruction event
    /// for each removed entity
    pub fn process(&self, world: &mut World, events: &EventBus) -> CollisionReport {
        let pairs = self.detect(world);
        let pending = Self::resolve(world, &pairs);

        let mut destroyed = Vec::with_capacity(pending.len());
        for destruction in pending {
            if !world.remove_entity(destruction.entity) {
                // A handler already removed it
                continue;
            }
            log::debug!(
                "Entity {} destroyed by collision ({:?})",
                destruction.entity,
                destruction.cause
            );
            events.publish(EntityDestroyed {
                entity: destruction.entity,
                cause: destruction.cause,
                instigator: destruction.instigator,
                score_value: destruction.score_value,
            });
            destroyed.push(destruction.entity);
        }

        CollisionReport { pairs, destroyed }
    }

    fn broad_phase(world: &World) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = world
            .query::<ColliderComponent>()
            .into_iter()
            .filter_map(|entity| {
                let collider = world.get_component::<ColliderComponent>(entity)?;
                if !collider.enabled {
                    return None;
                }
                let transform = world.get_component::<TransformComponent>(entity)?;
                Some(Candidate {
                    entity,
                    layer: collider.layer,
                    position: transform.position,
                    radius: collider.radius(transform),
                })
            })
            .collect();
        candidates.sort_by_key(|candidate| candidate.entity);
        candidates
    }

    fn narrow_phase(a: &Candidate, b: &Candidate) -> bool {
        circles_overlap(a.position, a.radius, b.position, b.radius)
    }

    fn resolve(world: &mut World, pairs: &[CollisionPair]) -> Vec<PendingDestruction> {
        let mut marked: HashSet<EntityId> = HashSet::new();
        let mut pending = Vec::new();

        for pair in pairs {
            // Both sides of a pair respond; an entity marked by an earlier
            // pair takes part in nothing further this pass
            if marked.contains(&pair.entity_a) || marked.contains(&pair.entity_b) {
                continue;
            }

            for (entity, other) in [(pair.entity_a, pair.entity_b), (pair.entity_b, pair.entity_a)] {
                if !world.contains(entity) || !world.contains(other) {
                    break;
                }
                let Some((other_layer, other_groups)) = Self::classification(world, other) else {
                    break;
                };

                for handler in Self::handlers(world, entity, other_layer, other_groups) {
                    if handler(entity, other, world) {
                        marked.insert(entity);
                        pending.push(PendingDestruction {
                            entity,
                            cause: cause_for(other_layer),
                            instigator: Some(instigator_for(world, other)),
                            score_value: world
                                .get_component::<ScoreValue>(entity)
                                .map_or(0, |score| score.0),
                        });
                        break;
                    }
                    if !world.contains(entity) || !world.contains(other) {
                        break;
                    }
                }
            }
        }
        pending
    }

    fn classification(world: &World, entity: EntityId) -> Option<(CollisionLayer, CollisionGroups)> {
        world
            .get_component::<ColliderComponent>(entity)
            .map(|collider| (collider.layer, collider.groups))
    }

    // Cloned out so handlers can borrow the world mutably
    fn handlers(
        world: &World,
        entity: EntityId,
        layer: CollisionLayer,
        groups: CollisionGroups,
    ) -> Vec<ResponseHandler> {
        world
            .get_component::<CollisionResponseComponent>(entity)
            .map(|responses| responses.handlers_for(layer, groups))
            .unwrap_or_default()
    }
}

/// Destruction cause implied by the layer of the entity that was hit
fn cause_for(layer: CollisionLayer) -> DestructionCause {
    match layer {
        CollisionLayer::PlayerProjectile | CollisionLayer::EnemyProjectile => DestructionCause::Projectile,
        CollisionLayer::Environment => DestructionCause::Environmental,
        CollisionLayer::Player | CollisionLayer::Enemy | CollisionLayer::Asteroid => DestructionCause::Collision,
        CollisionLayer::Pickup => DestructionCause::Other,
    }
}

/// Projectiles credit their shooter, everything else credits itself
fn instigator_for(world: &World, other: EntityId) -> EntityId {
    world
        .get_component::<Owner>(other)
        .map_or(other, |owner| owner.shooter)
}

impl System for CollisionSystem {
    fn name(&self) -> &str {
        "collision"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let report = self.process(ctx.world, ctx.events);
        if ctx.state.debug() && !report.pairs.is_empty() {
            log::debug!(
                "Collision pass: {} pairs, {} destroyed",
                report.pairs.len(),
                report.destroyed.len()
            );
        }
        Ok(())
    }
}
