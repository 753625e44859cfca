//! Asteroid field
//!
//! [`AsteroidFieldPlugin`] seeds the playfield with drifting asteroids when
//! the simulation starts and clears them, split fragments included, when it
//! stops. Asteroids spawned outside the plugin are left alone. Every asteroid
//! carries a collision response that breaks it into two smaller ones when a
//! player projectile lands the final hit.

use crate::components::{Asteroid, AsteroidSize, Projectile};
use crate::config::FieldConfig;
use nalgebra::Rotation2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_kernel::ecs::components::{
    BoundaryPolicy, ColliderComponent, CollisionResponseComponent, PhysicsComponent, ScoreValue,
    TransformComponent,
};
use sim_kernel::ecs::{EntityId, SystemError, World};
use sim_kernel::foundation::math::{direction, Vec2};
use sim_kernel::physics::{CollisionGroups, CollisionLayer};
use sim_kernel::plugin::{Plugin, SpawnTracker};
use sim_kernel::state::SimulationState;
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Everything needed to place one asteroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidSpawn {
    /// Size category
    pub size: AsteroidSize,
    /// Centre
    pub position: Vec2,
    /// Drift velocity
    pub velocity: Vec2,
    /// Spin in radians per second
    pub spin: f32,
}

/// Spawn a free-standing asteroid; neither it nor its fragments belong to a
/// field plugin
pub fn spawn_asteroid(world: &mut World, config: &Arc<FieldConfig>, spawn: AsteroidSpawn) -> EntityId {
    AsteroidFactory::new(Arc::clone(config)).spawn(world, spawn)
}

/// Tracker shared by a field plugin and the split responses of its asteroids
pub type SharedTracker = Arc<Mutex<SpawnTracker>>;

fn lock(tracker: &SharedTracker) -> MutexGuard<'_, SpawnTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builds asteroids and their split responses
///
/// An owned factory records every asteroid it spawns, split fragments
/// included, in its owner's tracker while that tracker is started.
#[derive(Clone)]
pub struct AsteroidFactory {
    config: Arc<FieldConfig>,
    owner: Option<SharedTracker>,
}

impl AsteroidFactory {
    /// Factory whose asteroids belong to nobody
    pub fn new(config: Arc<FieldConfig>) -> Self {
        Self { config, owner: None }
    }

    /// Factory recording its asteroids in `owner`
    pub fn owned(config: Arc<FieldConfig>, owner: SharedTracker) -> Self {
        Self {
            config,
            owner: Some(owner),
        }
    }

    /// Field settings
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Spawn one asteroid with its collider, score value and split response
    pub fn spawn(&self, world: &mut World, spawn: AsteroidSpawn) -> EntityId {
        let radius = self.config.base_radius * spawn.size.scale_factor();
        let entity = world
            .spawn()
            .with(TransformComponent::new(spawn.position, radius))
            .with(
                PhysicsComponent::default()
                    .with_velocity(spawn.velocity)
                    .with_angular_velocity(spawn.spin),
            )
            .with(
                ColliderComponent::new(CollisionLayer::Asteroid)
                    .with_groups(CollisionGroups::HOSTILE | CollisionGroups::DESTRUCTIBLE),
            )
            .with(self.response())
            .with(Asteroid::new(spawn.size))
            .with(ScoreValue(spawn.size.points()))
            .with(BoundaryPolicy::Wrap)
            .id();

        if let Some(owner) = &self.owner {
            let mut tracker = lock(owner);
            if tracker.is_started() {
                tracker.track(entity);
            }
        }
        entity
    }

    /// Response shared by every asteroid: damage from player projectiles,
    /// split when broken
    pub fn response(&self) -> CollisionResponseComponent {
        let factory = self.clone();
        CollisionResponseComponent::new().on_layer(CollisionLayer::PlayerProjectile, move |me, other, world| {
            let damage = world
                .get_component::<Projectile>(other)
                .map_or(1, |projectile| projectile.damage);
            let broken = world
                .get_component_mut::<Asteroid>(me)
                .is_some_and(|asteroid| asteroid.take_damage(damage));
            if broken {
                factory.split(world, me);
            }
            broken
        })
    }

    /// Spawn the two children of a broken asteroid; small asteroids leave none
    pub fn split(&self, world: &mut World, parent: EntityId) -> Vec<EntityId> {
        let Some(next) = world
            .get_component::<Asteroid>(parent)
            .and_then(|asteroid| asteroid.size.split_into())
        else {
            return Vec::new();
        };
        let Some((position, heading)) = world
            .get_component::<TransformComponent>(parent)
            .map(|transform| (transform.position, transform.rotation))
        else {
            return Vec::new();
        };

        let mut velocity = sim_kernel::physics::velocity(world, parent);
        if velocity == Vec2::zeros() {
            velocity = direction(heading) * self.config.min_speed;
        }
        let spin = sim_kernel::physics::angular_velocity(world, parent);

        [-1.0_f32, 1.0]
            .into_iter()
            .map(|side| {
                let turn = Rotation2::new(side * self.config.split_angle);
                let spawn = AsteroidSpawn {
                    size: next,
                    position,
                    velocity: turn * velocity * self.config.split_speedup,
                    spin: spin * -side,
                };
                self.spawn(world, spawn)
            })
            .collect()
    }
}

/// Plugin owning the asteroid field
pub struct AsteroidFieldPlugin {
    factory: AsteroidFactory,
    rng: StdRng,
    tracker: SharedTracker,
}

impl AsteroidFieldPlugin {
    /// Start order among plugins
    pub const PRIORITY: i32 = 0;

    /// Create the plugin; seeded from `config.seed` when present
    pub fn new(config: FieldConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let tracker = SharedTracker::default();
        Self {
            factory: AsteroidFactory::owned(Arc::new(config), Arc::clone(&tracker)),
            rng,
            tracker,
        }
    }

    /// Field settings
    pub fn config(&self) -> &FieldConfig {
        self.factory.config()
    }

    /// Factory spawning asteroids owned by this field
    pub fn factory(&self) -> &AsteroidFactory {
        &self.factory
    }

    /// Whether the field has been seeded
    pub fn is_started(&self) -> bool {
        lock(&self.tracker).is_started()
    }

    /// Asteroids this field spawned since the last start, fragments included
    pub fn spawned(&self) -> Vec<EntityId> {
        lock(&self.tracker).spawned().to_vec()
    }

    fn random_spawn(&mut self, width: f32, height: f32) -> AsteroidSpawn {
        let centre = Vec2::new(width * 0.5, height * 0.5);
        let config = Arc::clone(&self.factory.config);
        let reach = config.safe_radius.min(width.min(height) * 0.45);

        // Pick a point outside the safe zone around the centre
        let angle = self.rng.gen_range(0.0..TAU);
        let span = (width.max(height) * 0.5 - reach).max(1.0);
        let distance = reach + self.rng.gen_range(0.0..span);
        let position = centre + direction(angle) * distance;

        let (low, high) = (config.min_speed, config.max_speed.max(config.min_speed));
        let speed = if high > low { self.rng.gen_range(low..high) } else { low };
        let heading = self.rng.gen_range(0.0..TAU);
        let spin = if config.max_spin > 0.0 {
            self.rng.gen_range(-config.max_spin..config.max_spin)
        } else {
            0.0
        };

        AsteroidSpawn {
            size: AsteroidSize::Large,
            position,
            velocity: direction(heading) * speed,
            spin,
        }
    }
}

impl Plugin for AsteroidFieldPlugin {
    fn name(&self) -> &str {
        "asteroid_field"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn start(&mut self, state: Option<&SimulationState>, world: Option<&mut World>) -> Result<(), SystemError> {
        let (Some(state), Some(world)) = (state, world) else {
            log::debug!("Asteroid field start skipped: state or world unavailable");
            return Ok(());
        };
        let begun = lock(&self.tracker).begin();
        if !begun {
            return Ok(());
        }

        for _ in 0..self.config().asteroid_count {
            let spawn = self.random_spawn(state.width(), state.height());
            self.factory.spawn(world, spawn);
        }
        log::info!("Seeded {} asteroids", lock(&self.tracker).spawned().len());
        Ok(())
    }

    fn stop(&mut self, _state: Option<&SimulationState>, world: Option<&mut World>) -> Result<(), SystemError> {
        let Some(world) = world else {
            log::debug!("Asteroid field stop skipped: world unavailable");
            return Ok(());
        };
        let mut tracker = lock(&self.tracker);
        if !tracker.is_started() {
            return Ok(());
        }

        let removed = tracker.release(world);
        log::info!("Cleared asteroid field ({} asteroids)", removed);
        Ok(())
    }
}
