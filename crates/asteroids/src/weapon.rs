//! Weapons
//!
//! A [`WeaponConfig`] describes one volley; [`WeaponConfig::fire`] spawns its
//! projectiles in front of the shooter. Presets cover the common cases and
//! [`WeaponConfigBuilder`] assembles anything else.

use crate::components::Projectile;
use serde::{Deserialize, Serialize};
use sim_kernel::ecs::components::{
    BoundaryPolicy, ColliderComponent, CollisionResponseComponent, Lifetime, Owner,
    PhysicsComponent, TransformComponent,
};
use sim_kernel::ecs::{EntityId, World};
use sim_kernel::foundation::math::{direction, Vec2};
use sim_kernel::physics::{CollisionGroups, CollisionLayer};

/// Projectile parameters for one weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Display name
    pub name: String,

    /// Muzzle speed
    pub speed: f32,

    /// Seconds before a projectile expires
    pub lifetime: f32,

    /// Projectile collision radius
    pub radius: f32,

    /// Damage per projectile
    pub damage: u32,

    /// Angle in radians between neighbouring projectiles of one volley
    pub spread: f32,

    /// Projectiles per volley
    pub count: u32,

    /// Distance past the playfield edge before a projectile is removed
    pub margin: f32,

    /// Add the shooter's velocity to the muzzle velocity
    pub inherit_velocity: bool,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self::blaster()
    }
}

impl WeaponConfig {
    /// Single straight shot
    pub fn blaster() -> Self {
        Self {
            name: "blaster".to_string(),
            speed: 600.0,
            lifetime: 3.0,
            radius: 2.0,
            damage: 1,
            spread: 0.0,
            count: 1,
            margin: 20.0,
            inherit_velocity: true,
        }
    }

    /// Three-way fan of weaker shots
    pub fn scatter() -> Self {
        WeaponConfigBuilder::new("scatter")
            .speed(500.0)
            .lifetime(1.5)
            .spread(0.2)
            .count(3)
            .build()
    }

    /// Slow, heavy single shot
    pub fn cannon() -> Self {
        WeaponConfigBuilder::new("cannon")
            .speed(350.0)
            .radius(5.0)
            .damage(3)
            .build()
    }

    /// Spawn one volley from `shooter` at simulation time `now`
    ///
    /// The shooter's collider layer picks the projectile side: enemies fire
    /// enemy projectiles, everything else fires player projectiles. Returns
    /// nothing if the shooter has no transform.
    pub fn fire(&self, world: &mut World, shooter: EntityId, now: f32) -> Vec<EntityId> {
        let Some((origin, heading, shooter_radius)) = world
            .get_component::<TransformComponent>(shooter)
            .map(|transform| (transform.position, transform.rotation, transform.radius))
        else {
            return Vec::new();
        };
        let base_velocity = if self.inherit_velocity {
            sim_kernel::physics::velocity(world, shooter)
        } else {
            Vec2::zeros()
        };
        let hostile = world
            .get_component::<ColliderComponent>(shooter)
            .is_some_and(|collider| collider.layer == CollisionLayer::Enemy);

        let count = self.count.max(1);
        let centre = (count - 1) as f32 * 0.5;
        (0..count)
            .map(|i| {
                let angle = heading + (i as f32 - centre) * self.spread;
                let aim = direction(angle);
                let position = origin + aim * (shooter_radius + self.radius);
                self.spawn_projectile(world, shooter, position, angle, base_velocity + aim * self.speed, hostile, now)
            })
            .collect()
    }

    fn spawn_projectile(
        &self,
        world: &mut World,
        shooter: EntityId,
        position: Vec2,
        angle: f32,
        velocity: Vec2,
        hostile: bool,
        now: f32,
    ) -> EntityId {
        let (layer, groups, targets) = if hostile {
            (
                CollisionLayer::EnemyProjectile,
                CollisionGroups::HOSTILE,
                [CollisionLayer::Player, CollisionLayer::Asteroid, CollisionLayer::Environment],
            )
        } else {
            (
                CollisionLayer::PlayerProjectile,
                CollisionGroups::FRIENDLY,
                [CollisionLayer::Enemy, CollisionLayer::Asteroid, CollisionLayer::Environment],
            )
        };

        let response = targets
            .into_iter()
            .fold(CollisionResponseComponent::new(), |response, target| {
                response.on_layer(target, |_, _, _| true)
            });

        world
            .spawn()
            .with(TransformComponent::new(position, self.radius).with_rotation(angle))
            .with(PhysicsComponent::kinematic().with_velocity(velocity))
            .with(ColliderComponent::new(layer).with_groups(groups))
            .with(response)
            .with(Projectile { damage: self.damage })
            .with(Owner { shooter })
            .with(Lifetime::new(now, self.lifetime))
            .with(BoundaryPolicy::Destroy { margin: self.margin })
            .id()
    }
}

/// Fluent builder for [`WeaponConfig`], starting from the blaster preset
#[derive(Debug, Clone)]
pub struct WeaponConfigBuilder {
    config: WeaponConfig,
}

impl WeaponConfigBuilder {
    /// Start a named weapon
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: WeaponConfig {
                name: name.into(),
                ..WeaponConfig::blaster()
            },
        }
    }

    /// Muzzle speed
    pub fn speed(mut self, speed: f32) -> Self {
        self.config.speed = speed.max(0.0);
        self
    }

    /// Projectile lifetime in seconds
    pub fn lifetime(mut self, lifetime: f32) -> Self {
        self.config.lifetime = lifetime;
        self
    }

    /// Projectile radius
    pub fn radius(mut self, radius: f32) -> Self {
        self.config.radius = radius.max(0.0);
        self
    }

    /// Damage per projectile
    pub fn damage(mut self, damage: u32) -> Self {
        self.config.damage = damage;
        self
    }

    /// Angle between neighbouring projectiles
    pub fn spread(mut self, spread: f32) -> Self {
        self.config.spread = spread;
        self
    }

    /// Projectiles per volley (at least one)
    pub fn count(mut self, count: u32) -> Self {
        self.config.count = count.max(1);
        self
    }

    /// Out-of-bounds margin
    pub fn margin(mut self, margin: f32) -> Self {
        self.config.margin = margin;
        self
    }

    /// Whether the shooter's velocity carries over
    pub fn inherit_velocity(mut self, inherit: bool) -> Self {
        self.config.inherit_velocity = inherit;
        self
    }

    /// Finish
    pub fn build(self) -> WeaponConfig {
        self.config
    }
}
