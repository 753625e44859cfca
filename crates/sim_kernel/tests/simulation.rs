//! Whole-kernel scenarios driven through `Simulation::frame`

use approx::assert_relative_eq;
use sim_kernel::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

const DT: f32 = 1.0 / 60.0;

fn simulation() -> Simulation {
    Simulation::builder().with_default_systems().build().unwrap()
}

#[test]
fn impulse_then_fixed_step_then_motion() {
    let mut sim = simulation();
    let start = Vec2::new(100.0, 100.0);
    let ship = sim
        .world_mut()
        .spawn()
        .with(TransformComponent::new(start, 1.0))
        .with(PhysicsComponent::new(1.0).unwrap().with_drag(1.0).unwrap())
        .id();

    assert!(sim_kernel::physics::apply_impulse(sim.world_mut(), ship, Vec2::new(100.0, 0.0)));

    // Update runs before the fixed step, so this frame only integrates velocity
    let stats = sim.frame(DT);
    assert_eq!(stats.fixed_steps, 1);
    assert_eq!(sim_kernel::physics::velocity(sim.world(), ship), Vec2::new(100.0, 0.0));
    let position = sim.world().get_component::<TransformComponent>(ship).unwrap().position;
    assert_eq!(position, start);

    // Next Update pass moves the body
    sim.frame(DT);
    let position = sim.world().get_component::<TransformComponent>(ship).unwrap().position;
    assert_relative_eq!(position.x - start.x, 100.0 / 60.0, epsilon = 1e-4);
    assert_relative_eq!(position.y, start.y);
}

#[test]
fn score_listener_accumulates_projectile_kills() {
    let sim = simulation();
    let total = Arc::new(AtomicU32::new(0));
    let sink = Arc::clone(&total);
    sim.events().subscribe_fn(move |event: &EntityDestroyed| {
        if event.cause == DestructionCause::Projectile {
            sink.fetch_add(event.score_value, Ordering::SeqCst);
        }
        Ok(())
    });

    let before = total.load(Ordering::SeqCst);
    let mut world = World::new();
    let rock = world.create();
    let delivery = sim.events().publish(EntityDestroyed {
        entity: rock,
        cause: DestructionCause::Projectile,
        instigator: None,
        score_value: 100,
    });

    assert_eq!(delivery.delivered, 1);
    assert_eq!(total.load(Ordering::SeqCst) - before, 100);
}

struct Stamp {
    label: &'static str,
    priority: i32,
    log: Arc<Mutex<Vec<(u64, &'static str)>>>,
}

impl System for Stamp {
    fn name(&self) -> &str {
        self.label
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        self.log.lock().unwrap().push((ctx.state.frame(), self.label));
        Ok(())
    }
}

#[test]
fn lower_priority_runs_first_every_frame() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulation::builder()
        .with_update(Stamp { label: "late", priority: 100, log: Arc::clone(&log) })
        .with_update(Stamp { label: "early", priority: 10, log: Arc::clone(&log) })
        .build()
        .unwrap();

    for _ in 0..5 {
        sim.frame(DT);
    }

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 10);
    for frame in log.chunks(2) {
        assert_eq!(frame[0].0, frame[1].0);
        assert_eq!(frame[0].1, "early");
        assert_eq!(frame[1].1, "late");
    }
}

struct Faulty;

impl System for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn run(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        Err(SystemError::failed("faulty", "always fails"))
    }
}

#[test]
fn failing_system_does_not_stop_the_frame() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulation::builder()
        .with_update(Faulty)
        .with_update(Stamp { label: "after", priority: 5, log: Arc::clone(&log) })
        .build()
        .unwrap();

    let stats = sim.frame(DT);
    assert_eq!(stats.failures.len(), 1);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn bullet_destroys_asteroid_after_the_pass() {
    let mut sim = simulation();
    let world = sim.world_mut();
    let ship = world.create();
    let bullet = world
        .spawn()
        .with(TransformComponent::new(Vec2::new(300.0, 300.0), 2.0))
        .with(ColliderComponent::new(CollisionLayer::PlayerProjectile))
        .with(Owner { shooter: ship })
        .with(CollisionResponseComponent::new().on_layer(CollisionLayer::Asteroid, |_, _, _| true))
        .id();
    let rock = world
        .spawn()
        .with(TransformComponent::new(Vec2::new(305.0, 300.0), 10.0))
        .with(ColliderComponent::new(CollisionLayer::Asteroid))
        .with(ScoreValue(20))
        .with(CollisionResponseComponent::new().on_layer(CollisionLayer::PlayerProjectile, |_, _, _| true))
        .id();

    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&destroyed);
    sim.events().subscribe_fn(move |event: &EntityDestroyed| {
        sink.lock().unwrap().push(event.clone());
        Ok(())
    });

    sim.frame(DT);

    assert!(!sim.world().contains(bullet));
    assert!(!sim.world().contains(rock));
    let destroyed = destroyed.lock().unwrap();
    assert_eq!(destroyed.len(), 2);
    assert_eq!(destroyed[0].entity, bullet);
    assert_eq!(destroyed[0].cause, DestructionCause::Collision);
    assert_eq!(destroyed[1].entity, rock);
    assert_eq!(destroyed[1].cause, DestructionCause::Projectile);
    assert_eq!(destroyed[1].instigator, Some(ship));
    assert_eq!(destroyed[1].score_value, 20);
}

#[test]
fn bullets_expire_and_leave_the_playfield() {
    let mut sim = simulation();
    let now = sim.state().elapsed();
    let world = sim.world_mut();
    let expiring = world
        .spawn()
        .with(TransformComponent::new(Vec2::new(50.0, 50.0), 1.0))
        .with(Lifetime::new(now, 0.05))
        .id();
    let escaping = world
        .spawn()
        .with(TransformComponent::new(Vec2::new(-20.0, 50.0), 1.0))
        .with(BoundaryPolicy::Destroy { margin: 10.0 })
        .id();
    let wrapping = world
        .spawn()
        .with(TransformComponent::new(Vec2::new(-20.0, 50.0), 1.0))
        .with(BoundaryPolicy::Wrap)
        .id();

    for _ in 0..4 {
        sim.frame(DT);
    }

    assert!(!sim.world().contains(expiring));
    assert!(!sim.world().contains(escaping));
    let wrapped = sim.world().get_component::<TransformComponent>(wrapping).unwrap();
    assert!(wrapped.position.x > 1000.0);
}

#[test]
fn resting_body_falls_asleep_and_wakes_on_impulse() {
    let mut sim = simulation();
    let rock = sim
        .world_mut()
        .spawn()
        .with(TransformComponent::new(Vec2::new(200.0, 200.0), 5.0))
        .with(PhysicsComponent::default().with_velocity(Vec2::new(0.1, 0.0)))
        .id();

    for _ in 0..60 {
        sim.frame(DT);
    }
    assert!(sim_kernel::physics::is_sleeping(sim.world(), rock));
    assert_eq!(sim_kernel::physics::velocity(sim.world(), rock), Vec2::zeros());

    assert!(!sim_kernel::physics::apply_force(sim.world_mut(), rock, Vec2::new(10.0, 0.0)));
    assert!(sim_kernel::physics::apply_impulse(sim.world_mut(), rock, Vec2::new(10.0, 0.0)));
    sim.frame(DT);
    assert!(!sim_kernel::physics::is_sleeping(sim.world(), rock));
    assert_relative_eq!(sim_kernel::physics::velocity(sim.world(), rock).x, 10.0, epsilon = 1e-5);
}
