//! # Lifecycle Scenario Tests
//!
//! Drives the effect manager tick by tick the way a game loop does.

use spectra_core::{EntityId, Transform, Vec2};
use spectra_rendering::effects::{EffectKind, EffectManager, Phase, SpawnRequest, StrokeBuffer};
use spectra_rendering::integration::EffectRequestQueue;
use spectra_shared::{FxConfig, PoolCapacities, StyleTable};

fn manager_with_fog_capacity(fog: usize) -> EffectManager {
    let config = FxConfig {
        pools: PoolCapacities {
            fog,
            ..PoolCapacities::default()
        },
        ..FxConfig::default()
    };
    EffectManager::new(config, StyleTable::new())
}

/// Test: a 100-tick effect fades in over 20 ticks, holds, fades out from
/// tick 70 and is gone at tick 100.
#[test]
fn test_opacity_envelope_over_lifetime() {
    let mut fx = EffectManager::with_defaults();
    let handle = fx.spawn(SpawnRequest::new(EffectKind::Death, Vec2::new(50.0, 50.0)).with_lifetime(100));
    assert_eq!(fx.phase(handle), Some(Phase::FadeIn));

    let expected = [(10, 0.5, Phase::FadeIn), (50, 1.0, Phase::Sustain), (85, 0.5, Phase::FadeOut)];
    let mut ticks = 0;
    for (at, opacity, phase) in expected {
        while ticks < at {
            fx.tick();
            ticks += 1;
        }
        let snapshot = fx.snapshot(handle, 1.0).unwrap();
        assert!(
            (snapshot.opacity - opacity).abs() < 1e-4,
            "tick {at}: opacity {} != {opacity}",
            snapshot.opacity
        );
        assert_eq!(snapshot.phase, phase);
    }

    while ticks < 99 {
        fx.tick();
        ticks += 1;
    }
    assert!(fx.is_alive(handle));
    assert_eq!(fx.tick().released, 1);
    assert!(!fx.is_alive(handle));
    assert_eq!(fx.phase(handle), None);
}

/// Test: phases never go backwards, whatever the sub-tick.
#[test]
fn test_phase_is_monotone() {
    let mut fx = EffectManager::with_defaults();
    let handle = fx.spawn(SpawnRequest::new(EffectKind::Aura, Vec2::new(5.0, 5.0)).with_lifetime(37));

    let mut last = Phase::Spawned;
    while let Some(phase) = fx.phase(handle) {
        assert!(phase >= last);
        last = phase;
        fx.tick();
    }
    assert_eq!(last, Phase::FadeOut);
}

/// Test: with capacity 3, spawning A, B, C, D evicts A and keeps B, C, D.
#[test]
fn test_eviction_order() {
    let mut fx = manager_with_fog_capacity(3);
    let spawn = |fx: &mut EffectManager, x: f32| {
        fx.spawn(SpawnRequest::new(EffectKind::Fog, Vec2::new(x, 1.0)))
    };
    let a = spawn(&mut fx, 1.0);
    let b = spawn(&mut fx, 2.0);
    let c = spawn(&mut fx, 3.0);
    let d = spawn(&mut fx, 4.0);

    assert!(!fx.is_alive(a));
    assert!(fx.is_alive(b) && fx.is_alive(c) && fx.is_alive(d));

    let e = spawn(&mut fx, 5.0);
    assert!(!fx.is_alive(b));
    assert!(fx.is_alive(e));
    assert_eq!(fx.stats().evicted, 2);
}

/// Test: a force-expired effect is drawn this frame at most, then released.
#[test]
fn test_force_expire_releases_next_tick() {
    let mut fx = EffectManager::with_defaults();
    let handle = fx.spawn(SpawnRequest::new(EffectKind::Telegraph, Vec2::new(5.0, 5.0)));
    for _ in 0..20 {
        fx.tick();
    }
    assert!(fx.force_expire(handle));
    assert!(fx.is_alive(handle));
    fx.tick();
    assert!(!fx.is_alive(handle));
    assert!(!fx.force_expire(handle));
}

/// Test: a moving effect interpolates between ticks and slows down.
#[test]
fn test_velocity_is_damped() {
    let mut fx = EffectManager::with_defaults();
    let handle = fx.spawn(
        SpawnRequest::new(EffectKind::Fog, Vec2::new(10.0, 10.0))
            .with_velocity(Vec2::new(4.0, 0.0))
            .with_lifetime(50),
    );
    fx.tick();
    let first = fx.snapshot(handle, 1.0).unwrap().transform.position;
    let halfway = fx.snapshot(handle, 0.5).unwrap().transform.position;
    assert_eq!(first, Vec2::new(14.0, 10.0));
    assert_eq!(halfway, Vec2::new(12.0, 10.0));

    fx.tick();
    let second = fx.snapshot(handle, 1.0).unwrap().transform.position;
    assert!(second.x - first.x < 4.0);
}

/// Test: requests posted from worker threads land on the next apply.
#[test]
fn test_requests_from_worker_threads() {
    let mut fx = EffectManager::with_defaults();
    let queue = EffectRequestQueue::from_config(fx.config());
    let boss = EntityId(42);
    fx.spawn(SpawnRequest::new(EffectKind::Aura, Vec2::new(9.0, 9.0)).attached_to(boss));

    std::thread::scope(|scope| {
        let sender = queue.sender();
        scope.spawn(move || {
            for i in 0..8 {
                sender.spawn(SpawnRequest::new(EffectKind::Death, Vec2::new(1.0 + i as f32, 2.0)));
            }
        });
        let sender = queue.sender();
        scope.spawn(move || {
            sender.expire_attached(boss);
        });
    });

    assert_eq!(fx.apply_requests(&queue), 9);
    fx.tick();
    assert_eq!(fx.active_count(EffectKind::Death), 8);
    assert_eq!(fx.active_count(EffectKind::Aura), 0);
}

/// Test: trails follow pushed points and drop old ones.
#[test]
fn test_trail_follows_weapon() {
    let mut fx = EffectManager::with_defaults();
    let trail = fx.spawn(SpawnRequest::new(EffectKind::Trail, Vec2::new(1.0, 1.0)).with_lifetime(200));
    for i in 1..=10 {
        assert!(fx.push_trail_point(trail, Transform::at(Vec2::new(1.0 + i as f32 * 3.0, 1.0))));
        fx.tick();
    }
    let snapshot = fx.snapshot(trail, 1.0).unwrap();
    assert_eq!(snapshot.transform.position, Vec2::new(31.0, 1.0));
}

/// Test: between ticks, a trail's head sits between the last two recorded
/// points, and the stroke starts at that interpolated head.
#[test]
fn test_trail_head_interpolates_between_ticks() {
    let mut fx = EffectManager::with_defaults();
    let trail = fx.spawn(SpawnRequest::new(EffectKind::Trail, Vec2::new(1.0, 1.0)));

    fx.push_trail_point(trail, Transform::at(Vec2::new(10.0, 1.0)));
    fx.tick();
    let half = fx.snapshot(trail, 0.5).unwrap().transform.position;
    assert_eq!(half, Vec2::new(5.5, 1.0));

    fx.push_trail_point(trail, Transform::at(Vec2::new(20.0, 1.0)));
    fx.tick();
    let half = fx.snapshot(trail, 0.5).unwrap().transform.position;
    assert_eq!(half, Vec2::new(15.0, 1.0));

    let none = |_: EntityId| -> Option<Transform> { None };
    let mut strokes = StrokeBuffer::with_capacity(64, 4);
    fx.collect_strokes(0.5, &none, &mut strokes);
    let (points, _) = strokes.iter().next().unwrap();
    assert_eq!(
        points,
        &[
            Vec2::new(15.0, 1.0),
            Vec2::new(20.0, 1.0),
            Vec2::new(10.0, 1.0),
            Vec2::new(1.0, 1.0)
        ]
    );
}
