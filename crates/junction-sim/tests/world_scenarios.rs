//! Scenario tests for the intersection world
//!
//! These drive the world through many ticks and check the invariants that
//! hold regardless of spawn randomness.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use std::collections::HashSet;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use junction_core::{Axis, Direction, EntityKind, Phase, SimulationConfig, State};
use junction_sim::{Entity, World};

/// Config with spawning disabled, for hand-placed scenarios
fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        spawn_rate: 0.0,
        seed: Some(1),
        ..SimulationConfig::default()
    }
}

/// Config that spawns often enough to build queues quickly
fn busy_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        spawn_rate: 12.0,
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

/// Entities held at a red stop line under `phase`
fn expected_waiting(world: &World, phase: Phase) -> usize {
    world
        .entities()
        .iter()
        .filter(|e| {
            phase.is_red_for(e.axis())
                && world.bands().contains(e.direction, e.leading_edge())
        })
        .count()
}

fn random_phase(rng: &mut StdRng) -> Phase {
    if rng.gen_bool(0.5) {
        Phase::NorthSouthGreen
    } else {
        Phase::EastWestGreen
    }
}

#[test]
fn test_spawned_entities_never_overlap() {
    let mut world = World::new(busy_config(42)).unwrap();
    let mut phases = StdRng::seed_from_u64(5);
    let mut seen = HashSet::new();

    for _ in 0..3000 {
        world.step(random_phase(&mut phases));

        let fresh: Vec<&Entity> = world
            .entities()
            .iter()
            .filter(|e| !seen.contains(&e.id))
            .collect();
        for entity in &fresh {
            for other in world.entities() {
                assert!(
                    other.id == entity.id || !entity.rect.intersects(&other.rect),
                    "spawned {} overlaps {}",
                    entity.id,
                    other.id
                );
            }
        }
        seen.extend(fresh.iter().map(|e| e.id));
    }

    assert!(world.total_spawned() > 0);
}

#[test]
fn test_reward_matches_held_entity_count() {
    let mut world = World::new(busy_config(9)).unwrap();
    let mut phases = StdRng::seed_from_u64(17);
    let mut saw_queue = false;

    for _ in 0..3000 {
        let outcome = world.step(random_phase(&mut phases));
        let waiting = expected_waiting(&world, world.phase());

        assert!(outcome.reward <= 0.0);
        assert_eq!(outcome.reward, -(waiting as f64));
        assert_eq!(world.currently_waiting(), waiting);
        saw_queue |= waiting > 0;
    }

    assert!(saw_queue, "scenario never built a queue");
}

#[test]
fn test_state_counts_live_entities_by_axis() {
    let mut world = World::new(busy_config(3)).unwrap();

    for tick in 0..2000 {
        let phase = if (tick / 200) % 2 == 0 {
            Phase::NorthSouthGreen
        } else {
            Phase::EastWestGreen
        };
        let outcome = world.step(phase);

        let north_south = world
            .entities()
            .iter()
            .filter(|e| e.axis() == Axis::NorthSouth)
            .count();
        let east_west = world
            .entities()
            .iter()
            .filter(|e| e.axis() == Axis::EastWest)
            .count();

        assert_eq!(outcome.state, State::new(north_south, east_west));
        assert_eq!(outcome.state.total(), world.entities().len());
        assert_eq!(world.get_state(), outcome.state);
    }
}

#[test]
fn test_zero_spawn_rate_stays_empty() {
    let mut world = World::new(quiet_config()).unwrap();

    for tick in 0..5000 {
        let outcome = if tick % 2 == 0 {
            world.step(Phase::NorthSouthGreen)
        } else {
            world.tick();
            world.step(Phase::EastWestGreen)
        };
        assert_eq!(outcome.state, State::new(0, 0));
        assert_eq!(outcome.reward, 0.0);
    }

    assert_eq!(world.total_spawned(), 0);
}

#[test]
fn test_entity_halts_inside_red_stop_band() {
    let mut world = World::new(quiet_config()).unwrap();
    assert_eq!(world.bands().east, [340.0, 350.0]);

    // Eastbound, right edge starts at 300
    world.place(Direction::East, 280.0, 370.0).unwrap();

    for _ in 0..100 {
        world.step(Phase::NorthSouthGreen);
    }

    let held = world.entities()[0].rect;
    assert!((340.0..=350.0).contains(&held.right()));
    assert_eq!(held.right(), 340.0);
    assert_eq!(world.currently_waiting(), 1);

    for _ in 0..50 {
        let outcome = world.step(Phase::NorthSouthGreen);
        assert_eq!(world.entities()[0].rect, held);
        assert_eq!(outcome.reward, -1.0);
    }

    world.step(Phase::EastWestGreen);
    assert_eq!(world.entities()[0].rect.right(), 342.0);
    assert_eq!(world.currently_waiting(), 0);
}

#[test]
fn test_follower_holds_while_leader_moves() {
    let mut world = World::new(quiet_config()).unwrap();

    let leader = world.place(Direction::East, 200.0, 370.0).unwrap();
    // Two units behind: the follower's sensor reaches five
    let follower = world.place(Direction::East, 178.0, 370.0).unwrap();

    world.step(Phase::EastWestGreen);

    let by_id = |id| {
        world
            .entities()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.rect.x)
            .unwrap()
    };
    assert_eq!(by_id(leader), 202.0);
    assert_eq!(by_id(follower), 178.0);
}

#[test]
fn test_queue_forms_behind_red_light() {
    let mut world = World::new(quiet_config()).unwrap();
    world.place(Direction::South, 420.0, 200.0).unwrap();
    world.place(Direction::South, 420.0, 150.0).unwrap();
    world.place(Direction::South, 420.0, 100.0).unwrap();

    for _ in 0..300 {
        world.step(Phase::EastWestGreen);
    }

    let mut tops: Vec<f64> = world.entities().iter().map(|e| e.rect.top()).collect();
    tops.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rects: Vec<_> = world.entities().iter().map(|e| e.rect).collect();
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "queued entities overlap");
        }
    }
    // Only the head of the queue sits in the band
    assert_eq!(world.currently_waiting(), 1);
    assert!(tops.windows(2).all(|w| w[1] - w[0] >= 20.0));
}

#[test]
fn test_trains_follow_the_same_rules() {
    let config = SimulationConfig {
        entity_kind: EntityKind::Train,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    world.place(Direction::West, 600.0, 420.0).unwrap();

    for _ in 0..200 {
        world.step(Phase::NorthSouthGreen);
    }

    let train = &world.entities()[0];
    assert_eq!(train.kind, EntityKind::Train);
    assert_eq!(train.rect.width, 60.0);
    let edge = train.leading_edge();
    assert!(world.bands().contains(Direction::West, edge));
    assert_eq!(world.currently_waiting(), 1);
}

#[test]
fn test_manual_tick_cycles_phases() {
    let config = SimulationConfig {
        manual_phase_ticks: 30,
        ..busy_config(8)
    };
    let mut world = World::new(config).unwrap();
    let mut flips = 0;
    let mut last = world.phase();

    for _ in 0..300 {
        // The waiting count is taken before a flip, so it follows the
        // phase that was active while entities moved
        let before = world.phase();
        world.tick();
        assert_eq!(world.currently_waiting(), expected_waiting(&world, before));
        if world.phase() != last {
            flips += 1;
            last = world.phase();
        }
    }

    assert_eq!(flips, 10);
}

#[test]
fn test_same_seed_reproduces_run() {
    let run = |seed| {
        let mut world = World::new(busy_config(seed)).unwrap();
        for tick in 0..1500 {
            let phase = if tick % 120 < 60 {
                Phase::NorthSouthGreen
            } else {
                Phase::EastWestGreen
            };
            world.step(phase);
        }
        world
            .entities()
            .iter()
            .map(|e| (e.id, e.direction, e.rect.x, e.rect.y))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(21), run(21));
}

#[test]
fn test_injected_rng_picks_lane() {
    let config = SimulationConfig {
        frame_rate: 1,
        spawn_rate: 1.0,
        ..SimulationConfig::default()
    };
    // An all-zero stream always selects the first lane, which enters from the north
    let mut world = World::with_rng(config, StepRng::new(0, 0)).unwrap();
    world.step(Phase::NorthSouthGreen);

    assert_eq!(world.total_spawned(), 1);
    assert_eq!(world.entities()[0].direction, Direction::South);
}
