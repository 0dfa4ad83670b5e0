use std::time::Duration;

use gridfire_core::{AgentBehaviorState, Command, Event, GameOutcome};
use gridfire_world::{apply, query, SpawnConfig, World, WorldConfig, WorldError};

fn placements(world: &World) -> Vec<(gridfire_core::ArchetypeKind, gridfire_core::CellCoord)> {
    query::agent_view(world)
        .iter()
        .map(|agent| (agent.archetype, agent.cell()))
        .collect()
}

#[test]
fn same_seed_builds_identical_worlds() {
    let first = World::new(WorldConfig::default()).expect("first world");
    let second = World::new(WorldConfig::default()).expect("second world");

    assert_eq!(placements(&first), placements(&second));
}

#[test]
fn reset_rebuilds_a_fresh_game() {
    let mut world = World::new(WorldConfig::default()).expect("world");
    let before = placements(&world);
    let first = query::agent_view(&world)
        .iter()
        .next()
        .map(|agent| agent.id)
        .expect("agent");

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::DamageAgent {
            agent: first,
            amount: 1_000,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut events,
    );
    assert!(events.contains(&Event::AgentDied { agent: first }));

    world.reset().expect("reset");

    let view = query::agent_view(&world);
    assert_eq!(view.iter().count(), before.len());
    assert!(view
        .iter()
        .all(|agent| agent.alive && agent.behavior == AgentBehaviorState::Idle));
    assert_eq!(query::tick_index(&world), 0);
    assert_eq!(query::outcome(&world), None);
}

#[test]
fn killing_every_agent_wins_the_level() {
    let mut world = World::new(WorldConfig::default()).expect("world");
    let ids: Vec<_> = query::agent_view(&world).iter().map(|agent| agent.id).collect();
    let mut events = Vec::new();

    for agent in ids {
        apply(
            &mut world,
            Command::DamageAgent {
                agent,
                amount: 1_000,
            },
            &mut events,
        );
    }

    let cleared = events
        .iter()
        .filter(|event| **event == Event::LevelCleared)
        .count();
    assert_eq!(cleared, 1);
    assert_eq!(query::outcome(&world), Some(GameOutcome::Victory));
}

#[test]
fn impossible_spawn_budget_fails_construction() {
    let config = WorldConfig {
        spawning: SpawnConfig {
            enemy_count: 500,
            max_attempts: 50,
            ..SpawnConfig::default()
        },
        ..WorldConfig::default()
    };

    assert!(matches!(World::new(config), Err(WorldError::Spawn(_))));
}

#[test]
fn config_round_trips_through_toml() {
    let config = WorldConfig::default();
    let encoded = toml::to_string(&config).expect("serialize");
    let decoded: WorldConfig = toml::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, config);
}
