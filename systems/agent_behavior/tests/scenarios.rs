use std::time::Duration;

use gridfire_core::{
    AgentBehaviorState, AgentId, ArchetypeKind, AttackRange, CellCoord, Command, Event,
    GameOutcome, ViewConfig, WorldPoint,
};
use gridfire_system_agent_behavior::{AgentBehavior, BehaviorInputs};
use gridfire_system_pathfinding::{PathFinder, PathGraph};
use gridfire_world::{
    apply, query, CellRegion, LevelData, PlayerConfig, SpawnConfig, World, WorldConfig,
};

struct Harness {
    world: World,
    behavior: AgentBehavior,
    pathfinder: PathFinder,
}

impl Harness {
    fn new(config: WorldConfig) -> Self {
        let world = World::new(config).expect("world");
        let pathfinder = PathFinder::new(PathGraph::from_grid(query::grid(&world)));
        Self {
            world,
            behavior: AgentBehavior::new(ViewConfig::default(), 11),
            pathfinder,
        }
    }

    fn spawn(&mut self, cell: CellCoord) -> AgentId {
        let mut events = Vec::new();
        apply(
            &mut self.world,
            Command::SpawnAgent {
                archetype: ArchetypeKind::Soldier,
                cell,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::AgentSpawned { agent, .. }] => *agent,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    /// Runs one tick and returns the behaviour commands and every world event.
    fn step(&mut self, ms: u64, fire: bool) -> (Vec<Command>, Vec<Event>) {
        let mut events = Vec::new();
        apply(
            &mut self.world,
            Command::Tick {
                dt: Duration::from_millis(ms),
            },
            &mut events,
        );
        if fire {
            apply(&mut self.world, Command::FireWeapon, &mut events);
        }

        let agents = query::agent_view(&self.world);
        let inputs = BehaviorInputs {
            tick: query::tick_events(&self.world),
            player: query::player(&self.world),
            agents: &agents,
            grid: query::grid(&self.world),
            occupancy: query::occupancy(&self.world),
            weapon_damage: query::config(&self.world).weapon.damage,
        };
        let mut commands = Vec::new();
        self.behavior
            .handle(&inputs, &mut self.pathfinder, &mut commands);

        for command in commands.iter().cloned() {
            apply(&mut self.world, command, &mut events);
        }
        (commands, events)
    }

    fn agent(&self, id: AgentId) -> gridfire_core::AgentSnapshot {
        *query::agent_view(&self.world).get(id).expect("agent")
    }
}

fn corridor(level: LevelData) -> WorldConfig {
    let mut config = WorldConfig {
        level,
        player: PlayerConfig {
            start: WorldPoint::new(1.5, 1.5),
            angle: 0.0,
            ..PlayerConfig::default()
        },
        spawning: SpawnConfig {
            enemy_count: 0,
            restricted: CellRegion::EMPTY,
            ..SpawnConfig::default()
        },
        ..WorldConfig::default()
    };
    config.archetypes.soldier.attack_range = AttackRange::fixed(3);
    config
}

fn open_corridor() -> WorldConfig {
    corridor(LevelData::open_room(9, 3))
}

#[test]
fn agent_within_range_and_in_sight_attacks() {
    let mut harness = Harness::new(open_corridor());
    let agent = harness.spawn(CellCoord::new(3, 1));

    let (commands, _) = harness.step(16, false);

    assert_eq!(
        commands,
        vec![Command::SetAgentBehavior {
            agent,
            behavior: AgentBehaviorState::Attacking,
        }]
    );
    let snapshot = harness.agent(agent);
    assert_eq!(snapshot.behavior, AgentBehaviorState::Attacking);
    assert!(snapshot.acquired);
}

#[test]
fn wall_between_agent_and_player_keeps_agent_idle() {
    let level = LevelData {
        rows: vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1],
        ],
        props: Vec::new(),
    };
    let mut harness = Harness::new(corridor(level));
    let agent = harness.spawn(CellCoord::new(6, 1));

    for _ in 0..10 {
        let (commands, _) = harness.step(16, false);
        assert!(commands.is_empty(), "unexpected commands {commands:?}");
    }

    let snapshot = harness.agent(agent);
    assert_eq!(snapshot.behavior, AgentBehaviorState::Idle);
    assert!(!snapshot.acquired);
    assert_eq!(snapshot.position, CellCoord::new(6, 1).center());
}

#[test]
fn visible_agent_in_crosshair_takes_one_shot() {
    let mut harness = Harness::new(open_corridor());
    let agent = harness.spawn(CellCoord::new(4, 1));

    let (commands, events) = harness.step(16, true);

    assert_eq!(
        commands,
        vec![Command::DamageAgent { agent, amount: 75 }]
    );
    assert!(events.contains(&Event::AgentDamaged {
        agent,
        amount: 75,
        health: 25,
    }));
    assert!(!query::tick_events(&harness.world).weapon_fired);
    let snapshot = harness.agent(agent);
    assert_eq!(snapshot.health, 25);
    assert_eq!(snapshot.behavior, AgentBehaviorState::Pain);
}

#[test]
fn shot_is_consumed_by_the_earliest_spawned_agent() {
    let mut harness = Harness::new(open_corridor());
    let far = harness.spawn(CellCoord::new(5, 1));
    let near = harness.spawn(CellCoord::new(3, 1));

    let (commands, _) = harness.step(16, true);

    let hits: Vec<_> = commands
        .iter()
        .filter_map(|command| match command {
            Command::DamageAgent { agent, .. } => Some(*agent),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![far]);
    assert_eq!(harness.agent(near).health, 100);
}

#[test]
fn agent_out_of_range_walks_toward_player() {
    let mut harness = Harness::new(open_corridor());
    let agent = harness.spawn(CellCoord::new(6, 1));

    let (commands, events) = harness.step(100, false);

    assert_eq!(
        commands,
        vec![
            Command::SetAgentBehavior {
                agent,
                behavior: AgentBehaviorState::Searching,
            },
            Command::StepAgent {
                agent,
                toward: CellCoord::new(5, 1),
            },
        ]
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AgentMoved { agent: moved, .. } if *moved == agent)));
    assert!(harness.agent(agent).position.x() < 6.5);
}

#[test]
fn repeated_fire_kills_agent_exactly_once() {
    let mut harness = Harness::new(open_corridor());
    let agent = harness.spawn(CellCoord::new(4, 1));

    let mut deaths = 0;
    for _ in 0..60 {
        let (_, events) = harness.step(120, true);
        deaths += events
            .iter()
            .filter(|event| matches!(event, Event::AgentDied { .. }))
            .count();
    }

    assert_eq!(deaths, 1);
    let snapshot = harness.agent(agent);
    assert!(!snapshot.alive);
    assert_eq!(snapshot.behavior, AgentBehaviorState::Dead);
    assert_eq!(query::outcome(&harness.world), Some(GameOutcome::Victory));
}

#[test]
fn identical_sessions_replay_identically() {
    fn record() -> Vec<Event> {
        let mut harness = Harness::new(WorldConfig::default());
        let mut log = Vec::new();
        for tick in 0..200 {
            let (_, events) = harness.step(16, tick % 25 == 0);
            log.extend(events);
        }
        log
    }

    assert_eq!(record(), record());
}
