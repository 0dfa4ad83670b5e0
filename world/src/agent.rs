//! Agents and props owned by the world.

use std::time::Duration;

use gridfire_core::{
    AgentBehaviorState, AgentId, AgentSnapshot, AgentStats, AnimationCursor, AnimationFrames,
    AnimationStep, ArchetypeDescriptor, ArchetypeKind, CellCoord, Event, PropId, PropKind,
    PropSnapshot, SpriteDescriptor, WorldPoint,
};
use rand::Rng;

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    archetype: ArchetypeKind,
    pub(crate) position: WorldPoint,
    health: i32,
    pub(crate) alive: bool,
    pub(crate) behavior: AgentBehaviorState,
    pain: bool,
    acquired: bool,
    pub(crate) stats: AgentStats,
    sprite: SpriteDescriptor,
    frames: AnimationFrames,
    frame_time: Duration,
    animation: AnimationCursor,
    animation_clock: Duration,
    animation_trigger: bool,
}

impl Agent {
    /// Creates an idle agent at the centre of `cell`, drawing a ranged attack distance if needed.
    pub(crate) fn spawn<R: Rng>(
        id: AgentId,
        descriptor: &ArchetypeDescriptor,
        cell: CellCoord,
        rng: &mut R,
    ) -> Self {
        let range = descriptor.attack_range;
        let attack_range = if range.is_fixed() {
            range.min
        } else {
            rng.gen_range(range.min..=range.max)
        };

        Self {
            id,
            archetype: descriptor.kind,
            position: cell.center(),
            health: descriptor.max_health,
            alive: true,
            behavior: AgentBehaviorState::Idle,
            pain: false,
            acquired: false,
            stats: AgentStats {
                max_health: descriptor.max_health,
                attack_range: attack_range as f32,
                attack_damage: descriptor.attack_damage,
                accuracy: descriptor.accuracy,
                speed: descriptor.speed,
            },
            sprite: descriptor.sprite,
            frames: descriptor.frames,
            frame_time: descriptor.frame_time(),
            animation: AnimationCursor::new(AgentBehaviorState::Idle.sequence()),
            animation_clock: Duration::ZERO,
            animation_trigger: false,
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.position.cell()
    }

    pub(crate) fn archetype(&self) -> ArchetypeKind {
        self.archetype
    }

    pub(crate) fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            archetype: self.archetype,
            position: self.position,
            health: self.health.max(0),
            alive: self.alive,
            behavior: self.behavior,
            pain: self.pain,
            acquired: self.acquired,
            stats: self.stats,
            sprite: self.sprite,
            animation: self.animation,
            animation_trigger: self.animation_trigger,
        }
    }

    /// Samples the animation clock and plays one frame of the current state.
    pub(crate) fn animate(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.animation_trigger = false;
        if self.behavior == AgentBehaviorState::Dead {
            return;
        }

        self.animation_clock = self.animation_clock.saturating_add(dt);
        if self.animation_clock <= self.frame_time {
            return;
        }
        self.animation_clock = Duration::ZERO;
        self.animation_trigger = true;

        match self.behavior {
            AgentBehaviorState::Dying => {
                if self.animation.is_last_frame(self.frames.death) {
                    self.behavior = AgentBehaviorState::Dead;
                    out_events.push(Event::AgentBehaviorChanged {
                        agent: self.id,
                        from: AgentBehaviorState::Dying,
                        to: AgentBehaviorState::Dead,
                    });
                    out_events.push(Event::AgentRemoved { agent: self.id });
                } else {
                    let _ = self.animation.advance(self.frames.death);
                }
            }
            AgentBehaviorState::Pain => match self.animation.advance(self.frames.pain) {
                AnimationStep::Advanced => {}
                AnimationStep::Wrapped | AnimationStep::Unchanged => self.pain = false,
            },
            state => {
                let _ = self
                    .animation
                    .advance(self.frames.count(state.sequence()));
            }
        }
    }

    /// Enters a requested state. Returns the previous state on change.
    pub(crate) fn transition(&mut self, to: AgentBehaviorState) -> Option<AgentBehaviorState> {
        if !self.alive || to.is_reserved() || self.behavior == to {
            return None;
        }

        let from = self.behavior;
        self.behavior = to;
        self.animation.restart(to.sequence());
        if matches!(
            to,
            AgentBehaviorState::Searching | AgentBehaviorState::Attacking
        ) {
            self.acquired = true;
        }
        Some(from)
    }

    /// Applies weapon damage and returns the remaining health, floored at zero.
    pub(crate) fn take_damage(&mut self, amount: i32) -> i32 {
        self.health = self.health.saturating_sub(amount);
        self.pain = true;
        self.health.max(0)
    }

    pub(crate) fn is_lethally_wounded(&self) -> bool {
        self.health < 1
    }

    /// Marks the agent dead and starts its death sequence.
    pub(crate) fn begin_dying(&mut self) -> AgentBehaviorState {
        let from = self.behavior;
        self.alive = false;
        self.pain = false;
        self.behavior = AgentBehaviorState::Dying;
        self.animation.restart(AgentBehaviorState::Dying.sequence());
        self.animation_clock = Duration::ZERO;
        from
    }

    /// Enters or restarts the pain sequence. Returns the previous state on change.
    pub(crate) fn begin_pain(&mut self) -> Option<AgentBehaviorState> {
        let from = self.behavior;
        self.behavior = AgentBehaviorState::Pain;
        self.animation.restart(AgentBehaviorState::Pain.sequence());
        (from != AgentBehaviorState::Pain).then_some(from)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Prop {
    id: PropId,
    kind: PropKind,
    position: WorldPoint,
    animation: AnimationCursor,
    animation_clock: Duration,
}

impl Prop {
    pub(crate) fn new(id: PropId, kind: PropKind, position: WorldPoint) -> Self {
        Self {
            id,
            kind,
            position,
            animation: AnimationCursor::new(gridfire_core::AnimationSequence::Idle),
            animation_clock: Duration::ZERO,
        }
    }

    pub(crate) fn animate(&mut self, dt: Duration) {
        self.animation_clock = self.animation_clock.saturating_add(dt);
        if self.animation_clock <= self.kind.frame_time() {
            return;
        }
        self.animation_clock = Duration::ZERO;
        let _ = self.animation.advance(self.kind.frames().idle);
    }

    pub(crate) fn snapshot(&self) -> PropSnapshot {
        PropSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            sprite: self.kind.sprite(),
            animation: self.animation,
        }
    }
}
