//! Data-driven descriptors for agents, props and the player's weapon.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AnimationFrames;

/// Agent archetypes available to levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArchetypeKind {
    /// Common ranged infantry.
    Soldier,
    /// Fast melee flyer.
    CacoDemon,
    /// Heavily armoured long-range brute.
    CyberDemon,
}

impl ArchetypeKind {
    /// Every archetype in spawn-weight order.
    pub const ALL: [ArchetypeKind; 3] = [Self::Soldier, Self::CacoDemon, Self::CyberDemon];
}

/// Inclusive range of whole grid units an archetype's attack range is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackRange {
    /// Smallest attack range.
    pub min: u32,
    /// Largest attack range.
    pub max: u32,
}

impl AttackRange {
    /// Range that always resolves to `value`.
    #[must_use]
    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Reports whether the range must be sampled at spawn.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.min >= self.max
    }
}

/// Billboard parameters for a projected sprite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Height of the sprite relative to a full wall.
    pub scale: f32,
    /// Downward shift of the sprite as a fraction of its projected height.
    pub height_shift: f32,
    /// Width divided by height of the source image.
    pub image_ratio: f32,
}

impl SpriteDescriptor {
    /// Creates a new sprite descriptor.
    #[must_use]
    pub const fn new(scale: f32, height_shift: f32, image_ratio: f32) -> Self {
        Self {
            scale,
            height_shift,
            image_ratio,
        }
    }
}

/// Stat block and asset set describing one agent archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDescriptor {
    /// Archetype described by this block.
    pub kind: ArchetypeKind,
    /// Directory holding the archetype's frame sequences.
    pub asset_dir: String,
    /// Health at spawn.
    pub max_health: i32,
    /// Range the spawn-time attack distance is drawn from.
    pub attack_range: AttackRange,
    /// Damage per landed attack.
    pub attack_damage: i32,
    /// Probability in `[0, 1]` that an attack lands.
    pub accuracy: f32,
    /// Travel speed in grid units per second.
    pub speed: f32,
    /// Milliseconds between animation frames.
    pub frame_time_ms: u64,
    /// Billboard parameters.
    pub sprite: SpriteDescriptor,
    /// Frame counts per sequence.
    pub frames: AnimationFrames,
}

impl ArchetypeDescriptor {
    /// Standard soldier.
    #[must_use]
    pub fn soldier() -> Self {
        Self {
            kind: ArchetypeKind::Soldier,
            asset_dir: "resources/sprites/npc/soldier".to_owned(),
            max_health: 100,
            attack_range: AttackRange { min: 3, max: 6 },
            attack_damage: 10,
            accuracy: 0.15,
            speed: 1.8,
            frame_time_ms: 180,
            sprite: SpriteDescriptor::new(0.6, 0.38, 0.5),
            frames: AnimationFrames {
                idle: 8,
                walk: 4,
                attack: 2,
                pain: 1,
                death: 9,
            },
        }
    }

    /// Caco demon.
    #[must_use]
    pub fn caco_demon() -> Self {
        Self {
            kind: ArchetypeKind::CacoDemon,
            asset_dir: "resources/sprites/npc/caco_demon".to_owned(),
            max_health: 150,
            attack_range: AttackRange::fixed(1),
            attack_damage: 25,
            accuracy: 0.35,
            speed: 3.0,
            frame_time_ms: 250,
            sprite: SpriteDescriptor::new(0.7, 0.27, 1.0),
            frames: AnimationFrames {
                idle: 8,
                walk: 3,
                attack: 5,
                pain: 2,
                death: 6,
            },
        }
    }

    /// Cyber demon.
    #[must_use]
    pub fn cyber_demon() -> Self {
        Self {
            kind: ArchetypeKind::CyberDemon,
            asset_dir: "resources/sprites/npc/cyber_demon".to_owned(),
            max_health: 350,
            attack_range: AttackRange::fixed(6),
            attack_damage: 15,
            accuracy: 0.25,
            speed: 3.3,
            frame_time_ms: 210,
            sprite: SpriteDescriptor::new(1.0, 0.04, 0.7),
            frames: AnimationFrames {
                idle: 8,
                walk: 4,
                attack: 2,
                pain: 2,
                death: 9,
            },
        }
    }

    /// Interval between animation frames.
    #[must_use]
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(self.frame_time_ms)
    }
}

/// Descriptor lookup for every archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    /// Soldier stats.
    pub soldier: ArchetypeDescriptor,
    /// Caco demon stats.
    pub caco_demon: ArchetypeDescriptor,
    /// Cyber demon stats.
    pub cyber_demon: ArchetypeDescriptor,
}

impl ArchetypeTable {
    /// Descriptor for the provided archetype.
    #[must_use]
    pub fn get(&self, kind: ArchetypeKind) -> &ArchetypeDescriptor {
        match kind {
            ArchetypeKind::Soldier => &self.soldier,
            ArchetypeKind::CacoDemon => &self.caco_demon,
            ArchetypeKind::CyberDemon => &self.cyber_demon,
        }
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            soldier: ArchetypeDescriptor::soldier(),
            caco_demon: ArchetypeDescriptor::caco_demon(),
            cyber_demon: ArchetypeDescriptor::cyber_demon(),
        }
    }
}

/// Static decorations placed in a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropKind {
    /// Animated green candelabra.
    GreenLight,
    /// Animated red candelabra.
    RedLight,
    /// Unlit candelabra.
    Candelabra,
}

impl PropKind {
    /// Billboard parameters of the prop.
    #[must_use]
    pub const fn sprite(self) -> SpriteDescriptor {
        match self {
            Self::GreenLight | Self::RedLight => SpriteDescriptor::new(0.8, 0.16, 0.4),
            Self::Candelabra => SpriteDescriptor::new(0.7, 0.27, 0.4),
        }
    }

    /// Frame counts of the prop's idle loop.
    #[must_use]
    pub const fn frames(self) -> AnimationFrames {
        match self {
            Self::GreenLight | Self::RedLight => AnimationFrames::idle_only(4),
            Self::Candelabra => AnimationFrames::idle_only(1),
        }
    }

    /// Interval between animation frames.
    #[must_use]
    pub const fn frame_time(self) -> Duration {
        Duration::from_millis(120)
    }
}

/// Damage and reload timing of the player's weapon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponDescriptor {
    /// Directory holding the weapon's frames.
    pub asset_dir: String,
    /// Damage applied to an agent per hit.
    pub damage: i32,
    /// Frames in the reload animation; reloading ends after the last one.
    pub reload_frames: usize,
    /// Milliseconds between reload frames.
    pub frame_time_ms: u64,
}

impl WeaponDescriptor {
    /// Default shotgun.
    #[must_use]
    pub fn shotgun() -> Self {
        Self {
            asset_dir: "resources/sprites/weapon/shotgun".to_owned(),
            damage: 75,
            reload_frames: 6,
            frame_time_ms: 120,
        }
    }

    /// Interval between reload frames.
    #[must_use]
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(self.frame_time_ms)
    }
}

impl Default for WeaponDescriptor {
    fn default() -> Self {
        Self::shotgun()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_matches_kind() {
        let table = ArchetypeTable::default();
        for kind in ArchetypeKind::ALL {
            assert_eq!(table.get(kind).kind, kind);
        }
    }

    #[test]
    fn soldier_range_is_sampled_while_demons_are_fixed() {
        let table = ArchetypeTable::default();
        assert!(!table.soldier.attack_range.is_fixed());
        assert!(table.caco_demon.attack_range.is_fixed());
        assert_eq!(table.cyber_demon.attack_range, AttackRange::fixed(6));
    }

    #[test]
    fn archetype_descriptor_survives_bincode() {
        let descriptor = ArchetypeDescriptor::cyber_demon();
        let bytes = bincode::serialize(&descriptor).expect("serialize");
        let restored: ArchetypeDescriptor = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, descriptor);
    }
}
