#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and audio contracts for Gridfire adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use gridfire_core::{AgentId, AnimationCursor, Event, MovementIntent, PropId, ViewConfig, WallType};
use gridfire_system_raycasting::WallColumn;
use gridfire_system_sprite_projection::SpriteProjection;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Input snapshot gathered by adapters before advancing the simulation.
///
/// Values are already sanitized: axes lie in `[-1, 1]` and the look delta is
/// expressed in pixels of pointer travel.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Forward (positive) or backward (negative) travel.
    pub forward: f32,
    /// Rightward (positive) or leftward (negative) strafing.
    pub strafe: f32,
    /// Keyboard rotation, clockwise positive.
    pub turn: f32,
    /// Horizontal pointer travel since the previous frame.
    pub look_delta: f32,
    /// Whether the fire control was pressed on this frame.
    pub fire: bool,
}

impl FrameInput {
    /// Movement intent covering a frame of duration `dt`.
    #[must_use]
    pub fn movement(&self, dt: Duration) -> MovementIntent {
        MovementIntent {
            forward: self.forward.clamp(-1.0, 1.0),
            strafe: self.strafe.clamp(-1.0, 1.0),
            turn: self.turn.clamp(-1.0, 1.0),
            look_delta: self.look_delta,
            dt,
        }
    }
}

/// Entity a projected sprite belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteSubject {
    /// An agent.
    Agent(AgentId),
    /// A static prop.
    Prop(PropId),
}

/// Content of a single draw entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drawable {
    /// One textured column of wall.
    WallSlice {
        /// Ray index the slice was produced by.
        column: u32,
        /// Texture of the struck wall.
        wall: WallType,
        /// Horizontal texture coordinate in `[0, 1]`.
        offset: f32,
        /// Slice width and projected height in pixels.
        size: Vec2,
    },
    /// A billboard.
    Sprite {
        /// Entity the sprite depicts.
        subject: SpriteSubject,
        /// Frame to draw.
        animation: AnimationCursor,
        /// Projected width and height in pixels.
        size: Vec2,
    },
}

/// Screen-space item ordered by depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawEntry {
    /// Distance used for painter's ordering.
    pub depth: f32,
    /// Top-left corner in pixels.
    pub position: Vec2,
    /// What to draw.
    pub drawable: Drawable,
}

/// Draw entries ordered farthest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    entries: Vec<DrawEntry>,
}

impl DrawList {
    /// Merges wall columns and visible sprite projections into a depth-sorted list.
    ///
    /// Columns without a wall hit and culled sprites are skipped. Entries of
    /// equal depth keep their insertion order, walls before sprites.
    #[must_use]
    pub fn compose<I>(view: &ViewConfig, columns: &[WallColumn], sprites: I) -> Self
    where
        I: IntoIterator<Item = (SpriteSubject, AnimationCursor, SpriteProjection)>,
    {
        let column_width = view.column_width();
        let half_height = view.half_height();
        let mut entries: Vec<DrawEntry> = columns
            .iter()
            .filter_map(|column| {
                let hit = column.hit?;
                let height = column.projected_height;
                Some(DrawEntry {
                    depth: column.depth,
                    position: Vec2::new(
                        column.index as f32 * column_width,
                        half_height - height / 2.0,
                    ),
                    drawable: Drawable::WallSlice {
                        column: column.index,
                        wall: hit.wall,
                        offset: hit.offset,
                        size: Vec2::new(column_width, height),
                    },
                })
            })
            .collect();

        entries.extend(
            sprites
                .into_iter()
                .filter(|(_, _, projection)| projection.visible)
                .map(|(subject, animation, projection)| DrawEntry {
                    depth: projection.normalized_distance,
                    position: projection.origin,
                    drawable: Drawable::Sprite {
                        subject,
                        animation,
                        size: projection.size,
                    },
                }),
        );

        entries.sort_by(|left, right| right.depth.total_cmp(&left.depth));
        Self { entries }
    }

    /// Entries in painter's order.
    #[must_use]
    pub fn entries(&self) -> &[DrawEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of sprite entries.
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.drawable, Drawable::Sprite { .. }))
            .count()
    }
}

/// Screen overlays drawn above the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay {
    /// Health counter.
    Health {
        /// Current health.
        value: i32,
        /// Maximum health.
        max: i32,
    },
    /// Full-screen tint shown on the frame the player is hurt.
    DamageTint(Color),
    /// Shown while the game is frozen after a win.
    Victory,
    /// Shown while the game is frozen after a loss.
    Defeat,
}

impl Overlay {
    /// Tint used for the damage flash.
    pub const DAMAGE_TINT: Color = Color::new(1.0, 0.0, 0.0, 0.35);
}

/// Scene description consumed by rendering backends for a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// World geometry and billboards in painter's order.
    pub draw_list: DrawList,
    /// Overlays drawn after the draw list, in order.
    pub overlays: Vec<Overlay>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(draw_list: DrawList, overlays: Vec<Overlay>) -> Self {
        Self {
            draw_list,
            overlays,
        }
    }
}

/// Rendering backend capable of presenting Gridfire scenes.
pub trait RenderingBackend {
    /// Presents one frame. Missing textures surface as errors.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Sounds the engine may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Weapon discharge.
    Shotgun,
    /// Agent hit but still alive.
    AgentPain,
    /// Agent killed.
    AgentDeath,
    /// Player hurt.
    PlayerPain,
    /// Background music.
    Theme,
}

impl SoundId {
    /// Sound an adapter should play in response to a world event.
    #[must_use]
    pub fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::WeaponFired => Some(Self::Shotgun),
            Event::AgentDamaged { health, .. } if *health > 0 => Some(Self::AgentPain),
            Event::AgentDied { .. } => Some(Self::AgentDeath),
            Event::PlayerDamaged { .. } => Some(Self::PlayerPain),
            _ => None,
        }
    }
}

/// Fire-and-forget audio output.
pub trait AudioBackend {
    /// Plays a one-shot sound.
    fn play(&mut self, sound: SoundId) -> AnyResult<()>;

    /// Starts looping background music.
    fn loop_music(&mut self, sound: SoundId) -> AnyResult<()>;

    /// Stops background music.
    fn stop_music(&mut self);
}

/// Summary of a frame captured by [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedFrame {
    /// Number of wall slices drawn.
    pub walls: usize,
    /// Number of sprites drawn.
    pub sprites: usize,
    /// Distinct wall texture ids drawn, ascending.
    pub textures: Vec<u8>,
    /// Overlays drawn.
    pub overlays: Vec<Overlay>,
}

/// Headless backend that records frames and sounds instead of presenting them.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    frames: Vec<RecordedFrame>,
    sounds: Vec<SoundId>,
    music: Option<SoundId>,
    missing: Vec<SoundId>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a sound as absent so requests for it fail.
    #[must_use]
    pub fn without_sound(mut self, sound: SoundId) -> Self {
        self.missing.push(sound);
        self
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Sounds played so far, in order.
    #[must_use]
    pub fn sounds(&self) -> &[SoundId] {
        &self.sounds
    }

    /// Music currently looping.
    #[must_use]
    pub fn music(&self) -> Option<SoundId> {
        self.music
    }

    fn ensure_available(&self, sound: SoundId) -> Result<(), RenderingError> {
        if self.missing.contains(&sound) {
            Err(RenderingError::MissingSound { sound })
        } else {
            Ok(())
        }
    }
}

impl RenderingBackend for RecordingBackend {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let sprites = scene.draw_list.sprite_count();
        let mut textures: Vec<u8> = scene
            .draw_list
            .entries()
            .iter()
            .filter_map(|entry| match entry.drawable {
                Drawable::WallSlice { wall, .. } => Some(wall.get()),
                Drawable::Sprite { .. } => None,
            })
            .collect();
        textures.sort_unstable();
        textures.dedup();
        self.frames.push(RecordedFrame {
            walls: scene.draw_list.len() - sprites,
            sprites,
            textures,
            overlays: scene.overlays.clone(),
        });
        Ok(())
    }
}

impl AudioBackend for RecordingBackend {
    fn play(&mut self, sound: SoundId) -> AnyResult<()> {
        self.ensure_available(sound)?;
        self.sounds.push(sound);
        Ok(())
    }

    fn loop_music(&mut self, sound: SoundId) -> AnyResult<()> {
        self.ensure_available(sound)?;
        self.music = Some(sound);
        Ok(())
    }

    fn stop_music(&mut self) {
        self.music = None;
    }
}

/// Errors raised by the bundled backends.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A requested sound has no loaded asset.
    MissingSound {
        /// Sound that was requested.
        sound: SoundId,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSound { sound } => write!(f, "no asset loaded for sound {sound:?}"),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfire_core::{AnimationSequence, CellCoord};
    use gridfire_system_raycasting::{HitAxis, RayHit};

    fn column(index: u32, depth: f32) -> WallColumn {
        WallColumn {
            index,
            angle: 0.0,
            depth,
            projected_height: 100.0 / depth,
            hit: Some(RayHit {
                depth,
                wall: WallType::BOUNDARY,
                offset: 0.5,
                cell: CellCoord::new(0, 0),
                axis: HitAxis::Vertical,
            }),
        }
    }

    fn projection(depth: f32, visible: bool) -> SpriteProjection {
        SpriteProjection {
            delta: 0.0,
            distance: depth,
            normalized_distance: depth,
            screen_x: 10.0,
            size: Vec2::splat(10.0),
            origin: Vec2::new(5.0, 5.0),
            visible,
        }
    }

    #[test]
    fn compose_sorts_farthest_first_and_skips_culled_sprites() {
        let view = ViewConfig {
            width: 8,
            height: 8,
            ..ViewConfig::default()
        };
        let columns = [column(0, 2.0), column(1, 5.0)];
        let idle = AnimationCursor::new(AnimationSequence::Idle);
        let sprites = [
            (SpriteSubject::Agent(AgentId::new(0)), idle, projection(3.0, true)),
            (SpriteSubject::Prop(PropId::new(0)), idle, projection(9.0, false)),
        ];

        let list = DrawList::compose(&view, &columns, sprites);

        let depths: Vec<f32> = list.entries().iter().map(|entry| entry.depth).collect();
        assert_eq!(depths, vec![5.0, 3.0, 2.0]);
        assert_eq!(list.sprite_count(), 1);
    }

    #[test]
    fn equal_depths_keep_walls_before_sprites() {
        let view = ViewConfig {
            width: 8,
            height: 8,
            ..ViewConfig::default()
        };
        let idle = AnimationCursor::new(AnimationSequence::Idle);
        let list = DrawList::compose(
            &view,
            &[column(0, 4.0)],
            [(SpriteSubject::Agent(AgentId::new(1)), idle, projection(4.0, true))],
        );
        assert!(matches!(
            list.entries()[0].drawable,
            Drawable::WallSlice { .. }
        ));
    }

    #[test]
    fn events_map_to_sounds() {
        assert_eq!(SoundId::for_event(&Event::WeaponFired), Some(SoundId::Shotgun));
        assert_eq!(
            SoundId::for_event(&Event::AgentDamaged {
                agent: AgentId::new(0),
                amount: 75,
                health: 0
            }),
            None
        );
        assert_eq!(SoundId::for_event(&Event::LevelCleared), None);
    }

    #[test]
    fn recording_backend_reports_missing_sounds() {
        let mut backend = RecordingBackend::new().without_sound(SoundId::Theme);
        assert!(backend.loop_music(SoundId::Theme).is_err());
        backend.play(SoundId::Shotgun).expect("shotgun available");
        assert_eq!(backend.sounds(), &[SoundId::Shotgun]);
        assert_eq!(backend.music(), None);
    }

    #[test]
    fn recording_backend_lists_wall_textures_once() {
        let view = ViewConfig {
            width: 8,
            height: 8,
            ..ViewConfig::default()
        };
        let mut painted = column(2, 3.0);
        if let Some(hit) = painted.hit.as_mut() {
            hit.wall = WallType::new(4).expect("non-zero id");
        }
        let columns = [column(0, 2.0), painted, column(1, 5.0)];
        let idle = AnimationCursor::new(AnimationSequence::Idle);
        let list = DrawList::compose(
            &view,
            &columns,
            [(SpriteSubject::Agent(AgentId::new(0)), idle, projection(4.0, true))],
        );

        let mut backend = RecordingBackend::new();
        backend
            .present(&Scene::new(list, Vec::new()))
            .expect("present");

        let frame = &backend.frames()[0];
        assert_eq!(frame.walls, 3);
        assert_eq!(frame.sprites, 1);
        assert_eq!(frame.textures, vec![1, 4]);
    }

    #[test]
    fn frame_input_clamps_axes() {
        let input = FrameInput {
            forward: 3.0,
            strafe: -2.0,
            ..FrameInput::default()
        };
        let intent = input.movement(Duration::from_millis(16));
        assert_eq!(intent.forward, 1.0);
        assert_eq!(intent.strafe, -1.0);
    }
}
