//! Index-based animation cursors over immutable frame sequences.

use serde::{Deserialize, Serialize};

/// Named frame sequences every animated sprite may provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationSequence {
    /// Looping idle frames. Static props only use this sequence.
    Idle,
    /// Looping walk frames.
    Walk,
    /// Looping attack frames.
    Attack,
    /// One-shot pain frames.
    Pain,
    /// One-shot death frames.
    Death,
}

/// Frame counts for each sequence of an animated sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationFrames {
    /// Frames in the idle loop.
    pub idle: usize,
    /// Frames in the walk loop.
    pub walk: usize,
    /// Frames in the attack loop.
    pub attack: usize,
    /// Frames in the pain sequence.
    pub pain: usize,
    /// Frames in the death sequence.
    pub death: usize,
}

impl AnimationFrames {
    /// Frame counts for a sprite that only loops its idle sequence.
    #[must_use]
    pub const fn idle_only(frames: usize) -> Self {
        Self {
            idle: frames,
            walk: 0,
            attack: 0,
            pain: 0,
            death: 0,
        }
    }

    /// Number of frames in the provided sequence.
    #[must_use]
    pub const fn count(&self, sequence: AnimationSequence) -> usize {
        match sequence {
            AnimationSequence::Idle => self.idle,
            AnimationSequence::Walk => self.walk,
            AnimationSequence::Attack => self.attack,
            AnimationSequence::Pain => self.pain,
            AnimationSequence::Death => self.death,
        }
    }
}

/// Result of advancing an [`AnimationCursor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStep {
    /// The sequence is empty; nothing changed.
    Unchanged,
    /// The cursor moved to the next frame.
    Advanced,
    /// The cursor passed the last frame and returned to the first.
    Wrapped,
}

/// Position within one sequence of an immutable frame array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationCursor {
    sequence: AnimationSequence,
    frame: usize,
}

impl AnimationCursor {
    /// Creates a cursor at the first frame of the sequence.
    #[must_use]
    pub const fn new(sequence: AnimationSequence) -> Self {
        Self { sequence, frame: 0 }
    }

    /// Sequence currently playing.
    #[must_use]
    pub const fn sequence(&self) -> AnimationSequence {
        self.sequence
    }

    /// Zero-based frame index within the sequence.
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    /// Switches to another sequence, rewinding to its first frame.
    pub fn restart(&mut self, sequence: AnimationSequence) {
        self.sequence = sequence;
        self.frame = 0;
    }

    /// Reports whether the cursor sits on the final frame of a sequence of `frame_count`.
    #[must_use]
    pub const fn is_last_frame(&self, frame_count: usize) -> bool {
        frame_count == 0 || self.frame + 1 >= frame_count
    }

    /// Advances to the next frame, wrapping modulo `frame_count`.
    pub fn advance(&mut self, frame_count: usize) -> AnimationStep {
        if frame_count == 0 {
            return AnimationStep::Unchanged;
        }

        let next = (self.frame + 1) % frame_count;
        self.frame = next;
        if next == 0 {
            AnimationStep::Wrapped
        } else {
            AnimationStep::Advanced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_modulo_frame_count() {
        let mut cursor = AnimationCursor::new(AnimationSequence::Walk);
        assert_eq!(cursor.advance(3), AnimationStep::Advanced);
        assert_eq!(cursor.advance(3), AnimationStep::Advanced);
        assert_eq!(cursor.advance(3), AnimationStep::Wrapped);
        assert_eq!(cursor.frame(), 0);
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let mut cursor = AnimationCursor::new(AnimationSequence::Pain);
        assert_eq!(cursor.advance(0), AnimationStep::Unchanged);
        assert_eq!(cursor.frame(), 0);
        assert!(cursor.is_last_frame(0));
    }

    #[test]
    fn single_frame_sequence_wraps_every_step() {
        let mut cursor = AnimationCursor::new(AnimationSequence::Pain);
        assert_eq!(cursor.advance(1), AnimationStep::Wrapped);
    }

    #[test]
    fn restart_rewinds_to_first_frame() {
        let mut cursor = AnimationCursor::new(AnimationSequence::Idle);
        let _ = cursor.advance(4);
        cursor.restart(AnimationSequence::Death);
        assert_eq!(cursor.sequence(), AnimationSequence::Death);
        assert_eq!(cursor.frame(), 0);
    }
}
