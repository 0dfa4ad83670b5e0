//! Scripted input for headless sessions.

use gridfire_rendering::FrameInput;

/// Turns the player in place and pulls the trigger on a fixed cadence.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScriptedInput {
    fire_every: u64,
    turn: f32,
}

impl ScriptedInput {
    /// Fires every `fire_every` ticks; zero never fires.
    pub(crate) fn new(fire_every: u64, turn: f32) -> Self {
        Self { fire_every, turn }
    }

    /// Input for the provided tick.
    pub(crate) fn frame(&self, tick: u64) -> FrameInput {
        FrameInput {
            turn: self.turn,
            fire: self.fire_every != 0 && tick % self.fire_every == 0,
            ..FrameInput::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_cadence() {
        let input = ScriptedInput::new(3, 0.5);
        let fired: Vec<_> = (0..7).map(|tick| input.frame(tick).fire).collect();
        assert_eq!(fired, [true, false, false, true, false, false, true]);
        assert!((input.frame(1).turn - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_cadence_never_fires() {
        let input = ScriptedInput::new(0, 0.0);
        assert!((0..10).all(|tick| !input.frame(tick).fire));
    }
}
