//! Fixed-point phase accumulators for the pan and tremolo LFOs.

use sb_ir::Q16_16_TWO_PI;

/// A phase accumulator in Q16.16 radians, wrapping at one full turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lfo {
    phase: i32,
    step: i32,
}

impl Lfo {
    pub const fn new(step: i32) -> Self {
        Self { phase: 0, step }
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.phase += self.step;
        if self.phase >= Q16_16_TWO_PI {
            self.phase -= Q16_16_TWO_PI;
        }
    }

    /// Current phase in `[0, 2π)`.
    pub fn phase(&self) -> i32 {
        self.phase
    }

    pub fn step(&self) -> i32 {
        self.step
    }
}
