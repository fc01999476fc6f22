//! Stochastic stutter/pitch-bend generator.
//!
//! A run is armed with a step count and step period. The loudness target
//! and pitch contour are rolled once, on the first step, and then ramp
//! deterministically until the run completes.

use sb_ir::{PITCH_MAX, PITCH_MID};

use crate::random::RandomSource;

/// Lowest pitch index a bend may reach.
const PITCH_FLOOR: u8 = 1;
/// Highest pitch index a bend may reach.
const PITCH_CEIL: u8 = PITCH_MAX - 2;

/// Retrigger run state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Retrigger {
    /// Steps left in the run (0 = idle)
    remaining: u8,
    armed: bool,
    /// Next step is the first of the run
    first: bool,
    /// Volume multiplier in [0, 1]
    volume: f32,
    /// Per-step volume ramp toward 1.0
    volume_step: f32,
    /// Index into the pitch table
    pitch: u8,
    /// Pitch index change per step
    bend: i8,
    /// Ticks between steps
    period: u16,
}

impl Default for Retrigger {
    fn default() -> Self {
        Self {
            remaining: 0,
            armed: false,
            first: false,
            volume: 1.0,
            volume_step: 0.0,
            pitch: PITCH_MID,
            bend: 0,
            period: 96,
        }
    }
}

impl Retrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a run of `steps` steps, one every `period` ticks.
    pub fn arm(&mut self, steps: u8, period: u16, volume_step: f32) {
        self.remaining = steps;
        self.armed = steps > 0;
        self.first = true;
        self.period = period.max(1);
        self.volume_step = volume_step.clamp(0.0, 1.0);
    }

    /// Abandon any run in progress.
    pub fn cancel(&mut self) {
        self.remaining = 0;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed && self.remaining > 0
    }

    /// True on ticks where an armed run takes a step.
    pub fn is_step_tick(&self, tick: i64) -> bool {
        tick.rem_euclid(self.period as i64) == 0
    }

    /// Take one step. Returns true when the caller should re-trigger the
    /// current slice.
    pub fn step<R: RandomSource>(&mut self, rng: &mut R) -> bool {
        if !self.is_armed() {
            return false;
        }
        if self.first {
            self.roll(rng);
            self.first = false;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            self.armed = false;
            self.volume = 1.0;
            self.pitch = PITCH_MID;
            return true;
        }

        if self.volume < 1.0 {
            self.volume = (self.volume + self.volume_step).min(1.0);
        }
        let bent = self.pitch as i16 + self.bend as i16;
        self.pitch = bent.clamp(PITCH_FLOOR as i16, PITCH_CEIL as i16) as u8;
        true
    }

    /// Draw the run's loudness target and pitch bend.
    fn roll<R: RandomSource>(&mut self, rng: &mut R) {
        self.volume = match rng.roll(1, 6) {
            1 | 2 => 1.0,
            3 => 0.5,
            _ => 0.0,
        };
        self.pitch = PITCH_MID;
        self.bend = 0;
        if rng.roll(1, 10) == 1 {
            let amount = rng.roll(1, 3) as i8;
            self.bend = if rng.roll(1, 2) == 1 { -amount } else { amount };
        }
    }

    /// Back to neutral loudness and pitch without touching the run.
    pub fn reset_cosmetics(&mut self) {
        self.volume = 1.0;
        self.pitch = PITCH_MID;
        self.bend = 0;
    }

    /// Recenter the pitch (manual jumps).
    pub fn center_pitch(&mut self) {
        self.pitch = PITCH_MID;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn period(&self) -> u16 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of rolls, then repeats the last one.
    struct Script<'a> {
        rolls: &'a [u8],
        pos: usize,
    }

    impl<'a> Script<'a> {
        fn new(rolls: &'a [u8]) -> Self {
            Self { rolls, pos: 0 }
        }
    }

    impl RandomSource for Script<'_> {
        fn roll(&mut self, min: u8, max: u8) -> u8 {
            let r = self.rolls[self.pos.min(self.rolls.len() - 1)];
            self.pos += 1;
            r.clamp(min, max)
        }
    }

    #[test]
    fn idle_step_does_nothing() {
        let mut rt = Retrigger::new();
        let mut rng = Script::new(&[1]);
        assert!(!rt.step(&mut rng));
        assert_eq!(rng.pos, 0);
    }

    #[test]
    fn volume_targets_by_roll() {
        for (roll, expected) in [(1, 1.0), (2, 1.0), (3, 0.5), (4, 0.0), (5, 0.0), (6, 0.0)] {
            let mut rt = Retrigger::new();
            rt.arm(4, 12, 0.0);
            let rolls = [roll, 10];
            let mut rng = Script::new(&rolls);
            assert!(rt.step(&mut rng));
            assert_eq!(rt.volume(), expected, "roll {}", roll);
        }
    }

    #[test]
    fn bend_only_on_one_in_ten() {
        let mut rt = Retrigger::new();
        rt.arm(4, 12, 0.0);
        let mut rng = Script::new(&[1, 2, 3, 1]);
        rt.step(&mut rng);
        assert_eq!(rt.pitch(), PITCH_MID);
    }

    #[test]
    fn downward_bend_accumulates() {
        let mut rt = Retrigger::new();
        rt.arm(4, 12, 0.0);
        // volume roll, enable bend, magnitude 3, direction down
        let mut rng = Script::new(&[1, 1, 3, 1]);
        rt.step(&mut rng);
        assert_eq!(rt.pitch(), PITCH_MID - 3);
        rt.step(&mut rng);
        assert_eq!(rt.pitch(), PITCH_MID - 6);
    }

    #[test]
    fn upward_bend_clamps_below_table_end() {
        let mut rt = Retrigger::new();
        rt.arm(200, 12, 0.0);
        let mut rng = Script::new(&[1, 1, 3, 2]);
        for _ in 0..100 {
            rt.step(&mut rng);
            assert!(rt.pitch() <= PITCH_MAX - 2);
        }
        assert_eq!(rt.pitch(), PITCH_MAX - 2);
    }

    #[test]
    fn downward_bend_clamps_above_zero() {
        let mut rt = Retrigger::new();
        rt.arm(200, 12, 0.0);
        let mut rng = Script::new(&[1, 1, 3, 1]);
        for _ in 0..100 {
            rt.step(&mut rng);
        }
        assert_eq!(rt.pitch(), 1);
    }

    #[test]
    fn volume_ramps_without_overshoot() {
        let mut rt = Retrigger::new();
        rt.arm(10, 12, 0.3);
        let mut rng = Script::new(&[6, 10]);
        rt.step(&mut rng);
        assert!((rt.volume() - 0.3).abs() < 1e-6);
        rt.step(&mut rng);
        rt.step(&mut rng);
        rt.step(&mut rng);
        assert_eq!(rt.volume(), 1.0);
    }

    #[test]
    fn every_outcome_ends_neutral() {
        for vol in 1..=6 {
            for enable in [1, 5] {
                for magnitude in 1..=3 {
                    for direction in 1..=2 {
                        for steps in 1..=12u8 {
                            let mut rt = Retrigger::new();
                            rt.arm(steps, 6, 0.05);
                            let rolls = [vol, enable, magnitude, direction];
                            let mut rng = Script::new(&rolls);
                            for _ in 0..steps {
                                assert!(rt.step(&mut rng));
                            }
                            assert!(!rt.is_armed());
                            assert_eq!(rt.remaining(), 0);
                            assert_eq!(rt.volume(), 1.0);
                            assert_eq!(rt.pitch(), PITCH_MID);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn rolls_happen_once_per_run() {
        let mut rt = Retrigger::new();
        rt.arm(5, 12, 0.0);
        let mut rng = Script::new(&[3, 10]);
        rt.step(&mut rng);
        let used = rng.pos;
        rt.step(&mut rng);
        rt.step(&mut rng);
        assert_eq!(rng.pos, used);
        assert_eq!(rt.volume(), 0.5);
    }

    #[test]
    fn step_ticks_follow_period() {
        let mut rt = Retrigger::new();
        rt.arm(3, 24, 0.0);
        assert!(rt.is_step_tick(0));
        assert!(!rt.is_step_tick(23));
        assert!(rt.is_step_tick(48));
    }

    #[test]
    fn cancel_disarms() {
        let mut rt = Retrigger::new();
        rt.arm(3, 24, 0.0);
        rt.cancel();
        assert!(!rt.is_armed());
    }
}
