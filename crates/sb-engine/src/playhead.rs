//! Play position and the slice/phase state machine.
//!
//! [`PlayHead::trigger`] is the single write path for the playback phase:
//! everything that wants to reposition playback sets the beat and calls it.

use sb_ir::SliceTable;

/// Control signals for the gate/attack envelope in the render path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gate {
    /// Ticks since the last trigger; counted by the engine while playing,
    /// cleared on every trigger
    pub counter: u32,
    /// Set when the attack must restart; cleared by the consumer
    pub attack_reset: bool,
}

/// Current beat, derived slice and the playback phase it resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayHead {
    /// Beat index; modulo the slice count it is the slice to play
    pub beat: i32,
    /// Slice resolved by the last trigger
    pub slice: u16,
    /// Playback direction
    pub forward: bool,
    /// Automatic advances to swallow after a manual jump
    pub jump_debounce: u8,
    /// Automatic advances to swallow (quantized entry); blocks retrigger repositioning
    pub quantize_debounce: u16,
    /// Phase the render path should jump to
    pub phase: i32,
    /// Raised by every trigger
    pub phase_changed: bool,
    pub gate: Gate,
    /// Pending mute, cleared by the next trigger
    pub mute: bool,
    /// One-bit visual tick indicator, toggled per trigger
    pub indicator: bool,
}

impl Default for PlayHead {
    fn default() -> Self {
        Self {
            beat: 0,
            slice: 0,
            forward: true,
            jump_debounce: 0,
            quantize_debounce: 0,
            phase: 0,
            phase_changed: false,
            gate: Gate::default(),
            mute: false,
            indicator: false,
        }
    }
}

impl PlayHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the current beat into a slice and phase.
    pub fn trigger(&mut self, table: &SliceTable) {
        let count = table.slice_count().max(1) as i32;
        let slice = self.beat.rem_euclid(count) as u16;
        self.slice = slice;
        self.phase = if self.forward { table.start(slice) } else { table.stop(slice) };
        self.phase_changed = true;
        self.gate.counter = 0;
        self.gate.attack_reset = true;
        self.mute = false;
        self.indicator = !self.indicator;
    }

    /// Step the beat one slice in the current direction.
    ///
    /// Forward wraps modulo `slice_count`; reverse from 0 lands on
    /// `slice_count` itself (which resolves to slice 0). A beat past the
    /// slice count (after a jump) keeps stepping from the slice it plays.
    pub fn advance(&mut self, slice_count: u16) {
        let count = slice_count.max(1) as i32;
        if self.forward {
            self.beat = (self.beat + 1).rem_euclid(count);
        } else if self.beat <= 0 {
            self.beat = count;
        } else {
            self.beat -= 1;
        }
    }

    /// Move to a beat within the current 16-beat bar.
    pub fn jump_within_bar(&mut self, beat: u8) {
        self.beat = self.beat.div_euclid(16) * 16 + beat as i32;
        self.jump_debounce = 1;
    }

    /// Put the beat just before 0 so the first forward advance lands on 0.
    pub fn rewind(&mut self, slice_count: u16) {
        self.beat = slice_count.max(1) as i32 - 1;
    }

    /// Clear per-tick edge flags.
    pub(crate) fn clear_edges(&mut self) {
        self.phase_changed = false;
        self.gate.attack_reset = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_ir::PlayMode;

    fn table(count: u16) -> SliceTable {
        SliceTable::evenly_spaced(count as i32 * 100, count, 1, PlayMode::FreeRun).unwrap()
    }

    #[test]
    fn trigger_forward_uses_slice_start() {
        let t = table(8);
        let mut head = PlayHead::new();
        head.beat = 11;
        head.trigger(&t);
        assert_eq!(head.slice, 3);
        assert_eq!(head.phase, 300);
        assert!(head.phase_changed);
        assert!(head.gate.attack_reset);
    }

    #[test]
    fn trigger_reverse_uses_slice_stop() {
        let t = table(8);
        let mut head = PlayHead::new();
        head.forward = false;
        head.beat = 2;
        head.trigger(&t);
        assert_eq!(head.phase, 299);
    }

    #[test]
    fn trigger_clears_mute_and_gate_and_toggles_indicator() {
        let t = table(4);
        let mut head = PlayHead::new();
        head.mute = true;
        head.gate.counter = 77;
        head.trigger(&t);
        assert!(!head.mute);
        assert_eq!(head.gate.counter, 0);
        assert!(head.indicator);
        head.trigger(&t);
        assert!(!head.indicator);
    }

    #[test]
    fn forward_advance_wraps_to_zero() {
        let mut head = PlayHead::new();
        head.beat = 3;
        head.advance(4);
        assert_eq!(head.beat, 0);
    }

    #[test]
    fn reverse_advance_wraps_to_slice_count() {
        let mut head = PlayHead::new();
        head.forward = false;
        head.beat = 0;
        head.advance(4);
        assert_eq!(head.beat, 4);
        head.advance(4);
        assert_eq!(head.beat, 3);
    }

    #[test]
    fn advance_keeps_slice_in_range_for_all_counts() {
        for count in 1..=64u16 {
            for forward in [true, false] {
                let t = table(count);
                let mut head = PlayHead::new();
                head.forward = forward;
                head.rewind(count);
                for _ in 0..(count as usize * 3 + 5) {
                    head.advance(count);
                    assert!(head.beat >= 0 && head.beat <= count as i32);
                    head.trigger(&t);
                    assert!(head.slice < count);
                }
            }
        }
    }

    #[test]
    fn advance_continues_from_beat_past_slice_count() {
        let t = table(8);
        let mut head = PlayHead::new();
        head.jump_within_bar(12);
        head.trigger(&t);
        assert_eq!(head.slice, 4);
        head.advance(8);
        head.advance(8);
        head.trigger(&t);
        assert_eq!(head.slice, 6);

        let mut head = PlayHead::new();
        head.forward = false;
        head.jump_within_bar(12);
        head.advance(8);
        head.advance(8);
        head.trigger(&t);
        assert_eq!(head.beat, 10);
        assert_eq!(head.slice, 2);
    }

    #[test]
    fn rewind_then_advance_lands_on_zero() {
        let mut head = PlayHead::new();
        head.beat = 5;
        head.rewind(16);
        head.advance(16);
        assert_eq!(head.beat, 0);
    }

    #[test]
    fn jump_stays_in_bar() {
        let mut head = PlayHead::new();
        head.beat = 37;
        head.jump_within_bar(4);
        assert_eq!(head.beat, 36);
        assert_eq!(head.jump_debounce, 1);
    }
}
