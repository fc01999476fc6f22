//! Transport state: tempo, tick counter, start/stop requests.

use sb_ir::{tick_period_us, TEMPO_MAX, TEMPO_MIN};

/// Transport state, mutated only by the tick context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transport {
    /// Requested tempo (BPM)
    pub tempo: u16,
    /// Tempo the running timer period was computed from
    pub applied_tempo: u16,
    /// Ticks since start; -1 before the first tick of a run
    pub tick: i64,
    /// Automatic beat advances since start; -1 before the first
    pub beats_total: i64,
    pub playing: bool,
    pub start_pending: bool,
    pub stop_pending: bool,
}

impl Transport {
    /// Stopped transport that starts on its first tick.
    pub fn new(tempo: u16) -> Self {
        let tempo = tempo.clamp(TEMPO_MIN, TEMPO_MAX);
        Self {
            tempo,
            applied_tempo: tempo,
            tick: -1,
            beats_total: -1,
            playing: false,
            start_pending: false,
            stop_pending: false,
        }
    }

    /// Request a tempo; clamped to the supported range.
    pub fn set_tempo(&mut self, bpm: u16) {
        self.tempo = bpm.clamp(TEMPO_MIN, TEMPO_MAX);
    }

    /// If the tempo changed since the last re-arm, record it and return the
    /// new timer period.
    pub fn take_tempo_change(&mut self) -> Option<u32> {
        if self.tempo == self.applied_tempo {
            return None;
        }
        self.applied_tempo = self.tempo;
        Some(tick_period_us(self.tempo))
    }

    /// Period of the currently armed timer.
    pub fn period_us(&self) -> u32 {
        tick_period_us(self.applied_tempo)
    }

    /// Reset counters for a fresh run (consumes a start request).
    pub(crate) fn restart(&mut self) {
        self.start_pending = false;
        self.tick = -1;
        self.beats_total = -1;
        self.playing = true;
    }

    /// Halt (consumes a stop request).
    pub(crate) fn halt(&mut self) {
        self.stop_pending = false;
        self.playing = false;
    }

    /// Tick counter as the sequencer's unsigned clock.
    ///
    /// Wraps modulo 2^32 like a hardware counter; sequencer deltas are
    /// taken with wrapping arithmetic.
    pub fn sequencer_tick(&self) -> u32 {
        (self.tick.max(0) as u64 & u64::from(u32::MAX)) as u32
    }
}
