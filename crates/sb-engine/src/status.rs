//! Engine outputs and their lock-free handoff to the foreground.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

/// Control values for the render path, captured after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// Phase to jump to when `phase_changed` is set
    pub phase: i32,
    pub phase_changed: bool,
    pub slice: u16,
    pub beat: i32,
    pub forward: bool,
    pub mute: bool,
    pub gate_counter: u32,
    pub attack_reset: bool,
    /// Retrigger volume multiplier in [0, 1]
    pub retrigger_volume: f32,
    /// Retrigger pitch table index
    pub retrigger_pitch: u8,
    /// Playback rate for `retrigger_pitch`
    pub pitch_ratio: f32,
    /// Pan LFO phase (Q16.16 radians)
    pub lfo_pan: i32,
    /// Tremolo LFO phase (Q16.16 radians)
    pub lfo_tremolo: i32,
    /// Raised on every automatic advance
    pub clock_out: bool,
    /// Visual tick indicator
    pub indicator: bool,
    pub playing: bool,
    pub tick: i64,
    pub beats_total: i64,
    pub tempo: u16,
    /// Active sequencer finished (or was never started)
    pub sequencer_finished: bool,
}

/// What the foreground reads back from a [`StatusCell`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub beat: i32,
    pub slice: u16,
    pub phase: i32,
    pub tick: i32,
    pub beats_total: i32,
    pub tempo: u16,
    pub playing: bool,
    pub forward: bool,
    pub mute: bool,
    pub indicator: bool,
    pub sequencer_finished: bool,
    pub retrigger_volume: f32,
    pub retrigger_pitch: u8,
    pub lfo_pan: i32,
    pub lfo_tremolo: i32,
}

/// Atomic mailbox the tick context publishes into and the foreground reads.
///
/// Each field has a single writer. Edge flags (`phase_changed`,
/// `clock_out`) are only ever raised by the engine and lowered by the
/// reader through the `take_*` methods.
#[derive(Debug)]
pub struct StatusCell {
    beat: AtomicI32,
    slice: AtomicU32,
    phase: AtomicI32,
    tick: AtomicI32,
    beats_total: AtomicI32,
    tempo: AtomicU32,
    playing: AtomicBool,
    forward: AtomicBool,
    mute: AtomicBool,
    indicator: AtomicBool,
    sequencer_finished: AtomicBool,
    retrigger_volume: AtomicU32,
    retrigger_pitch: AtomicU32,
    lfo_pan: AtomicI32,
    lfo_tremolo: AtomicI32,
    phase_changed: AtomicBool,
    clock_out: AtomicBool,
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCell {
    pub const fn new() -> Self {
        Self {
            beat: AtomicI32::new(0),
            slice: AtomicU32::new(0),
            phase: AtomicI32::new(0),
            tick: AtomicI32::new(-1),
            beats_total: AtomicI32::new(-1),
            tempo: AtomicU32::new(0),
            playing: AtomicBool::new(false),
            forward: AtomicBool::new(true),
            mute: AtomicBool::new(false),
            indicator: AtomicBool::new(false),
            sequencer_finished: AtomicBool::new(true),
            // 1.0f32
            retrigger_volume: AtomicU32::new(0x3F80_0000),
            retrigger_pitch: AtomicU32::new(sb_ir::PITCH_MID as u32),
            lfo_pan: AtomicI32::new(0),
            lfo_tremolo: AtomicI32::new(0),
            phase_changed: AtomicBool::new(false),
            clock_out: AtomicBool::new(false),
        }
    }

    /// Publish a tick's outputs.
    pub fn store(&self, p: &RenderParams) {
        self.beat.store(p.beat, Ordering::Relaxed);
        self.slice.store(p.slice as u32, Ordering::Relaxed);
        self.phase.store(p.phase, Ordering::Relaxed);
        self.tick.store(saturate_i32(p.tick), Ordering::Relaxed);
        self.beats_total.store(saturate_i32(p.beats_total), Ordering::Relaxed);
        self.tempo.store(p.tempo as u32, Ordering::Relaxed);
        self.playing.store(p.playing, Ordering::Relaxed);
        self.forward.store(p.forward, Ordering::Relaxed);
        self.mute.store(p.mute, Ordering::Relaxed);
        self.indicator.store(p.indicator, Ordering::Relaxed);
        self.sequencer_finished.store(p.sequencer_finished, Ordering::Relaxed);
        self.retrigger_volume.store(p.retrigger_volume.to_bits(), Ordering::Relaxed);
        self.retrigger_pitch.store(p.retrigger_pitch as u32, Ordering::Relaxed);
        self.lfo_pan.store(p.lfo_pan, Ordering::Relaxed);
        self.lfo_tremolo.store(p.lfo_tremolo, Ordering::Relaxed);
        if p.clock_out {
            self.clock_out.store(true, Ordering::Release);
        }
        // raised last so a reader that sees it also sees the new phase
        if p.phase_changed {
            self.phase_changed.store(true, Ordering::Release);
        }
    }

    pub fn load(&self) -> StatusSnapshot {
        StatusSnapshot {
            beat: self.beat.load(Ordering::Relaxed),
            slice: self.slice.load(Ordering::Relaxed) as u16,
            phase: self.phase.load(Ordering::Relaxed),
            tick: self.tick.load(Ordering::Relaxed),
            beats_total: self.beats_total.load(Ordering::Relaxed),
            tempo: self.tempo.load(Ordering::Relaxed) as u16,
            playing: self.playing.load(Ordering::Relaxed),
            forward: self.forward.load(Ordering::Relaxed),
            mute: self.mute.load(Ordering::Relaxed),
            indicator: self.indicator.load(Ordering::Relaxed),
            sequencer_finished: self.sequencer_finished.load(Ordering::Relaxed),
            retrigger_volume: f32::from_bits(self.retrigger_volume.load(Ordering::Relaxed)),
            retrigger_pitch: self.retrigger_pitch.load(Ordering::Relaxed) as u8,
            lfo_pan: self.lfo_pan.load(Ordering::Relaxed),
            lfo_tremolo: self.lfo_tremolo.load(Ordering::Relaxed),
        }
    }

    /// Consume a pending phase change, returning the phase to jump to.
    pub fn take_phase_change(&self) -> Option<i32> {
        if self.phase_changed.swap(false, Ordering::Acquire) {
            Some(self.phase.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Consume a pending clock-out pulse.
    pub fn take_clock_out(&self) -> bool {
        self.clock_out.swap(false, Ordering::Acquire)
    }
}

/// Narrow a counter for the 32-bit atomics, pinning at the limits.
fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
