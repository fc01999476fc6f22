//! Step sequencer: records key presses against the tick counter and loops
//! them back.
//!
//! Recording and playback share one buffer but keep separate cursors. A slot
//! is in exactly one [`SequencerMode`] at a time, so a buffer is never
//! recorded into and played back from in the same tick.

use heapless::Vec;

/// Maximum recorded events per sequencer.
pub const SEQUENCER_CAPACITY: usize = 255;

/// A recorded key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeqEvent {
    /// Beat-within-bar key (0-15)
    pub key: u8,
    /// Ticks after the recording origin
    pub delta: u32,
}

/// Fixed-capacity record buffer with an independent playback cursor.
#[derive(Clone, Debug)]
pub struct StepSequencer {
    events: Vec<SeqEvent, SEQUENCER_CAPACITY>,
    /// Tick of the first recorded event
    record_origin: u32,
    /// Next event to play
    cursor: usize,
    /// Tick playback was anchored at
    play_origin: u32,
    /// Playback reached the end (or was stopped); next step re-anchors
    finished: bool,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSequencer {
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            record_origin: 0,
            cursor: 0,
            play_origin: 0,
            finished: true,
        }
    }

    /// Drop every recorded event and stop playback.
    pub fn clear(&mut self) {
        self.events.clear();
        self.record_origin = 0;
        self.cursor = 0;
        self.play_origin = 0;
        self.finished = true;
    }

    /// Record `key` at absolute `tick`. Ignored once the buffer is full.
    ///
    /// The first event anchors the origin. Later events are stored one tick
    /// early to cancel the capture latency of the key path.
    pub fn add(&mut self, key: u8, tick: u32) {
        let delta = if self.events.is_empty() {
            self.record_origin = tick;
            0
        } else {
            tick.wrapping_sub(self.record_origin).saturating_sub(1)
        };
        let _ = self.events.push(SeqEvent { key, delta });
    }

    /// Advance playback to `tick`, returning the key due on this tick.
    pub fn step(&mut self, tick: u32) -> Option<u8> {
        // A lone event would be both the first step and the loop end.
        if self.events.len() < 2 {
            return None;
        }
        if self.finished {
            self.finished = false;
            self.cursor = 0;
            self.play_origin = tick;
        }
        let event = self.events[self.cursor];
        if tick.wrapping_sub(self.play_origin) != event.delta {
            return None;
        }
        self.cursor += 1;
        if self.cursor >= self.events.len() {
            self.finished = true;
        }
        Some(event.key)
    }

    /// Stop playback; the next `step` restarts from the top.
    pub fn stop(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }

    pub fn events(&self) -> &[SeqEvent] {
        &self.events
    }
}

/// What a track slot's sequencer is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequencerMode {
    #[default]
    Idle,
    /// Manual jumps are appended to the buffer
    Recording,
    /// The buffer drives jumps
    Playing,
}

/// A sequencer owned by one track slot.
#[derive(Clone, Debug, Default)]
pub struct SequencerSlot {
    pub sequencer: StepSequencer,
    pub mode: SequencerMode,
}

impl SequencerSlot {
    /// Clear the buffer and start capturing.
    pub fn record(&mut self) {
        self.sequencer.clear();
        self.mode = SequencerMode::Recording;
    }

    /// Loop the recorded buffer from the top.
    pub fn play(&mut self) {
        self.sequencer.stop();
        self.mode = SequencerMode::Playing;
    }

    /// Leave recording/playback; the buffer is kept.
    pub fn idle(&mut self) {
        self.sequencer.stop();
        self.mode = SequencerMode::Idle;
    }

    pub fn is_recording(&self) -> bool {
        self.mode == SequencerMode::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.mode == SequencerMode::Playing
    }
}
