//! The engine context and its tick scheduler.
//!
//! One [`Engine`] owns every piece of real-time state. The periodic timer
//! calls [`Engine::run_tick`], which first applies queued foreground
//! commands and then advances exactly one tick. Nothing on this path
//! allocates or blocks.

use sb_ir::{pitch_ratio, ticks_per_trigger, SampleLibrary, Selection};

use crate::command::{Command, CommandSource};
use crate::config::EngineConfig;
use crate::lfo::Lfo;
use crate::playhead::PlayHead;
use crate::random::{RandomSource, SeededRandom};
use crate::retrigger::Retrigger;
use crate::sequencer::SequencerSlot;
use crate::status::{RenderParams, StatusCell};
use crate::time_base::TickTimer;
use crate::transport::Transport;

/// Number of track slots, each with its own sequencer.
pub const TRACK_SLOTS: usize = 3;

/// External clock in/out lines.
#[derive(Clone, Copy, Debug, Default)]
struct ClockIo {
    /// Advance on external pulses instead of the trigger subdivision
    external: bool,
    /// A pulse arrived and has not been consumed
    ready: bool,
    /// Raised on every automatic advance
    out: bool,
}

/// The real-time engine.
pub struct Engine<R: RandomSource = SeededRandom> {
    library: SampleLibrary,
    selection: Selection,
    transport: Transport,
    head: PlayHead,
    retrigger: Retrigger,
    tracks: [SequencerSlot; TRACK_SLOTS],
    active_track: usize,
    clock: ClockIo,
    pan: Lfo,
    tremolo: Lfo,
    /// Retrigger period used when a request leaves it at zero
    retrigger_period: u16,
    rng: R,
}

impl Engine<SeededRandom> {
    /// Create an engine with the configured seed.
    pub fn new(library: SampleLibrary, config: EngineConfig) -> Self {
        let rng = SeededRandom::new(config.seed);
        Self::with_random(library, config, rng)
    }
}

impl<R: RandomSource> Engine<R> {
    /// Create an engine with an explicit random source.
    pub fn with_random(library: SampleLibrary, config: EngineConfig, rng: R) -> Self {
        let mut head = PlayHead::new();
        head.forward = config.forward;
        let active_track = (config.active_track as usize).min(TRACK_SLOTS - 1);

        Self {
            library,
            selection: config.selection,
            transport: Transport::new(config.tempo),
            head,
            retrigger: Retrigger::new(),
            tracks: Default::default(),
            active_track,
            clock: ClockIo::default(),
            pan: Lfo::new(config.pan_step),
            tremolo: Lfo::new(config.tremolo_step),
            retrigger_period: config.retrigger_period.max(1),
            rng,
        }
    }

    // --- Foreground interface ---

    /// Apply every queued command, then advance one tick.
    pub fn run_tick<C: CommandSource, T: TickTimer>(&mut self, inbox: &mut C, timer: &mut T) {
        while let Some(cmd) = inbox.next_command() {
            self.apply(cmd);
        }

        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.tick(timer));
        #[cfg(not(feature = "alloc_check"))]
        self.tick(timer);
    }

    /// Apply one foreground request.
    pub fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::SetTempo(bpm) => self.transport.set_tempo(bpm),
            Command::Start => self.transport.start_pending = true,
            Command::Continue => {
                if !self.transport.stop_pending {
                    self.transport.playing = true;
                }
            }
            Command::Stop => self.transport.stop_pending = true,
            Command::Select(sel) => {
                if self.library.table(sel).is_some() {
                    self.selection = sel;
                } else {
                    log::warn!(target: "engine", "ignoring selection of missing sample {:?}", sel);
                }
            }
            Command::SetDirection { forward } => self.head.forward = forward,
            Command::Jump(beat) => self.key_do_jump(beat),
            Command::ArmRetrigger { steps, period_ticks, volume_step } => {
                let period = if period_ticks == 0 { self.retrigger_period } else { period_ticks };
                self.retrigger.arm(steps, period, volume_step);
            }
            Command::CancelRetrigger => self.retrigger.cancel(),
            Command::SelectTrack(slot) => {
                if (slot as usize) < TRACK_SLOTS {
                    self.active_track = slot as usize;
                } else {
                    log::warn!(target: "engine", "ignoring track slot {}", slot);
                }
            }
            Command::RecordSequence => self.tracks[self.active_track].record(),
            Command::PlaySequence => self.tracks[self.active_track].play(),
            Command::StopSequence => self.tracks[self.active_track].idle(),
            Command::ClearSequence => self.tracks[self.active_track].sequencer.clear(),
            Command::ExternalClock(on) => {
                self.clock.external = on;
                self.clock.ready = false;
            }
            Command::ClockPulse => self.clock.ready = true,
            Command::QuantizeDebounce(n) => self.head.quantize_debounce = n,
            Command::Mute => self.head.mute = true,
        }
    }

    /// Jump to `beat` (0-15) within the current bar.
    ///
    /// Recorded into the active sequencer when it is capturing. Suppresses
    /// the next automatic advance so the jump is heard.
    pub fn key_do_jump(&mut self, beat: u8) {
        if beat >= 16 {
            log::warn!(target: "engine", "ignoring jump to beat {}", beat);
            return;
        }
        let tick = self.transport.sequencer_tick();
        let slot = &mut self.tracks[self.active_track];
        if slot.is_recording() {
            slot.sequencer.add(beat, tick);
        }
        self.head.jump_within_bar(beat);
        self.retrigger.center_pitch();
        self.update_phase();
    }

    // --- Tick ---

    /// Advance one tick.
    pub fn tick<T: TickTimer>(&mut self, timer: &mut T) {
        let Some(table) = self.library.table(self.selection) else {
            return;
        };
        let slice_count = table.slice_count();
        let trigger = table.trigger;
        let bounded = table.mode.is_bounded();

        if let Some(period) = self.transport.take_tempo_change() {
            timer.reschedule(period);
        }

        if self.transport.start_pending {
            self.transport.restart();
            self.retrigger.cancel();
            self.head.rewind(slice_count);
        }
        if self.transport.stop_pending {
            self.transport.halt();
            self.head.beat = 0;
        }
        if !self.transport.playing {
            return;
        }

        self.transport.tick += 1;
        self.head.gate.counter = self.head.gate.counter.saturating_add(1);

        if self.retrigger.is_armed() {
            if self.retrigger.is_step_tick(self.transport.tick)
                && self.retrigger.step(&mut self.rng)
                && self.head.quantize_debounce == 0
            {
                self.update_phase();
            }
        } else if self.tracks[self.active_track].is_playing() && bounded {
            self.step_sequencer();
        } else if self.auto_trigger_enabled(trigger) && self.selection.is_base_variation() {
            self.retrigger.reset_cosmetics();
            if self.tracks[self.active_track].is_playing() {
                self.step_sequencer();
            } else if self.advance_due(trigger) {
                self.clock.ready = false;
                if self.head.quantize_debounce == 0 {
                    self.head.advance(slice_count);
                    self.transport.beats_total += 1;
                    self.clock.out = true;
                    if self.head.jump_debounce == 0 {
                        self.update_phase();
                    } else {
                        self.head.jump_debounce -= 1;
                    }
                } else {
                    self.head.quantize_debounce -= 1;
                }
            }
        }

        self.pan.advance();
        self.tremolo.advance();
    }

    /// Resolve the current beat into a playback phase.
    fn update_phase(&mut self) {
        if let Some(table) = self.library.table(self.selection) {
            self.head.trigger(table);
        }
    }

    fn step_sequencer(&mut self) {
        let tick = self.transport.sequencer_tick();
        if let Some(key) = self.tracks[self.active_track].sequencer.step(tick) {
            self.key_do_jump(key);
        }
    }

    fn auto_trigger_enabled(&self, trigger: u8) -> bool {
        if self.clock.external {
            self.clock.ready
        } else {
            trigger > 0
        }
    }

    fn advance_due(&self, trigger: u8) -> bool {
        if self.clock.external {
            return self.clock.ready;
        }
        ticks_per_trigger(trigger).is_some_and(|n| self.transport.tick.rem_euclid(n as i64) == 0)
    }

    // --- Outputs ---

    /// Control values for the render path.
    pub fn render_params(&self) -> RenderParams {
        let pitch = self.retrigger.pitch();
        RenderParams {
            phase: self.head.phase,
            phase_changed: self.head.phase_changed,
            slice: self.head.slice,
            beat: self.head.beat,
            forward: self.head.forward,
            mute: self.head.mute,
            gate_counter: self.head.gate.counter,
            attack_reset: self.head.gate.attack_reset,
            retrigger_volume: self.retrigger.volume(),
            retrigger_pitch: pitch,
            pitch_ratio: pitch_ratio(pitch),
            lfo_pan: self.pan.phase(),
            lfo_tremolo: self.tremolo.phase(),
            clock_out: self.clock.out,
            indicator: self.head.indicator,
            playing: self.transport.playing,
            tick: self.transport.tick,
            beats_total: self.transport.beats_total,
            tempo: self.transport.tempo,
            sequencer_finished: self.tracks[self.active_track].sequencer.is_finished(),
        }
    }

    /// Publish outputs to the foreground and lower the edge flags.
    pub fn publish(&mut self, cell: &StatusCell) {
        cell.store(&self.render_params());
        self.head.clear_edges();
        self.clock.out = false;
    }

    // --- Accessors ---

    /// True when the active selection resolves to a slice table.
    pub fn is_loaded(&self) -> bool {
        self.library.table(self.selection).is_some()
    }

    /// Period of the currently armed timer.
    pub fn period_us(&self) -> u32 {
        self.transport.period_us()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn head(&self) -> &PlayHead {
        &self.head
    }

    pub fn retrigger(&self) -> &Retrigger {
        &self.retrigger
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn library(&self) -> &SampleLibrary {
        &self.library
    }

    pub fn active_track(&self) -> usize {
        self.active_track
    }

    pub fn track(&self, slot: usize) -> Option<&SequencerSlot> {
        self.tracks.get(slot)
    }
}
