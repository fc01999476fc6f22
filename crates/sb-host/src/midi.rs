//! Maps decoded MIDI messages onto engine commands.

use sb_engine::{Command, MidiHandler};

/// Decoder handler that turns MIDI input into queued [`Command`]s.
///
/// Note-on selects a beat within the bar, the transport messages map
/// directly, and timing clocks are divided down into external clock pulses.
#[derive(Debug)]
pub struct MidiBridge {
    clocks_per_trigger: u32,
    clocks: u32,
    pending: Vec<Command>,
}

impl MidiBridge {
    pub fn new(clocks_per_trigger: u32) -> Self {
        Self {
            clocks_per_trigger: clocks_per_trigger.max(1),
            clocks: 0,
            pending: Vec::new(),
        }
    }

    /// Take every command produced since the last drain, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.pending.drain(..)
    }

    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    /// Drop the oldest `n` pending commands once they have been delivered.
    pub fn consume(&mut self, n: usize) {
        self.pending.drain(..n.min(self.pending.len()));
    }
}

impl MidiHandler for MidiBridge {
    fn note_on(&mut self, note: u8, velocity: u8) {
        // velocity 0 is a note-off by convention
        if velocity > 0 {
            self.pending.push(Command::Jump(note % 16));
        }
    }

    fn start(&mut self) {
        self.clocks = 0;
        self.pending.push(Command::Start);
    }

    fn resume(&mut self) {
        self.pending.push(Command::Continue);
    }

    fn stop(&mut self) {
        self.pending.push(Command::Stop);
    }

    fn timing_clock(&mut self) {
        self.clocks += 1;
        if self.clocks >= self.clocks_per_trigger {
            self.clocks = 0;
            self.pending.push(Command::ClockPulse);
        }
    }
}
