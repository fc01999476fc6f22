//! Foreground requests, applied by the engine at tick boundaries.

use sb_ir::Selection;

/// A request from the foreground to the tick context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Change tempo (BPM); the timer is re-armed on the next tick
    SetTempo(u16),
    /// Restart playback from the top of the slice table
    Start,
    /// Resume without resetting counters
    Continue,
    Stop,
    /// Switch bank/sample/variation
    Select(Selection),
    /// Playback direction
    SetDirection { forward: bool },
    /// Jump to a beat within the current bar (0-15)
    Jump(u8),
    /// Start a retrigger run; a zero period uses the configured default
    ArmRetrigger { steps: u8, period_ticks: u16, volume_step: f32 },
    CancelRetrigger,
    /// Make a track slot's sequencer the active one
    SelectTrack(u8),
    /// Clear the active sequencer and start recording jumps into it
    RecordSequence,
    /// Loop the active sequencer's recording
    PlaySequence,
    /// Stop recording or playback on the active sequencer
    StopSequence,
    /// Drop the active sequencer's recording
    ClearSequence,
    /// Follow an external clock instead of the internal trigger subdivision
    ExternalClock(bool),
    /// One external clock pulse
    ClockPulse,
    /// Swallow the next `n` automatic advances
    QuantizeDebounce(u16),
    /// Silence output until the next trigger repositions playback
    Mute,
}

/// Fixed-capacity single-producer/single-consumer command queue.
pub type CommandQueue<const N: usize> = heapless::spsc::Queue<Command, N>;

/// The consumer side of a command queue.
pub trait CommandSource {
    fn next_command(&mut self) -> Option<Command>;
}

impl<const N: usize> CommandSource for heapless::spsc::Consumer<'_, Command, N> {
    fn next_command(&mut self) -> Option<Command> {
        self.dequeue()
    }
}

impl<const N: usize> CommandSource for heapless::spsc::Queue<Command, N> {
    fn next_command(&mut self) -> Option<Command> {
        self.dequeue()
    }
}
