//! Headless controller for the slicebox groovebox.
//!
//! Runs the engine on a dedicated tick thread paced by a [`ThreadTimer`],
//! feeds it through a `ringbuf` command queue, and exposes the published
//! status to the foreground. The one-wire decoder lives here on the
//! foreground side and turns MIDI input into commands.

mod config;
mod loopback;
mod midi;
mod timer;

use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use sb_engine::{ByteSource, CommandSource, Engine, OneWireDecoder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

// Re-export common types so callers don't need sb-ir/sb-engine directly.
pub use sb_engine::{Command, EngineConfig, StatusCell, StatusSnapshot, TRACK_SLOTS};
pub use sb_ir::{PlayMode, SampleEntry, SampleLibrary, Selection, SliceError, SliceTable};

pub use config::HostConfig;
pub use loopback::{loopback, LoopbackSource, WireSender};
pub use midi::MidiBridge;
pub use timer::{SystemClock, ThreadTimer};

/// Error type for controller operations.
#[derive(Debug)]
pub enum HostError {
    /// The engine did not drain the queue fast enough
    QueueFull(Command),
    /// The tick thread is already running
    AlreadyRunning,
    /// No tick thread is running
    NotRunning,
    /// The tick thread could not be started
    Spawn(String),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::QueueFull(cmd) => write!(f, "Command queue full, dropped {:?}", cmd),
            HostError::AlreadyRunning => write!(f, "Engine is already running"),
            HostError::NotRunning => write!(f, "Engine is not running"),
            HostError::Spawn(msg) => write!(f, "Failed to start tick thread: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

/// Headless groovebox controller: owns a sample library and the tick thread.
pub struct Controller {
    library: SampleLibrary,
    engine_config: EngineConfig,
    config: HostConfig,
    status: Arc<StatusCell>,
    decoder: OneWireDecoder,
    bridge: MidiBridge,
    clock: SystemClock,
    session: Option<Session>,
}

struct Session {
    commands: HeapProd<Command>,
    stop_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(library: SampleLibrary, engine_config: EngineConfig, config: HostConfig) -> Self {
        let bridge = MidiBridge::new(config.clocks_per_trigger);
        Self {
            library,
            engine_config,
            config,
            status: Arc::new(StatusCell::new()),
            decoder: OneWireDecoder::new(),
            bridge,
            clock: SystemClock::new(),
            session: None,
        }
    }

    pub fn library(&self) -> &SampleLibrary {
        &self.library
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    // --- Tick thread ---

    /// Start the tick thread. The transport stays stopped until [`Self::start`].
    pub fn launch(&mut self) -> Result<(), HostError> {
        if self.session.is_some() {
            return Err(HostError::AlreadyRunning);
        }

        let (commands, inbox) = HeapRb::<Command>::new(self.config.queue_capacity.max(1)).split();
        let stop_signal = Arc::new(AtomicBool::new(false));

        let engine = Engine::new(self.library.clone(), self.engine_config.clone());
        if !engine.is_loaded() {
            log::warn!(
                target: "host",
                "selection {:?} has no slice table; engine will idle",
                engine.selection()
            );
        }

        let stop = stop_signal.clone();
        let status = self.status.clone();
        let publish = self.config.publish_status;
        let thread = std::thread::Builder::new()
            .name("slicebox-tick".into())
            .spawn(move || tick_thread(engine, Inbox(inbox), status, stop, publish))
            .map_err(|e| HostError::Spawn(e.to_string()))?;

        log::info!(target: "host", "tick thread started");
        self.session = Some(Session {
            commands,
            stop_signal,
            thread: Some(thread),
        });
        Ok(())
    }

    /// Stop and join the tick thread.
    pub fn shutdown(&mut self) -> Result<(), HostError> {
        let mut session = self.session.take().ok_or(HostError::NotRunning)?;
        session.stop_signal.store(true, Ordering::Relaxed);
        if let Some(handle) = session.thread.take() {
            if handle.join().is_err() {
                log::error!(target: "host", "tick thread panicked");
            }
        }
        log::info!(target: "host", "tick thread stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    // --- Commands ---

    /// Queue a command for the next tick.
    pub fn send(&mut self, cmd: Command) -> Result<(), HostError> {
        let session = self.session.as_mut().ok_or(HostError::NotRunning)?;
        push(&mut session.commands, cmd)
    }

    pub fn start(&mut self) -> Result<(), HostError> {
        self.send(Command::Start)
    }

    pub fn resume(&mut self) -> Result<(), HostError> {
        self.send(Command::Continue)
    }

    pub fn stop(&mut self) -> Result<(), HostError> {
        self.send(Command::Stop)
    }

    pub fn set_tempo(&mut self, bpm: u16) -> Result<(), HostError> {
        self.send(Command::SetTempo(bpm))
    }

    pub fn select(&mut self, selection: Selection) -> Result<(), HostError> {
        self.send(Command::Select(selection))
    }

    pub fn set_direction(&mut self, forward: bool) -> Result<(), HostError> {
        self.send(Command::SetDirection { forward })
    }

    pub fn jump(&mut self, beat: u8) -> Result<(), HostError> {
        self.send(Command::Jump(beat))
    }

    /// Arm a retrigger run; a zero period uses the engine default.
    pub fn retrigger(&mut self, steps: u8, period_ticks: u16, volume_step: f32) -> Result<(), HostError> {
        self.send(Command::ArmRetrigger { steps, period_ticks, volume_step })
    }

    pub fn follow_external_clock(&mut self, on: bool) -> Result<(), HostError> {
        self.send(Command::ExternalClock(on))
    }

    /// Silence output until the next trigger.
    pub fn mute(&mut self) -> Result<(), HostError> {
        self.send(Command::Mute)
    }

    // --- MIDI input ---

    /// Drain `source` through the decoder and forward the resulting
    /// commands. Returns the number of bytes consumed.
    ///
    /// On a full queue the undelivered commands stay in the bridge and are
    /// forwarded first on the next poll.
    pub fn poll_midi<S: ByteSource>(&mut self, source: &mut S) -> Result<usize, HostError> {
        let session = self.session.as_mut().ok_or(HostError::NotRunning)?;
        let mut consumed = 0;
        while self.decoder.poll(source, &self.clock, &mut self.bridge) {
            consumed += 1;
        }
        forward(&mut self.bridge, &mut session.commands)?;
        Ok(consumed)
    }

    /// Commands decoded from MIDI but not yet queued.
    pub fn pending_midi(&self) -> &[Command] {
        self.bridge.pending()
    }

    // --- Status ---

    pub fn status(&self) -> StatusSnapshot {
        self.status.load()
    }

    /// Shared handle for readers on other threads.
    pub fn status_cell(&self) -> Arc<StatusCell> {
        self.status.clone()
    }

    /// Consume a pending playback reposition.
    pub fn take_phase_change(&self) -> Option<i32> {
        self.status.take_phase_change()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if self.session.is_some() {
            let _ = self.shutdown();
        }
    }
}

fn push(commands: &mut HeapProd<Command>, cmd: Command) -> Result<(), HostError> {
    commands.try_push(cmd).map_err(HostError::QueueFull)
}

/// Queue the bridge's pending commands in order, keeping whatever does not fit.
fn forward(bridge: &mut MidiBridge, commands: &mut HeapProd<Command>) -> Result<(), HostError> {
    let mut sent = 0;
    let mut result = Ok(());
    for &cmd in bridge.pending() {
        if let Err(e) = push(commands, cmd) {
            result = Err(e);
            break;
        }
        sent += 1;
    }
    bridge.consume(sent);
    if result.is_err() {
        log::warn!(
            target: "host",
            "command queue full, {} MIDI commands held back",
            bridge.pending().len()
        );
    }
    result
}

/// Engine-side end of the host command queue.
struct Inbox(HeapCons<Command>);

impl CommandSource for Inbox {
    fn next_command(&mut self) -> Option<Command> {
        self.0.try_pop()
    }
}

fn tick_thread(
    mut engine: Engine,
    mut inbox: Inbox,
    status: Arc<StatusCell>,
    stop_signal: Arc<AtomicBool>,
    publish: bool,
) {
    let mut timer = ThreadTimer::new(engine.period_us());
    let mut period = timer.period_us();

    while !stop_signal.load(Ordering::Relaxed) {
        timer.wait();
        engine.run_tick(&mut inbox, &mut timer);
        if publish {
            engine.publish(&status);
        }
        if timer.period_us() != period {
            period = timer.period_us();
            log::debug!(
                target: "host::timer",
                "tempo {} bpm, period {} us",
                engine.transport().tempo,
                period
            );
        }
    }
}
