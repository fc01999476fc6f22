//! Real-time tick engine for the slicebox groovebox.
//!
//! Owns transport, play position, retrigger, step sequencer and LFO state
//! in one [`Engine`] context. A periodic timer calls [`Engine::run_tick`];
//! the foreground talks to it only through a single-producer command queue
//! and reads back an atomic [`StatusCell`]. The one-wire MIDI decoder runs
//! on the foreground side and is independent of tempo.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod command;
mod config;
mod decoder;
mod engine;
mod lfo;
mod playhead;
mod random;
mod retrigger;
mod sequencer;
mod status;
mod time_base;
mod transport;

pub use command::{Command, CommandQueue, CommandSource};
pub use config::EngineConfig;
pub use decoder::{decode_wire, encode_wire, ByteSource, MidiCallbacks, MidiHandler, OneWireDecoder};
pub use engine::{Engine, TRACK_SLOTS};
pub use lfo::Lfo;
pub use playhead::{Gate, PlayHead};
pub use random::{RandomSource, SeededRandom};
pub use retrigger::Retrigger;
pub use sequencer::{SeqEvent, SequencerMode, SequencerSlot, StepSequencer, SEQUENCER_CAPACITY};
pub use status::{RenderParams, StatusCell, StatusSnapshot};
pub use time_base::{Clock, TickTimer};
pub use transport::Transport;
