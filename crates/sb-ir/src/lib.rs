//! Core data types for the slicebox groovebox.
//!
//! This crate defines the read-only tables the real-time engine consumes:
//! slice tables grouped into a sample library, play-boundary modes, the
//! pitch ratio table, and the tempo/tick arithmetic shared by the engine
//! and its hosts.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod fixed;
mod library;
mod pitch;
mod slice;
mod tempo;

pub use fixed::{Q16_16_ONE, Q16_16_TWO_PI};
pub use library::{Bank, SampleEntry, SampleLibrary, Selection};
pub use pitch::{pitch_ratio, PITCH_MAX, PITCH_MID};
pub use slice::{PlayMode, SliceError, SliceTable};
pub use tempo::{tick_period_us, ticks_per_trigger, DEFAULT_TEMPO, PPQN, TEMPO_MAX, TEMPO_MIN};
