//! One-wire MIDI decoder.
//!
//! Bytes are captured least-significant-bit first with the line idling
//! high, so every captured byte is bit-reversed and inverted before it is
//! classified. Only note on/off and the transport realtime messages are
//! understood; everything else is dropped and the frame resynchronizes.

use arrayvec::ArrayVec;

use crate::time_base::Clock;

const NOTE_OFF_MIN: u8 = 0x80;
const NOTE_OFF_MAX: u8 = 0x8F;
const NOTE_ON_MIN: u8 = 0x90;
const NOTE_ON_MAX: u8 = 0x9F;
const TIMING_CLOCK: u8 = 0xF8;
const START: u8 = 0xFA;
const CONTINUE: u8 = 0xFB;
const STOP: u8 = 0xFC;
const ACTIVE_SENSE: u8 = 0xFE;

/// Silence longer than this (µs) between bytes restarts the frame.
const SILENCE_GAP_US: u32 = 1000;

/// Recover a logical byte from a captured one.
pub fn decode_wire(raw: u8) -> u8 {
    !raw.reverse_bits()
}

/// Produce the captured form of a logical byte (inverse of [`decode_wire`]).
pub fn encode_wire(byte: u8) -> u8 {
    (!byte).reverse_bits()
}

/// Non-blocking source of captured bytes.
pub trait ByteSource {
    fn next_byte(&mut self) -> Option<u8>;
}

/// Receives decoded events. Every method defaults to a no-op, so a handler
/// only implements what it cares about.
pub trait MidiHandler {
    fn note_on(&mut self, _note: u8, _velocity: u8) {}
    fn note_off(&mut self, _note: u8) {}
    fn start(&mut self) {}
    /// MIDI Continue
    fn resume(&mut self) {}
    fn stop(&mut self) {}
    fn timing_clock(&mut self) {}
}

/// Handler with no callbacks at all.
impl MidiHandler for () {}

/// Plain function-pointer callbacks; `None` slots are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct MidiCallbacks {
    pub note_on: Option<fn(u8, u8)>,
    pub note_off: Option<fn(u8)>,
    pub start: Option<fn()>,
    pub resume: Option<fn()>,
    pub stop: Option<fn()>,
    pub timing_clock: Option<fn()>,
}

impl MidiHandler for MidiCallbacks {
    fn note_on(&mut self, note: u8, velocity: u8) {
        if let Some(f) = self.note_on {
            f(note, velocity);
        }
    }

    fn note_off(&mut self, note: u8) {
        if let Some(f) = self.note_off {
            f(note);
        }
    }

    fn start(&mut self) {
        if let Some(f) = self.start {
            f();
        }
    }

    fn resume(&mut self) {
        if let Some(f) = self.resume {
            f();
        }
    }

    fn stop(&mut self) {
        if let Some(f) = self.stop {
            f();
        }
    }

    fn timing_clock(&mut self) {
        if let Some(f) = self.timing_clock {
            f();
        }
    }
}

fn is_note_status(byte: u8) -> bool {
    (NOTE_OFF_MIN..=NOTE_ON_MAX).contains(&byte)
}

/// Frame decoder state. Not reentrant: feed it from one context only.
#[derive(Clone, Debug, Default)]
pub struct OneWireDecoder {
    /// Status byte plus up to two data bytes
    frame: ArrayVec<u8, 3>,
    /// Capture time of the previous byte
    last_us: u32,
}

impl OneWireDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position within the current frame (0-2).
    pub fn frame_index(&self) -> usize {
        self.frame.len()
    }

    /// Poll `source` once; returns true if a byte was consumed.
    pub fn poll<S, C, H>(&mut self, source: &mut S, clock: &C, handler: &mut H) -> bool
    where
        S: ByteSource,
        C: Clock,
        H: MidiHandler,
    {
        match source.next_byte() {
            Some(raw) => {
                self.feed(raw, clock.now_us(), handler);
                true
            }
            None => false,
        }
    }

    /// Process one captured byte taken at `now_us`.
    pub fn feed<H: MidiHandler>(&mut self, raw: u8, now_us: u32, handler: &mut H) {
        if now_us.wrapping_sub(self.last_us) > SILENCE_GAP_US {
            self.frame.clear();
        }
        self.last_us = now_us;

        let byte = decode_wire(raw);
        match byte {
            START => {
                handler.start();
                self.frame.clear();
            }
            CONTINUE => {
                handler.resume();
                self.frame.clear();
            }
            STOP => {
                handler.stop();
                self.frame.clear();
            }
            TIMING_CLOCK => {
                handler.timing_clock();
                self.frame.clear();
            }
            ACTIVE_SENSE => self.frame.clear(),
            _ => self.frame_byte(byte, handler),
        }
    }

    fn frame_byte<H: MidiHandler>(&mut self, byte: u8, handler: &mut H) {
        if self.frame.is_empty() {
            if is_note_status(byte) {
                let _ = self.frame.try_push(byte);
            } else {
                log::warn!(target: "engine::decoder", "unexpected byte {:02X} at frame start", byte);
            }
            return;
        }

        if byte & 0x80 != 0 {
            log::warn!(
                target: "engine::decoder",
                "status {:02X} inside frame at index {}",
                byte,
                self.frame.len()
            );
            self.frame.clear();
            if is_note_status(byte) {
                let _ = self.frame.try_push(byte);
            }
            return;
        }

        let _ = self.frame.try_push(byte);
        if self.frame.is_full() {
            let (status, data1, data2) = (self.frame[0], self.frame[1], self.frame[2]);
            self.frame.clear();
            match status {
                NOTE_ON_MIN..=NOTE_ON_MAX => handler.note_on(data1, data2),
                NOTE_OFF_MIN..=NOTE_OFF_MAX => handler.note_off(data1),
                _ => log::warn!(
                    target: "engine::decoder",
                    "dropped frame {:02X} {:02X} {:02X}",
                    status,
                    data1,
                    data2
                ),
            }
        }
    }
}
