//! Pitch ratio table used by retrigger pitch bends.
//!
//! Indices step in quarter tones (24-TET) from two octaves down
//! (ratio 0.25) to one octave up (ratio 2.0).

/// Number of entries in the pitch table.
pub const PITCH_MAX: u8 = 73;

/// Index of the unity ratio.
pub const PITCH_MID: u8 = 48;

/// Playback-rate ratio for a pitch index. Out-of-range indices clamp.
pub fn pitch_ratio(index: u8) -> f32 {
    let index = index.min(PITCH_MAX - 1);
    let steps = index as f32 - PITCH_MID as f32;
    libm::exp2f(steps / 24.0)
}
