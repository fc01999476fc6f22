//! Q16.16 fixed-point constants.

/// 1.0 in Q16.16.
pub const Q16_16_ONE: i32 = 1 << 16;

/// One full oscillator turn (2π) in Q16.16.
pub const Q16_16_TWO_PI: i32 = 411_775;
