//! Tempo to tick-period arithmetic.

/// Ticks per beat. Matches the MIDI clock quantum (4 × 24).
pub const PPQN: u32 = 96;

/// Tempo the engine boots with.
pub const DEFAULT_TEMPO: u16 = 185;

/// Lowest supported tempo (BPM).
pub const TEMPO_MIN: u16 = 30;

/// Highest supported tempo (BPM).
pub const TEMPO_MAX: u16 = 300;

/// Tick period in microseconds for a tempo: `round(30_000_000 / bpm / 96)`.
///
/// A zero tempo is treated as `TEMPO_MIN` rather than dividing by zero.
pub fn tick_period_us(bpm: u16) -> u32 {
    let bpm = if bpm == 0 { TEMPO_MIN } else { bpm };
    libm::round(30_000_000.0 / bpm as f64 / PPQN as f64) as u32
}

/// Ticks between automatic beat advances for a trigger subdivision.
///
/// Returns `None` for a zero subdivision (no automatic advance).
pub fn ticks_per_trigger(subdivision: u8) -> Option<u32> {
    match subdivision {
        0 => None,
        n => Some(PPQN * n as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_at_common_tempos() {
        assert_eq!(tick_period_us(120), 2604);
        assert_eq!(tick_period_us(185), 1689);
        assert_eq!(tick_period_us(60), 5208);
        assert_eq!(tick_period_us(100), 3125);
    }

    #[test]
    fn period_rounds_to_nearest() {
        for bpm in TEMPO_MIN..=TEMPO_MAX {
            let exact = 30_000_000.0 / bpm as f64 / 96.0;
            let period = tick_period_us(bpm) as f64;
            assert!((period - exact).abs() <= 0.5, "bpm {} -> {}", bpm, period);
        }
    }

    #[test]
    fn period_shrinks_as_tempo_rises() {
        assert!(tick_period_us(200) < tick_period_us(100));
    }

    #[test]
    fn zero_tempo_does_not_divide_by_zero() {
        assert_eq!(tick_period_us(0), tick_period_us(TEMPO_MIN));
    }

    #[test]
    fn trigger_ticks() {
        assert_eq!(ticks_per_trigger(0), None);
        assert_eq!(ticks_per_trigger(1), Some(96));
        assert_eq!(ticks_per_trigger(4), Some(384));
    }
}
