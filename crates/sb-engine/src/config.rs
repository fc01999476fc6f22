//! Engine configuration.

use sb_ir::{Selection, DEFAULT_TEMPO, PPQN, Q16_16_TWO_PI};

/// Boot-time engine settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Initial tempo (BPM)
    pub tempo: u16,
    /// Initial bank/sample/variation
    pub selection: Selection,
    /// Initial playback direction
    pub forward: bool,
    /// Pan LFO increment per tick (Q16.16 radians)
    pub pan_step: i32,
    /// Tremolo LFO increment per tick (Q16.16 radians)
    pub tremolo_step: i32,
    /// Retrigger step period used when a request leaves it at zero
    pub retrigger_period: u16,
    /// Track slot whose sequencer the scheduler drives
    pub active_track: u8,
    /// Seed for the retrigger dice
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            selection: Selection::default(),
            forward: true,
            // one turn every five beats
            pan_step: Q16_16_TWO_PI / (PPQN as i32 * 5),
            // one turn per beat
            tremolo_step: Q16_16_TWO_PI / PPQN as i32,
            retrigger_period: PPQN as u16,
            active_track: 0,
            seed: 0x5eed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.tempo, 185);
        assert_eq!(cfg.pan_step, 857);
        assert_eq!(cfg.tremolo_step, 4289);
        assert_eq!(cfg.retrigger_period, 96);
        assert!(cfg.forward);
    }
}
