//! Slice tables: how a sample variation is cut into rhythmic slices.

use alloc::vec::Vec;
use core::fmt;

/// What playback does when it reaches a boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Ignore boundaries; the engine advances beats on its own clock.
    #[default]
    FreeRun,
    /// Start at the slice start and stop at the slice end.
    SpliceStop,
    /// Start at the slice start and loop within the slice.
    SpliceLoop,
    /// Start at the slice start and stop at the end of the sample.
    SampleStop,
    /// Start at the slice start and loop back at the end of the sample.
    SampleLoop,
}

impl PlayMode {
    /// Parse a mode name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "free" | "normal" => Some(Self::FreeRun),
            "splice-stop" => Some(Self::SpliceStop),
            "splice-loop" => Some(Self::SpliceLoop),
            "sample-stop" => Some(Self::SampleStop),
            "sample-loop" => Some(Self::SampleLoop),
            _ => None,
        }
    }

    /// True for every mode except free-run.
    pub fn is_bounded(self) -> bool {
        self != Self::FreeRun
    }
}

/// Error building a slice table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// No slices were given
    Empty,
    /// Start and stop lists differ in length
    LengthMismatch { starts: usize, stops: usize },
    /// A slice ends before it begins
    Inverted { slice: usize },
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::Empty => write!(f, "slice table has no slices"),
            SliceError::LengthMismatch { starts, stops } => {
                write!(f, "{} slice starts but {} slice stops", starts, stops)
            }
            SliceError::Inverted { slice } => write!(f, "slice {} stops before it starts", slice),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SliceError {}

/// Slice layout of one sample variation.
///
/// Offsets are positions in the sample's playback phase units. The table is
/// built at load time and only read by the real-time engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceTable {
    starts: Vec<i32>,
    stops: Vec<i32>,
    /// Beats between automatic advances (0 = never on the internal clock)
    pub trigger: u8,
    /// Boundary behavior
    pub mode: PlayMode,
}

impl SliceTable {
    /// Build a table from explicit slice boundaries.
    pub fn new(
        starts: Vec<i32>,
        stops: Vec<i32>,
        trigger: u8,
        mode: PlayMode,
    ) -> Result<Self, SliceError> {
        if starts.is_empty() {
            return Err(SliceError::Empty);
        }
        if starts.len() != stops.len() {
            return Err(SliceError::LengthMismatch { starts: starts.len(), stops: stops.len() });
        }
        if let Some(slice) = starts.iter().zip(&stops).position(|(a, b)| a > b) {
            return Err(SliceError::Inverted { slice });
        }
        Ok(Self { starts, stops, trigger, mode })
    }

    /// Cut `length` phase units into `count` equal slices.
    pub fn evenly_spaced(
        length: i32,
        count: u16,
        trigger: u8,
        mode: PlayMode,
    ) -> Result<Self, SliceError> {
        if count == 0 {
            return Err(SliceError::Empty);
        }
        let width = length / count as i32;
        let starts = (0..count as i32).map(|i| i * width).collect();
        let stops = (0..count as i32).map(|i| (i + 1) * width - 1).collect();
        Self::new(starts, stops, trigger, mode)
    }

    /// Number of slices (always at least one).
    pub fn slice_count(&self) -> u16 {
        self.starts.len() as u16
    }

    /// Start offset of a slice.
    pub fn start(&self, slice: u16) -> i32 {
        self.starts.get(slice as usize).copied().unwrap_or(0)
    }

    /// Stop offset of a slice.
    pub fn stop(&self, slice: u16) -> i32 {
        self.stops.get(slice as usize).copied().unwrap_or(0)
    }
}
