//! Host-side settings.

/// Settings for a [`crate::Controller`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Capacity of the foreground-to-engine command queue
    pub queue_capacity: usize,
    /// Publish engine outputs to the status cell after every tick
    pub publish_status: bool,
    /// MIDI timing clocks per external clock pulse (24 = one quarter note)
    pub clocks_per_trigger: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            publish_status: true,
            clocks_per_trigger: 24,
        }
    }
}
