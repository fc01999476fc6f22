//! Banks of samples, each with one or more slice-table variations.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::slice::SliceTable;

/// The active (bank, sample, variation) triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub bank: u8,
    pub sample: u8,
    /// 0 is the base variation; others are time-stretched renderings
    pub variation: u8,
}

impl Selection {
    pub const fn new(bank: u8, sample: u8, variation: u8) -> Self {
        Self { bank, sample, variation }
    }

    /// True when the base (non-time-stretched) variation is selected.
    pub fn is_base_variation(&self) -> bool {
        self.variation == 0
    }
}

/// One sample and its variations.
#[derive(Clone, Debug)]
pub struct SampleEntry {
    /// Sample name
    pub name: ArrayString<26>,
    /// Variations sharing beat indices but with their own slice tables
    pub variations: Vec<SliceTable>,
}

impl SampleEntry {
    /// Create a sample with a base variation.
    pub fn new(name: &str, base: SliceTable) -> Self {
        let mut entry = Self { name: ArrayString::new(), variations: Vec::new() };
        let _ = entry.name.try_push_str(name);
        entry.variations.push(base);
        entry
    }

    /// Add a variation, returning its index.
    pub fn add_variation(&mut self, table: SliceTable) -> u8 {
        self.variations.push(table);
        (self.variations.len() - 1) as u8
    }
}

/// A bank of samples.
#[derive(Clone, Debug, Default)]
pub struct Bank {
    pub samples: Vec<SampleEntry>,
}

/// Every loaded bank. Built by the loader, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct SampleLibrary {
    pub banks: Vec<Bank>,
}

impl SampleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: a library holding a single sample in bank 0.
    pub fn single(entry: SampleEntry) -> Self {
        let mut library = Self::new();
        library.banks.push(Bank { samples: alloc::vec![entry] });
        library
    }

    /// Add a bank, returning its index.
    pub fn add_bank(&mut self, bank: Bank) -> u8 {
        self.banks.push(bank);
        (self.banks.len() - 1) as u8
    }

    /// Look up the slice table for a selection.
    pub fn table(&self, sel: Selection) -> Option<&SliceTable> {
        self.banks
            .get(sel.bank as usize)?
            .samples
            .get(sel.sample as usize)?
            .variations
            .get(sel.variation as usize)
    }

    /// Number of samples in a bank (0 for a missing bank).
    pub fn sample_count(&self, bank: u8) -> usize {
        self.banks.get(bank as usize).map_or(0, |b| b.samples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.banks.iter().all(|b| b.samples.is_empty())
    }
}
