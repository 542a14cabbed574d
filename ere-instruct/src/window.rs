//! Window partitioning
//!
//! A focal event's companions are shuffled once and sliced into
//! `ceil(n / capacity)` windows (at least one) whose sizes differ by at most
//! one, the larger windows first. Each window then receives the focal event and
//! is re-sorted into document order.
//!
//! The number of windows produced per focal event is recorded in a
//! `WindowLedger`; an evaluator needs that sequence to fold flattened per-window
//! predictions back onto (document, focal event) boundaries.

use crate::types::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One window: the focal item plus a slice of the others, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<T> {
    pub focal: T,
    /// All window items including the focal one
    pub members: Vec<T>,
}

/// Splits companions of a focal item into balanced windows
#[derive(Debug, Clone, Copy)]
pub struct WindowPartitioner {
    capacity: usize,
}

impl WindowPartitioner {
    /// Create a partitioner holding at most `capacity` companions per window
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window sizes for `n` companions
    ///
    /// `m = ceil(n / capacity)` windows (one for `n = 0`); the first `n mod m`
    /// windows hold `n / m + 1` items, the rest `n / m`.
    pub fn window_sizes(&self, n: usize) -> Vec<usize> {
        let m = if n > 0 { n.div_ceil(self.capacity) } else { 1 };
        let min_size = n / m;
        let extra = n % m;
        (0..m)
            .map(|i| if i < extra { min_size + 1 } else { min_size })
            .collect()
    }

    /// Shuffle `others` and slice them by `window_sizes`
    pub fn partition<T, R>(&self, mut others: Vec<T>, rng: &mut R) -> Vec<Vec<T>>
    where
        R: Rng + ?Sized,
    {
        let sizes = self.window_sizes(others.len());
        others.shuffle(rng);

        let mut items = others.into_iter();
        sizes
            .into_iter()
            .map(|size| items.by_ref().take(size).collect())
            .collect()
    }

    /// Build the windows for one focal item
    ///
    /// `order_key` gives the document-order position used to re-sort each
    /// window after the focal item is added.
    pub fn windows<T, K, F, R>(&self, focal: T, others: Vec<T>, order_key: F, rng: &mut R) -> Vec<Window<T>>
    where
        T: Clone,
        K: Ord,
        F: Fn(&T) -> K,
        R: Rng + ?Sized,
    {
        self.partition(others, rng)
            .into_iter()
            .map(|mut members| {
                members.push(focal.clone());
                members.sort_by_key(|item| order_key(item));
                Window {
                    focal: focal.clone(),
                    members,
                }
            })
            .collect()
    }
}

/// Per-focal-event window counts, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLedger {
    counts: Vec<usize>,
}

impl WindowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: Vec<usize>) -> Self {
        Self { counts }
    }

    /// Record the window count of the next focal event
    pub fn record(&mut self, count: usize) {
        self.counts.push(count);
    }

    /// Append another ledger's counts
    pub fn extend(&mut self, other: &WindowLedger) {
        self.counts.extend_from_slice(&other.counts);
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of windows (examples) covered by the ledger
    pub fn total_windows(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Persist the counts as a flat JSON list
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.counts)?;
        writer.flush()?;
        Ok(())
    }

    /// Load counts written by `write_json`
    pub fn read_json(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let counts: Vec<usize> = serde_json::from_reader(reader)?;
        Ok(Self { counts })
    }
}
