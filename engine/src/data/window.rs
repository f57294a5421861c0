//! Fixed-capacity candle window

use crate::data::Candle;
use std::collections::VecDeque;

/// Chronological ring buffer of candles for one instrument.
///
/// Pushing past capacity evicts the oldest candle.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    candles: VecDeque<Candle>,
    capacity: usize,
}

impl CandleWindow {
    /// Create an empty window; a zero capacity is bumped to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a window from candles in arrival order, keeping the newest `capacity`
    pub fn from_candles(capacity: usize, candles: impl IntoIterator<Item = Candle>) -> Self {
        let mut window = Self::new(capacity);
        window.extend(candles);
        window
    }

    /// Append a candle, evicting the oldest when full
    pub fn push(&mut self, candle: Candle) {
        if self.candles.len() == self.capacity {
            self.candles.pop_front();
        }
        self.candles.push_back(candle);
    }

    /// Append candles in order
    pub fn extend(&mut self, candles: impl IntoIterator<Item = Candle>) {
        for candle in candles {
            self.push(candle);
        }
    }

    /// Replace the whole window (historical re-fetch)
    pub fn replace(&mut self, candles: impl IntoIterator<Item = Candle>) {
        self.candles.clear();
        self.extend(candles);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.back()
    }

    /// Candle before the most recent one
    pub fn previous(&self) -> Option<&Candle> {
        self.candles.len().checked_sub(2).and_then(|i| self.candles.get(i))
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Candle> + ExactSizeIterator {
        self.candles.iter()
    }

    /// Get close prices as vector
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Get volumes as vector
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

impl<'a> IntoIterator for &'a CandleWindow {
    type Item = &'a Candle;
    type IntoIter = std::collections::vec_deque::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
