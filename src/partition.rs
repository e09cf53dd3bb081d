//! Static assignment of string lengths to workers.
//!
//! Lengths are split into contiguous chunks of equal count, with the last
//! worker absorbing the remainder. Longer lengths hold exponentially more
//! candidates, so the worker owning the longest lengths usually finishes
//! last. A work-stealing partitioner would balance completion time better;
//! it can be supplied through [`Partitioner`].

use std::ops::Range;

/// Contiguous lengths owned by one worker. May be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    start: usize,
    end: usize,
}

impl LengthRange {
    /// Half-open range `start..end`; `end <= start` yields an empty range.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, length: usize) -> bool {
        (self.start..self.end).contains(&length)
    }

    /// Lengths in ascending order.
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl IntoIterator for LengthRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Range<usize> {
        self.iter()
    }
}

/// Splits `min_length..=max_length` among `workers` workers.
///
/// Implementations must return exactly `workers` ranges that are pairwise
/// disjoint and together cover every length once.
pub trait Partitioner: Send + Sync {
    fn partition(&self, min_length: usize, max_length: usize, workers: usize) -> Vec<LengthRange>;
}

/// Equal-count contiguous chunks; the final chunk takes the remainder.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPartitioner;

impl Partitioner for StaticPartitioner {
    fn partition(&self, min_length: usize, max_length: usize, workers: usize) -> Vec<LengthRange> {
        partition(min_length, max_length, workers)
    }
}

/// See [`StaticPartitioner`].
pub fn partition(min_length: usize, max_length: usize, workers: usize) -> Vec<LengthRange> {
    if workers == 0 {
        return Vec::new();
    }
    let total = if max_length >= min_length {
        max_length - min_length + 1
    } else {
        0
    };
    let chunk = (total / workers).max(1);

    (0..workers)
        .map(|i| {
            let start = i * chunk;
            if start >= total {
                return LengthRange::empty();
            }
            let end = if i + 1 == workers { total } else { start + chunk };
            LengthRange::new(min_length + start, min_length + end)
        })
        .collect()
}
