//! Deterministic enumeration of fixed-length candidates over an alphabet.
//!
//! Candidates are produced in positional radix order: the rightmost position
//! varies fastest and symbols count up in alphabet order. For alphabet `ab`
//! and length 2 the order is `aa`, `ab`, `ba`, `bb`.

use std::sync::Arc;

/// Number of candidates of `length` symbols over an alphabet of
/// `alphabet_len` symbols, or `None` if it does not fit in a `u64`.
pub fn combinations(alphabet_len: usize, length: usize) -> Option<u64> {
    let exp = u32::try_from(length).ok()?;
    (alphabet_len as u64).checked_pow(exp)
}

/// Returns the candidate at position `index` of the enumeration order.
/// `None` when the index is past the end.
pub fn candidate_at(symbols: &[char], length: usize, index: u64) -> Option<String> {
    let base = symbols.len() as u64;
    if base == 0 || index >= combinations(symbols.len(), length)? {
        return None;
    }
    let mut digits = vec![0usize; length];
    let mut rest = index;
    for slot in digits.iter_mut().rev() {
        *slot = (rest % base) as usize;
        rest /= base;
    }
    Some(digits.into_iter().map(|d| symbols[d]).collect())
}

/// Lazy cursor over all candidates of one length.
///
/// Holds one counter digit per position, so memory stays independent of the
/// size of the space.
#[derive(Debug, Clone)]
pub struct Enumerator {
    symbols: Arc<[char]>,
    digits: Vec<usize>,
    exhausted: bool,
}

impl Enumerator {
    pub fn new(symbols: Arc<[char]>, length: usize) -> Self {
        let exhausted = symbols.is_empty();
        Self {
            symbols,
            digits: vec![0; length],
            exhausted,
        }
    }

    pub fn length(&self) -> usize {
        self.digits.len()
    }

    /// Rewind to the first candidate.
    pub fn reset(&mut self) {
        self.digits.iter_mut().for_each(|d| *d = 0);
        self.exhausted = self.symbols.is_empty();
    }

    /// Replace the contents of `batch` with up to `max` next candidates.
    ///
    /// Returns the number written. A result below `max` means the sequence is
    /// exhausted; further calls return 0.
    pub fn next_batch(&mut self, max: usize, batch: &mut Vec<String>) -> usize {
        batch.clear();
        while batch.len() < max {
            match self.next() {
                Some(candidate) => batch.push(candidate),
                None => break,
            }
        }
        batch.len()
    }

    fn current(&self) -> String {
        self.digits.iter().map(|&d| self.symbols[d]).collect()
    }

    /// Step the counter; marks exhaustion on wrap-around.
    fn advance(&mut self) {
        let base = self.symbols.len();
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < base {
                return;
            }
            *digit = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for Enumerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let out = self.current();
        self.advance();
        Some(out)
    }
}
