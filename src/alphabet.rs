//! Ordered symbol sets used to build candidates.

use std::fmt;

use crate::SwallowError;

/// Printable ASCII without whitespace: digits, lowercase, uppercase, then
/// punctuation.
pub const PRINTABLE: &str = concat!(
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

/// An ordered set of unique symbols.
///
/// Symbol order defines enumeration order: the first symbol is the "zero"
/// digit of the positional counter driven by the enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from `chars`, dropping repeated symbols but keeping
    /// the position of their first occurrence.
    pub fn new(chars: &str) -> Result<Self, SwallowError> {
        let mut symbols: Vec<char> = Vec::with_capacity(chars.len());
        for c in chars.chars() {
            if !symbols.contains(&c) {
                symbols.push(c);
            }
        }
        if symbols.is_empty() {
            return Err(SwallowError::config("alphabet must contain at least one symbol"));
        }
        Ok(Self { symbols })
    }

    /// Build an alphabet with symbols sorted by code point and deduplicated.
    pub fn sorted(chars: &str) -> Result<Self, SwallowError> {
        let mut symbols: Vec<char> = chars.chars().collect();
        symbols.sort_unstable();
        symbols.dedup();
        if symbols.is_empty() {
            return Err(SwallowError::config("alphabet must contain at least one symbol"));
        }
        Ok(Self { symbols })
    }

    pub fn printable() -> Self {
        Self {
            symbols: PRINTABLE.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
