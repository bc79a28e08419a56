use crate::error::{GeneratorError, Result};
use std::collections::HashSet;
use tinylink_core::shortcode::is_code_char;

/// The Bitcoin base58 alphabet, used when no alphabet is configured.
pub const DEFAULT_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// An ordered set of symbols that short codes are drawn from.
///
/// Symbols are single ASCII bytes, so a symbol's index doubles as its digit
/// value when a counter is rendered in the alphabet's radix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Validates `symbols` and builds an alphabet from them.
    ///
    /// Requires at least two symbols, no repeats, and only characters that
    /// are legal in a short code.
    pub fn new(symbols: &str) -> Result<Self> {
        let mut seen = HashSet::new();

        for c in symbols.chars() {
            if !is_code_char(c) {
                return Err(GeneratorError::InvalidSymbol(c));
            }
            if !seen.insert(c) {
                return Err(GeneratorError::DuplicateSymbol(c));
            }
        }

        if seen.len() < 2 {
            return Err(GeneratorError::AlphabetTooSmall(seen.len()));
        }

        Ok(Self {
            symbols: symbols.as_bytes().to_vec(),
        })
    }

    /// Builds an alphabet from configuration, falling back to
    /// [`DEFAULT_ALPHABET`] when the value is empty.
    pub fn from_config(symbols: &str) -> Result<Self> {
        if symbols.trim().is_empty() {
            Ok(Self::default())
        } else {
            Self::new(symbols.trim())
        }
    }

    /// Number of symbols in the alphabet.
    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the symbol at `index`. Panics if `index >= radix()`.
    pub fn symbol(&self, index: usize) -> char {
        char::from(self.symbols[index])
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.symbols.contains(&(c as u8))
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII code characters.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.as_bytes().to_vec(),
        }
    }
}
