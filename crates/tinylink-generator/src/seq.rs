use crate::alphabet::Alphabet;
use crate::error::{GeneratorError, Result};
use crate::Generator;
use std::sync::atomic::{AtomicU64, Ordering};
use tinylink_core::shortcode::MAX_LENGTH;
use tinylink_core::ShortCode;

/// A short code generator backed by an atomic counter.
///
/// Each call takes the next counter value and renders it in the alphabet's
/// radix using bijective numbering: with alphabet `ab` the codes run
/// `a`, `b`, `aa`, `ab`, `ba`, ... so every length is exhausted before the
/// next one starts.
///
/// Without a maximum length the codes grow with the counter and never
/// repeat within one instance. With a maximum length the counter wraps
/// around the finite code space, and the repository's duplicate check takes
/// over.
///
/// Codes are enumerable; prefer [`RandomGenerator`](crate::RandomGenerator)
/// when that matters.
#[derive(Debug)]
pub struct SequenceGenerator {
    counter: AtomicU64,
    alphabet: Alphabet,
    /// Number of distinct codes of length `1..=max_length`, if it fits in a `u64`.
    space: Option<u64>,
}

impl Clone for SequenceGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            alphabet: self.alphabet.clone(),
            space: self.space,
        }
    }
}

impl SequenceGenerator {
    /// Creates an unbounded generator starting from zero.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            counter: AtomicU64::new(0),
            alphabet,
            space: None,
        }
    }

    /// Creates a generator whose codes are at most `max_length` long.
    pub fn with_max_length(alphabet: Alphabet, max_length: usize) -> Result<Self> {
        if max_length == 0 || max_length > MAX_LENGTH {
            return Err(GeneratorError::InvalidLength {
                length: max_length,
                max: MAX_LENGTH,
            });
        }

        let space = code_space(alphabet.radix() as u64, max_length);
        Ok(Self {
            counter: AtomicU64::new(0),
            alphabet,
            space,
        })
    }

    /// Starts the counter at `offset` instead of zero.
    ///
    /// Useful for resuming from a known state, or for seeding from the clock
    /// so a restarted process does not replay codes it already handed out.
    pub fn starting_at(self, offset: u64) -> Self {
        self.counter.store(offset, Ordering::SeqCst);
        self
    }

    fn encode(&self, value: u64) -> String {
        let radix = self.alphabet.radix() as u64;
        let mut n = match self.space {
            Some(space) => value % space,
            None => value,
        };

        // Bijective numeration: shift by one so zero maps to the first
        // single-symbol code instead of the empty string.
        let mut digits = Vec::new();
        loop {
            digits.push(self.alphabet.symbol((n % radix) as usize));
            if n < radix {
                break;
            }
            n = n / radix - 1;
        }

        digits.iter().rev().collect()
    }
}

/// Computes `radix + radix^2 + ... + radix^max_length`, or `None` on overflow.
fn code_space(radix: u64, max_length: usize) -> Option<u64> {
    let mut total: u64 = 0;
    let mut power: u64 = 1;
    for _ in 0..max_length {
        power = power.checked_mul(radix)?;
        total = total.checked_add(power)?;
    }
    Some(total)
}

impl Generator for SequenceGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(self.encode(count))
    }
}
