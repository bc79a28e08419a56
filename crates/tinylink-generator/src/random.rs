use crate::alphabet::Alphabet;
use crate::error::{GeneratorError, Result};
use crate::Generator;
use rand::Rng;
use tinylink_core::shortcode::MAX_LENGTH;
use tinylink_core::ShortCode;

/// Code length used by [`RandomGenerator`] when none is configured.
pub const DEFAULT_RANDOM_LENGTH: usize = 8;

/// A short code generator sampling symbols uniformly at random.
///
/// Every code has exactly `length` symbols. Codes are not enumerable, but two
/// calls may propose the same code; the repository's atomic insert is what
/// rejects the second one.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    alphabet: Alphabet,
    length: usize,
}

impl RandomGenerator {
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self> {
        if length == 0 || length > MAX_LENGTH {
            return Err(GeneratorError::InvalidLength {
                length,
                max: MAX_LENGTH,
            });
        }
        Ok(Self { alphabet, length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        // Thread-local RNG: no shared state between concurrent callers.
        let mut rng = rand::rng();
        let radix = self.alphabet.radix();
        let code: String = (0..self.length)
            .map(|_| self.alphabet.symbol(rng.random_range(0..radix)))
            .collect();
        ShortCode::new_unchecked(code)
    }
}
