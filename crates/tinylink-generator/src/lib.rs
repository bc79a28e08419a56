//! Short code generators.
//!
//! Generators only propose codes. Uniqueness is settled by the repository's
//! atomic insert, so every implementation here is free of storage access
//! and safe to call from many tasks at once.

pub mod alphabet;
pub mod error;
pub mod random;
pub mod seq;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use error::GeneratorError;
pub use random::{RandomGenerator, DEFAULT_RANDOM_LENGTH};
pub use seq::SequenceGenerator;

use tinylink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Proposes a candidate code drawn from the generator's alphabet.
    fn generate(&self) -> Self::Output;
}

/// How codes are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratorStrategy {
    /// Sequence when no maximum length is set, random otherwise.
    #[default]
    Auto,
    Random,
    Sequence,
}

/// A generator selected once from configuration.
#[derive(Debug, Clone)]
pub enum CodeGenerator {
    Random(RandomGenerator),
    Sequence(SequenceGenerator),
}

impl CodeGenerator {
    /// Builds the generator for `strategy`.
    ///
    /// `max_length` of `None` means no positive bound was configured. `seed`
    /// is the starting counter value for the sequence strategy.
    pub fn from_config(
        strategy: GeneratorStrategy,
        alphabet: Alphabet,
        max_length: Option<usize>,
        seed: u64,
    ) -> error::Result<Self> {
        let strategy = match (strategy, max_length) {
            (GeneratorStrategy::Auto, None) => GeneratorStrategy::Sequence,
            (GeneratorStrategy::Auto, Some(_)) => GeneratorStrategy::Random,
            (explicit, _) => explicit,
        };

        match strategy {
            GeneratorStrategy::Random => {
                let length = max_length.unwrap_or(DEFAULT_RANDOM_LENGTH);
                Ok(Self::Random(RandomGenerator::new(alphabet, length)?))
            }
            _ => {
                let generator = match max_length {
                    Some(max_length) => SequenceGenerator::with_max_length(alphabet, max_length)?,
                    None => SequenceGenerator::new(alphabet),
                };
                Ok(Self::Sequence(generator.starting_at(seed)))
            }
        }
    }
}

impl Generator for CodeGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        match self {
            CodeGenerator::Random(generator) => generator.generate(),
            CodeGenerator::Sequence(generator) => generator.generate(),
        }
    }
}
