use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors raised while validating generator configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("alphabet needs at least 2 distinct symbols, got {0}")]
    AlphabetTooSmall(usize),
    #[error("alphabet contains duplicate symbol '{0}'")]
    DuplicateSymbol(char),
    #[error("alphabet symbol '{0}' is not allowed in a short code")]
    InvalidSymbol(char),
    #[error("code length {length} is out of range; expected 1..={max}")]
    InvalidLength { length: usize, max: usize },
}
