use thiserror::Error;

/// Errors of the key-switching layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Rns(#[from] rns::Error),
    #[error("no switching key for galois element {gal_el}")]
    KeyNotAvailable { gal_el: u64 },
    #[error("switching key has {available} digits but level {level} requires {required}")]
    NotEnoughDigits {
        available: usize,
        required: usize,
        level: usize,
    },
    #[error("ring degree mismatch: expected n={expected}, got n={got}")]
    DegreeMismatch { expected: usize, got: usize },
    #[error("invalid ciphertext degree: expected {expected}, got {got}")]
    CiphertextDegree { expected: usize, got: usize },
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
