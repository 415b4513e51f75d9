use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid ring degree: n={0} is not a power of two greater than one")]
    InvalidRingDegree(usize),
    #[error("invalid modulus: q={0} is not an odd prime")]
    NotPrime(u64),
    #[error("invalid modulus: q={q} has more than {max_bits} bits")]
    ModulusTooLarge { q: u64, max_bits: u32 },
    #[error("invalid modulus: no primitive {nth_root}-th root of unity modulo q={q}")]
    NoPrimitiveRoot { q: u64, nth_root: u64 },
    #[error("invalid moduli: empty modulus chain")]
    EmptyModuli,
    #[error("invalid moduli: q={0} appears more than once")]
    DuplicateModulus(u64),
    #[error("invalid bases: q={0} belongs to both bases")]
    OverlappingBases(u64),
    #[error("ring degree mismatch: {0} != {1}")]
    DegreeMismatch(usize, usize),
    #[error("level {level} is out of range (maximum level is {max})")]
    LevelOutOfRange { level: usize, max: usize },
    #[error("invalid scaling modulus: t={0} must be odd, in [3, 2^61) and coprime with Q")]
    InvalidScalingModulus(u64),
    #[error("no more NTT-friendly primes of {bit_size} bits for nth_root={nth_root}")]
    PrimesExhausted { bit_size: u64, nth_root: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns [Error::LevelOutOfRange] if level > max.
#[inline]
pub fn check_level(level: usize, max: usize) -> Result<()> {
    if level > max {
        return Err(Error::LevelOutOfRange { level, max });
    }
    Ok(())
}
