pub mod decomposer;
pub mod decryptor;
pub mod encryptor;
pub mod error;
pub mod keygen;
pub mod keys;
pub mod keyswitch;
pub mod operand;
pub mod parameters;
pub mod poly_qp;

pub use error::{Error, Result};
