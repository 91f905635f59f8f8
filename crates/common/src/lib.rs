//! Common types, wire-format definitions, and errors shared across `aes-wrapper` crates.

pub mod error;
pub mod protocol;

pub use error::{CipherError, ErrorKind};
pub use protocol::{FramedCiphertext, IvPolicy, KeySize, TextEncoding, BLOCK_LEN, IV_LEN};
