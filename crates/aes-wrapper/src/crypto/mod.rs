//! AES-CBC-PKCS#7 block-cipher primitives.
//!
//! This module is intentionally free of key state, framing and text handling.
//! It provides the one-shot encrypt/decrypt operations used by the wrapper.
//!
//! Every call builds its own `cbc` engine and drops it before returning, on
//! success and error paths alike. With the `zeroize` features of `aes` and
//! `cbc` enabled the expanded round keys are wiped on drop.

pub mod cipher;

pub use cipher::{decrypt_cbc, encrypt_cbc};
