//! AES-CBC encryption with PKCS#7 padding and self-contained IV framing.
//!
//! [`AesWrapper`] owns a key and an IV. [`AesWrapper::encrypt`] produces
//! `IV || ciphertext`; [`AesWrapper::decrypt`] reads the IV back from the
//! frame. [`AesWrapper::encrypt_to_base64`] and
//! [`AesWrapper::decrypt_from_base64`] carry text through standard Base64.
//!
//! This is a confidentiality-only scheme. There is no integrity tag: a
//! modified frame usually fails the padding check but may decrypt to garbage.
//!
//! ```
//! use aes_wrapper::{AesWrapper, KeySize, TextEncoding};
//!
//! let wrapper = AesWrapper::with_key(KeySize::Aes256, &[0u8; 32])?;
//! let framed = wrapper.encrypt(b"hello")?;
//! assert_eq!(framed.len(), 32);
//! assert_eq!(wrapper.decrypt(&framed)?, b"hello");
//!
//! let b64 = wrapper.encrypt_to_base64("hello", TextEncoding::Utf8)?;
//! assert_eq!(wrapper.decrypt_from_base64(&b64, TextEncoding::Utf8)?, "hello");
//! # Ok::<(), aes_wrapper::CipherError>(())
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod key;
pub mod telemetry;
pub mod wrapper;

pub use common::{
    CipherError, ErrorKind, FramedCiphertext, IvPolicy, KeySize, TextEncoding, BLOCK_LEN, IV_LEN,
};
pub use config::WrapperConfig;
pub use key::{InitVector, KeyMaterial, KeyState};
pub use wrapper::AesWrapper;
