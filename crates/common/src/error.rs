//! Common error types shared across crates.

use thiserror::Error;

use crate::protocol::{TextEncoding, BLOCK_LEN, IV_LEN};

/// Coarse classification of a [`CipherError`].
///
/// Callers that only need to branch on the failure family (bad key, bad input,
/// failed unpadding, text conversion) match on this instead of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The key does not have one of the valid AES lengths.
    InvalidKey,
    /// The input cannot be a framed ciphertext (too short, or not Base64).
    MalformedInput,
    /// The ciphertext is misaligned or its PKCS#7 padding did not validate.
    Padding,
    /// Text could not be converted to or from bytes in the chosen encoding.
    Encoding,
}

/// Errors produced by the cipher layer.
///
/// None of these are transient; a failed operation must not be retried with
/// the same input.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The key does not match the key size it was supplied with.
    #[error("invalid key length: key size requires {expected} bytes, got {actual}")]
    KeySizeMismatch {
        /// Byte length required by the requested key size.
        expected: usize,
        /// Byte length actually supplied.
        actual: usize,
    },

    /// The framed input is too short to hold an IV.
    #[error("framed ciphertext too short: {0} bytes, need at least {IV_LEN}")]
    FrameTooShort(usize),

    /// The text input is not valid standard Base64.
    #[error("invalid base64 input: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The cipher part of a frame is not a whole number of blocks.
    #[error("ciphertext length {0} is not a multiple of {BLOCK_LEN}")]
    UnalignedCiphertext(usize),

    /// PKCS#7 padding failed to validate after decryption.
    ///
    /// Also raised for most (not all) tampered or wrong-key ciphertexts.
    #[error("padding check failed")]
    BadPadding,

    /// The text contains a character the encoding cannot represent.
    #[error("text cannot be represented in {0}")]
    Unencodable(TextEncoding),

    /// Decrypted bytes are not valid text in the encoding.
    #[error("decrypted bytes are not valid {0}")]
    InvalidText(TextEncoding),
}

impl CipherError {
    /// Returns the failure family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CipherError::InvalidKeyLength(_) | CipherError::KeySizeMismatch { .. } => {
                ErrorKind::InvalidKey
            }
            CipherError::FrameTooShort(_) | CipherError::InvalidBase64(_) => {
                ErrorKind::MalformedInput
            }
            CipherError::UnalignedCiphertext(_) | CipherError::BadPadding => ErrorKind::Padding,
            CipherError::Unencodable(_) | CipherError::InvalidText(_) => ErrorKind::Encoding,
        }
    }
}
