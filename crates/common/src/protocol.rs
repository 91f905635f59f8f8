//! Wire format and parameter types shared by every component.
//!
//! # Framed ciphertext
//!
//! ```text
//! offset 0..16   : IV (16 raw bytes)
//! offset 16..end : PKCS#7-padded AES-CBC ciphertext (multiple of 16 bytes)
//! ```
//!
//! There is no version tag, algorithm identifier, or integrity tag. A reader
//! must know out of band which key and key size produced a given frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Initialisation vector length in bytes (one block).
pub const IV_LEN: usize = BLOCK_LEN;

// ---------------------------------------------------------------------------
// Key size
// ---------------------------------------------------------------------------

/// AES key length.
///
/// Serialised as its bit count (`128`, `192` or `256`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum KeySize {
    /// 128-bit key (16 bytes).
    Aes128,
    /// 192-bit key (24 bytes).
    Aes192,
    /// 256-bit key (32 bytes).
    #[default]
    Aes256,
}

impl KeySize {
    /// Key length in bits.
    pub const fn bits(self) -> u16 {
        match self {
            KeySize::Aes128 => 128,
            KeySize::Aes192 => 192,
            KeySize::Aes256 => 256,
        }
    }

    /// Key length in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Returns the key size whose byte length is `len`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `len` is 16, 24 or 32.
    pub fn from_key_len(len: usize) -> Result<Self, CipherError> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            other => Err(CipherError::InvalidKeyLength(other)),
        }
    }
}

impl TryFrom<u16> for KeySize {
    type Error = String;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(KeySize::Aes128),
            192 => Ok(KeySize::Aes192),
            256 => Ok(KeySize::Aes256),
            other => Err(format!("unsupported key size {other}: expected 128, 192 or 256")),
        }
    }
}

impl From<KeySize> for u16 {
    fn from(size: KeySize) -> Self {
        size.bits()
    }
}

impl FromStr for KeySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits: u16 = s
            .trim()
            .parse()
            .map_err(|_| format!("key size must be a number of bits, got {s:?}"))?;
        KeySize::try_from(bits)
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bits())
    }
}

// ---------------------------------------------------------------------------
// Text encoding
// ---------------------------------------------------------------------------

/// Character encoding used when converting text to and from plaintext bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// UTF-16, little-endian, no byte-order mark.
    Utf16Le,
    /// UTF-16, big-endian, no byte-order mark.
    Utf16Be,
    /// ISO-8859-1: one byte per code point `U+0000..=U+00FF`.
    Latin1,
    /// 7-bit US-ASCII.
    Ascii,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Ascii => "US-ASCII",
        })
    }
}

// ---------------------------------------------------------------------------
// IV policy
// ---------------------------------------------------------------------------

/// How the IV for each encryption is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvPolicy {
    /// Use the context's current IV until the caller regenerates it.
    ///
    /// Encrypting several messages under one key with the same IV lets an
    /// observer see which messages share a plaintext prefix.
    #[default]
    Reuse,
    /// Draw a fresh random IV for every message. The context's IV is untouched.
    PerMessage,
}

// ---------------------------------------------------------------------------
// Framed ciphertext
// ---------------------------------------------------------------------------

/// A framed ciphertext viewed in place: the IV and the padded cipher blocks
/// after it, both borrowed from the frame bytes.
///
/// Block alignment of `ciphertext` is checked by the cipher, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramedCiphertext<'a> {
    /// IV the message was encrypted under.
    pub iv: &'a [u8; IV_LEN],
    /// PKCS#7-padded ciphertext.
    pub ciphertext: &'a [u8],
}

impl<'a> FramedCiphertext<'a> {
    /// Total frame length produced for a plaintext of `plain_len` bytes.
    ///
    /// PKCS#7 always adds between 1 and 16 bytes, so an empty plaintext still
    /// yields one full block.
    pub const fn framed_len(plain_len: usize) -> usize {
        IV_LEN + (plain_len / BLOCK_LEN + 1) * BLOCK_LEN
    }

    /// Split raw frame bytes into IV and ciphertext without copying.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::FrameTooShort`] if `bytes` cannot hold an IV.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CipherError> {
        let (iv, ciphertext) = bytes
            .split_first_chunk::<IV_LEN>()
            .ok_or(CipherError::FrameTooShort(bytes.len()))?;
        Ok(Self { iv, ciphertext })
    }

    /// Encode this frame as `IV || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        out.extend_from_slice(self.iv);
        out.extend_from_slice(self.ciphertext);
        out
    }
}
