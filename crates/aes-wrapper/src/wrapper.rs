//! [`AesWrapper`]: IV-prepend framing over AES-CBC-PKCS#7.
//!
//! Encryption writes `IV || ciphertext`. Decryption reads the IV back out of
//! the frame and hands it straight to the block-cipher engine, so the
//! context's own IV is never swapped or restored. Every operation that changes
//! the key or IV takes `&mut self`; shared references can encrypt and decrypt
//! from any number of threads at once.

use common::{CipherError, FramedCiphertext, IvPolicy, KeySize, TextEncoding};
use tracing::{debug, warn};

use crate::crypto;
use crate::key::{InitVector, KeyState};

/// A cipher context: one key, the IV for the next encryption, the policy
/// that decides whether that IV is reused, and the default text encoding.
#[derive(Debug, Clone)]
pub struct AesWrapper {
    state: KeyState,
    iv_policy: IvPolicy,
    text_encoding: TextEncoding,
}

impl AesWrapper {
    /// Context with a random AES-256 key and a random IV.
    pub fn new() -> Self {
        Self::generate(KeySize::default())
    }

    /// Context with a random key of `key_size` and a random IV.
    pub fn generate(key_size: KeySize) -> Self {
        Self {
            state: KeyState::generate(key_size),
            iv_policy: IvPolicy::default(),
            text_encoding: TextEncoding::default(),
        }
    }

    /// Context with the caller's key and a random IV.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::KeySizeMismatch`] if `key` is not
    /// `key_size.bytes()` long.
    pub fn with_key(key_size: KeySize, key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            state: KeyState::with_key(key_size, key)?,
            iv_policy: IvPolicy::default(),
            text_encoding: TextEncoding::default(),
        })
    }

    /// Set how the IV for each encryption is chosen.
    pub fn with_iv_policy(mut self, iv_policy: IvPolicy) -> Self {
        self.iv_policy = iv_policy;
        self
    }

    /// Current IV policy.
    pub fn iv_policy(&self) -> IvPolicy {
        self.iv_policy
    }

    /// Set the encoding used by [`encrypt_text`](Self::encrypt_text) and
    /// [`decrypt_text`](Self::decrypt_text).
    pub fn with_text_encoding(mut self, text_encoding: TextEncoding) -> Self {
        self.text_encoding = text_encoding;
        self
    }

    /// Encoding used by the text methods that take none.
    pub fn text_encoding(&self) -> TextEncoding {
        self.text_encoding
    }

    /// Raw key bytes. Do not log or persist them in the clear.
    pub fn key(&self) -> &[u8] {
        self.state.key()
    }

    /// Size of the current key.
    pub fn key_size(&self) -> KeySize {
        self.state.key_size()
    }

    /// Replace the key. The IV is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.state.set_key(key)
    }

    /// Replace the key with a random one of the same size.
    pub fn regenerate_key(&mut self) {
        self.state.regenerate_key();
    }

    /// IV that the next [`encrypt`](Self::encrypt) uses under [`IvPolicy::Reuse`].
    pub fn current_iv(&self) -> &InitVector {
        self.state.iv()
    }

    /// Install a caller-managed IV for subsequent encryptions.
    pub fn set_iv(&mut self, iv: InitVector) {
        self.state.set_iv(iv);
    }

    /// Draw a fresh random IV for subsequent encryptions.
    pub fn regenerate_iv(&mut self) {
        self.state.regenerate_iv();
    }

    /// Encrypt `plaintext` into a framed ciphertext.
    ///
    /// The IV comes from the context under [`IvPolicy::Reuse`], or is drawn
    /// fresh for this message under [`IvPolicy::PerMessage`]. Either way the
    /// context's IV is unchanged afterwards.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; with a validated key there are none in practice.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.iv_policy {
            IvPolicy::Reuse => self.encrypt_with_iv(plaintext, self.state.iv()),
            IvPolicy::PerMessage => self.encrypt_with_iv(plaintext, &InitVector::generate()),
        }
    }

    /// Encrypt `plaintext` under an explicit IV, ignoring the context's IV.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; with a validated key there are none in practice.
    pub fn encrypt_with_iv(
        &self,
        plaintext: &[u8],
        iv: &InitVector,
    ) -> Result<Vec<u8>, CipherError> {
        let ciphertext = crypto::encrypt_cbc(self.state.key(), iv.as_bytes(), plaintext)?;
        let frame = FramedCiphertext {
            iv: iv.as_bytes(),
            ciphertext: &ciphertext,
        };
        let framed = frame.to_bytes();
        debug!(
            plaintext_len = plaintext.len(),
            framed_len = framed.len(),
            "encrypted"
        );
        Ok(framed)
    }

    /// [`encrypt`](Self::encrypt), passing `None` through unchanged.
    ///
    /// # Errors
    ///
    /// As for [`encrypt`](Self::encrypt).
    pub fn encrypt_opt(&self, plaintext: Option<&[u8]>) -> Result<Option<Vec<u8>>, CipherError> {
        plaintext.map(|p| self.encrypt(p)).transpose()
    }

    /// Decrypt a framed ciphertext using the IV stored in its first 16 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::FrameTooShort`] if `framed` has fewer than
    /// 16 bytes, [`CipherError::UnalignedCiphertext`] if the cipher part is
    /// not a whole number of blocks, and [`CipherError::BadPadding`] if
    /// unpadding fails. There is no integrity tag, so a tampered frame may
    /// also decrypt to garbage without any error.
    pub fn decrypt(&self, framed: &[u8]) -> Result<Vec<u8>, CipherError> {
        let result = FramedCiphertext::parse(framed).and_then(|frame| {
            crypto::decrypt_cbc(self.state.key(), frame.iv, frame.ciphertext)
        });
        match &result {
            Ok(plaintext) => debug!(
                framed_len = framed.len(),
                plaintext_len = plaintext.len(),
                "decrypted"
            ),
            Err(e) => warn!(
                framed_len = framed.len(),
                kind = ?e.kind(),
                error = %e,
                "decryption failed"
            ),
        }
        result
    }

    /// [`decrypt`](Self::decrypt), passing `None` through unchanged.
    ///
    /// # Errors
    ///
    /// As for [`decrypt`](Self::decrypt).
    pub fn decrypt_opt(&self, framed: Option<&[u8]>) -> Result<Option<Vec<u8>>, CipherError> {
        framed.map(|f| self.decrypt(f)).transpose()
    }
}

impl Default for AesWrapper {
    fn default() -> Self {
        Self::new()
    }
}
