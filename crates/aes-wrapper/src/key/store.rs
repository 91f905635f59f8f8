//! [`KeyState`]: the key and current IV owned by one cipher context.

use std::fmt;

use common::{CipherError, KeySize, IV_LEN};
use rand::RngCore;

/// Owned AES key bytes of a valid length.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which key material lives in RAM.
#[derive(Clone)]
pub struct KeyMaterial {
    bytes: Box<[u8]>,
    size: KeySize,
}

impl KeyMaterial {
    /// Copy `bytes` into a new key, inferring the key size from its length.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `bytes` is 16, 24 or 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CipherError> {
        let size = KeySize::from_key_len(bytes.len())?;
        Ok(Self {
            bytes: bytes.into(),
            size,
        })
    }

    /// Copy `bytes` into a new key that must be exactly `size` long.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::KeySizeMismatch`] if the length differs from
    /// `size.bytes()`.
    pub fn with_size(size: KeySize, bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() != size.bytes() {
            return Err(CipherError::KeySizeMismatch {
                expected: size.bytes(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes: bytes.into(),
            size,
        })
    }

    /// Generate a random key of `size` from the OS-seeded CSPRNG.
    pub fn generate(size: KeySize) -> Self {
        let mut bytes = vec![0u8; size.bytes()].into_boxed_slice();
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes, size }
    }

    /// Raw key bytes. Do not log or persist them in the clear.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of this key.
    pub fn size(&self) -> KeySize {
        self.size
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({}, [REDACTED])", self.size)
    }
}

/// A 16-byte CBC initialisation vector.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InitVector([u8; IV_LEN]);

impl InitVector {
    /// Generate a random IV from the OS-seeded CSPRNG.
    pub fn generate() -> Self {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);
        Self(iv)
    }

    /// Raw IV bytes.
    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

impl From<[u8; IV_LEN]> for InitVector {
    fn from(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for InitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitVector([{IV_LEN} bytes])")
    }
}

/// The key and the IV used for the next encryption.
///
/// Both are fixed between operations; only the explicit setters and
/// `regenerate_*` methods change them.
#[derive(Debug, Clone)]
pub struct KeyState {
    key: KeyMaterial,
    iv: InitVector,
}

impl KeyState {
    /// Random key of `size` and a random IV.
    pub fn generate(size: KeySize) -> Self {
        Self {
            key: KeyMaterial::generate(size),
            iv: InitVector::generate(),
        }
    }

    /// Install a caller-supplied key of `size` and draw a random IV.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::KeySizeMismatch`] if `key` is not `size.bytes()` long.
    pub fn with_key(size: KeySize, key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            key: KeyMaterial::with_size(size, key)?,
            iv: InitVector::generate(),
        })
    }

    /// Current key bytes.
    pub fn key(&self) -> &[u8] {
        self.key.as_bytes()
    }

    /// Size of the current key.
    pub fn key_size(&self) -> KeySize {
        self.key.size()
    }

    /// Replace the key. The key size follows the new key; the IV is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `key` is 16, 24 or 32
    /// bytes. The current key is left in place on error.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.key = KeyMaterial::from_slice(key)?;
        Ok(())
    }

    /// Replace the key with a fresh random key of the same size.
    pub fn regenerate_key(&mut self) {
        self.key = KeyMaterial::generate(self.key.size());
    }

    /// IV used for the next encryption under [`common::IvPolicy::Reuse`].
    pub fn iv(&self) -> &InitVector {
        &self.iv
    }

    /// Install a caller-managed IV.
    pub fn set_iv(&mut self, iv: InitVector) {
        self.iv = iv;
    }

    /// Replace the IV with a fresh random one.
    pub fn regenerate_iv(&mut self) {
        self.iv = InitVector::generate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_uses_requested_size() {
        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            let state = KeyState::generate(size);
            assert_eq!(state.key().len(), size.bytes());
            assert_eq!(state.key_size(), size);
        }
    }

    #[test]
    fn with_key_rejects_size_mismatch() {
        let err = KeyState::with_key(KeySize::Aes256, &[0u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            CipherError::KeySizeMismatch {
                expected: 32,
                actual: 16
            }
        ));
    }

    #[test]
    fn set_key_changes_size_and_keeps_iv() {
        let mut state = KeyState::with_key(KeySize::Aes256, &[1u8; 32]).unwrap();
        let iv = *state.iv();
        state.set_key(&[2u8; 16]).unwrap();
        assert_eq!(state.key(), &[2u8; 16]);
        assert_eq!(state.key_size(), KeySize::Aes128);
        assert_eq!(*state.iv(), iv);
    }

    #[test]
    fn set_key_rejects_bad_length_and_keeps_old_key() {
        let mut state = KeyState::with_key(KeySize::Aes128, &[7u8; 16]).unwrap();
        for len in [15, 17, 20, 33] {
            assert!(matches!(
                state.set_key(&vec![0u8; len]),
                Err(CipherError::InvalidKeyLength(l)) if l == len
            ));
        }
        assert_eq!(state.key(), &[7u8; 16]);
    }

    #[test]
    fn regenerate_iv_replaces_iv() {
        let mut state = KeyState::generate(KeySize::Aes128);
        let before = *state.iv();
        state.regenerate_iv();
        assert_ne!(*state.iv(), before);
    }

    #[test]
    fn regenerate_key_keeps_size() {
        let mut state = KeyState::with_key(KeySize::Aes192, &[0u8; 24]).unwrap();
        state.regenerate_key();
        assert_eq!(state.key_size(), KeySize::Aes192);
        assert_ne!(state.key(), &[0u8; 24]);
    }

    #[test]
    fn set_iv_installs_value() {
        let mut state = KeyState::generate(KeySize::Aes256);
        state.set_iv(InitVector::from([9u8; IV_LEN]));
        assert_eq!(state.iv().as_bytes(), &[9u8; IV_LEN]);
    }

    #[test]
    fn debug_output_is_redacted() {
        let state = KeyState::with_key(KeySize::Aes128, &[0xABu8; 16]).unwrap();
        let dbg = format!("{state:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("171"));
    }
}
