//! One-shot AES-CBC encryption and decryption with PKCS#7 padding.
//!
//! The AES variant is chosen from the key length: 16, 24 or 32 bytes select
//! AES-128, AES-192 or AES-256. The block size is always 128 bits.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use common::{CipherError, KeySize, BLOCK_LEN, IV_LEN};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Pad `plaintext` with PKCS#7 and encrypt it under `key` and `iv`.
///
/// The output length is the plaintext length rounded up to the next whole
/// block, plus one extra block when the plaintext is already block-aligned.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
pub fn encrypt_cbc(
    key: &[u8],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    match KeySize::from_key_len(key.len())? {
        KeySize::Aes128 => encrypt_with::<Aes128CbcEnc>(key, iv, plaintext),
        KeySize::Aes192 => encrypt_with::<Aes192CbcEnc>(key, iv, plaintext),
        KeySize::Aes256 => encrypt_with::<Aes256CbcEnc>(key, iv, plaintext),
    }
}

/// Decrypt `ciphertext` under `key` and `iv` and strip the PKCS#7 padding.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
/// Returns [`CipherError::UnalignedCiphertext`] if `ciphertext` is not a whole
/// number of blocks.
/// Returns [`CipherError::BadPadding`] if the padding does not validate, which
/// is what a wrong key or a tampered message usually produces.
pub fn decrypt_cbc(
    key: &[u8],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let key_size = KeySize::from_key_len(key.len())?;
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::UnalignedCiphertext(ciphertext.len()));
    }
    match key_size {
        KeySize::Aes128 => decrypt_with::<Aes128CbcDec>(key, iv, ciphertext),
        KeySize::Aes192 => decrypt_with::<Aes192CbcDec>(key, iv, ciphertext),
        KeySize::Aes256 => decrypt_with::<Aes256CbcDec>(key, iv, ciphertext),
    }
}

fn encrypt_with<C>(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: KeyIvInit + BlockEncryptMut,
{
    let engine =
        C::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    Ok(engine.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with<C>(key: &[u8], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: KeyIvInit + BlockDecryptMut,
{
    let engine =
        C::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    engine
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::BadPadding)
}
