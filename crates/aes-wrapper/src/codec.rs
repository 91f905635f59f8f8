//! Text layer: string ⇄ plaintext bytes in a chosen encoding, and framed
//! ciphertext ⇄ standard Base64.
//!
//! Base64 here is only a text-safe transport for binary frames. It carries no
//! cryptographic meaning.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{CipherError, TextEncoding};

use crate::wrapper::AesWrapper;

/// Convert `text` to bytes in `encoding`.
///
/// # Errors
///
/// Returns [`CipherError::Unencodable`] if `text` contains a character that
/// `encoding` cannot represent. Nothing is substituted.
pub fn encode_text(text: &str, encoding: TextEncoding) -> Result<Vec<u8>, CipherError> {
    match encoding {
        TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        TextEncoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(c).map_err(|_| CipherError::Unencodable(encoding)))
            .collect(),
        TextEncoding::Ascii => {
            if text.is_ascii() {
                Ok(text.as_bytes().to_vec())
            } else {
                Err(CipherError::Unencodable(encoding))
            }
        }
    }
}

/// Convert `bytes` in `encoding` back to a string.
///
/// # Errors
///
/// Returns [`CipherError::InvalidText`] if `bytes` is not well-formed in
/// `encoding`. Nothing is replaced with U+FFFD.
pub fn decode_text(bytes: Vec<u8>, encoding: TextEncoding) -> Result<String, CipherError> {
    let invalid = || CipherError::InvalidText(encoding);
    match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| invalid()),
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            if bytes.len() % 2 != 0 {
                return Err(invalid());
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if encoding == TextEncoding::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                })
                .collect();
            String::from_utf16(&units).map_err(|_| invalid())
        }
        TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        TextEncoding::Ascii => {
            if bytes.is_ascii() {
                String::from_utf8(bytes).map_err(|_| invalid())
            } else {
                Err(invalid())
            }
        }
    }
}

impl AesWrapper {
    /// Encrypt `text` and return the framed ciphertext as standard Base64.
    ///
    /// Empty text yields an empty string without touching the cipher.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Unencodable`] if `text` cannot be represented in
    /// `encoding`.
    pub fn encrypt_to_base64(
        &self,
        text: &str,
        encoding: TextEncoding,
    ) -> Result<String, CipherError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let framed = self.encrypt(&encode_text(text, encoding)?)?;
        Ok(STANDARD.encode(framed))
    }

    /// [`encrypt_to_base64`](Self::encrypt_to_base64), mapping `None` to an
    /// empty string.
    ///
    /// # Errors
    ///
    /// As for [`encrypt_to_base64`](Self::encrypt_to_base64).
    pub fn encrypt_to_base64_opt(
        &self,
        text: Option<&str>,
        encoding: TextEncoding,
    ) -> Result<String, CipherError> {
        self.encrypt_to_base64(text.unwrap_or_default(), encoding)
    }

    /// [`encrypt_to_base64`](Self::encrypt_to_base64) in this context's
    /// [`text_encoding`](Self::text_encoding).
    ///
    /// # Errors
    ///
    /// As for [`encrypt_to_base64`](Self::encrypt_to_base64).
    pub fn encrypt_text(&self, text: &str) -> Result<String, CipherError> {
        self.encrypt_to_base64(text, self.text_encoding())
    }

    /// Decode standard Base64, decrypt the frame, and decode the plaintext
    /// as `encoding`.
    ///
    /// Empty text yields an empty string without touching the cipher.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidBase64`] if `text` is not valid padded
    /// Base64, any error from [`decrypt`](Self::decrypt), or
    /// [`CipherError::InvalidText`] if the plaintext is not valid in `encoding`.
    pub fn decrypt_from_base64(
        &self,
        text: &str,
        encoding: TextEncoding,
    ) -> Result<String, CipherError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let framed = STANDARD.decode(text)?;
        decode_text(self.decrypt(&framed)?, encoding)
    }

    /// [`decrypt_from_base64`](Self::decrypt_from_base64), mapping `None` to
    /// an empty string.
    ///
    /// # Errors
    ///
    /// As for [`decrypt_from_base64`](Self::decrypt_from_base64).
    pub fn decrypt_from_base64_opt(
        &self,
        text: Option<&str>,
        encoding: TextEncoding,
    ) -> Result<String, CipherError> {
        self.decrypt_from_base64(text.unwrap_or_default(), encoding)
    }

    /// [`decrypt_from_base64`](Self::decrypt_from_base64) in this context's
    /// [`text_encoding`](Self::text_encoding).
    ///
    /// # Errors
    ///
    /// As for [`decrypt_from_base64`](Self::decrypt_from_base64).
    pub fn decrypt_text(&self, text: &str) -> Result<String, CipherError> {
        self.decrypt_from_base64(text, self.text_encoding())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ErrorKind, KeySize};

    const ALL: [TextEncoding; 5] = [
        TextEncoding::Utf8,
        TextEncoding::Utf16Le,
        TextEncoding::Utf16Be,
        TextEncoding::Latin1,
        TextEncoding::Ascii,
    ];

    fn wrapper() -> AesWrapper {
        AesWrapper::with_key(KeySize::Aes128, &[0x24u8; 16]).unwrap()
    }

    #[test]
    fn encode_known_bytes() {
        assert_eq!(encode_text("hé", TextEncoding::Utf8).unwrap(), vec![0x68, 0xC3, 0xA9]);
        assert_eq!(
            encode_text("hé", TextEncoding::Utf16Le).unwrap(),
            vec![0x68, 0x00, 0xE9, 0x00]
        );
        assert_eq!(
            encode_text("hé", TextEncoding::Utf16Be).unwrap(),
            vec![0x00, 0x68, 0x00, 0xE9]
        );
        assert_eq!(encode_text("hé", TextEncoding::Latin1).unwrap(), vec![0x68, 0xE9]);
    }

    #[test]
    fn unencodable_characters_rejected() {
        assert!(matches!(
            encode_text("hé", TextEncoding::Ascii),
            Err(CipherError::Unencodable(TextEncoding::Ascii))
        ));
        assert!(matches!(
            encode_text("€", TextEncoding::Latin1),
            Err(CipherError::Unencodable(TextEncoding::Latin1))
        ));
    }

    #[test]
    fn malformed_bytes_rejected() {
        assert!(decode_text(vec![0xC3], TextEncoding::Utf8).is_err());
        assert!(decode_text(vec![0x68], TextEncoding::Utf16Le).is_err());
        // Lone high surrogate.
        assert!(decode_text(vec![0x00, 0xD8], TextEncoding::Utf16Le).is_err());
        assert!(decode_text(vec![0x80], TextEncoding::Ascii).is_err());
    }

    #[test]
    fn latin1_decodes_every_byte() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode_text(bytes.clone(), TextEncoding::Latin1).unwrap();
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode_text(&text, TextEncoding::Latin1).unwrap(), bytes);
    }

    #[test]
    fn base64_round_trip_each_encoding() {
        let w = wrapper();
        for enc in ALL {
            let text = "Plain text, 42!";
            let b64 = w.encrypt_to_base64(text, enc).unwrap();
            assert_eq!(w.decrypt_from_base64(&b64, enc).unwrap(), text);
        }
        let text = "日本語のテキスト";
        for enc in [TextEncoding::Utf8, TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
            let b64 = w.encrypt_to_base64(text, enc).unwrap();
            assert_eq!(w.decrypt_from_base64(&b64, enc).unwrap(), text);
        }
    }

    #[test]
    fn output_is_padded_standard_base64() {
        let w = wrapper();
        let b64 = w.encrypt_to_base64("hello", TextEncoding::Utf8).unwrap();
        // 32 framed bytes encode to 44 characters with one `=`.
        assert_eq!(b64.len(), 44);
        assert!(b64.ends_with('='));
        assert_eq!(STANDARD.decode(&b64).unwrap().len(), 32);
    }

    #[test]
    fn empty_and_none_pass_through() {
        let w = wrapper();
        assert_eq!(w.encrypt_to_base64("", TextEncoding::Utf8).unwrap(), "");
        assert_eq!(w.decrypt_from_base64("", TextEncoding::Utf8).unwrap(), "");
        assert_eq!(w.encrypt_to_base64_opt(None, TextEncoding::Utf8).unwrap(), "");
        assert_eq!(w.decrypt_from_base64_opt(None, TextEncoding::Utf8).unwrap(), "");
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let w = wrapper();
        let err = w
            .decrypt_from_base64("not base64!!", TextEncoding::Utf8)
            .unwrap_err();
        assert!(matches!(err, CipherError::InvalidBase64(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn short_decoded_frame_is_malformed() {
        let w = wrapper();
        let short = STANDARD.encode([0u8; 8]);
        let err = w.decrypt_from_base64(&short, TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, CipherError::FrameTooShort(8)));
    }

    #[test]
    fn text_methods_use_context_encoding() {
        let w = wrapper().with_text_encoding(TextEncoding::Latin1);
        let b64 = w.encrypt_text("café").unwrap();
        assert_eq!(w.decrypt_from_base64(&b64, TextEncoding::Latin1).unwrap(), "café");
        assert_eq!(w.decrypt_text(&b64).unwrap(), "café");
        // Latin-1 stores `é` as one byte, so the frame holds 4 plaintext bytes.
        let plain = w.decrypt(&STANDARD.decode(&b64).unwrap()).unwrap();
        assert_eq!(plain, vec![0x63, 0x61, 0x66, 0xE9]);
        assert!(matches!(
            w.encrypt_text("€"),
            Err(CipherError::Unencodable(TextEncoding::Latin1))
        ));
        assert_eq!(w.encrypt_text("").unwrap(), "");
    }

    #[test]
    fn wrong_decoding_encoding_is_reported() {
        let w = wrapper();
        let b64 = w.encrypt_to_base64("é", TextEncoding::Latin1).unwrap();
        // A lone 0xE9 is not valid UTF-8.
        let err = w.decrypt_from_base64(&b64, TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, CipherError::InvalidText(TextEncoding::Utf8)));
    }
}
