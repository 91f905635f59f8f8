//! Optional configuration loading for host applications.
//!
//! Values come from environment variables prefixed `AES_WRAPPER_` (for example
//! `AES_WRAPPER_KEY_SIZE=128`), optionally layered over a TOML file. The
//! library never reads configuration on its own; callers opt in.
//!
//! Environment values stay strings until serde asks for a type. A Base64 key
//! made only of digits must never be coerced into a number.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{IvPolicy, KeySize, TextEncoding};
use serde::Deserialize;

use crate::wrapper::AesWrapper;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "AES_WRAPPER";

/// Validated wrapper configuration.
#[derive(Clone, Deserialize)]
pub struct WrapperConfig {
    /// AES key size in bits.
    #[serde(default)]
    pub key_size: KeySize,

    /// Standard-Base64 key. A random key is generated when absent.
    #[serde(default)]
    pub key: Option<String>,

    /// How each encryption picks its IV.
    #[serde(default)]
    pub iv_policy: IvPolicy,

    /// Text encoding used by [`AesWrapper::encrypt_text`] and
    /// [`AesWrapper::decrypt_text`].
    #[serde(default)]
    pub text_encoding: TextEncoding,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            key_size: KeySize::default(),
            key: None,
            iv_policy: IvPolicy::default(),
            text_encoding: TextEncoding::default(),
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for WrapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperConfig")
            .field("key_size", &self.key_size)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("iv_policy", &self.iv_policy)
            .field("text_encoding", &self.text_encoding)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl WrapperConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the key is invalid.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Config::builder())
    }

    /// Load a TOML file, then apply environment overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a variable cannot
    /// be parsed, or the key is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = config::Config::builder().add_source(config::File::from(path));
        Self::load(builder)
            .with_context(|| format!("failed to load configuration from {}", path.display()))
    }

    fn load(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let cfg = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build configuration")?;

        let c: WrapperConfig = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Check that the configured key, if any, decodes to `key_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        if let Some(key) = self.decoded_key()? {
            if key.len() != self.key_size.bytes() {
                anyhow::bail!(
                    "KEY decodes to {} bytes but KEY_SIZE {} requires {}",
                    key.len(),
                    self.key_size.bits(),
                    self.key_size.bytes()
                );
            }
        }
        Ok(())
    }

    /// Decode the configured key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not valid standard Base64.
    pub fn decoded_key(&self) -> Result<Option<Vec<u8>>> {
        self.key
            .as_deref()
            .map(|k| STANDARD.decode(k.trim()).context("KEY is not valid base64"))
            .transpose()
    }

    /// Build an [`AesWrapper`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key is invalid.
    pub fn build_wrapper(&self) -> Result<AesWrapper> {
        let wrapper = match self.decoded_key()? {
            Some(key) => AesWrapper::with_key(self.key_size, &key)
                .context("configured key does not match key size")?,
            None => AesWrapper::generate(self.key_size),
        };
        Ok(wrapper
            .with_iv_policy(self.iv_policy)
            .with_text_encoding(self.text_encoding))
    }
}
