//! At-rest encoding of cached secret values
//!
//! AES-256-GCM with a fresh random nonce per entry. The 256-bit key is the
//! SHA-256 digest of the configured encryption key. Ciphertext and nonce are
//! kept as base64 strings so a `CacheEntry` never holds raw plaintext bytes.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;

/// Failures while encoding or decoding a cache entry
///
/// A decode failure means the entry is corrupt or was written under a
/// different key; the resolver treats it as a cache miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("failed to encrypt cache entry")]
    Encode,

    #[error("cache entry is not valid base64")]
    Base64,

    #[error("cache entry nonce has length {0}, expected 12")]
    NonceLength(usize),

    #[error("cache entry failed authentication")]
    Authentication,

    #[error("decrypted cache entry is not valid UTF-8")]
    Utf8,
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Output of [`CacheCipher::encode`]
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedValue {
    /// Base64 ciphertext including the authentication tag
    pub cipher: String,
    /// Base64 nonce used for this entry
    pub nonce: String,
}

impl fmt::Debug for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedValue")
            .field("cipher", &format!("<{} bytes>", self.cipher.len()))
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Symmetric cipher bound to one encryption key for the resolver's lifetime
#[derive(Clone)]
pub struct CacheCipher {
    cipher: Aes256Gcm,
}

impl CacheCipher {
    /// Derive the cipher from the configured encryption key
    pub fn new(encryption_key: &str) -> Self {
        let digest = Sha256::digest(encryption_key.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(digest.as_slice());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt a plaintext value under a fresh nonce
    pub fn encode(&self, plain: &str) -> CacheResult<EncodedValue> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plain.as_bytes())
            .map_err(|_| CacheError::Encode)?;

        Ok(EncodedValue {
            cipher: STANDARD.encode(ciphertext),
            nonce: STANDARD.encode(nonce),
        })
    }

    /// Recover the plaintext from an encoded value
    pub fn decode(&self, encoded: &EncodedValue) -> CacheResult<String> {
        let ciphertext = STANDARD
            .decode(&encoded.cipher)
            .map_err(|_| CacheError::Base64)?;
        let nonce = STANDARD.decode(&encoded.nonce).map_err(|_| CacheError::Base64)?;
        if nonce.len() != NONCE_LEN {
            return Err(CacheError::NonceLength(nonce.len()));
        }

        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| CacheError::Authentication)?;

        String::from_utf8(plain).map_err(|_| CacheError::Utf8)
    }
}

impl fmt::Debug for CacheCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheCipher")
            .field("algorithm", &"AES-256-GCM")
            .finish()
    }
}
