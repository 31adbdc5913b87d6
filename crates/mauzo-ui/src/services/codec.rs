//! Payload sealing for the optional encrypted transport mode.
//!
//! The key is derived from the deploy-time secret with SHA-256; payloads are
//! sealed with AES-256-GCM under a fresh random nonce, and travel as
//! `base64(nonce || ciphertext)`. The same codec produces the `token` header
//! (a sealed user id) on every authenticated request.

use aes_gcm::aead::{Aead, OsRng, rand_core::RngCore};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

/// Errors raised while sealing or opening a payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The sealed text was not valid base64.
    #[error("sealed payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    /// The sealed text was shorter than the nonce prefix.
    #[error("sealed payload is truncated")]
    Truncated,
    /// Encryption failed.
    #[error("could not seal payload")]
    Seal,
    /// Decryption or authentication failed.
    #[error("could not open payload")]
    Open,
    /// The opened bytes were not UTF-8 text.
    #[error("opened payload is not text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Symmetric sealer shared by the transport client and the token header.
#[derive(Clone)]
pub struct PayloadCodec {
    cipher: Aes256Gcm,
}

impl PayloadCodec {
    /// Derive the codec from the deploy-time secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&digest)),
        }
    }

    /// Seal plaintext into `base64(nonce || ciphertext)`.
    ///
    /// # Errors
    /// Returns [`CodecError::Seal`] when encryption fails.
    pub fn seal(&self, plaintext: &str) -> Result<String, CodecError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CodecError::Seal)?;
        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(sealed))
    }

    /// Open a sealed payload back into plaintext.
    ///
    /// # Errors
    /// Returns a [`CodecError`] when the text is not base64, is shorter than
    /// the nonce prefix, fails authentication, or is not UTF-8.
    pub fn open(&self, sealed: &str) -> Result<String, CodecError> {
        let bytes = BASE64.decode(sealed)?;
        if bytes.len() <= NONCE_LEN {
            return Err(CodecError::Truncated);
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::Open)?;
        Ok(String::from_utf8(plaintext)?)
    }
}
