//! Per-epoch blinding secrets.

use rand_core::{OsRng, RngCore};
use secrecy::{ExposeSecret, SecretVec};
use std::fmt;
use thiserror::Error;

/// Length in bytes of every generated secret.
pub const SECRET_LEN: usize = 32;

/// Secret bytes that blind the leaves of a single tree epoch.
///
/// The bytes are zeroized on drop and never printed by `Debug`.
pub struct Secret(SecretVec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(SecretVec::new(bytes.into()))
    }

    /// Draws [`SECRET_LEN`] bytes from the operating system CSPRNG.
    pub fn generate() -> Result<Self, SecureRandomError> {
        Self::generate_len(SECRET_LEN)
    }

    /// Draws `len` bytes from the operating system CSPRNG. A generator
    /// failure is returned as is; there is no fallback source.
    pub fn generate_len(len: usize) -> Result<Self, SecureRandomError> {
        let mut bytes = vec![0u8; len];
        OsRng.try_fill_bytes(&mut bytes).map_err(SecureRandomError)?;
        Ok(Self::new(bytes))
    }

    /// Exposes the raw secret bytes.
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.expose().len()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_vec())
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {}])", self.len())
    }
}

impl From<Vec<u8>> for Secret {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[derive(Error, Debug)]
#[error("secure random source unavailable")]
pub struct SecureRandomError(#[source] rand_core::Error);
