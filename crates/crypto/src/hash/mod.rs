use digest::core_api::BlockSizeUser;
use std::fmt;

mod dynamic;
mod keyed;
mod r#static;

pub use digest::{Digest, InvalidLength, Output};
pub use sha2::{Sha256, Sha512_256};

pub use dynamic::DynHash;
pub use keyed::KeyedHash;
pub use r#static::Hash;

use crate::VisitBytes;

/// A digest family. Each family provides both an unkeyed digest and an
/// HMAC keyed hash over the same underlying function.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum HashAlgorithm {
    Sha256,
    Sha512_256,
}

impl HashAlgorithm {
    /// Length in bytes of both the digest and the keyed hash output.
    pub fn output_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => <Sha256 as Digest>::output_size(),
            HashAlgorithm::Sha512_256 => <Sha512_256 as Digest>::output_size(),
        }
    }

    /// Computes `HMAC(key, content)` with this algorithm's digest.
    pub fn keyed(&self, key: &[u8], content: impl VisitBytes) -> Result<Vec<u8>, InvalidLength> {
        Ok(match self {
            HashAlgorithm::Sha256 => KeyedHash::<Sha256>::of(key, content)?.bytes().to_vec(),
            HashAlgorithm::Sha512_256 => {
                KeyedHash::<Sha512_256>::of(key, content)?.bytes().to_vec()
            }
        })
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Sha512_256 => write!(f, "sha512-256"),
        }
    }
}

impl fmt::Debug for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub trait SupportedDigest: Digest + BlockSizeUser + Clone + private::Sealed {
    const ALGORITHM: HashAlgorithm;
}

impl SupportedDigest for Sha256 {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;
}

impl SupportedDigest for Sha512_256 {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Sha512_256;
}

mod private {
    use sha2::{Sha256, Sha512_256};

    pub trait Sealed {}
    impl Sealed for Sha256 {}
    impl Sealed for Sha512_256 {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_algorithm_names() {
        assert_eq!(HashAlgorithm::Sha256.to_string(), "sha256");
        assert_eq!(format!("{:?}", HashAlgorithm::Sha512_256), "sha512-256");
    }

    #[test]
    fn test_output_sizes() {
        assert_eq!(HashAlgorithm::Sha256.output_size(), 32);
        assert_eq!(HashAlgorithm::Sha512_256.output_size(), 32);
    }
}
