use std::fmt;

use super::{Hash, HashAlgorithm, Sha256, Sha512_256, SupportedDigest};
use crate::VisitBytes;

impl HashAlgorithm {
    /// Computes the unkeyed digest of `content` with this algorithm.
    pub fn digest(&self, content: impl VisitBytes) -> DynHash {
        match self {
            HashAlgorithm::Sha256 => Hash::<Sha256>::of(content).into(),
            HashAlgorithm::Sha512_256 => Hash::<Sha512_256>::of(content).into(),
        }
    }
}

/// A digest labeled with the algorithm that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct DynHash {
    algo: HashAlgorithm,
    bytes: Vec<u8>,
}

impl DynHash {
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algo
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<D: SupportedDigest> From<Hash<D>> for DynHash {
    fn from(value: Hash<D>) -> Self {
        DynHash {
            algo: D::ALGORITHM,
            bytes: value.digest.to_vec(),
        }
    }
}

impl fmt::Display for DynHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algo, hex::encode(&self.bytes))
    }
}

impl fmt::Debug for DynHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynHash({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_digests() {
        let input = b"The quick brown fox jumped over the lazy dog".as_slice();
        assert_eq!(
            HashAlgorithm::Sha256.digest(input).to_string(),
            "sha256:7d38b5cd25a2baf85ad3bb5b9311383e671a8a142eb302b324d4a5fba8748c69"
        );

        let abc = HashAlgorithm::Sha512_256.digest(b"abc".as_slice());
        assert_eq!(abc.algorithm(), HashAlgorithm::Sha512_256);
        assert_eq!(
            hex::encode(abc.bytes()),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }
}
