use std::fmt;

use crate::{ByteVisitor, VisitBytes};

use super::{Output, SupportedDigest};

/// An unkeyed digest computed with a statically known algorithm.
pub struct Hash<D: SupportedDigest> {
    pub(crate) digest: Output<D>,
}

struct DigestVisitor<D: SupportedDigest> {
    digest: D,
}

impl<D: SupportedDigest> ByteVisitor for DigestVisitor<D> {
    fn visit_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        self.digest.update(bytes)
    }
}

impl<D: SupportedDigest> Hash<D> {
    pub fn of(content: impl VisitBytes) -> Self {
        let mut visitor = DigestVisitor { digest: D::new() };
        content.visit(&mut visitor);
        Self {
            digest: visitor.digest.finalize(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.digest.as_slice()
    }
}

impl<D: SupportedDigest> AsRef<[u8]> for Hash<D> {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}

impl<D: SupportedDigest> VisitBytes for Hash<D> {
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV) {
        visitor.visit_bytes(self.bytes())
    }
}

// Derived impls would demand the bounds on `D` rather than its output.
impl<D: SupportedDigest> Clone for Hash<D> {
    fn clone(&self) -> Self {
        Self {
            digest: self.digest.clone(),
        }
    }
}

impl<D: SupportedDigest> Eq for Hash<D> {}
impl<D: SupportedDigest> PartialEq for Hash<D> {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest
    }
}

impl<D: SupportedDigest> fmt::Display for Hash<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", D::ALGORITHM, hex::encode(self.bytes()))
    }
}

impl<D: SupportedDigest> fmt::Debug for Hash<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash<{:?}>({})", D::ALGORITHM, hex::encode(self.bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Sha256, Sha512_256};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hash_empties_have_no_impact() {
        let empty: &[u8] = &[];

        let h0: Hash<Sha256> = Hash::of([0u8, 1u8]);
        let h1: Hash<Sha256> = Hash::of(([0u8, 1u8], empty));
        let h2: Hash<Sha256> = Hash::of((empty, [0u8, 1u8]));

        assert_eq!(h0, h1);
        assert_eq!(h0, h2);
    }

    #[test]
    fn test_sha512_256_known_digest() {
        let hash: Hash<Sha512_256> = Hash::of(b"abc".as_slice());
        assert_eq!(
            hash.to_string(),
            "sha512-256:53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
        assert_eq!(hash.bytes().len(), 32);
    }
}
