use digest::KeyInit;
use hmac::{Mac, SimpleHmac};
use std::fmt;

use crate::{ByteVisitor, VisitBytes};

use super::{InvalidLength, Output, SupportedDigest};

/// An HMAC tag computed with a statically known digest.
pub struct KeyedHash<D: SupportedDigest> {
    tag: Output<D>,
}

struct KeyedHashVisitor<D: SupportedDigest> {
    mac: SimpleHmac<D>,
}

impl<D: SupportedDigest> ByteVisitor for KeyedHashVisitor<D> {
    fn visit_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        Mac::update(&mut self.mac, bytes.as_ref())
    }
}

impl<D: SupportedDigest> KeyedHash<D> {
    /// Computes `HMAC(key, content)`.
    pub fn of(key: &[u8], content: impl VisitBytes) -> Result<Self, InvalidLength> {
        let mut visitor = KeyedHashVisitor {
            mac: <SimpleHmac<D> as KeyInit>::new_from_slice(key)?,
        };
        content.visit(&mut visitor);
        Ok(Self {
            tag: visitor.mac.finalize().into_bytes(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.tag.as_slice()
    }
}

impl<D: SupportedDigest> Clone for KeyedHash<D> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
        }
    }
}

impl<D: SupportedDigest> Eq for KeyedHash<D> {}
impl<D: SupportedDigest> PartialEq for KeyedHash<D> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl<D: SupportedDigest> fmt::Debug for KeyedHash<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KeyedHash<{:?}>({})",
            D::ALGORITHM,
            hex::encode(self.tag.as_slice())
        )
    }
}
