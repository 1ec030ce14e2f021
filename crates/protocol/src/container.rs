use blindtree_crypto::{
    canonical::{DecodeError, EncodingError},
    ByteVisitor, CanonicalReader, CanonicalVisitor, DecodeCanonical, VisitCanonical,
};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::{Leaf, LeafDecodeError, LeafType};

/// The envelope that is actually serialized and hashed for a leaf.
///
/// Keeping the tag next to the bytes lets a verifier decode the leaf
/// without any outside context.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafContainer {
    leaf_type: LeafType,
    #[serde_as(as = "Base64")]
    leaf_bytes: Vec<u8>,
}

impl LeafContainer {
    pub fn new(leaf_type: LeafType, leaf_bytes: Vec<u8>) -> Self {
        Self {
            leaf_type,
            leaf_bytes,
        }
    }

    pub fn leaf_type(&self) -> LeafType {
        self.leaf_type
    }

    pub fn leaf_bytes(&self) -> &[u8] {
        &self.leaf_bytes
    }

    /// Decodes the enveloped leaf.
    pub fn leaf(&self) -> Result<Leaf, LeafDecodeError> {
        Leaf::import(self)
    }
}

impl VisitCanonical for LeafContainer {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError> {
        visitor.visit_record(2)?;
        visitor.visit_unsigned(self.leaf_type.0.into())?;
        visitor.visit_bin(&self.leaf_bytes)
    }
}

impl DecodeCanonical for LeafContainer {
    type Error = DecodeError;

    fn read_canonical(reader: &mut CanonicalReader<'_>) -> Result<Self, Self::Error> {
        reader.read_record(2)?;
        Ok(Self {
            leaf_type: LeafType(reader.read_u16()?),
            leaf_bytes: reader.read_bin()?.to_vec(),
        })
    }
}

/// The preimage of a tree leaf value.
///
/// Hashing the canonical container under `blinded_entropy` reproduces the
/// stored value, which lets a verifier check a leaf without learning the
/// epoch secret.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindedPreimage {
    pub leaf_container: LeafContainer,
    #[serde_as(as = "Base64")]
    pub blinded_entropy: Vec<u8>,
}

impl BlindedPreimage {
    /// Envelopes `leaf` and pairs it with already-blinded entropy.
    pub fn new(leaf: &Leaf, blinded_entropy: Vec<u8>) -> Result<Self, EncodingError> {
        Ok(Self {
            leaf_container: leaf.export()?,
            blinded_entropy,
        })
    }
}

impl VisitCanonical for BlindedPreimage {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError> {
        visitor.visit_record(2)?;
        visitor.visit_nested(&self.leaf_container)?;
        visitor.visit_bin(&self.blinded_entropy)
    }
}

impl DecodeCanonical for BlindedPreimage {
    type Error = DecodeError;

    fn read_canonical(reader: &mut CanonicalReader<'_>) -> Result<Self, Self::Error> {
        reader.read_record(2)?;
        Ok(Self {
            leaf_container: LeafContainer::read_canonical(reader)?,
            blinded_entropy: reader.read_bin()?.to_vec(),
        })
    }
}
