//! The closed registry of leaf variants.
//!
//! Every variant is identified on the wire by a [`LeafType`] tag stored next
//! to its bytes in a [`LeafContainer`]. Adding a leaf kind means adding a tag
//! constant and a [`Leaf`] variant; the structure of stored bytes is never
//! inferred from their content.

use blindtree_crypto::{
    canonical::{DecodeError, EncodingError},
    ByteVisitor, CanonicalReader, CanonicalVisitor, DecodeCanonical, VisitCanonical,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::LeafContainer;

/// A sequence number within a sigchain.
pub type Seqno = i64;

/// The tag describing how a container's leaf bytes are structured.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafType(pub u16);

impl LeafType {
    pub const CHAIN17_V1: LeafType = LeafType(1);
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TeamId(pub [u8; 16]);

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinkId(pub [u8; 32]);

macro_rules! hex_debug {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($ty))
            }
        }
    };
}

hex_debug!(TeamId);
hex_debug!(LinkId);

/// A team sigchain link committed to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain17V1Leaf {
    pub team_id: TeamId,
    pub sig_id: Vec<u8>,
    pub link_id: LinkId,
    pub seqno: Seqno,
}

impl VisitCanonical for Chain17V1Leaf {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError> {
        visitor.visit_record(4)?;
        visitor.visit_bin(&self.team_id.0)?;
        visitor.visit_bin(&self.sig_id)?;
        visitor.visit_bin(&self.link_id.0)?;
        visitor.visit_signed(self.seqno)
    }
}

impl DecodeCanonical for Chain17V1Leaf {
    type Error = DecodeError;

    fn read_canonical(reader: &mut CanonicalReader<'_>) -> Result<Self, Self::Error> {
        reader.read_record(4)?;
        Ok(Self {
            team_id: TeamId(reader.read_bin_array()?),
            sig_id: reader.read_bin()?.to_vec(),
            link_id: LinkId(reader.read_bin_array()?),
            seqno: reader.read_i64()?,
        })
    }
}

/// Every leaf shape that may be committed to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Chain17V1(Chain17V1Leaf),
}

impl Leaf {
    /// The tag stored alongside this leaf's bytes.
    pub fn leaf_type(&self) -> LeafType {
        match self {
            Leaf::Chain17V1(_) => LeafType::CHAIN17_V1,
        }
    }

    /// The identity the leaf belongs to.
    pub fn id(&self) -> &[u8] {
        match self {
            Leaf::Chain17V1(leaf) => &leaf.team_id.0,
        }
    }

    pub fn seqno(&self) -> Seqno {
        match self {
            Leaf::Chain17V1(leaf) => leaf.seqno,
        }
    }

    /// The canonical bytes of the leaf itself, without its tag.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            Leaf::Chain17V1(leaf) => leaf.to_canonical(),
        }
    }

    /// Wraps the leaf in its self-describing envelope.
    pub fn export(&self) -> Result<LeafContainer, EncodingError> {
        Ok(LeafContainer::new(self.leaf_type(), self.serialize()?))
    }

    /// Decodes the leaf held by `container`, dispatching on its tag.
    pub fn import(container: &LeafContainer) -> Result<Self, LeafDecodeError> {
        let leaf_type = container.leaf_type();
        let malformed = |source| LeafDecodeError::Malformed { leaf_type, source };
        match leaf_type {
            LeafType::CHAIN17_V1 => Chain17V1Leaf::from_canonical(container.leaf_bytes())
                .map(Leaf::Chain17V1)
                .map_err(malformed),
            _ => Err(LeafDecodeError::UnknownLeafType(leaf_type)),
        }
    }
}

impl From<Chain17V1Leaf> for Leaf {
    fn from(value: Chain17V1Leaf) -> Self {
        Leaf::Chain17V1(value)
    }
}

impl TryFrom<&LeafContainer> for Leaf {
    type Error = LeafDecodeError;

    fn try_from(value: &LeafContainer) -> Result<Self, Self::Error> {
        Leaf::import(value)
    }
}

#[derive(Error, Debug)]
pub enum LeafDecodeError {
    #[error("unknown leaf type {0}")]
    UnknownLeafType(LeafType),

    #[error("malformed leaf of type {leaf_type}")]
    Malformed {
        leaf_type: LeafType,
        #[source]
        source: DecodeError,
    },
}
