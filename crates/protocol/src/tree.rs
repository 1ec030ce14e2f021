use blindtree_crypto::{
    hash::{DynHash, HashAlgorithm},
    VisitBytes,
};

use crate::EncodingType;

/// Children of every interior node.
pub const CHILDREN_PER_NODE: usize = 2;

/// Values stored in a leaf node before it splits.
pub const MAX_VALUES_PER_LEAF: usize = 2;

/// The shape and interior hasher handed to the Merkle tree engine for an
/// epoch.
///
/// Leaf values themselves come from the [`Encoder`](crate::Encoder); the
/// engine only hashes interior nodes, with the unkeyed digest of the same
/// family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    pub encoding_type: EncodingType,
    pub children_per_node: usize,
    pub max_values_per_leaf: usize,
}

impl TreeConfig {
    pub fn for_encoding(encoding_type: EncodingType) -> Self {
        Self {
            encoding_type,
            children_per_node: CHILDREN_PER_NODE,
            max_values_per_leaf: MAX_VALUES_PER_LEAF,
        }
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.encoding_type.hash_algorithm()
    }

    /// Hashes a serialized interior node.
    pub fn hash_node(&self, node: impl VisitBytes) -> DynHash {
        self.hash_algorithm().digest(node)
    }
}

impl From<EncodingType> for TreeConfig {
    fn from(value: EncodingType) -> Self {
        Self::for_encoding(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_follows_encoding_family() {
        let legacy = TreeConfig::for_encoding(EncodingType::BlindedSha256V1);
        let current = TreeConfig::for_encoding(EncodingType::BlindedSha512_256V1);

        assert_eq!(legacy.children_per_node, 2);
        assert_eq!(legacy.max_values_per_leaf, 2);
        assert_eq!(legacy.hash_node(b"abc".as_slice()).algorithm(), HashAlgorithm::Sha256);
        assert_eq!(
            hex::encode(current.hash_node(b"abc".as_slice()).bytes()),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }
}
