//! Leaf blinding and root metadata chaining for a verifiable Merkle log.
//!
//! Leaves are wrapped in a [`LeafContainer`] envelope and blinded by an
//! [`Encoder`] before insertion, so the tree never stores a value that can be
//! tested against candidate leaves without the epoch's [`Secret`]. Each tree
//! epoch is then described by [`RootMetadata`], whose content hash links the
//! epochs into a chain through skip pointers.

#![warn(rust_2018_idioms, unused_lifetimes)]
#![forbid(unsafe_code, clippy::expect_used)]

pub mod container;
pub mod encoder;
pub mod encoding_type;
pub mod leaf;
pub mod path;
pub mod root;
pub mod tree;

mod key;
mod timestamp;

pub use blindtree_crypto::{SecureRandomError, Secret};
pub use container::{BlindedPreimage, LeafContainer};
pub use encoder::{Encoder, EncoderError};
pub use encoding_type::{EncodingType, UnknownEncodingType};
pub use key::Key;
pub use leaf::{Chain17V1Leaf, Leaf, LeafDecodeError, LeafType, LinkId, Seqno, TeamId};
pub use path::{PathResponse, Skiplist, TreeNode};
pub use root::{verify_skiplist, HashMeta, Root, RootError, RootMetadata, Skips, TreeSeqno};
pub use tree::TreeConfig;
