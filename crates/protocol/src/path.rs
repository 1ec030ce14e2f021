use blindtree_crypto::{
    canonical::EncodingError, ByteVisitor, CanonicalReader, CanonicalVisitor, DecodeCanonical,
    VisitCanonical,
};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::{
    BlindedPreimage, Encoder, EncoderError, Leaf, LeafDecodeError, RootError, RootMetadata,
};

/// A run of root metadata bridging a trusted epoch to a later one.
pub type Skiplist = Vec<RootMetadata>;

/// A serialized node of the inclusion path, in the tree engine's own format.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeNode(#[serde_as(as = "Base64")] pub Vec<u8>);

/// Everything a verifier needs to check one leaf against a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    pub root_metadata: RootMetadata,
    pub path: Vec<TreeNode>,
    /// Underlies the value actually stored in the tree.
    pub blinded_preimage: BlindedPreimage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skiplists: Vec<Skiplist>,
}

impl PathResponse {
    /// Recomputes the tree value for the bundled preimage.
    ///
    /// The encoding type recorded in the root metadata is used, not the
    /// current default, so responses for older epochs stay checkable.
    pub fn leaf_value(&self) -> Result<Vec<u8>, EncoderError> {
        Encoder::new(self.root_metadata.encoding_type()).hash(&self.blinded_preimage)
    }

    /// Decodes the leaf inside the preimage's envelope.
    pub fn leaf(&self) -> Result<Leaf, LeafDecodeError> {
        self.blinded_preimage.leaf_container.leaf()
    }
}

impl VisitCanonical for PathResponse {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError> {
        visitor.visit_record(4)?;
        visitor.visit_nested(&self.root_metadata)?;
        visitor.visit_seq_len(self.path.len())?;
        for node in &self.path {
            visitor.visit_bin(&node.0)?;
        }
        visitor.visit_nested(&self.blinded_preimage)?;
        visitor.visit_seq_len(self.skiplists.len())?;
        for skiplist in &self.skiplists {
            visitor.visit_seq_len(skiplist.len())?;
            for metadata in skiplist {
                visitor.visit_nested(metadata)?;
            }
        }
        Ok(())
    }
}

impl DecodeCanonical for PathResponse {
    type Error = RootError;

    fn read_canonical(reader: &mut CanonicalReader<'_>) -> Result<Self, Self::Error> {
        reader.read_record(4)?;
        let root_metadata = RootMetadata::read_canonical(reader)?;

        let mut path = Vec::new();
        for _ in 0..reader.read_seq_len()? {
            path.push(TreeNode(reader.read_bin()?.to_vec()));
        }

        let blinded_preimage = BlindedPreimage::read_canonical(reader)?;

        let mut skiplists = Vec::new();
        for _ in 0..reader.read_seq_len()? {
            let mut skiplist = Skiplist::new();
            for _ in 0..reader.read_seq_len()? {
                skiplist.push(RootMetadata::read_canonical(reader)?);
            }
            skiplists.push(skiplist);
        }

        Ok(Self {
            root_metadata,
            path,
            blinded_preimage,
            skiplists,
        })
    }
}
