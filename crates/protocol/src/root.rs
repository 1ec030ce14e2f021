//! Tree root metadata and its content hash.
//!
//! Each epoch publishes a [`RootMetadata`] record naming its encoding type,
//! its tree root and a set of skip pointers to the `HashMeta` of earlier
//! epochs. The skip pointers always include the immediate predecessor, so
//! the records form an unbroken hash chain; which other epochs are pointed
//! to is up to the log operator.

use blindtree_crypto::{
    canonical::{DecodeError, EncodingError},
    hash::{Hash, Sha512_256},
    ByteVisitor, CanonicalReader, CanonicalVisitor, DecodeCanonical, VisitCanonical,
};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use std::{collections::BTreeMap, time::SystemTime};
use thiserror::Error;

use crate::{EncodingType, UnknownEncodingType};

/// A tree epoch counter.
pub type TreeSeqno = i64;

/// The content hash of a [`RootMetadata`] record.
pub type HashMeta = Hash<Sha512_256>;

/// The sequence number of the first tree; it has no predecessor.
pub const INITIAL_TREE_SEQNO: TreeSeqno = 1;

/// Length of every skip pointer, the size of a [`HashMeta`].
pub const SKIP_HASH_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum RootError {
    #[error("tree seqno {0} precedes the initial epoch")]
    SeqnoBeforeInitial(TreeSeqno),

    #[error("root metadata for seqno {seqno} is missing its skip to the previous epoch")]
    MissingPrevSkip { seqno: TreeSeqno },

    #[error("skip from seqno {seqno} to {skip} does not point to an earlier epoch")]
    SkipNotEarlier { seqno: TreeSeqno, skip: TreeSeqno },

    #[error("skip from seqno {seqno} to {skip} is {len} bytes, expected 32")]
    SkipLength {
        seqno: TreeSeqno,
        skip: TreeSeqno,
        len: usize,
    },

    #[error(transparent)]
    UnknownEncodingType(#[from] UnknownEncodingType),

    #[error("failed to encode root metadata")]
    Encoding(#[from] EncodingError),

    #[error("failed to decode root metadata")]
    Decode(#[from] DecodeError),

    #[error("root hash metadata does not match its metadata bytes")]
    HashMismatch,

    #[error("root seqno {root} does not match metadata seqno {metadata}")]
    SeqnoMismatch {
        root: TreeSeqno,
        metadata: TreeSeqno,
    },

    #[error("skiplist entry for seqno {seqno} does not follow seqno {prev}")]
    SkiplistOrder { seqno: TreeSeqno, prev: TreeSeqno },

    #[error("skiplist entry for seqno {seqno} has no matching skip to seqno {prev}")]
    BrokenSkiplist { seqno: TreeSeqno, prev: TreeSeqno },
}

/// Back-pointers from one epoch to the `HashMeta` of earlier epochs.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skips(#[serde_as(as = "BTreeMap<_, Base64>")] BTreeMap<TreeSeqno, Vec<u8>>);

impl Skips {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a skip to `seqno`, replacing any previous entry.
    pub fn insert(&mut self, seqno: TreeSeqno, hash: impl AsRef<[u8]>) {
        self.0.insert(seqno, hash.as_ref().to_vec());
    }

    pub fn get(&self, seqno: TreeSeqno) -> Option<&[u8]> {
        self.0.get(&seqno).map(Vec::as_slice)
    }

    /// Iterates entries in ascending seqno order.
    pub fn iter(&self) -> impl Iterator<Item = (TreeSeqno, &[u8])> + '_ {
        self.0.iter().map(|(seqno, hash)| (*seqno, hash.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TreeSeqno, Vec<u8>)> for Skips {
    fn from_iter<T: IntoIterator<Item = (TreeSeqno, Vec<u8>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The metadata describing one tree epoch.
///
/// Construction and decoding both enforce the chain invariant: every epoch
/// after the first carries a skip to its immediate predecessor.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RootMetadataBody")]
pub struct RootMetadata {
    encoding_type: EncodingType,
    seqno: TreeSeqno,
    skips: Skips,
    #[serde_as(as = "Base64")]
    root_hash: Vec<u8>,
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RootMetadataBody {
    encoding_type: EncodingType,
    seqno: TreeSeqno,
    skips: Skips,
    #[serde_as(as = "Base64")]
    root_hash: Vec<u8>,
}

impl TryFrom<RootMetadataBody> for RootMetadata {
    type Error = RootError;

    fn try_from(value: RootMetadataBody) -> Result<Self, Self::Error> {
        RootMetadata::new(value.encoding_type, value.seqno, value.skips, value.root_hash)
    }
}

impl RootMetadata {
    pub fn new(
        encoding_type: EncodingType,
        seqno: TreeSeqno,
        skips: Skips,
        root_hash: Vec<u8>,
    ) -> Result<Self, RootError> {
        let metadata = Self {
            encoding_type,
            seqno,
            skips,
            root_hash,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<(), RootError> {
        if self.seqno < INITIAL_TREE_SEQNO {
            return Err(RootError::SeqnoBeforeInitial(self.seqno));
        }
        if self.seqno > INITIAL_TREE_SEQNO && self.skips.get(self.seqno - 1).is_none() {
            return Err(RootError::MissingPrevSkip { seqno: self.seqno });
        }
        for (skip, hash) in self.skips.iter() {
            if skip >= self.seqno || skip < INITIAL_TREE_SEQNO {
                return Err(RootError::SkipNotEarlier {
                    seqno: self.seqno,
                    skip,
                });
            }
            if hash.len() != SKIP_HASH_LEN {
                return Err(RootError::SkipLength {
                    seqno: self.seqno,
                    skip,
                    len: hash.len(),
                });
            }
        }
        Ok(())
    }

    pub fn encoding_type(&self) -> EncodingType {
        self.encoding_type
    }

    pub fn seqno(&self) -> TreeSeqno {
        self.seqno
    }

    pub fn skips(&self) -> &Skips {
        &self.skips
    }

    pub fn root_hash(&self) -> &[u8] {
        &self.root_hash
    }

    /// The skip to the immediate predecessor, absent only for the first epoch.
    pub fn prev(&self) -> Option<&[u8]> {
        self.skips.get(self.seqno - 1)
    }

    /// Returns the canonical bytes of the record and their SHA-512/256 digest.
    ///
    /// The digest is the same for every encoding type; it depends on nothing
    /// but the canonical bytes.
    pub fn canonicalize_and_hash(&self) -> Result<(Vec<u8>, HashMeta), EncodingError> {
        let bytes = self.to_canonical()?;
        let hash = HashMeta::of(bytes.as_slice());
        tracing::trace!(seqno = self.seqno, hash_meta = %hash, "hashed root metadata");
        Ok((bytes, hash))
    }

    pub fn hash_meta(&self) -> Result<HashMeta, EncodingError> {
        Ok(self.canonicalize_and_hash()?.1)
    }

    /// Parses canonical metadata bytes, rejecting unknown encoding types and
    /// records that break the chain invariant.
    pub fn decode(bytes: &[u8]) -> Result<Self, RootError> {
        Self::from_canonical(bytes)
    }
}

impl VisitCanonical for RootMetadata {
    fn visit_canonical<BV: ?Sized + ByteVisitor>(
        &self,
        visitor: &mut CanonicalVisitor<'_, BV>,
    ) -> Result<(), EncodingError> {
        visitor.visit_record(4)?;
        visitor.visit_unsigned(self.encoding_type.tag().into())?;
        visitor.visit_signed(self.seqno)?;
        visitor.visit_map_len(self.skips.len())?;
        for (seqno, hash) in self.skips.iter() {
            visitor.visit_signed(seqno)?;
            visitor.visit_bin(hash)?;
        }
        visitor.visit_bin(&self.root_hash)
    }
}

impl DecodeCanonical for RootMetadata {
    type Error = RootError;

    fn read_canonical(reader: &mut CanonicalReader<'_>) -> Result<Self, Self::Error> {
        reader.read_record(4)?;
        let encoding_type = EncodingType::try_from(reader.read_u8()?)?;
        let seqno = reader.read_i64()?;

        let mut skips = BTreeMap::new();
        let mut last = None;
        for _ in 0..reader.read_map_len()? {
            let skip = reader.read_i64()?;
            if last.is_some_and(|last| skip <= last) {
                return Err(DecodeError::UnorderedKeys.into());
            }
            last = Some(skip);
            skips.insert(skip, reader.read_bin()?.to_vec());
        }

        let root_hash = reader.read_bin()?.to_vec();
        RootMetadata::new(encoding_type, seqno, Skips(skips), root_hash)
    }
}

/// The externally published unit for one epoch.
///
/// There is no plain "root hash" here: `hash_metadata` is the only
/// identifier of the root.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    seqno: TreeSeqno,
    #[serde(with = "crate::timestamp")]
    ctime: SystemTime,
    #[serde_as(as = "Base64")]
    hash_metadata: Vec<u8>,
    #[serde_as(as = "Base64")]
    metadata: Vec<u8>,
}

impl Root {
    pub fn new(metadata: &RootMetadata, ctime: SystemTime) -> Result<Self, EncodingError> {
        let (bytes, hash) = metadata.canonicalize_and_hash()?;
        Ok(Self {
            seqno: metadata.seqno(),
            ctime,
            hash_metadata: hash.bytes().to_vec(),
            metadata: bytes,
        })
    }

    pub fn seqno(&self) -> TreeSeqno {
        self.seqno
    }

    pub fn ctime(&self) -> SystemTime {
        self.ctime
    }

    pub fn hash_metadata(&self) -> &[u8] {
        &self.hash_metadata
    }

    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }

    /// Checks the root against its metadata bytes and decodes them.
    pub fn open(&self) -> Result<RootMetadata, RootError> {
        if HashMeta::of(self.metadata.as_slice()).bytes() != self.hash_metadata.as_slice() {
            return Err(RootError::HashMismatch);
        }
        let metadata = RootMetadata::decode(&self.metadata)?;
        if metadata.seqno() != self.seqno {
            return Err(RootError::SeqnoMismatch {
                root: self.seqno,
                metadata: metadata.seqno(),
            });
        }
        Ok(metadata)
    }
}

/// Checks that `skiplist` chains forward from `trusted`.
///
/// Every record must come after the one before it and must carry a skip
/// holding exactly that record's `HashMeta`. On success the last record of
/// the list (or `trusted` for an empty list) is reachable from `trusted`.
pub fn verify_skiplist(trusted: &RootMetadata, skiplist: &[RootMetadata]) -> Result<(), RootError> {
    let mut prev_seqno = trusted.seqno();
    let mut prev_hash = trusted.hash_meta()?;
    for metadata in skiplist {
        if metadata.seqno() <= prev_seqno {
            return Err(RootError::SkiplistOrder {
                seqno: metadata.seqno(),
                prev: prev_seqno,
            });
        }
        if metadata.skips().get(prev_seqno) != Some(prev_hash.bytes()) {
            return Err(RootError::BrokenSkiplist {
                seqno: metadata.seqno(),
                prev: prev_seqno,
            });
        }
        prev_seqno = metadata.seqno();
        prev_hash = metadata.hash_meta()?;
    }
    Ok(())
}
