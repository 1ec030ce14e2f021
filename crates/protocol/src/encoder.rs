//! The two-stage keyed-hash blinding protocol.
//!
//! For an epoch secret `s`, a key `k` and a leaf `v`, the value stored in the
//! tree is `H(H(s, k), canonical(container(v)))`, where `H` is the keyed hash
//! selected by the encoder's [`EncodingType`]. Without `s` the inner blind
//! cannot be computed, so stored values cannot be tested against guessed
//! leaves; with `s`, `k` and the leaf anyone can recompute them.

use blindtree_crypto::{canonical::EncodingError, SecureRandomError, Secret, VisitCanonical};
use thiserror::Error;

use crate::{BlindedPreimage, EncodingType, Key, Leaf, UnknownEncodingType};

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error(transparent)]
    UnknownEncodingType(#[from] UnknownEncodingType),

    #[error("failed to serialize leaf")]
    Serialization(#[from] EncodingError),

    #[error(transparent)]
    SecureRandom(#[from] SecureRandomError),

    #[error("keyed hash rejected a key of {0} bytes")]
    InvalidKeyLength(usize),
}

/// Blinds and hashes leaves for one encoding type.
///
/// An encoder holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    encoding_type: EncodingType,
}

impl Encoder {
    pub fn new(encoding_type: EncodingType) -> Self {
        Self { encoding_type }
    }

    /// Creates an encoder from a raw wire tag, rejecting unregistered tags.
    pub fn from_tag(tag: u8) -> Result<Self, UnknownEncodingType> {
        Ok(Self::new(EncodingType::try_from(tag)?))
    }

    pub fn encoding_type(&self) -> EncodingType {
        self.encoding_type
    }

    /// Blinds `key` under `secret` and envelopes `leaf` with the result.
    pub fn derive_blinded_entropy(
        &self,
        leaf: &Leaf,
        key: &Key,
        secret: &Secret,
    ) -> Result<BlindedPreimage, EncoderError> {
        let blinded = self
            .encoding_type
            .hash_algorithm()
            .keyed(secret.expose(), key)
            .map_err(|_| EncoderError::InvalidKeyLength(secret.len()))?;
        Ok(BlindedPreimage::new(leaf, blinded)?)
    }

    /// Computes the tree value for a preimage.
    pub fn hash(&self, preimage: &BlindedPreimage) -> Result<Vec<u8>, EncoderError> {
        let container = preimage.leaf_container.to_canonical()?;
        self.encoding_type
            .hash_algorithm()
            .keyed(&preimage.blinded_entropy, container.as_slice())
            .map_err(|_| EncoderError::InvalidKeyLength(preimage.blinded_entropy.len()))
    }

    /// Computes the tree value for a leaf directly.
    ///
    /// Always equal to hashing the result of
    /// [`derive_blinded_entropy`](Self::derive_blinded_entropy).
    pub fn encode(&self, leaf: &Leaf, key: &Key, secret: &Secret) -> Result<Vec<u8>, EncoderError> {
        let preimage = self.derive_blinded_entropy(leaf, key, secret)?;
        let value = self.hash(&preimage)?;
        tracing::trace!(
            encoding_type = %self.encoding_type,
            leaf_type = %leaf.leaf_type(),
            seqno = leaf.seqno(),
            "encoded leaf"
        );
        Ok(value)
    }

    /// Generates a fresh epoch secret from the OS CSPRNG.
    pub fn generate_secret(&self) -> Result<Secret, EncoderError> {
        let secret = Secret::generate_len(self.encoding_type.secret_len())?;
        tracing::debug!(encoding_type = %self.encoding_type, "generated epoch secret");
        Ok(secret)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(EncodingType::default())
    }
}

impl From<EncodingType> for Encoder {
    fn from(value: EncodingType) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_rejects_unknown() {
        assert!(Encoder::from_tag(2).is_ok());
        for tag in [0u8, 3, 200] {
            assert_eq!(Encoder::from_tag(tag), Err(UnknownEncodingType(tag)));
        }
    }

    #[test]
    fn test_encoder_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<Encoder>();
    }
}
