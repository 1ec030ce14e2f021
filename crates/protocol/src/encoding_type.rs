use blindtree_crypto::{hash::HashAlgorithm, SECRET_LEN};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The algorithm pair that blinds keys and hashes leaves for a tree epoch.
///
/// The numeric tag is recorded in every [`RootMetadata`](crate::RootMetadata)
/// so leaves blinded in an older epoch stay verifiable after the default
/// moves on.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EncodingType {
    /// `(k, v) -> (k, HMAC-SHA256(HMAC-SHA256(s, k), v))`
    BlindedSha256V1,
    /// `(k, v) -> (k, HMAC-SHA512/256(HMAC-SHA512/256(s, k), v))`
    BlindedSha512_256V1,
}

impl EncodingType {
    /// The encoding type used for new epochs unless configured otherwise.
    pub const CURRENT: EncodingType = EncodingType::BlindedSha512_256V1;

    /// Gets every registered encoding type.
    pub const fn all() -> [EncodingType; 2] {
        [
            EncodingType::BlindedSha256V1,
            EncodingType::BlindedSha512_256V1,
        ]
    }

    /// The wire tag of this encoding type.
    pub fn tag(self) -> u8 {
        match self {
            EncodingType::BlindedSha256V1 => 1,
            EncodingType::BlindedSha512_256V1 => 2,
        }
    }

    /// The digest family behind both keyed hashes of this encoding.
    pub fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            EncodingType::BlindedSha256V1 => HashAlgorithm::Sha256,
            EncodingType::BlindedSha512_256V1 => HashAlgorithm::Sha512_256,
        }
    }

    /// The length of the per-epoch secret.
    pub fn secret_len(self) -> usize {
        match self {
            EncodingType::BlindedSha256V1 | EncodingType::BlindedSha512_256V1 => SECRET_LEN,
        }
    }
}

impl Default for EncodingType {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl TryFrom<u8> for EncodingType {
    type Error = UnknownEncodingType;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(EncodingType::BlindedSha256V1),
            2 => Ok(EncodingType::BlindedSha512_256V1),
            _ => Err(UnknownEncodingType(tag)),
        }
    }
}

impl From<EncodingType> for u8 {
    fn from(value: EncodingType) -> Self {
        value.tag()
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingType::BlindedSha256V1 => write!(f, "blinded-sha256-v1"),
            EncodingType::BlindedSha512_256V1 => write!(f, "blinded-sha512-256-v1"),
        }
    }
}

impl fmt::Debug for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}({tag})", tag = self.tag())
    }
}

/// Parses either the numeric tag or the display name.
impl FromStr for EncodingType {
    type Err = EncodingTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tag) = s.parse::<u8>() {
            return Ok(EncodingType::try_from(tag)?);
        }

        EncodingType::all()
            .into_iter()
            .find(|ty| ty.to_string() == s)
            .ok_or_else(|| EncodingTypeParseError::Name(s.to_owned()))
    }
}

/// A tag that names no registered encoding type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown encoding type {0}")]
pub struct UnknownEncodingType(pub u8);

#[derive(Error, Debug)]
pub enum EncodingTypeParseError {
    #[error(transparent)]
    Unknown(#[from] UnknownEncodingType),

    #[error("`{0}` is not a valid encoding type")]
    Name(String),
}
