//! Cryptographic building blocks for blinded Merkle leaves.
//!
//! This crate knows nothing about leaves or tree roots; it provides the
//! digests, keyed hashes, secrets and the canonical positional encoding
//! that the protocol crate composes.

#![warn(rust_2018_idioms, unused_lifetimes)]
#![forbid(unsafe_code, clippy::expect_used)]

pub mod canonical;
pub mod hash;
pub mod secret;
mod visit_bytes;

pub use canonical::{CanonicalReader, CanonicalVisitor, DecodeCanonical, VisitCanonical};
pub use secret::{SecureRandomError, Secret, SECRET_LEN};
pub use visit_bytes::{ByteVisitor, VisitBytes};
