#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! Attestation primitives: Keccak-256 hashing, Ethereum message framing, a minimal DER codec.
//
// This crate implements the byte-level utilities shared by the attestation engine:
//
// - Keccak-256 (the pre-standard SHA-3 padding, as used by Ethereum)
// - Personal-message framing ("\x19Ethereum Signed Message:\n" || len || m)
// - DER TLV encoding/decoding for the small ASN.1 subset the attestation format uses
// - Constant-time equality helpers for digests and addresses

use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;

/// 32-byte hash (Keccak-256 output).
pub type Hash256 = [u8; 32];

pub mod constants;
pub mod der;

pub use der::{DerError, DerReader, ObjectIdentifier, Tlv};

/// Keccak-256 of a single buffer.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash256 {
    keccak256_parts(&[data])
}

/// Keccak-256 over the concatenation of `parts`, without framing.
#[must_use]
pub fn keccak256_parts(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Keccak256::new();
    for p in parts {
        hasher.update(p);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// `PREFIX || ascii_decimal(len(m)) || m`
#[must_use]
pub fn personal_message(message: &[u8]) -> Vec<u8> {
    let len = message.len().to_string();
    let mut v = Vec::with_capacity(constants::PERSONAL_MESSAGE_PREFIX.len() + len.len() + message.len());
    v.extend_from_slice(constants::PERSONAL_MESSAGE_PREFIX);
    v.extend_from_slice(len.as_bytes());
    v.extend_from_slice(message);
    v
}

/// Keccak-256 of the personal-message framing of `message`.
#[must_use]
pub fn personal_message_hash(message: &[u8]) -> Hash256 {
    keccak256(&personal_message(message))
}

/// Constant-time equality for two 32-byte hashes.
#[must_use]
pub fn ct_eq_hash(a: &Hash256, b: &Hash256) -> bool {
    a.ct_eq(b).into()
}

/// Constant-time equality for byte slices; slices of different length compare unequal.
#[must_use]
pub fn ct_eq_bytes(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Drop leading zero bytes of a big-endian magnitude. Zero becomes the empty slice.
#[must_use]
pub fn strip_leading_zeros(be: &[u8]) -> &[u8] {
    let skip = be.iter().take_while(|&&b| b == 0).count();
    &be[skip..]
}

/// Left-pad a big-endian magnitude to exactly 32 bytes.
///
/// Returns `None` when the magnitude does not fit.
#[must_use]
pub fn left_pad_32(be: &[u8]) -> Option<[u8; 32]> {
    let trimmed = strip_leading_zeros(be);
    if trimmed.len() > 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Some(out)
}
