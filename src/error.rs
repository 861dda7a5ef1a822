//! Error types for the address codec.
//!
//! Malformed text is ordinary traffic, so the validating entry points report it
//! through `bool`/`Option`. [`AddrError`] is returned where a caller asked for a
//! `Result`, and for contract violations such as a buffer of the wrong length.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddrError {
    #[error("Invalid IP address format: {0}")]
    InvalidFormat(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid address length: {0} (expected 4 or 16)")]
    InvalidLength(usize),

    #[error("Invalid prefix length: {prefix} (must be 0-{max})")]
    PrefixOutOfRange { prefix: u8, max: u8 },

    #[error("Address family mismatch: {0} and {1}")]
    FamilyMismatch(String, String),

    #[error("Range start {start} is after range end {end}")]
    InvertedRange { start: String, end: String },
}
