//! Text <-> binary codecs for each address family.
//!
//! - [`ipv4`] - dotted-quad grammar, packed `u32` form, netmasks
//! - [`ipv6`] - RFC 4291 grammar and RFC 5952 canonical output
//! - [`hex`] - nibble table shared by the parsers

pub mod hex;
pub mod ipv4;
pub mod ipv6;

pub use ipv4::Ipv4Literal;
