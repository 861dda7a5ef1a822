//! Address value types.
//!
//! This module contains the typed forms the codecs parse into and format from:
//! - [`Ipv4Address`] - packed IPv4 address
//! - [`Ipv6Address`] - IPv6 address with an optional zone
//! - [`IpAddress`] - either family
//! - [`Cidr`] - address with a prefix length

mod cidr;
mod ip;
mod ipv4;
mod ipv6;

// Re-export public types
pub use cidr::Cidr;
pub use ip::IpAddress;
pub use ipv4::Ipv4Address;
pub use ipv6::Ipv6Address;
