//! IPv4 and IPv6 address codec.
//!
//! Parses, validates and canonically formats IP addresses, and does the prefix
//! arithmetic around them (netmasks, CIDR blocks, range decomposition).
//!
//! - [`codec`] - per-family text <-> binary conversion
//! - [`models`] - typed addresses and CIDR blocks
//! - [`ip`] - entry points that accept either family
//! - [`cidr`] - masks and range decomposition
//! - [`error`] - [`AddrError`]
//!
//! No function does I/O or touches the platform resolver, and malformed input
//! is reported, never panicked on.

pub mod cidr;
pub mod codec;
pub mod error;
pub mod ip;
pub mod models;

pub use cidr::AddressRange;
pub use error::AddrError;
pub use ip::{format_address, format_host_port, parse_address};
pub use models::{Cidr, IpAddress, Ipv4Address, Ipv6Address};
