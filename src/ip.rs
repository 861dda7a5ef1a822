//! Family-agnostic entry points.
//!
//! Text is sniffed once: the IPv4 grammar is tried first, then IPv6.

use std::net::SocketAddr;

use crate::cidr::cut_addr;
use crate::codec::{ipv4, ipv6, Ipv4Literal};
use crate::error::AddrError;
use crate::models::{IpAddress, Ipv4Address};

/// Parse an address of either family.
///
/// # Examples
/// ```
/// use ipcodec::ip::parse_address;
/// assert!(parse_address("10.0.0.1").unwrap().is_ipv4());
/// assert!(parse_address("[fe80::1%eth0]").unwrap().is_ipv6());
/// assert!(parse_address("example.com").is_err());
/// ```
pub fn parse_address(ip: &str) -> Result<IpAddress, AddrError> {
    if let Some(literal) = Ipv4Literal::new(ip) {
        return Ok(IpAddress::V4(Ipv4Address::from(literal.to_u32())));
    }
    match ipv6::parse(ip) {
        Some(address) => Ok(IpAddress::V6(address)),
        None => {
            log::debug!("Not an IP address: {ip:?}");
            Err(AddrError::InvalidFormat(ip.to_string()))
        }
    }
}

/// Parse to 4 or 16 bytes, depending on the family.
pub fn to_bytes(ip: &str) -> Result<Vec<u8>, AddrError> {
    parse_address(ip).map(|address| address.octets())
}

/// Format 4 bytes as IPv4 or 16 bytes as IPv6.
///
/// # Examples
/// ```
/// use ipcodec::ip::format_address;
/// assert_eq!(format_address(&[127, 0, 0, 1]).unwrap(), "127.0.0.1");
/// assert!(format_address(&[1, 2, 3]).is_err());
/// ```
pub fn format_address(bytes: &[u8]) -> Result<String, AddrError> {
    match bytes.len() {
        ipv4::LENGTH => Ok(ipv4::to_string(u32::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
        ]))),
        ipv6::LENGTH => ipv6::to_string(bytes, 0, false),
        len => {
            log::warn!("Cannot format {len} bytes as an IP address");
            Err(AddrError::InvalidLength(len))
        }
    }
}

/// `host:port`, with IPv6 hosts in brackets.
///
/// # Examples
/// ```
/// use ipcodec::ip::format_host_port;
/// assert_eq!(format_host_port("10.0.0.1", 80), "10.0.0.1:80");
/// assert_eq!(format_host_port("::1", 443), "[::1]:443");
/// ```
pub fn format_host_port(host: &str, port: u16) -> String {
    let bracketed = host.len() > 1 && host.starts_with('[') && host.ends_with(']');
    if host.contains(':') && !bracketed {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Same as [`format_host_port`] with canonical host text.
pub fn format_socket_addr(addr: &SocketAddr) -> String {
    let host = IpAddress::from(addr.ip()).to_string();
    format_host_port(&host, addr.port())
}

/// Zero every bit after the first `prefix` bits.
pub fn truncate(address: &IpAddress, prefix: u8) -> Result<IpAddress, AddrError> {
    cut_addr(address, prefix)
}
