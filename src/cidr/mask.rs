//! Prefix and netmask utilities.
//!
//! Masks are computed on `u128` so one implementation serves both families;
//! the IPv4 entry points narrow the result back to `u32`.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::error::AddrError;
use crate::models::IpAddress;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Maximum length for an IPv6 prefix (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// The 33 canonical IPv4 netmasks, indexed by prefix length.
const CIDR_NETMASKS: [&str; MAX_LENGTH as usize + 1] = [
    "0.0.0.0",
    "128.0.0.0",
    "192.0.0.0",
    "224.0.0.0",
    "240.0.0.0",
    "248.0.0.0",
    "252.0.0.0",
    "254.0.0.0",
    "255.0.0.0",
    "255.128.0.0",
    "255.192.0.0",
    "255.224.0.0",
    "255.240.0.0",
    "255.248.0.0",
    "255.252.0.0",
    "255.254.0.0",
    "255.255.0.0",
    "255.255.128.0",
    "255.255.192.0",
    "255.255.224.0",
    "255.255.240.0",
    "255.255.248.0",
    "255.255.252.0",
    "255.255.254.0",
    "255.255.255.0",
    "255.255.255.128",
    "255.255.255.192",
    "255.255.255.224",
    "255.255.255.240",
    "255.255.255.248",
    "255.255.255.252",
    "255.255.255.254",
    "255.255.255.255",
];

lazy_static! {
    static ref NETMASK_PREFIXES: HashMap<&'static str, u8> = CIDR_NETMASKS
        .iter()
        .enumerate()
        .map(|(prefix, mask)| (*mask, prefix as u8))
        .collect();
}

/// Netmask text for `prefix`, the `/0` netmask when there is none.
pub fn netmask_for_prefix(prefix: u8) -> &'static str {
    CIDR_NETMASKS
        .get(usize::from(prefix))
        .copied()
        .unwrap_or(CIDR_NETMASKS[0])
}

/// Prefix for a canonical netmask, `0` when `mask` is not one.
pub fn prefix_for_netmask(mask: &str) -> u8 {
    NETMASK_PREFIXES.get(mask).copied().unwrap_or(0)
}

pub(crate) fn check_prefix(len: u8, max: u8) -> Result<(), AddrError> {
    if len > max {
        log::warn!("Prefix /{len} is longer than {max} bits");
        Err(AddrError::PrefixOutOfRange { prefix: len, max })
    } else {
        Ok(())
    }
}

/// Network mask of `len` bits inside a `width`-bit address. `len <= width`.
pub(crate) fn prefix_mask_bits(width: u8, len: u8) -> u128 {
    let right_len = u32::from(width - len);
    let all_bits = u128::MAX >> (128 - u32::from(width));
    all_bits
        .checked_shr(right_len)
        .map_or(0, |bits| bits << right_len)
}

/// Smallest prefix that `bits` is a network address for.
pub(crate) fn lo_mask_bits(bits: u128, width: u8) -> u8 {
    let trailing_zeros = bits.trailing_zeros().min(u32::from(width)) as u8;
    width - trailing_zeros
}

/// Convert a CIDR prefix length to an IPv4 subnet mask as u32.
///
/// # Examples
/// ```
/// use ipcodec::cidr::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, AddrError> {
    check_prefix(len, MAX_LENGTH)?;
    Ok(prefix_mask_bits(MAX_LENGTH, len) as u32)
}

/// Convert a CIDR prefix length to an IPv6 subnet mask as u128.
pub fn get_cidr_mask_v6(len: u8) -> Result<u128, AddrError> {
    check_prefix(len, MAX_LENGTH_V6)?;
    Ok(prefix_mask_bits(MAX_LENGTH_V6, len))
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: &IpAddress, len: u8) -> Result<IpAddress, AddrError> {
    let width = addr.max_prefix();
    check_prefix(len, width)?;
    Ok(addr.with_bits(addr.to_bits() & prefix_mask_bits(width, len)))
}

/// Calculate the broadcast (highest) address for a given IP and prefix length.
pub fn broadcast_addr(addr: &IpAddress, len: u8) -> Result<IpAddress, AddrError> {
    let width = addr.max_prefix();
    check_prefix(len, width)?;
    let mask = prefix_mask_bits(width, len);
    let host_bits = !mask & prefix_mask_bits(width, width);
    Ok(addr.with_bits((addr.to_bits() & mask) | host_bits))
}

/// First address after the block `addr/len`, `None` when the block ends at the
/// top of the address space.
pub fn ip_after_subnet(addr: &IpAddress, len: u8) -> Result<Option<IpAddress>, AddrError> {
    let width = addr.max_prefix();
    check_prefix(len, width)?;
    let network = addr.to_bits() & prefix_mask_bits(width, len);
    Ok(next_block_bits(network, width, len).map(|bits| addr.with_bits(bits)))
}

/// Start of the block that follows `network/len`, if it fits in `width` bits.
pub(crate) fn next_block_bits(network: u128, width: u8, len: u8) -> Option<u128> {
    let size = 1u128.checked_shl(u32::from(width - len))?;
    network
        .checked_add(size)
        .filter(|next| *next <= prefix_mask_bits(width, width))
}

/// Calculate the minimum mask for an IP address based on trailing zeros.
pub fn lo_mask(addr: &IpAddress) -> u8 {
    lo_mask_bits(addr.to_bits(), addr.max_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_get_cidr_mask_v6() {
        assert_eq!(get_cidr_mask_v6(0).unwrap(), 0);
        assert_eq!(get_cidr_mask_v6(64).unwrap(), u128::MAX << 64);
        assert_eq!(get_cidr_mask_v6(128).unwrap(), u128::MAX);
        assert_eq!(
            get_cidr_mask_v6(129).unwrap_err(),
            AddrError::PrefixOutOfRange {
                prefix: 129,
                max: 128
            }
        );
    }

    #[test]
    fn test_cut_addr() {
        let addr = ip("192.168.1.42");
        assert_eq!(cut_addr(&addr, 24).unwrap(), ip("192.168.1.0"));
        assert_eq!(cut_addr(&addr, 16).unwrap(), ip("192.168.0.0"));
        assert_eq!(cut_addr(&addr, 8).unwrap(), ip("192.0.0.0"));
        assert_eq!(cut_addr(&addr, 32).unwrap(), ip("192.168.1.42"));
        assert_eq!(cut_addr(&addr, 0).unwrap(), ip("0.0.0.0"));
        assert!(cut_addr(&addr, 33).is_err());

        let addr = ip("2001:db8:abcd:12::1");
        assert_eq!(cut_addr(&addr, 48).unwrap(), ip("2001:db8:abcd::"));
        assert_eq!(cut_addr(&addr, 128).unwrap(), addr);
        assert!(cut_addr(&addr, 129).is_err());
    }

    #[test]
    fn test_broadcast_addr() {
        let addr = ip("192.168.1.0");
        assert_eq!(broadcast_addr(&addr, 24).unwrap(), ip("192.168.1.255"));
        assert_eq!(broadcast_addr(&addr, 16).unwrap(), ip("192.168.255.255"));
        assert_eq!(broadcast_addr(&addr, 8).unwrap(), ip("192.255.255.255"));
        assert_eq!(broadcast_addr(&addr, 32).unwrap(), ip("192.168.1.0"));
        assert_eq!(broadcast_addr(&addr, 0).unwrap(), ip("255.255.255.255"));

        let addr = ip("fe80::1");
        assert_eq!(
            broadcast_addr(&addr, 64).unwrap(),
            ip("fe80::ffff:ffff:ffff:ffff")
        );
    }

    #[test]
    fn test_ip_after_subnet() {
        assert_eq!(
            ip_after_subnet(&ip("10.0.0.7"), 24).unwrap(),
            Some(ip("10.0.1.0"))
        );
        assert_eq!(
            ip_after_subnet(&ip("10.0.0.7"), 32).unwrap(),
            Some(ip("10.0.0.8"))
        );
        assert_eq!(ip_after_subnet(&ip("255.255.255.0"), 24).unwrap(), None);
        assert_eq!(ip_after_subnet(&ip("1.2.3.4"), 0).unwrap(), None);
        assert_eq!(
            ip_after_subnet(&ip("2001:db8::"), 32).unwrap(),
            Some(ip("2001:db9::"))
        );
        assert_eq!(ip_after_subnet(&ip("::"), 0).unwrap(), None);
        assert!(ip_after_subnet(&ip("::"), 129).is_err());
    }

    #[test]
    fn test_lo_mask() {
        assert_eq!(lo_mask(&ip("192.168.1.1")), 32);
        assert_eq!(lo_mask(&ip("10.6.2.80")), 28);
        assert_eq!(lo_mask(&ip("10.11.12.0")), 22);
        assert_eq!(lo_mask(&ip("0.0.0.0")), 0);
        assert_eq!(lo_mask(&ip("2001:db8::")), 29);
        assert_eq!(lo_mask(&ip("::")), 0);
    }

    #[test]
    fn test_netmask_lookup() {
        assert_eq!(netmask_for_prefix(32), "255.255.255.255");
        assert_eq!(netmask_for_prefix(200), "0.0.0.0");
        assert_eq!(prefix_for_netmask("255.255.255.128"), 25);
        assert_eq!(prefix_for_netmask("garbage"), 0);
    }
}
