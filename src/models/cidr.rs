//! CIDR block notation (`10.0.0.0/24`, `2001:db8::/32`).

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use super::IpAddress;
use crate::cidr::{broadcast_addr, cut_addr, mask};
use crate::error::AddrError;

/// An address with a prefix length no longer than its family allows.
///
/// The address is kept as written; [`Cidr::lo`] gives the network address.
/// Ordering is by address, then by prefix.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Cidr {
    addr: IpAddress,
    prefix: u8,
}

impl Cidr {
    /// Create a new [`Cidr`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Cidr, AddrError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, prefix) = addr_cidr
            .split_once('/')
            .ok_or_else(|| AddrError::InvalidCidr(addr_cidr.to_string()))?;
        let addr: IpAddress = addr.parse()?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| AddrError::InvalidCidr(addr_cidr.to_string()))?;
        Cidr::from_parts(addr, prefix)
    }

    pub fn from_parts(addr: IpAddress, prefix: u8) -> Result<Cidr, AddrError> {
        mask::check_prefix(prefix, addr.max_prefix())?;
        Ok(Cidr { addr, prefix })
    }

    /// For prefixes already known to fit the family.
    pub(crate) fn from_block(addr: IpAddress, prefix: u8) -> Cidr {
        Cidr { addr, prefix }
    }

    pub fn addr(&self) -> &IpAddress {
        &self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Get the lowest (network) address in the block.
    pub fn lo(&self) -> IpAddress {
        let width = self.addr.max_prefix();
        self.addr
            .with_bits(self.addr.to_bits() & mask::prefix_mask_bits(width, self.prefix))
    }

    /// Get the highest (broadcast) address in the block.
    pub fn hi(&self) -> IpAddress {
        let width = self.addr.max_prefix();
        let host_bits =
            !mask::prefix_mask_bits(width, self.prefix) & mask::prefix_mask_bits(width, width);
        self.addr.with_bits(self.lo().to_bits() | host_bits)
    }

    /// Whether `addr` falls in the block. Other families never match.
    pub fn contains(&self, addr: &IpAddress) -> bool {
        addr.is_ipv4() == self.addr.is_ipv4() && (self.lo()..=self.hi()).contains(addr)
    }

    /// Dotted netmask of an IPv4 block, `None` for IPv6.
    pub fn netmask(&self) -> Option<&'static str> {
        self.addr
            .is_ipv4()
            .then(|| mask::netmask_for_prefix(self.prefix))
    }

    /// Shrink to a longer prefix, keeping the network address.
    pub fn cut(&self, prefix: u8) -> Result<Cidr, AddrError> {
        if prefix < self.prefix {
            return Err(AddrError::InvalidCidr(format!(
                "{self} can only be cut to a longer prefix, not /{prefix}"
            )));
        }
        Cidr::from_parts(cut_addr(&self.addr, prefix)?, prefix)
    }

    /// The broadcast address with this block's prefix.
    pub fn broadcast(&self) -> Result<Cidr, AddrError> {
        Ok(Cidr::from_block(
            broadcast_addr(&self.addr, self.prefix)?,
            self.prefix,
        ))
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cidr::new(s)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let cidr = format!("{}/{}", self.addr, self.prefix);
        serializer.serialize_str(&cidr)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {}: {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_new() {
        let cidr = Cidr::new(" 10.0.0.0/24 ").unwrap();
        assert_eq!(cidr.addr(), &ip("10.0.0.0"));
        assert_eq!(cidr.prefix(), 24);
        assert_eq!(cidr.to_string(), "10.0.0.0/24");

        let cidr: Cidr = "2001:DB8::/32".parse().unwrap();
        assert_eq!(cidr.to_string(), "2001:db8::/32");

        assert_eq!(
            Cidr::new("10.0.0.0").unwrap_err(),
            AddrError::InvalidCidr("10.0.0.0".to_string())
        );
        assert_eq!(
            Cidr::new("10.0.0.0/x").unwrap_err(),
            AddrError::InvalidCidr("10.0.0.0/x".to_string())
        );
        assert_eq!(
            Cidr::new("10.0.0.0/33").unwrap_err(),
            AddrError::PrefixOutOfRange {
                prefix: 33,
                max: 32
            }
        );
        assert!(Cidr::new("::/128").is_ok());
        assert!(Cidr::new("::/129").is_err());
        assert_eq!(
            Cidr::new("10.0.0/8").unwrap_err(),
            AddrError::InvalidFormat("10.0.0".to_string())
        );
    }

    #[test]
    fn test_lo_hi() {
        let cidr = Cidr::new("192.168.1.77/24").unwrap();
        assert_eq!(cidr.lo(), ip("192.168.1.0"));
        assert_eq!(cidr.hi(), ip("192.168.1.255"));

        let cidr = Cidr::new("10.0.0.0/0").unwrap();
        assert_eq!(cidr.lo(), ip("0.0.0.0"));
        assert_eq!(cidr.hi(), ip("255.255.255.255"));

        let cidr = Cidr::new("2001:db8::1/64").unwrap();
        assert_eq!(cidr.lo(), ip("2001:db8::"));
        assert_eq!(cidr.hi(), ip("2001:db8::ffff:ffff:ffff:ffff"));
    }

    #[test]
    fn test_contains() {
        let cidr = Cidr::new("10.10.10.10/24").unwrap();
        assert!(cidr.contains(&ip("10.10.10.5")));
        assert!(!cidr.contains(&ip("10.10.11.5")));
        assert!(!cidr.contains(&ip("::ffff:10.10.10.5")));

        let any = Cidr::new("0.0.0.0/0").unwrap();
        assert!(any.contains(&ip("255.255.255.255")));
        assert!(!any.contains(&ip("::")));

        let cidr = Cidr::new("fe80::/10").unwrap();
        assert!(cidr.contains(&ip("fe80::1%eth0")));
        assert!(cidr.contains(&ip("febf::1")));
        assert!(!cidr.contains(&ip("fec0::1")));
    }

    #[test]
    fn test_netmask() {
        assert_eq!(Cidr::new("10.0.0.0/20").unwrap().netmask(), Some("255.255.240.0"));
        assert_eq!(Cidr::new("::/64").unwrap().netmask(), None);
    }

    #[test]
    fn test_cut_and_broadcast() {
        let cidr = Cidr::new("10.18.126.77/16").unwrap();
        assert_eq!(cidr.cut(24).unwrap(), Cidr::new("10.18.126.0/24").unwrap());
        assert!(cidr.cut(8).is_err());
        assert!(cidr.cut(33).is_err());
        assert_eq!(
            cidr.broadcast().unwrap(),
            Cidr::new("10.18.255.255/16").unwrap()
        );
    }

    #[test]
    fn test_cmp_overlap() {
        let c1 = Cidr::new("10.0.10.0/24").unwrap();
        let c2 = Cidr::new("10.0.0.0/8").unwrap();
        let c3 = Cidr::new("10.0.10.64/26").unwrap();

        assert!(c1 > c2);
        assert!(c1 < c3);
        assert!(c2 < c3);
        assert!(c2.lo() < c1.lo());
        assert!(c2.hi() > c1.hi());
        assert!(c2.hi() > c3.hi());
        assert!(Cidr::new("10.0.0.0/8").unwrap() < Cidr::new("10.0.0.0/9").unwrap());
    }

    #[test]
    fn test_serde() {
        let cidrs: Vec<Cidr> = serde_json::from_str(r#"["10.0.0.0/8", "fd00::/8"]"#).unwrap();
        assert_eq!(cidrs[0].prefix(), 8);
        assert!(cidrs[1].addr().is_ipv6());
        assert_eq!(
            serde_json::to_string(&cidrs).unwrap(),
            r#"["10.0.0.0/8","fd00::/8"]"#
        );
        assert!(serde_json::from_str::<Cidr>("\"10.0.0.0/40\"").is_err());
    }
}
