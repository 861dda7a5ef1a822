//! IPv6 address value type.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::net::Ipv6Addr;
use std::str::FromStr;

use super::Ipv4Address;
use crate::codec::ipv6::{self, LENGTH, WORD_COUNT};
use crate::error::AddrError;

/// An IPv6 address with an optional zone (`fe80::1%eth0`).
///
/// The zone travels with the address but is not part of its identity:
/// equality, hashing and ordering look at the 16 octets only.
#[derive(Debug, Clone)]
pub struct Ipv6Address {
    octets: [u8; LENGTH],
    zone: Option<String>,
}

impl Ipv6Address {
    /// `::1`
    pub const LOCALHOST: Ipv6Address = Ipv6Address {
        octets: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        zone: None,
    };
    /// `::`
    pub const WILDCARD: Ipv6Address = Ipv6Address {
        octets: [0; LENGTH],
        zone: None,
    };

    pub fn with_zone(mut self, zone: &str) -> Ipv6Address {
        self.zone = Some(zone.to_string());
        self
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn octets(&self) -> [u8; LENGTH] {
        self.octets
    }

    pub fn segments(&self) -> [u16; WORD_COUNT] {
        ipv6::bytes_to_words(&self.octets)
    }

    pub fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.octets)
    }

    pub fn from_u128(bits: u128) -> Ipv6Address {
        Ipv6Address::from(bits.to_be_bytes())
    }

    /// `::1`, by value.
    pub fn is_loopback(&self) -> bool {
        self.octets == Self::LOCALHOST.octets
    }

    /// The embedded address of `::ffff:a.b.c.d`.
    pub fn to_ipv4_mapped(&self) -> Option<Ipv4Address> {
        match self.octets {
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, a, b, c, d] => {
                Some(Ipv4Address::new(a, b, c, d))
            }
            _ => None,
        }
    }

    /// Canonical text, with a dotted tail for IPv4-mapped addresses.
    pub fn to_string_mapped(&self) -> String {
        ipv6::format_words(&self.segments(), true)
    }

    /// Canonical text followed by `%zone` when there is one.
    pub fn to_string_with_zone(&self) -> String {
        match &self.zone {
            Some(zone) => format!("{self}%{zone}"),
            None => self.to_string(),
        }
    }
}

impl PartialEq for Ipv6Address {
    fn eq(&self, other: &Ipv6Address) -> bool {
        self.octets == other.octets
    }
}

impl Eq for Ipv6Address {}

impl Hash for Ipv6Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.octets.hash(state);
    }
}

impl PartialOrd for Ipv6Address {
    fn partial_cmp(&self, other: &Ipv6Address) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ipv6Address {
    fn cmp(&self, other: &Ipv6Address) -> Ordering {
        self.octets.cmp(&other.octets)
    }
}

impl std::fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        ipv6::write_words(&self.segments(), false, f)
    }
}

impl FromStr for Ipv6Address {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ipv6::parse(s).ok_or_else(|| AddrError::InvalidFormat(s.to_string()))
    }
}

impl From<[u8; LENGTH]> for Ipv6Address {
    fn from(octets: [u8; LENGTH]) -> Self {
        Ipv6Address { octets, zone: None }
    }
}

impl From<[u16; WORD_COUNT]> for Ipv6Address {
    fn from(words: [u16; WORD_COUNT]) -> Self {
        Ipv6Address::from(ipv6::words_to_bytes(&words))
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Ipv6Address::from(addr.octets())
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(addr: Ipv6Address) -> Self {
        Ipv6Addr::from(addr.octets)
    }
}

impl Serialize for Ipv6Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string_with_zone())
    }
}

impl<'de> Deserialize<'de> for Ipv6Address {
    fn deserialize<D>(deserializer: D) -> Result<Ipv6Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| de::Error::custom(format!("invalid IPv6 address: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let addr: Ipv6Address = "2001:DB8:0:0:0:0:0:1".parse().unwrap();
        assert_eq!(addr.to_string(), "2001:db8::1");
        assert_eq!(addr.segments(), [0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
        assert!("2001:db8::g".parse::<Ipv6Address>().is_err());
    }

    #[test]
    fn test_zone_is_not_identity() {
        let plain: Ipv6Address = "fe80::1".parse().unwrap();
        let zoned: Ipv6Address = "fe80::1%eth0".parse().unwrap();
        assert_eq!(plain, zoned);
        assert_eq!(zoned.zone(), Some("eth0"));
        assert_eq!(zoned.to_string(), "fe80::1");
        assert_eq!(zoned.to_string_with_zone(), "fe80::1%eth0");
        assert_eq!(plain.to_string_with_zone(), "fe80::1");
    }

    #[test]
    fn test_mapped() {
        let addr: Ipv6Address = "::ffff:192.168.0.1".parse().unwrap();
        assert_eq!(addr.to_string(), "::ffff:c0a8:1");
        assert_eq!(addr.to_string_mapped(), "::ffff:192.168.0.1");
        assert_eq!(addr.to_ipv4_mapped(), Some(Ipv4Address::new(192, 168, 0, 1)));
        assert_eq!(Ipv6Address::LOCALHOST.to_ipv4_mapped(), None);
    }

    #[test]
    fn test_u128_and_std() {
        assert_eq!(Ipv6Address::LOCALHOST.to_u128(), 1);
        assert_eq!(Ipv6Address::from_u128(1), Ipv6Address::LOCALHOST);
        assert!(Ipv6Address::from_u128(1).is_loopback());
        assert_eq!(Ipv6Addr::from(Ipv6Address::WILDCARD), Ipv6Addr::UNSPECIFIED);
        assert_eq!(Ipv6Address::from(Ipv6Addr::LOCALHOST), Ipv6Address::LOCALHOST);
        assert!(Ipv6Address::LOCALHOST > Ipv6Address::WILDCARD);
    }

    #[test]
    fn test_serde() {
        let addr: Ipv6Address = "fe80::1%eth0".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"fe80::1%eth0\"");
        let back: Ipv6Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back.zone(), Some("eth0"));
        assert!(serde_json::from_str::<Ipv6Address>("\"1::2::3\"").is_err());
    }
}
