//! IPv4 address value type.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::codec::{ipv4, Ipv4Literal};
use crate::error::AddrError;

/// An IPv4 address in its packed big-endian form.
///
/// Comparisons are unsigned, so `128.0.0.0` sorts after `127.255.255.255`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Default)]
pub struct Ipv4Address(u32);

impl Ipv4Address {
    /// `127.0.0.1`
    pub const LOCALHOST: Ipv4Address = Ipv4Address(0x7f00_0001);
    /// `0.0.0.0`
    pub const WILDCARD: Ipv4Address = Ipv4Address(0);

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Ipv4Address {
        Ipv4Address(u32::from_be_bytes([a, b, c, d]))
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn octets(self) -> [u8; ipv4::LENGTH] {
        self.0.to_be_bytes()
    }

    /// 10/8, 172.16/12 or 192.168/16.
    pub fn is_site_local(self) -> bool {
        ipv4::is_site_local(self.0)
    }

    /// 127/8.
    pub fn is_loopback(self) -> bool {
        ipv4::is_loopback(self.0)
    }
}

impl std::fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        ipv4::write_to(self.0, f)
    }
}

impl FromStr for Ipv4Address {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4Literal::new(s)
            .map(|literal| Ipv4Address(literal.to_u32()))
            .ok_or_else(|| AddrError::InvalidFormat(s.to_string()))
    }
}

impl From<u32> for Ipv4Address {
    fn from(bits: u32) -> Self {
        Ipv4Address(bits)
    }
}

impl From<Ipv4Address> for u32 {
    fn from(addr: Ipv4Address) -> Self {
        addr.0
    }
}

impl From<[u8; ipv4::LENGTH]> for Ipv4Address {
    fn from(octets: [u8; ipv4::LENGTH]) -> Self {
        Ipv4Address(u32::from_be_bytes(octets))
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Ipv4Address(u32::from(addr))
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        Ipv4Addr::from(addr.0)
    }
}

impl Serialize for Ipv4Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Address {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| de::Error::custom(format!("invalid IPv4 address: {}", s)))
    }
}
