//! Address of either family.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;
use std::str::FromStr;

use super::{Ipv4Address, Ipv6Address};
use crate::cidr::{MAX_LENGTH, MAX_LENGTH_V6};
use crate::error::AddrError;

/// An IPv4 or IPv6 address. All IPv4 addresses sort before all IPv6 ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl IpAddress {
    pub fn is_ipv4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    /// Bit width of the family, the longest valid prefix.
    pub fn max_prefix(&self) -> u8 {
        match self {
            IpAddress::V4(_) => MAX_LENGTH,
            IpAddress::V6(_) => MAX_LENGTH_V6,
        }
    }

    /// 4 or 16 bytes, network order.
    pub fn octets(&self) -> Vec<u8> {
        match self {
            IpAddress::V4(addr) => addr.octets().to_vec(),
            IpAddress::V6(addr) => addr.octets().to_vec(),
        }
    }

    /// The address as an unsigned integer, right aligned.
    pub fn to_bits(&self) -> u128 {
        match self {
            IpAddress::V4(addr) => u128::from(addr.to_u32()),
            IpAddress::V6(addr) => addr.to_u128(),
        }
    }

    /// Same family, other bits. `bits` must fit the family width; an IPv6
    /// zone is kept.
    pub(crate) fn with_bits(&self, bits: u128) -> IpAddress {
        match self {
            IpAddress::V4(_) => IpAddress::V4(Ipv4Address::from(bits as u32)),
            IpAddress::V6(addr) => {
                let moved = Ipv6Address::from_u128(bits);
                IpAddress::V6(match addr.zone() {
                    Some(zone) => moved.with_zone(zone),
                    None => moved,
                })
            }
        }
    }

    pub fn is_loopback(&self) -> bool {
        match self {
            IpAddress::V4(addr) => addr.is_loopback(),
            IpAddress::V6(addr) => addr.is_loopback(),
        }
    }
}

impl std::fmt::Display for IpAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IpAddress::V4(addr) => std::fmt::Display::fmt(addr, f),
            IpAddress::V6(addr) => std::fmt::Display::fmt(addr, f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::ip::parse_address(s)
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(addr: Ipv4Address) -> Self {
        IpAddress::V4(addr)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(addr: Ipv6Address) -> Self {
        IpAddress::V6(addr)
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(addr) => IpAddress::V4(addr.into()),
            IpAddr::V6(addr) => IpAddress::V6(addr.into()),
        }
    }
}

impl From<IpAddress> for IpAddr {
    fn from(addr: IpAddress) -> Self {
        match addr {
            IpAddress::V4(addr) => IpAddr::V4(addr.into()),
            IpAddress::V6(addr) => IpAddr::V6(addr.into()),
        }
    }
}

impl Serialize for IpAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self {
            IpAddress::V4(addr) => addr.serialize(serializer),
            IpAddress::V6(addr) => addr.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D>(deserializer: D) -> Result<IpAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| de::Error::custom(format!("invalid IP address: {}", s)))
    }
}
