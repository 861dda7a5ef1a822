//! IPv4 dotted-quad codec.
//!
//! Validation, text <-> binary conversion, the netmask tables and the
//! unsigned range checks used for private/loopback classification.

use std::fmt;
use std::net::Ipv4Addr;

use crate::cidr::{self, AddressRange, MAX_LENGTH};
use crate::error::AddrError;
use crate::models::{IpAddress, Ipv4Address};

/// Number of bytes in an IPv4 address.
pub const LENGTH: usize = 4;

/// Maximum number of characters in a dotted quad.
const MAX_CHAR_COUNT: usize = 15;

/// `127.0.0.1`
pub const LOCALHOST: Ipv4Address = Ipv4Address::LOCALHOST;
/// `0.0.0.0`
pub const WILDCARD: Ipv4Address = Ipv4Address::WILDCARD;

const PRIVATE_10: u32 = 0x0a00_0000;
const PRIVATE_172: u32 = 0xac10_0000;
const PRIVATE_192: u32 = 0xc0a8_0000;
const LOOPBACK_127: u32 = 0x7f00_0000;

/// Check whether `ip` is a dotted-quad IPv4 address.
///
/// Each word is 1-3 decimal digits; a 3-digit word must encode 0-255. Leading
/// zeros are accepted (`010` reads as ten), they never appear in output.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv4;
/// assert!(ipv4::is_valid("192.168.0.1"));
/// assert!(!ipv4::is_valid("1.256.3.4"));
/// ```
pub fn is_valid(ip: &str) -> bool {
    if !(7..=MAX_CHAR_COUNT).contains(&ip.len()) {
        return false;
    }
    let mut words = 0;
    for word in ip.split('.') {
        words += 1;
        if words > LENGTH || !is_valid_word(word.as_bytes()) {
            return false;
        }
    }
    words == LENGTH
}

/// Digit-by-digit check of one word, no integer is built.
fn is_valid_word(word: &[u8]) -> bool {
    match *word {
        [c0] => c0.is_ascii_digit(),
        [c0, c1] => c0.is_ascii_digit() && c1.is_ascii_digit(),
        [c0, c1, c2] => {
            c0.is_ascii_digit()
                && c1.is_ascii_digit()
                && c2.is_ascii_digit()
                && (c0 <= b'1' || (c0 == b'2' && (c1 < b'5' || (c1 == b'5' && c2 <= b'5'))))
        }
        _ => false,
    }
}

fn word_to_int(word: &[u8]) -> u32 {
    word.iter()
        .fold(0, |acc, c| acc * 10 + u32::from(c.wrapping_sub(b'0')))
}

/// A string that has passed [`is_valid`].
///
/// The conversions on this type skip validation; holding one is the proof that
/// validation already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Literal<'a>(&'a str);

impl<'a> Ipv4Literal<'a> {
    pub fn new(ip: &'a str) -> Option<Self> {
        is_valid(ip).then_some(Ipv4Literal(ip))
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    pub fn to_ints(&self) -> [u32; LENGTH] {
        let mut ints = [0; LENGTH];
        for (int, word) in ints.iter_mut().zip(self.0.split('.')) {
            *int = word_to_int(word.as_bytes());
        }
        ints
    }

    pub fn to_bytes(&self) -> [u8; LENGTH] {
        // every word is 0-255 once validated
        self.to_ints().map(|int| int as u8)
    }

    pub fn to_u32(&self) -> u32 {
        to_int(self.to_bytes())
    }
}

/// Parse a dotted quad into its 4 bytes, `None` if it is not valid.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv4;
/// assert_eq!(ipv4::to_bytes_or_none("127.0.0.1"), Some([0x7f, 0, 0, 1]));
/// assert_eq!(ipv4::to_bytes_or_none("127.0.0"), None);
/// ```
pub fn to_bytes_or_none(ip: &str) -> Option<[u8; LENGTH]> {
    Ipv4Literal::new(ip).map(|literal| literal.to_bytes())
}

/// Pack 4 bytes big-endian.
pub fn to_int(bytes: [u8; LENGTH]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Pack a dotted quad into a `u32`.
///
/// Returns `0` for invalid input, which is also the value of `0.0.0.0`; use
/// [`to_bytes_or_none`] when failure has to be detected.
pub fn to_int_str(ip: &str) -> u32 {
    Ipv4Literal::new(ip).map_or(0, |literal| literal.to_u32())
}

pub fn u32_to_bytes(ip: u32) -> [u8; LENGTH] {
    ip.to_be_bytes()
}

/// Write `ip` as a dotted quad.
pub fn write_to<W: fmt::Write>(ip: u32, out: &mut W) -> fmt::Result {
    let [a, b, c, d] = ip.to_be_bytes();
    write!(out, "{a}.{b}.{c}.{d}")
}

/// Format a packed address as a dotted quad.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv4;
/// assert_eq!(ipv4::to_string(0x0a0a0a05), "10.10.10.5");
/// ```
pub fn to_string(ip: u32) -> String {
    let mut buf = String::with_capacity(MAX_CHAR_COUNT);
    // writing into a String cannot fail
    let _ = write_to(ip, &mut buf);
    buf
}

pub fn bytes_to_string(bytes: &[u8; LENGTH]) -> String {
    to_string(to_int(*bytes))
}

pub fn ints_to_string(ints: &[u32; LENGTH]) -> String {
    let [a, b, c, d] = ints;
    format!("{a}.{b}.{c}.{d}")
}

/// Private addresses: 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
pub fn is_site_local(ip: u32) -> bool {
    // smallest range first
    is_in_range(ip, PRIVATE_192, 16)
        || is_in_range(ip, PRIVATE_172, 12)
        || is_in_range(ip, PRIVATE_10, 8)
}

/// Like [`is_site_local`]; `false` for invalid input.
pub fn is_site_local_str(ip: &str) -> bool {
    Ipv4Literal::new(ip).is_some_and(|literal| is_site_local(literal.to_u32()))
}

/// Loopback addresses: 127.0.0.0/8.
pub fn is_loopback(ip: u32) -> bool {
    is_in_range(ip, LOOPBACK_127, 8)
}

/// Like [`is_loopback`]; `false` for invalid input.
pub fn is_loopback_str(ip: &str) -> bool {
    Ipv4Literal::new(ip).is_some_and(|literal| is_loopback(literal.to_u32()))
}

/// Check a CIDR literal such as `1.2.3.4/24`. Only IPv4 with a prefix of 0-32
/// is accepted.
pub fn is_valid_cidr(cidr: &str) -> bool {
    let Some((ip, prefix)) = cidr.split_once('/') else {
        return false;
    };
    is_valid(ip) && prefix.parse::<u8>().is_ok_and(|prefix| prefix <= MAX_LENGTH)
}

/// Netmask for a prefix length, e.g. `24` -> `255.255.255.0`.
///
/// Prefixes above 32 give the `/0` netmask.
pub fn get_cidr_as_netmask(prefix: u8) -> &'static str {
    cidr::netmask_for_prefix(prefix)
}

/// Prefix length for one of the 33 canonical netmasks, `0` for anything else.
pub fn cidr_prefix_from_subnet_mask(mask: &str) -> u8 {
    cidr::prefix_for_netmask(mask)
}

/// Netmask for a prefix length as a packed integer.
///
/// The shift is done on 64 bits so a prefix of 0 gives 0 instead of a
/// shift-by-32. Prefixes above 32 are treated as 32.
pub fn cidr_prefix_to_subnet_mask(prefix: u8) -> u32 {
    let prefix = prefix.min(MAX_LENGTH);
    ((-1i64 << (MAX_LENGTH - prefix)) & 0xffff_ffff) as u32
}

/// Check if `address` is inside `network/prefix`.
///
/// A prefix of 0 always matches. A prefix above 32 never does.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv4;
/// assert!(ipv4::is_in_range(0xc0a82a0e, 0xc0a80000, 16));
/// assert!(!ipv4::is_in_range(0x0b000005, 0x0a0a0a0a, 8));
/// ```
pub fn is_in_range(address: u32, network: u32, prefix: u8) -> bool {
    if prefix == 0 {
        return true;
    }
    if prefix > MAX_LENGTH {
        log::warn!("Prefix /{prefix} is out of range for IPv4");
        return false;
    }
    let netmask = !((1u32 << (MAX_LENGTH - prefix)) - 1);
    let network = network & netmask;
    let broadcast = network | !netmask;
    (network..=broadcast).contains(&address)
}

/// Like [`is_in_range`] for dotted quads; `false` if either is invalid.
pub fn is_in_range_str(address: &str, network: &str, prefix: u8) -> bool {
    match (Ipv4Literal::new(address), Ipv4Literal::new(network)) {
        (Some(address), Some(network)) => is_in_range(address.to_u32(), network.to_u32(), prefix),
        _ => false,
    }
}

/// Split the inclusive range `start_ip..=end_ip` into the fewest CIDR blocks.
///
/// An empty list is returned when `start_ip` is after `end_ip`.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv4;
/// assert_eq!(
///     ipv4::range_to_cidr("10.0.0.1", "10.0.0.6").unwrap(),
///     vec!["10.0.0.1/32", "10.0.0.2/31", "10.0.0.4/31", "10.0.0.6/32"]
/// );
/// ```
pub fn range_to_cidr(start_ip: &str, end_ip: &str) -> Result<Vec<String>, AddrError> {
    let start = parse_literal(start_ip)?;
    let end = parse_literal(end_ip)?;
    if start > end {
        return Ok(Vec::new());
    }
    let range = AddressRange::new(IpAddress::V4(start), IpAddress::V4(end))?;
    Ok(range
        .to_cidrs()
        .iter()
        .map(|cidr| cidr.to_string())
        .collect())
}

fn parse_literal(ip: &str) -> Result<Ipv4Address, AddrError> {
    Ipv4Literal::new(ip)
        .map(|literal| Ipv4Address::from(literal.to_u32()))
        .ok_or_else(|| AddrError::InvalidFormat(ip.to_string()))
}

pub fn to_std(ip: &str) -> Option<Ipv4Addr> {
    to_bytes_or_none(ip).map(Ipv4Addr::from)
}
