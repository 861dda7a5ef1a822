//! IPv6 text codec.
//!
//! Input follows the RFC 4291 grammar: optional `[...]` brackets, an optional
//! `%zone` suffix, at most one `::` and an optional dotted-quad tail in the
//! IPv4-mapped (or deprecated IPv4-compatible) position. Output follows
//! RFC 5952 section 4.
//!
//! Validation and parsing share one scanner so they can never disagree.

use std::fmt;
use std::net::Ipv6Addr;
use std::ops::Range;

use itertools::Itertools;

use super::hex::decode_hex_nibble;
use super::ipv4::{self, Ipv4Literal};
use crate::error::AddrError;
use crate::models::Ipv6Address;

/// Number of bytes in an IPv6 address.
pub const LENGTH: usize = 16;

/// Number of 16-bit words in an IPv6 address.
pub const WORD_COUNT: usize = 8;

const MAX_WORD_DIGITS: usize = 4;

/// Longest canonical text, without a zone.
const MAX_CHAR_COUNT: usize = 39;

/// Word that marks an IPv4-mapped address (`::ffff:a.b.c.d`).
const MAPPED_MARKER: u16 = 0xffff;

/// `::1`
pub const LOCALHOST: Ipv6Address = Ipv6Address::LOCALHOST;
/// `::`
pub const WILDCARD: Ipv6Address = Ipv6Address::WILDCARD;

struct Scanned<'a> {
    words: [u16; WORD_COUNT],
    ipv4_tail: bool,
    zone: Option<&'a str>,
}

fn scan(ip: &str) -> Option<Scanned<'_>> {
    let body = strip_brackets(ip)?;
    // whatever follows '%' is the zone and is not checked
    let (addr, zone) = match body.split_once('%') {
        Some((addr, zone)) => (addr, Some(zone)),
        None => (body, None),
    };
    let (words, ipv4_tail) = scan_words(addr)?;
    Some(Scanned {
        words,
        ipv4_tail,
        zone,
    })
}

fn strip_brackets(ip: &str) -> Option<&str> {
    match (ip.strip_prefix('['), ip.ends_with(']')) {
        (Some(inner), true) => inner.strip_suffix(']'),
        (None, false) => Some(ip),
        _ => None,
    }
}

/// Left-to-right scan of the address part, expanding `::`.
fn scan_words(addr: &str) -> Option<([u16; WORD_COUNT], bool)> {
    let b = addr.as_bytes();
    let len = b.len();
    let mut words = [0u16; WORD_COUNT];
    let mut count = 0;
    let mut compress_at = None;
    let mut ipv4_tail = false;
    let mut i = 0;

    if b.starts_with(b"::") {
        compress_at = Some(0);
        i = 2;
    } else if b.first() == Some(&b':') {
        return None;
    }

    while i < len {
        let start = i;
        let mut value = 0u16;
        while let Some(nibble) = b.get(i).and_then(|c| decode_hex_nibble(*c)) {
            if i - start == MAX_WORD_DIGITS {
                return None;
            }
            value = (value << 4) | u16::from(nibble);
            i += 1;
        }

        if b.get(i) == Some(&b'.') {
            // the rest of the input has to be a dotted quad
            if count + 2 > WORD_COUNT {
                return None;
            }
            let [a, b, c, d] = Ipv4Literal::new(&addr[start..])?.to_bytes();
            words[count] = u16::from_be_bytes([a, b]);
            words[count + 1] = u16::from_be_bytes([c, d]);
            count += 2;
            ipv4_tail = true;
            break;
        }

        if i == start || count == WORD_COUNT {
            return None;
        }
        words[count] = value;
        count += 1;

        if i == len {
            break;
        }
        if b[i] != b':' {
            return None;
        }
        i += 1;
        if b.get(i) == Some(&b':') {
            if compress_at.is_some() {
                return None;
            }
            compress_at = Some(count);
            i += 1;
        } else if i == len {
            return None;
        }
    }

    let words = match compress_at {
        None if count == WORD_COUNT => words,
        // "::" stands for at least one zero word
        Some(at) if count < WORD_COUNT => {
            let mut expanded = [0u16; WORD_COUNT];
            expanded[..at].copy_from_slice(&words[..at]);
            expanded[WORD_COUNT - (count - at)..].copy_from_slice(&words[at..count]);
            expanded
        }
        _ => return None,
    };

    if ipv4_tail && !has_ipv4_prefix(&words) {
        return None;
    }
    Some((words, ipv4_tail))
}

/// RFC 4291 section 2.5.5: five zero words, then `0` (compatible) or `ffff`
/// (mapped).
fn has_ipv4_prefix(words: &[u16; WORD_COUNT]) -> bool {
    words[..5].iter().all(|word| *word == 0) && matches!(words[5], 0 | MAPPED_MARKER)
}

fn mapped_words([a, b, c, d]: [u8; ipv4::LENGTH]) -> [u16; WORD_COUNT] {
    [
        0,
        0,
        0,
        0,
        0,
        MAPPED_MARKER,
        u16::from_be_bytes([a, b]),
        u16::from_be_bytes([c, d]),
    ]
}

/// Check whether `ip` is an IPv6 address.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv6;
/// assert!(ipv6::is_valid("fe80::200:5aee:feaa:20a2"));
/// assert!(ipv6::is_valid("[::1%eth0]"));
/// assert!(ipv6::is_valid("::ffff:192.168.0.1"));
/// assert!(!ipv6::is_valid("1::2::3"));
/// ```
pub fn is_valid(ip: &str) -> bool {
    scan(ip).is_some()
}

fn parse_words(ip: &str, ipv4_mapped: bool) -> Option<([u16; WORD_COUNT], Option<&str>)> {
    match scan(ip) {
        Some(scanned) if scanned.ipv4_tail && !ipv4_mapped => None,
        Some(Scanned {
            mut words,
            ipv4_tail,
            zone,
        }) => {
            // IPv4-compatible input is normalised to IPv4-mapped
            if ipv4_tail {
                words[5] = MAPPED_MARKER;
            }
            Some((words, zone))
        }
        None if ipv4_mapped => Ipv4Literal::new(ip).map(|literal| (mapped_words(literal.to_bytes()), None)),
        None => None,
    }
}

/// Parse an IPv6 address into its 16 bytes.
///
/// With `ipv4_mapped` an embedded IPv4 tail, or a bare dotted quad, gives the
/// IPv4-mapped address. Without it any IPv4 form is rejected. The zone is
/// dropped.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv6;
/// let bytes = ipv6::get_ipv6_by_name("::1.2.3.4", true).unwrap();
/// assert_eq!(bytes[10..], [0xff, 0xff, 1, 2, 3, 4]);
/// assert_eq!(ipv6::get_ipv6_by_name("::1.2.3.4", false), None);
/// ```
pub fn get_ipv6_by_name(ip: &str, ipv4_mapped: bool) -> Option<[u8; LENGTH]> {
    parse_words(ip, ipv4_mapped).map(|(words, _)| words_to_bytes(&words))
}

/// Parse an IPv6 address, keeping the zone.
pub fn parse(ip: &str) -> Option<Ipv6Address> {
    parse_words(ip, true).map(|(words, zone)| {
        let address = Ipv6Address::from(words);
        match zone {
            Some(zone) => address.with_zone(zone),
            None => address,
        }
    })
}

pub fn to_bytes_or_none(ip: &str) -> Option<[u8; LENGTH]> {
    get_ipv6_by_name(ip, true)
}

pub fn to_std(ip: &str) -> Option<Ipv6Addr> {
    to_bytes_or_none(ip).map(Ipv6Addr::from)
}

/// `::1`, in any spelling. The zone is ignored.
pub fn is_loopback(ip: &str) -> bool {
    parse(ip).is_some_and(|address| address.is_loopback())
}

pub fn words_to_bytes(words: &[u16; WORD_COUNT]) -> [u8; LENGTH] {
    let mut bytes = [0u8; LENGTH];
    for (pair, word) in bytes.chunks_exact_mut(2).zip(words) {
        pair.copy_from_slice(&word.to_be_bytes());
    }
    bytes
}

pub fn bytes_to_words(bytes: &[u8; LENGTH]) -> [u16; WORD_COUNT] {
    let mut words = [0u16; WORD_COUNT];
    for (word, pair) in words.iter_mut().zip(bytes.chunks_exact(2)) {
        *word = u16::from_be_bytes([pair[0], pair[1]]);
    }
    words
}

/// Format the 16 bytes starting at `offset` as canonical text.
///
/// With `ipv4_mapped`, `::ffff:a.b.c.d` keeps its dotted tail.
///
/// # Examples
/// ```
/// use ipcodec::codec::ipv6;
/// let mut bytes = [0u8; 16];
/// bytes[15] = 1;
/// assert_eq!(ipv6::to_string(&bytes, 0, false).unwrap(), "::1");
/// assert!(ipv6::to_string(&bytes, 1, false).is_err());
/// ```
pub fn to_string(bytes: &[u8], offset: usize, ipv4_mapped: bool) -> Result<String, AddrError> {
    let octets: &[u8; LENGTH] = offset
        .checked_add(LENGTH)
        .and_then(|end| bytes.get(offset..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            log::warn!(
                "Need {LENGTH} bytes at offset {offset}, buffer has {}",
                bytes.len()
            );
            AddrError::InvalidLength(bytes.len())
        })?;
    Ok(format_words(&bytes_to_words(octets), ipv4_mapped))
}

pub fn format_words(words: &[u16; WORD_COUNT], ipv4_mapped: bool) -> String {
    let mut buf = String::with_capacity(MAX_CHAR_COUNT);
    // writing into a String cannot fail
    let _ = write_words(words, ipv4_mapped, &mut buf);
    buf
}

pub(crate) fn write_words<W: fmt::Write>(
    words: &[u16; WORD_COUNT],
    ipv4_mapped: bool,
    out: &mut W,
) -> fmt::Result {
    match longest_zero_run(words) {
        None => write!(out, "{:x}", words.iter().format(":")),
        Some(run) if ipv4_mapped && run == (0..5) && words[5] == MAPPED_MARKER => {
            let [a, b] = words[6].to_be_bytes();
            let [c, d] = words[7].to_be_bytes();
            write!(out, "::ffff:{a}.{b}.{c}.{d}")
        }
        Some(run) => write!(
            out,
            "{:x}::{:x}",
            words[..run.start].iter().format(":"),
            words[run.end..].iter().format(":")
        ),
    }
}

/// Longest run of zero words, the first one on a tie. Runs of one word are
/// not compressed.
fn longest_zero_run(words: &[u16; WORD_COUNT]) -> Option<Range<usize>> {
    let mut best = 0..0;
    let mut i = 0;
    while i < WORD_COUNT {
        if words[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < WORD_COUNT && words[i] == 0 {
            i += 1;
        }
        if i - start > best.len() {
            best = start..i;
        }
    }
    (best.len() > 1).then_some(best)
}
