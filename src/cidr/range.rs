//! Inclusive address ranges.

use std::fmt;

use super::mask::{lo_mask_bits, next_block_bits};
use crate::error::AddrError;
use crate::models::{Cidr, IpAddress};

/// `start..=end` over one address family, `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: IpAddress,
    end: IpAddress,
}

impl AddressRange {
    pub fn new(start: IpAddress, end: IpAddress) -> Result<Self, AddrError> {
        if start.is_ipv4() != end.is_ipv4() {
            return Err(AddrError::FamilyMismatch(start.to_string(), end.to_string()));
        }
        if start > end {
            return Err(AddrError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(AddressRange { start, end })
    }

    pub fn start(&self) -> &IpAddress {
        &self.start
    }

    pub fn end(&self) -> &IpAddress {
        &self.end
    }

    pub fn contains(&self, addr: &IpAddress) -> bool {
        addr.is_ipv4() == self.start.is_ipv4() && self.start <= *addr && *addr <= self.end
    }

    /// Cover the range with the fewest CIDR blocks, lowest block first.
    ///
    /// Each block is the largest one that starts at the current address, is
    /// aligned to it, and does not run past `end`.
    ///
    /// # Examples
    /// ```
    /// use ipcodec::cidr::AddressRange;
    /// let range = AddressRange::new("10.0.0.0".parse().unwrap(), "10.0.1.2".parse().unwrap()).unwrap();
    /// let blocks: Vec<String> = range.to_cidrs().iter().map(|c| c.to_string()).collect();
    /// assert_eq!(blocks, ["10.0.0.0/24", "10.0.1.0/31", "10.0.1.2/32"]);
    /// ```
    pub fn to_cidrs(&self) -> Vec<Cidr> {
        let width = self.start.max_prefix();
        let end = self.end.to_bits();
        let mut next = Some(self.start.to_bits());
        let mut blocks = Vec::new();

        while let Some(current) = next.filter(|current| *current <= end) {
            let prefix = find_biggest_block(current, end, width);
            let block = Cidr::from_block(self.start.with_bits(current), prefix);
            log::trace!("Range block {block}");
            blocks.push(block);
            next = next_block_bits(current, width, prefix);
        }
        blocks
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Shortest prefix for a block at `start` that stays inside `start..=end`.
fn find_biggest_block(start: u128, end: u128, width: u8) -> u8 {
    let align = lo_mask_bits(start, width);
    // host bits of the largest power of two not above the address count
    let host_bits = (end - start)
        .checked_add(1)
        .map_or(128, |count| 127 - count.leading_zeros()) as u8;
    align.max(width - host_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddress {
        s.parse().unwrap()
    }

    fn blocks(start: &str, end: &str) -> Vec<String> {
        AddressRange::new(ip(start), ip(end))
            .unwrap()
            .to_cidrs()
            .iter()
            .map(|cidr| cidr.to_string())
            .collect()
    }

    #[test]
    fn test_new_rejects_bad_ranges() {
        assert_eq!(
            AddressRange::new(ip("10.0.0.2"), ip("10.0.0.1")).unwrap_err(),
            AddrError::InvertedRange {
                start: "10.0.0.2".to_string(),
                end: "10.0.0.1".to_string()
            }
        );
        assert_eq!(
            AddressRange::new(ip("10.0.0.1"), ip("::1")).unwrap_err(),
            AddrError::FamilyMismatch("10.0.0.1".to_string(), "::1".to_string())
        );
    }

    #[test]
    fn test_contains() {
        let range = AddressRange::new(ip("10.0.0.5"), ip("10.0.0.9")).unwrap();
        assert!(range.contains(&ip("10.0.0.5")));
        assert!(range.contains(&ip("10.0.0.9")));
        assert!(!range.contains(&ip("10.0.0.10")));
        assert!(!range.contains(&ip("::ffff:10.0.0.6")));
        assert_eq!(range.to_string(), "10.0.0.5-10.0.0.9");
    }

    #[test]
    fn test_find_biggest_block() {
        // aligned start, enough room
        assert_eq!(find_biggest_block(0x0a00_0000, 0x0a00_00ff, 32), 24);
        // aligned start, count caps the block
        assert_eq!(find_biggest_block(0x0a00_0000, 0x0a00_0102, 32), 24);
        // alignment caps the block
        assert_eq!(find_biggest_block(0x0a00_0001, 0x0a00_00ff, 32), 32);
        assert_eq!(find_biggest_block(0, u32::MAX as u128, 32), 0);
        assert_eq!(find_biggest_block(0, u128::MAX, 128), 0);
    }

    #[test]
    fn test_to_cidrs_v4() {
        assert_eq!(blocks("10.0.0.1", "10.0.0.6"), [
            "10.0.0.1/32",
            "10.0.0.2/31",
            "10.0.0.4/31",
            "10.0.0.6/32"
        ]);
        assert_eq!(blocks("192.168.1.1", "192.168.1.1"), ["192.168.1.1/32"]);
        assert_eq!(blocks("0.0.0.0", "255.255.255.255"), ["0.0.0.0/0"]);
        assert_eq!(blocks("128.0.0.0", "255.255.255.255"), ["128.0.0.0/1"]);
        assert_eq!(blocks("255.255.255.255", "255.255.255.255"), [
            "255.255.255.255/32"
        ]);
    }

    #[test]
    fn test_to_cidrs_v6() {
        assert_eq!(blocks("::", "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"), ["::/0"]);
        assert_eq!(blocks("2001:db8::", "2001:db8::ff"), ["2001:db8::/120"]);
        assert_eq!(blocks("2001:db8::1", "2001:db8::4"), [
            "2001:db8::1/128",
            "2001:db8::2/127",
            "2001:db8::4/128"
        ]);
        assert_eq!(
            blocks("ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffe", "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"),
            ["ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffe/127"]
        );
    }

    #[test]
    fn test_blocks_cover_range_exactly() {
        let range = AddressRange::new(ip("10.1.2.3"), ip("10.9.8.7")).unwrap();
        let cidrs = range.to_cidrs();
        assert_eq!(cidrs.first().unwrap().lo(), ip("10.1.2.3"));
        assert_eq!(cidrs.last().unwrap().hi(), ip("10.9.8.7"));
        for pair in cidrs.windows(2) {
            assert_eq!(pair[0].hi().to_bits() + 1, pair[1].lo().to_bits());
        }
    }
}
