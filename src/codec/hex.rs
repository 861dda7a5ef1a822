//! Hex nibble decoding.

use lazy_static::lazy_static;

/// Marker for bytes that are not hex digits.
const INVALID: u8 = 0xff;

lazy_static! {
    static ref HEX_NIBBLES: [u8; 256] = {
        let mut table = [INVALID; 256];
        for (i, c) in (b'0'..=b'9').enumerate() {
            table[c as usize] = i as u8;
        }
        for (i, c) in (b'a'..=b'f').enumerate() {
            table[c as usize] = 10 + i as u8;
            table[c.to_ascii_uppercase() as usize] = 10 + i as u8;
        }
        table
    };
}

/// Decode one hex digit (either case), `None` for anything else.
pub fn decode_hex_nibble(c: u8) -> Option<u8> {
    match HEX_NIBBLES[c as usize] {
        INVALID => None,
        n => Some(n),
    }
}
