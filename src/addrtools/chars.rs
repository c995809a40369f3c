// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte classification tables for the address scanner.

pub(crate) const DECIMAL: u8 = 0b0000_0001;
pub(crate) const HEX: u8 = 0b0000_0010;
pub(crate) const UPPER_HEX: u8 = 0b0000_0100;
pub(crate) const SEPARATOR: u8 = 0b0000_1000;
pub(crate) const WILDCARD: u8 = 0b0001_0000;
pub(crate) const SINGLE_WILDCARD: u8 = 0b0010_0000;
pub(crate) const RANGE: u8 = 0b0100_0000;
pub(crate) const QUALIFIER: u8 = 0b1000_0000;

const NOT_A_DIGIT: u8 = 0xff;

/// Hex value of every byte that is a digit in some supported radix.
const DIGIT_VALUES: [u8; 256] = {
    let mut table = [NOT_A_DIGIT; 256];
    let mut i = 0;
    while i < 256 {
        let c = i as u8;
        table[i] = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => NOT_A_DIGIT,
        };
        i += 1;
    }
    table
};

/// Structural class flags per byte.
const CHAR_CLASS: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let c = i as u8;
        let mut flags = 0u8;
        if matches!(c, b'0'..=b'9') {
            flags |= DECIMAL | HEX;
        }
        if matches!(c, b'a'..=b'f') {
            flags |= HEX;
        }
        if matches!(c, b'A'..=b'F') {
            flags |= HEX | UPPER_HEX;
        }
        if matches!(c, b'.' | b':' | b'-' | b' ') {
            flags |= SEPARATOR;
        }
        if c == b'*' {
            flags |= WILDCARD;
        }
        if c == b'_' {
            flags |= SINGLE_WILDCARD;
        }
        if matches!(c, b'-' | b'|') {
            flags |= RANGE;
        }
        if matches!(c, b'/' | b'%') {
            flags |= QUALIFIER;
        }
        table[i] = flags;
        i += 1;
    }
    table
};

/// First byte of the UTF-8 encoding of `»`, the alternative range separator.
pub(crate) const ALT_RANGE_LEAD: u8 = 0xc2;
pub(crate) const ALT_RANGE_TRAIL: u8 = 0xbb;

#[inline]
pub(crate) const fn class(c: u8) -> u8 {
    CHAR_CLASS[c as usize]
}

#[inline]
pub(crate) const fn is(c: u8, flags: u8) -> bool {
    class(c) & flags != 0
}

/// Value of `c` as a digit of `radix` (2, 8, 10 or 16).
#[inline]
pub(crate) fn digit_value(c: u8, radix: u32) -> Option<u32> {
    let v = DIGIT_VALUES[c as usize];
    if v == NOT_A_DIGIT || u32::from(v) >= radix {
        return None;
    }
    Some(u32::from(v))
}

/// Hex value of `c`, regardless of radix.
#[inline]
pub(crate) fn hex_value(c: u8) -> Option<u32> {
    digit_value(c, 16)
}

#[inline]
pub(crate) fn is_radix_marker(c: u8) -> bool {
    matches!(c, b'x' | b'X')
}

/// Whether `s[index..]` starts with the two-byte `»` range separator.
#[inline]
pub(crate) fn is_alt_range(s: &[u8], index: usize) -> bool {
    s.get(index) == Some(&ALT_RANGE_LEAD) && s.get(index + 1) == Some(&ALT_RANGE_TRAIL)
}

/// Bytes that may not appear in a zone, raw or decoded.
#[inline]
pub(crate) fn is_reserved_zone_byte(c: u8) -> bool {
    c.is_ascii_control() || matches!(c, b' ' | b'%' | b'/' | b'[' | b']')
}

/// Number of digits needed to write `max` in `radix`.
pub(crate) fn digit_count(mut max: u128, radix: u32) -> u32 {
    let mut count = 1;
    while max >= u128::from(radix) {
        max /= u128::from(radix);
        count += 1;
    }
    count
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_values() {
        assert_eq!(digit_value(b'7', 8), Some(7));
        assert_eq!(digit_value(b'8', 8), None);
        assert_eq!(digit_value(b'1', 2), Some(1));
        assert_eq!(digit_value(b'2', 2), None);
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'f', 10), None);
        assert_eq!(hex_value(b'g'), None);
    }

    #[test]
    fn test_classes() {
        assert!(is(b'a', HEX));
        assert!(!is(b'a', DECIMAL));
        assert!(is(b'B', UPPER_HEX));
        assert!(is(b'-', SEPARATOR | RANGE));
        assert!(is(b'|', RANGE));
        assert!(is(b'*', WILDCARD));
        assert!(is(b'_', SINGLE_WILDCARD));
        assert!(is(b'%', QUALIFIER));
        assert!(!is(b'g', HEX | SEPARATOR));
    }

    #[test]
    fn test_alt_range() {
        let s = "1»2".as_bytes();
        assert!(is_alt_range(s, 1));
        assert!(!is_alt_range(s, 0));
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(255, 10), 3);
        assert_eq!(digit_count(255, 16), 2);
        assert_eq!(digit_count(255, 8), 3);
        assert_eq!(digit_count(0xffff, 16), 4);
        assert_eq!(digit_count(0xff_ffff, 10), 8);
        assert_eq!(digit_count(0, 10), 1);
        assert_eq!(digit_count(u128::MAX, 2), 128);
    }
}
