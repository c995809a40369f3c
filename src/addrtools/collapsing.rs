// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    strings::*,
    structs::{max_for_bits, wide_max, Address, Family, SegInt, Section},
    AddressError,
};
use std::fmt;

/**
Inclusive range of addresses of one family, from a lower to an upper value.

Unlike an [Address], whose segments each carry their own range, a
sequential range covers every value in between: `1.2.3.250 -> 1.2.4.5` is a
sequential range but not a segment-wise address.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SequentialRange {
    family: Family,
    lower: u128,
    upper: u128,
}

impl SequentialRange {
    /// Range spanning both addresses, in either order.
    pub fn new(a: &Address, b: &Address) -> Result<Self, AddressError> {
        if a.family() != b.family() {
            return Err(AddressError::Mismatch(a.family(), b.family()));
        }
        Ok(SequentialRange {
            family: a.family(),
            lower: a.lower_value().min(b.lower_value()),
            upper: a.upper_value().max(b.upper_value()),
        })
    }

    pub(crate) fn from_values(family: Family, lower: u128, upper: u128) -> Self {
        let max = wide_max(u32::from(family.bit_count()));
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        SequentialRange {
            family,
            lower: lower.min(max),
            upper: upper.min(max),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn lower_value(&self) -> u128 {
        self.lower
    }

    pub fn upper_value(&self) -> u128 {
        self.upper
    }

    pub fn lower(&self) -> Address {
        Address::new(product_section(self.family, self.lower, self.lower, None))
    }

    pub fn upper(&self) -> Address {
        Address::new(product_section(self.family, self.upper, self.upper, None))
    }

    pub fn is_multiple(&self) -> bool {
        self.lower != self.upper
    }

    /// Number of addresses, saturating at [u128::MAX] for the whole IPv6 space.
    pub fn count(&self) -> u128 {
        (self.upper - self.lower).saturating_add(1)
    }

    pub fn contains_value(&self, value: u128) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether every value of `addr` lies in the range.
    pub fn contains(&self, addr: &Address) -> bool {
        addr.family() == self.family
            && self.contains_value(addr.lower_value())
            && self.contains_value(addr.upper_value())
    }

    pub fn contains_range(&self, other: &SequentialRange) -> bool {
        other.family == self.family && self.lower <= other.lower && other.upper <= self.upper
    }

    pub fn overlaps(&self, other: &SequentialRange) -> bool {
        other.family == self.family && self.lower <= other.upper && other.lower <= self.upper
    }

    /// Iterate the individual addresses. Can be a lot of them, use with care.
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        (self.lower..=self.upper).map(|v| Address::new(product_section(self.family, v, v, None)))
    }

    /// As one segment-wise address, when the range is one (a prefix block, or a range in the last segment).
    pub fn to_address(&self) -> Result<Address, AddressError> {
        Section::from_values(self.family, self.lower, self.upper, None).map(Address::new)
    }

    /**
    Decompose the range into the minimal list of prefix blocks covering it
    exactly, in ascending order.

    Does not enumerate addresses, so it handles ranges of any size.
    */
    pub fn spanning_prefix_blocks(&self) -> Vec<Address> {
        let bits: u8 = self.family.bit_count();

        // whole address space
        if self.lower == 0 && self.upper == wide_max(u32::from(bits)) {
            return vec![Address::new(product_section(self.family, 0, self.upper, Some(0)))];
        }

        let mut start: u128 = self.lower;
        let end: u128 = self.upper;
        let mut out: Vec<Address> = Vec::new();

        loop {
            // largest block aligned at 'start'
            let tz: u8 = (start.trailing_zeros() as u8).min(bits);
            let max_align_prefix: u8 = bits - tz;

            // largest block that fits in the remaining range
            let remaining: u128 = (end - start).saturating_add(1);
            let max_fit_prefix: u8 = bits.saturating_sub(floor_log2_u128(remaining));

            let prefix: u8 = max_align_prefix.max(max_fit_prefix);
            let host: u128 = wide_max(u32::from(bits - prefix));
            let block_end: u128 = start | host;
            out.push(Address::new(product_section(self.family, start, block_end, Some(prefix))));

            if block_end >= end {
                break;
            }
            start = block_end + 1;
        }
        out
    }

    /// Merge overlapping and adjacent ranges, per family, sorted.
    pub fn join(ranges: &[SequentialRange]) -> Vec<SequentialRange> {
        let mut sorted: Vec<SequentialRange> = ranges.to_vec();
        sorted.sort();

        let mut out: Vec<SequentialRange> = Vec::with_capacity(sorted.len());
        for r in sorted {
            if let Some(last) = out.last_mut() {
                // overlap or adjacency?
                if last.family == r.family && r.lower <= last.upper.saturating_add(1) {
                    last.upper = last.upper.max(r.upper);
                    continue;
                }
            }
            out.push(r);
        }
        out
    }
}

impl fmt::Display for SequentialRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ARROW}{}", self.lower(), self.upper())
    }
}

impl IntoIterator for &SequentialRange {
    type Item = Address;
    type IntoIter = Box<dyn Iterator<Item = Address>>;

    fn into_iter(self) -> Self::IntoIter {
        let family = self.family;
        Box::new((self.lower..=self.upper).map(move |v| Address::new(product_section(family, v, v, None))))
    }
}

/* ---------------------------------- */

/// Section for a range that is a product of segment ranges: a single value or an aligned block.
fn product_section(family: Family, lower: u128, upper: u128, prefix: Option<u8>) -> Section {
    let bits: u8 = family.segment_bits();
    let max: SegInt = max_for_bits(bits);
    let ranges: Vec<(SegInt, SegInt)> = (0..family.segment_count())
        .rev()
        .map(|i| {
            let shift = i as u32 * u32::from(bits);
            ((lower >> shift) as SegInt & max, (upper >> shift) as SegInt & max)
        })
        .collect();
    Section::from_ranges(family, &ranges, prefix)
}

/// floor(log2(x)) for x>=1, returns in [0..127]
#[inline]
fn floor_log2_u128(x: u128) -> u8 {
    debug_assert!(x >= 1);
    127u8.saturating_sub(x.leading_zeros() as u8)
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const V4_LO: u128 = 0xac10_0004; // 172.16.0.4
    const V4_HI: u128 = 0xac10_0007;
    const RES_BLOCK_V4: &str = "172.16.0.4/30";

    const RES_SPLIT_V4: [&str; 3] = ["1.2.3.250/31", "1.2.3.252/30", "1.2.4.0/29"];

    fn v4(lower: u128, upper: u128) -> SequentialRange {
        SequentialRange::from_values(Family::Ipv4, lower, upper)
    }

    fn blocks(r: &SequentialRange) -> Vec<String> {
        r.spanning_prefix_blocks().iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_single_block() {
        assert_eq!(blocks(&v4(V4_LO, V4_HI)), vec![RES_BLOCK_V4]);
    }

    #[test]
    fn test_unaligned_range() {
        let r = v4(0x0102_03fa, 0x0102_0407);
        assert_eq!(blocks(&r), RES_SPLIT_V4.to_vec());
        assert_eq!(r.count(), 14);
    }

    #[test]
    fn test_blocks_cover_exactly() {
        let r = v4(7, 1000);
        let mut next = 7u128;
        for block in r.spanning_prefix_blocks() {
            assert!(block.is_prefix_block());
            assert_eq!(block.lower_value(), next);
            next = block.upper_value() + 1;
        }
        assert_eq!(next, 1001);
    }

    #[test]
    fn test_whole_space() {
        let all = SequentialRange::from_values(Family::Ipv6, 0, u128::MAX);
        assert_eq!(all.count(), u128::MAX);
        assert_eq!(blocks(&all), vec!["::/0"]);
        assert_eq!(blocks(&v4(0, u32::MAX as u128)), vec!["0.0.0.0/0"]);
    }

    #[test]
    fn test_reversed_values_normalize() {
        assert_eq!(v4(10, 1), v4(1, 10));
    }

    #[test]
    fn test_join() {
        let joined = SequentialRange::join(&[v4(20, 30), v4(1, 5), v4(6, 10), v4(8, 12)]);
        assert_eq!(joined, vec![v4(1, 12), v4(20, 30)]);
        let v6 = SequentialRange::from_values(Family::Ipv6, 1, 2);
        assert_eq!(SequentialRange::join(&[v6, v4(1, 2)]).len(), 2);
    }

    #[test]
    fn test_contains_and_display() {
        let r = v4(0x0102_03fa, 0x0102_0405);
        assert_eq!(r.to_string(), "1.2.3.250 -> 1.2.4.5");
        assert!(r.contains(&r.upper()));
        assert!(!r.contains(&Address::from(std::net::Ipv4Addr::new(1, 2, 4, 6))));
        assert!(r.contains_range(&v4(0x0102_0400, 0x0102_0401)));
        assert!(r.overlaps(&v4(0x0102_0405, 0x0102_0500)));
        assert_eq!(r.iter().count(), 12);
        assert!(r.to_address().unwrap_err().is_incompatible());
    }

    #[test]
    fn test_from_addresses() {
        let a = Address::from(std::net::Ipv4Addr::new(10, 0, 0, 9));
        let b = Address::from(std::net::Ipv4Addr::new(10, 0, 0, 1));
        let r = SequentialRange::new(&a, &b).unwrap();
        assert_eq!((r.lower_value(), r.upper_value()), (0x0a00_0001, 0x0a00_0009));
        let c = Address::from(std::net::Ipv6Addr::LOCALHOST);
        assert!(SequentialRange::new(&a, &c).is_err());
        assert_eq!(r.to_address().unwrap().to_string(), "10.0.0.1-9");
    }
}
