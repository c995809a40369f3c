// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests for parsing, masking and range arithmetic.

use miniaddr::{
    parse_ip_address, parse_mac_address, Address, AddressError, Family, Masker, SequentialRange,
};
use proptest::prelude::*;
use std::net::{Ipv4Addr, Ipv6Addr};

/* ---------------------------------- */

/// Every masked value of `[lower, upper]`, sorted and deduplicated.
fn masked_values(lower: u64, upper: u64, mask: u64) -> Vec<u64> {
    let mut out: Vec<u64> = (lower..=upper).map(|x| x & mask).collect();
    out.sort_unstable();
    out.dedup();
    out
}

fn is_contiguous(values: &[u64]) -> bool {
    values.windows(2).all(|w| w[1] == w[0] + 1)
}

/// Octet text: a value, a range with either separator, or a wildcard.
fn ipv4_segment() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), 0u8..4).prop_map(|(a, b, form)| match form {
        0 => a.to_string(),
        1 => format!("{a}-{b}"),
        2 => format!("{a}»{b}"),
        _ => "*".to_string(),
    })
}

fn ipv6_segment() -> impl Strategy<Value = String> {
    (any::<u16>(), any::<u16>(), 0u8..5).prop_map(|(a, b, form)| match form {
        0 | 1 => format!("{a:x}"),
        2 => format!("{a:x}-{b:x}"),
        3 => format!("{a:x}»{b:x}"),
        _ => "*".to_string(),
    })
}

fn ipv4_text() -> impl Strategy<Value = String> {
    prop::collection::vec(ipv4_segment(), 4).prop_map(|s| s.join("."))
}

fn ipv6_text() -> impl Strategy<Value = String> {
    prop::collection::vec(ipv6_segment(), 8).prop_map(|s| s.join(":"))
}

/// Six MAC bytes with one of the separators; the last byte is a range.
fn mac_text() -> impl Strategy<Value = String> {
    (any::<[u8; 6]>(), any::<u8>(), prop::sample::select(vec![":", "-", " "])).prop_map(
        |(bytes, other, sep)| {
            let mut segs: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
            let (lo, hi) = (bytes[5].min(other), bytes[5].max(other));
            segs[5] = format!("{lo:02x}|{hi:02x}");
            segs.join(sep)
        },
    )
}

/// The canonical string parses back to the same address and prints the same again.
fn assert_canonical_round_trip(
    addr: &Address,
    parse: fn(&str) -> Result<Address, AddressError>,
) -> Result<(), TestCaseError> {
    let text = addr.canonical().to_string();
    let again = parse(&text);
    prop_assert!(again.is_ok(), "{} does not parse", text);
    let again = again.unwrap();
    prop_assert_eq!(&again, addr);
    prop_assert_eq!(again.canonical(), text.as_str());
    Ok(())
}

proptest! {
    /// The masker agrees with masking each value of the range by hand.
    #[test]
    fn test_masker_matches_brute_force(a in 0u64..=255, b in 0u64..=255, mask in 0u64..=255) {
        let (lower, upper) = (a.min(b), a.max(b));
        let values = masked_values(lower, upper, mask);
        let res = Masker::mask(lower, upper, mask, 255);

        prop_assert_eq!(res.sequential, is_contiguous(&values));
        if res.sequential {
            prop_assert_eq!(res.lower, values[0]);
            prop_assert_eq!(res.upper, values[values.len() - 1]);
        }
    }

    /// Range bounds may be written in either order.
    #[test]
    fn test_reversed_range_normalizes(a in 0u8..=255, b in 0u8..=255) {
        let forward = parse_ip_address(&format!("10.1.2.{a}-{b}")).unwrap();
        let backward = parse_ip_address(&format!("10.1.2.{b}-{a}")).unwrap();
        prop_assert_eq!(&forward, &backward);

        let last = forward.segment(3).unwrap();
        prop_assert_eq!(last.lower(), u32::from(a.min(b)));
        prop_assert_eq!(last.upper(), u32::from(a.max(b)));
        prop_assert_eq!(forward.is_multiple(), a != b);
    }

    /// Taking the prefix block of a prefix block changes nothing.
    #[test]
    fn test_prefix_block_idempotent(v in any::<u32>(), prefix in 0u8..=32) {
        let addr = Address::from(Ipv4Addr::from(v));
        let block = addr.to_prefix_block(prefix);
        prop_assert!(block.contains(&addr));
        prop_assert!(block.is_single_prefix_block(prefix));
        prop_assert_eq!(block.to_prefix_block(prefix), block.clone());
        prop_assert_eq!(block.count(), 1u128 << (32 - prefix));
    }

    #[test]
    fn test_sequential_range_containment(a in any::<u32>(), b in any::<u32>()) {
        let lo = Address::from(Ipv4Addr::from(a.min(b)));
        let hi = Address::from(Ipv4Addr::from(a.max(b)));
        let range = SequentialRange::new(&hi, &lo).unwrap();

        prop_assert_eq!(range.family(), Family::Ipv4);
        prop_assert!(range.contains(&lo));
        prop_assert!(range.contains(&hi));
        prop_assert_eq!(range.is_multiple(), a != b);
        prop_assert_eq!(range.count(), u128::from(a.max(b) - a.min(b)) + 1);
    }

    /// Prefix blocks of a range are ascending, adjacent and cover it exactly.
    #[test]
    fn test_spanning_blocks_cover_exactly(a in any::<u32>(), b in any::<u32>()) {
        let (lo, hi) = (u128::from(a.min(b)), u128::from(a.max(b)));
        let range = SequentialRange::new(
            &Address::from(Ipv4Addr::from(a)),
            &Address::from(Ipv4Addr::from(b)),
        ).unwrap();

        let blocks = range.spanning_prefix_blocks();
        prop_assert!(!blocks.is_empty());
        prop_assert!(blocks.len() <= 62);
        let mut next = lo;
        for block in blocks.iter() {
            prop_assert!(block.is_prefix_block());
            prop_assert_eq!(block.lower_value(), next);
            next = block.upper_value() + 1;
        }
        prop_assert_eq!(next, hi + 1);
    }

    /// Text from the standard library parses to the same address, and the
    /// canonical string parses back to it as well.
    #[test]
    fn test_ipv4_text_round_trip(v in any::<u32>()) {
        let ip = Ipv4Addr::from(v);
        let parsed = parse_ip_address(&ip.to_string()).unwrap();
        prop_assert_eq!(&parsed, &Address::from(ip));
        prop_assert_eq!(parsed.canonical(), ip.to_string());
        prop_assert_eq!(parsed.as_ipv4().and_then(|v4| v4.to_ipv4_addr()), Some(ip));
    }

    #[test]
    fn test_ipv6_text_round_trip(v in any::<u128>(), zeros in 0usize..8, at in 0usize..8) {
        // runs of zero hextets exercise `::` compression
        let mut segs = Ipv6Addr::from(v).segments();
        for s in segs.iter_mut().skip(at).take(zeros) {
            *s = 0;
        }
        let ip = Ipv6Addr::from(segs);
        let parsed = parse_ip_address(&ip.to_string()).unwrap();
        prop_assert_eq!(&parsed, &Address::from(ip));

        let again = parse_ip_address(parsed.canonical()).unwrap();
        prop_assert_eq!(&again, &parsed);
        prop_assert_eq!(again.lower_value(), u128::from(ip));
    }

    /// Ranges written with `»` equal those written with `-` and print with `-`.
    #[test]
    fn test_ipv4_ranges_round_trip(text in ipv4_text()) {
        let parsed = parse_ip_address(&text).unwrap();
        let dashed = parse_ip_address(&text.replace('»', "-")).unwrap();
        prop_assert_eq!(&parsed, &dashed);
        prop_assert_eq!(parsed.canonical(), dashed.canonical());
        prop_assert!(!parsed.canonical().contains('»'));
        assert_canonical_round_trip(&parsed, parse_ip_address)?;
    }

    #[test]
    fn test_ipv6_ranges_round_trip(text in ipv6_text()) {
        let parsed = parse_ip_address(&text).unwrap();
        prop_assert_eq!(parsed.family(), Family::Ipv6);
        prop_assert!(!parsed.canonical().contains('»'));
        assert_canonical_round_trip(&parsed, parse_ip_address)?;
    }

    #[test]
    fn test_prefixed_round_trip(v4 in ipv4_text(), v6 in ipv6_text(), p4 in 0u8..=32, p6 in 0u8..=128) {
        let parsed = parse_ip_address(&format!("{v4}/{p4}")).unwrap();
        prop_assert_eq!(parsed.prefix_length(), Some(p4));
        assert_canonical_round_trip(&parsed, parse_ip_address)?;

        let parsed = parse_ip_address(&format!("{v6}/{p6}")).unwrap();
        prop_assert_eq!(parsed.prefix_length(), Some(p6));
        assert_canonical_round_trip(&parsed, parse_ip_address)?;
    }

    #[test]
    fn test_ipv6_prefix_block_idempotent(v in any::<u128>(), prefix in 0u8..=128) {
        let addr = Address::from(Ipv6Addr::from(v));
        let block = addr.to_prefix_block(prefix);
        prop_assert!(block.contains(&addr));
        prop_assert!(block.is_single_prefix_block(prefix));
        prop_assert_eq!(block.to_prefix_block(prefix), block.clone());
        assert_canonical_round_trip(&block, parse_ip_address)?;
    }

    #[test]
    fn test_zoned_round_trip(
        text in ipv6_text(),
        zone in "[a-z][a-z0-9]{0,7}",
        prefix in prop::option::of(0u8..=128),
    ) {
        let input = match prefix {
            Some(p) => format!("{text}%{zone}/{p}"),
            None => format!("{text}%{zone}"),
        };
        let parsed = parse_ip_address(&input).unwrap();
        prop_assert_eq!(parsed.zone().map(|z| z.as_str()), Some(zone.as_str()));
        assert_canonical_round_trip(&parsed, parse_ip_address)?;
    }

    #[test]
    fn test_mac_round_trip(text in mac_text()) {
        let parsed = parse_mac_address(&text).unwrap();
        prop_assert_eq!(parsed.family(), Family::Mac);
        assert_canonical_round_trip(&parsed, parse_mac_address)?;
    }
}
