// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Turns scanned slots into sections.

Slots may be wider than a segment (inet_aton joined IPv4, single-segment
forms, double-dashed MACs) or narrower (the octets of an embedded IPv4
tail). The builder brings every slot to segment width, applies a mask from
the qualifier and the prefix length, and produces two views of the same
string: the address view, masked, and the host view, unmasked.
*/

use super::{
    buffer::{SegmentSlot, SlotFlags},
    masker::mask_wide,
    scanner::{MacFormat, ScannedAddress, Shape},
    structs::{join_segments, split_range, wide_max, Family, SegInt, Section},
    AddressError, ErrorKey, IPV4_SEGMENT_BITS, IPV6_SEGMENT_BITS,
};
use tracing::debug;

/// Both views of one parsed address.
#[derive(Clone, Debug)]
pub(crate) struct BuiltAddress {
    /// masked by the qualifier mask, expanded to the prefix block when the host is zero
    pub address: Result<Section, AddressError>,
    /// the written values with the prefix length, never masked
    pub host: Result<Section, AddressError>,
}

/// One slot brought to a whole number of segments.
#[derive(Clone, Copy, Debug)]
struct WideRange {
    lower: u128,
    upper: u128,
    bits: u32,
}

impl WideRange {
    fn from_slot(slot: &SegmentSlot) -> Self {
        WideRange {
            lower: slot.lower_wide(),
            upper: slot.upper_wide(),
            bits: u32::from(slot.bits),
        }
    }

    fn zero(bits: u32) -> Self {
        WideRange {
            lower: 0,
            upper: 0,
            bits,
        }
    }
}

pub(crate) fn build(scanned: &ScannedAddress, input: &str) -> BuiltAddress {
    let Some(family) = scanned.family else {
        let err = AddressError::parse(ErrorKey::InvalidCharacter, input, None);
        return BuiltAddress {
            address: Err(err.clone()),
            host: Err(err),
        };
    };
    let built = match widen(scanned, family, input) {
        Ok(ranges) => build_views(scanned, family, &ranges, input),
        Err(err) => BuiltAddress {
            address: Err(err.clone()),
            host: Err(err),
        },
    };
    if let Err(err) = &built.address {
        debug!(input, %err, "address view unavailable");
    }
    built
}

/// Slots as wide ranges covering the whole address, `::` expanded and mixed octets joined.
fn widen(scanned: &ScannedAddress, family: Family, input: &str) -> Result<Vec<WideRange>, AddressError> {
    let slots = scanned.buffer.slots();
    // embedded IPv4 octets are the last four slots
    let mixed_from = match scanned.mixed {
        true => slots.len().saturating_sub(4),
        false => slots.len(),
    };
    let mut ranges: Vec<WideRange> = Vec::with_capacity(family.segment_count());
    let mut i = 0;
    while i < slots.len() {
        let slot = &slots[i];
        if i >= mixed_from && slot.flags.has(SlotFlags::MERGED_MIXED) {
            let next = slots
                .get(i + 1)
                .ok_or_else(|| AddressError::incompatible(ErrorKey::InvalidJoinedRange, input))?;
            let pair = [
                (slot.lower as SegInt, slot.upper as SegInt),
                (next.lower as SegInt, next.upper as SegInt),
            ];
            let (lower, upper) = join_segments(&pair, IPV4_SEGMENT_BITS)
                .ok_or_else(|| AddressError::incompatible(ErrorKey::InvalidJoinedRange, input))?;
            ranges.push(WideRange {
                lower,
                upper,
                bits: u32::from(IPV6_SEGMENT_BITS),
            });
            i += 2;
        } else {
            ranges.push(WideRange::from_slot(slot));
            i += 1;
        }
    }

    if let Some(at) = scanned.compress_at {
        let seg_bits = u32::from(family.segment_bits());
        let written: u32 = ranges.iter().map(|r| r.bits).sum();
        let missing = (u32::from(family.bit_count()).saturating_sub(written) / seg_bits) as usize;
        // `::` sits before the embedded IPv4 tail, so slot indexes before it are unchanged
        let at = at.min(ranges.len());
        ranges.splice(at..at, std::iter::repeat(WideRange::zero(seg_bits)).take(missing));
    }
    debug_assert_eq!(
        ranges.iter().map(|r| r.bits).sum::<u32>(),
        u32::from(family.bit_count())
    );
    Ok(ranges)
}

/// Bits of `mask` that line up with each range.
fn mask_parts(ranges: &[WideRange], family: Family, mask: u128) -> Vec<u128> {
    let total = u32::from(family.bit_count());
    let mut offset = 0;
    ranges
        .iter()
        .map(|r| {
            let shift = total - offset - r.bits;
            offset += r.bits;
            mask.checked_shr(shift).unwrap_or(0) & wide_max(r.bits)
        })
        .collect()
}

fn mask_ranges(
    ranges: &[WideRange],
    family: Family,
    mask: u128,
    input: &str,
) -> Result<Vec<(u128, u128, u32)>, AddressError> {
    ranges
        .iter()
        .zip(mask_parts(ranges, family, mask))
        .map(|(r, m)| {
            let res = mask_wide(r.lower, r.upper, m, r.bits);
            if res.sequential {
                Ok((res.lower, res.upper, r.bits))
            } else {
                Err(AddressError::incompatible(ErrorKey::NonSequentialMask, input))
            }
        })
        .collect()
}

fn split(
    ranges: impl Iterator<Item = (u128, u128, u32)>,
    family: Family,
    input: &str,
) -> Result<Vec<(SegInt, SegInt)>, AddressError> {
    let seg_bits = family.segment_bits();
    let mut out: Vec<(SegInt, SegInt)> = Vec::with_capacity(family.segment_count());
    for (lower, upper, bits) in ranges {
        let count = (bits / u32::from(seg_bits)) as usize;
        let parts = split_range(lower, upper, count, seg_bits)
            .ok_or_else(|| AddressError::incompatible(ErrorKey::InvalidJoinedRange, input))?;
        out.extend(parts);
    }
    Ok(out)
}

fn build_views(scanned: &ScannedAddress, family: Family, ranges: &[WideRange], input: &str) -> BuiltAddress {
    let prefix = scanned.qualifier.prefix_length();
    let host = split(ranges.iter().map(|r| (r.lower, r.upper, r.bits)), family, input)
        .map(|segs| Section::from_ranges(family, &segs, prefix).zero_host_to_block());

    let address = match scanned.qualifier.mask() {
        None => host.clone(),
        Some(mask) => mask_ranges(ranges, family, mask.lower_value(), input)
            .and_then(|masked| split(masked.into_iter(), family, input))
            .map(|segs| Section::from_ranges(family, &segs, prefix).zero_host_to_block()),
    };
    BuiltAddress { address, host }
}

/// Whether the address text before any qualifier already reads as the canonical string.
pub(crate) fn is_canonical_text(scanned: &ScannedAddress) -> bool {
    if !scanned.is_standard || scanned.single_segment || !scanned.qualifier.is_empty() {
        return false;
    }
    let slots = scanned.buffer.slots();
    let Some(family) = scanned.family else {
        return false;
    };
    // expanded trailing wildcards repeat one span
    let distinct = slots.windows(2).all(|w| w[0].span().1 < w[1].span().0);
    let whole = slots.len() == family.segment_count() && distinct;
    match scanned.shape {
        Shape::Ipv4 => whole,
        Shape::Mac => {
            whole
                && scanned.mac_format == Some(MacFormat::Colon)
                && !slots.iter().any(|s| s.flags.has(SlotFlags::STANDARD_RANGE_STR))
        }
        _ => false,
    }
}

/* -------------------------------------------------------------------------- */
