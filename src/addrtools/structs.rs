// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    collapsing::SequentialRange,
    masker::Masker,
    qualifier::Zone,
    strings::*,
    AddressError, ErrorKey, EUI64_BITS, EUI64_SEGMENT_COUNT, IPV4_BITS, IPV4_SEGMENT_BITS,
    IPV4_SEGMENT_COUNT, IPV6_BITS, IPV6_SEGMENT_BITS, IPV6_SEGMENT_COUNT, MAC_BITS,
    MAC_SEGMENT_BITS, MAC_SEGMENT_COUNT,
};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    sync::Arc,
};

/// Segment values; wide enough for 16-bit IPv6 segments.
pub type SegInt = u32;

/// IP address version
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IpFam {
    V4,
    V6,
}

impl IpFam {
    pub fn bit_count(&self) -> u8 {
        match self {
            IpFam::V4 => IPV4_BITS,
            IpFam::V6 => IPV6_BITS,
        }
    }

    pub fn family(&self) -> Family {
        match self {
            IpFam::V4 => Family::Ipv4,
            IpFam::V6 => Family::Ipv6,
        }
    }
}

/// Address family, including the MAC sizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Family {
    Ipv4,
    Ipv6,
    /// 6-byte MAC
    Mac,
    /// 8-byte MAC
    Eui64,
}

impl Family {
    pub fn segment_count(&self) -> usize {
        match self {
            Family::Ipv4 => IPV4_SEGMENT_COUNT,
            Family::Ipv6 => IPV6_SEGMENT_COUNT,
            Family::Mac => MAC_SEGMENT_COUNT,
            Family::Eui64 => EUI64_SEGMENT_COUNT,
        }
    }

    pub fn segment_bits(&self) -> u8 {
        match self {
            Family::Ipv4 => IPV4_SEGMENT_BITS,
            Family::Ipv6 => IPV6_SEGMENT_BITS,
            Family::Mac | Family::Eui64 => MAC_SEGMENT_BITS,
        }
    }

    pub fn bit_count(&self) -> u8 {
        match self {
            Family::Ipv4 => IPV4_BITS,
            Family::Ipv6 => IPV6_BITS,
            Family::Mac => MAC_BITS,
            Family::Eui64 => EUI64_BITS,
        }
    }

    pub fn max_segment_value(&self) -> SegInt {
        max_for_bits(self.segment_bits())
    }

    pub fn is_ip(&self) -> bool {
        matches!(self, Family::Ipv4 | Family::Ipv6)
    }

    pub fn is_mac(&self) -> bool {
        !self.is_ip()
    }

    pub fn ip_fam(&self) -> Option<IpFam> {
        match self {
            Family::Ipv4 => Some(IpFam::V4),
            Family::Ipv6 => Some(IpFam::V6),
            _ => None,
        }
    }

    /// MAC family for a byte count.
    pub(crate) fn mac_for_count(count: usize) -> Family {
        if count == EUI64_SEGMENT_COUNT {
            Family::Eui64
        } else {
            Family::Mac
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::Ipv4 => "IPv4",
            Family::Ipv6 => "IPv6",
            Family::Mac => "MAC",
            Family::Eui64 => "EUI-64",
        })
    }
}

#[inline]
pub(crate) fn max_for_bits(bits: u8) -> SegInt {
    if bits >= 32 {
        SegInt::MAX
    } else {
        (1 << bits) - 1
    }
}

/// All-ones value of `bits` width, up to 128.
#[inline]
pub(crate) fn wide_max(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/* -------------------------------------------------------------------------- */

/// One segment: an inclusive value range of fixed bit width.
///
/// `prefix` is the segment-relative prefix length: `None` for segments
/// entirely inside the network portion.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    lower: SegInt,
    upper: SegInt,
    bits: u8,
    prefix: Option<u8>,
}

impl Segment {
    pub fn new(value: SegInt, bits: u8) -> Self {
        Self::new_range(value, value, bits)
    }

    /// Range segment; reversed bounds are swapped.
    pub fn new_range(lower: SegInt, upper: SegInt, bits: u8) -> Self {
        let max = max_for_bits(bits);
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Segment {
            lower: lower.min(max),
            upper: upper.min(max),
            bits,
            prefix: None,
        }
    }

    pub(crate) fn with_prefix(self, prefix: Option<u8>) -> Self {
        Segment {
            prefix: prefix.map(|p| p.min(self.bits)),
            ..self
        }
    }

    pub fn lower(&self) -> SegInt {
        self.lower
    }

    pub fn upper(&self) -> SegInt {
        self.upper
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix
    }

    pub fn max_value(&self) -> SegInt {
        max_for_bits(self.bits)
    }

    pub fn is_multiple(&self) -> bool {
        self.lower != self.upper
    }

    pub fn is_full_range(&self) -> bool {
        self.lower == 0 && self.upper == self.max_value()
    }

    /// Number of values in the segment.
    pub fn count(&self) -> u32 {
        self.upper - self.lower + 1
    }

    pub fn contains(&self, other: &Segment) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    pub fn contains_value(&self, value: SegInt) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Host bits below a segment-relative prefix.
    #[inline]
    fn host_mask(&self, prefix: u8) -> SegInt {
        let prefix = prefix.min(self.bits);
        self.max_value() >> prefix
    }

    /// Whether every host value below `prefix` is included for each network value.
    pub fn contains_prefix_block(&self, prefix: u8) -> bool {
        let host = self.host_mask(prefix);
        self.lower & host == 0 && self.upper & host == host
    }

    /// Whether the segment is exactly one block for `prefix`.
    pub fn is_single_prefix_block(&self, prefix: u8) -> bool {
        let host = self.host_mask(prefix);
        self.contains_prefix_block(prefix) && (self.lower & !host) == (self.upper & !host)
    }

    /// Whether the segment contains the block of its own prefix length.
    pub fn is_prefix_block(&self) -> bool {
        self.prefix.is_some_and(|p| self.contains_prefix_block(p))
    }

    pub fn to_prefix_block(&self, prefix: u8) -> Segment {
        let host = self.host_mask(prefix);
        Segment {
            lower: self.lower & !host,
            upper: self.upper | host,
            ..*self
        }
    }

    pub fn mask(&self, mask: SegInt) -> Result<Segment, AddressError> {
        let max = self.max_value();
        let masker = Masker::new(
            u64::from(self.lower),
            u64::from(self.upper),
            u64::from(mask),
            u64::from(max),
        );
        if !masker.is_sequential() {
            return Err(AddressError::incompatible(
                ErrorKey::NonSequentialMask,
                format!("{}{DASH}{} & {mask}", self.lower, self.upper),
            ));
        }
        Ok(Segment {
            lower: masker.masked_lower(u64::from(self.lower), u64::from(mask)) as SegInt,
            upper: masker.masked_upper(u64::from(self.upper), u64::from(mask)) as SegInt,
            ..*self
        })
    }

    /// Bit-reversed segment; only single values and full ranges stay ranges.
    pub fn reverse_bits(&self) -> Result<Segment, AddressError> {
        let shift = SegInt::BITS - u32::from(self.bits);
        if self.is_multiple() && !self.is_full_range() {
            return Err(AddressError::incompatible(
                ErrorKey::NonSequentialBits,
                format!("{}{DASH}{}", self.lower, self.upper),
            ));
        }
        let value = self.lower.reverse_bits() >> shift;
        Ok(if self.is_full_range() {
            *self
        } else {
            Segment {
                lower: value,
                upper: value,
                ..*self
            }
        })
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower && self.upper == other.upper && self.bits == other.bits
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
        self.upper.hash(state);
        self.bits.hash(state);
    }
}

/* ---------------------------------- */

/// Segment-relative prefix of segment `index` for an address prefix.
#[inline]
pub(crate) fn segment_prefix(index: usize, seg_bits: u8, prefix: Option<u8>) -> Option<u8> {
    let prefix = u32::from(prefix?);
    let start = index as u32 * u32::from(seg_bits);
    if prefix >= start + u32::from(seg_bits) {
        None
    } else {
        Some(prefix.saturating_sub(start) as u8)
    }
}

/// Join segment ranges into one wide range. `None` if the product of the
/// segment ranges is not itself a range.
pub(crate) fn join_segments(ranges: &[(SegInt, SegInt)], seg_bits: u8) -> Option<(u128, u128)> {
    let max = max_for_bits(seg_bits);
    let mut ranged = false;
    let (mut lower, mut upper) = (0u128, 0u128);
    for &(l, u) in ranges {
        if ranged && (l != 0 || u != max) {
            return None;
        }
        ranged |= l != u;
        lower = (lower << seg_bits) | u128::from(l);
        upper = (upper << seg_bits) | u128::from(u);
    }
    Some((lower, upper))
}

/// Split a wide range into `count` segment ranges of `seg_bits` each. `None`
/// if the range is not a product of segment ranges.
pub(crate) fn split_range(
    lower: u128,
    upper: u128,
    count: usize,
    seg_bits: u8,
) -> Option<Vec<(SegInt, SegInt)>> {
    let max = max_for_bits(seg_bits);
    let mut out: Vec<(SegInt, SegInt)> = Vec::with_capacity(count);
    let mut ranged = false;
    for i in (0..count).rev() {
        let shift = i as u32 * u32::from(seg_bits);
        let l = if shift >= 128 { 0 } else { (lower >> shift) as SegInt & max };
        let u = if shift >= 128 { 0 } else { (upper >> shift) as SegInt & max };
        if ranged && (l != 0 || u != max) {
            return None;
        }
        ranged |= l != u;
        out.push((l, u));
    }
    Some(out)
}

/* -------------------------------------------------------------------------- */

/// Fixed-length sequence of segments of one family, with an optional prefix length.
#[derive(Clone, Debug)]
pub struct Section {
    family: Family,
    segments: Box<[Segment]>,
    prefix: Option<u8>,
}

impl Section {
    /// Section from segment ranges; segment prefixes follow from `prefix`.
    pub(crate) fn from_ranges(
        family: Family,
        ranges: &[(SegInt, SegInt)],
        prefix: Option<u8>,
    ) -> Section {
        let bits = family.segment_bits();
        let segments: Vec<Segment> = ranges
            .iter()
            .map(|&(l, u)| Segment::new_range(l, u, bits))
            .collect();
        Self::from_segments(family, segments, prefix)
    }

    pub(crate) fn from_segments(family: Family, segments: Vec<Segment>, prefix: Option<u8>) -> Section {
        debug_assert_eq!(segments.len(), family.segment_count());
        let prefix = prefix.map(|p| p.min(family.bit_count()));
        let bits = family.segment_bits();
        let segments: Box<[Segment]> = segments
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.with_prefix(segment_prefix(i, bits, prefix)))
            .collect();
        Section {
            family,
            segments,
            prefix,
        }
    }

    /// Section covering `[lower, upper]`, when the range splits into segment ranges.
    pub fn from_values(
        family: Family,
        lower: u128,
        upper: u128,
        prefix: Option<u8>,
    ) -> Result<Section, AddressError> {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        let max = wide_max(u32::from(family.bit_count()));
        let ranges = split_range(lower.min(max), upper.min(max), family.segment_count(), family.segment_bits())
            .ok_or_else(|| AddressError::incompatible(ErrorKey::InvalidJoinedRange, format!("{lower:#x}{DASH}{upper:#x}")))?;
        Ok(Self::from_ranges(family, &ranges, prefix))
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix
    }

    pub fn bit_count(&self) -> u8 {
        self.family.bit_count()
    }

    fn ranges(&self) -> Vec<(SegInt, SegInt)> {
        self.segments.iter().map(|s| (s.lower, s.upper)).collect()
    }

    pub fn lower_value(&self) -> u128 {
        let bits = self.family.segment_bits();
        self.segments
            .iter()
            .fold(0u128, |acc, s| (acc << bits) | u128::from(s.lower))
    }

    pub fn upper_value(&self) -> u128 {
        let bits = self.family.segment_bits();
        self.segments
            .iter()
            .fold(0u128, |acc, s| (acc << bits) | u128::from(s.upper))
    }

    pub fn is_multiple(&self) -> bool {
        self.segments.iter().any(Segment::is_multiple)
    }

    /// Number of individual addresses. Cannot be an [usize] due to IPv6. Saturating.
    pub fn count(&self) -> u128 {
        self.segments
            .iter()
            .fold(1u128, |acc, s| acc.saturating_mul(u128::from(s.count())))
    }

    /// Whether the section holds every value between its lower and upper bounds.
    pub fn is_sequential(&self) -> bool {
        let mut ranged = false;
        for s in self.segments.iter() {
            if ranged && !s.is_full_range() {
                return false;
            }
            ranged |= s.is_multiple();
        }
        true
    }

    pub fn contains(&self, other: &Section) -> bool {
        self.family == other.family
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a.contains(b))
    }

    fn prefixes(&self, prefix: u8) -> impl Iterator<Item = (&Segment, Option<u8>)> {
        let bits = self.family.segment_bits();
        let prefix = Some(prefix.min(self.bit_count()));
        self.segments
            .iter()
            .enumerate()
            .map(move |(i, s)| (s, segment_prefix(i, bits, prefix)))
    }

    /// Whether every host value below `prefix` is included for each network value.
    pub fn contains_prefix_block(&self, prefix: u8) -> bool {
        self.prefixes(prefix)
            .all(|(s, p)| p.map_or(true, |p| s.contains_prefix_block(p)))
    }

    /// Whether the section is exactly one prefix block for `prefix`.
    pub fn is_single_prefix_block(&self, prefix: u8) -> bool {
        self.prefixes(prefix).all(|(s, p)| match p {
            None => !s.is_multiple(),
            Some(p) => s.is_single_prefix_block(p),
        })
    }

    /// Whether the section contains the block of its own prefix length.
    pub fn is_prefix_block(&self) -> bool {
        self.prefix.is_some_and(|p| self.contains_prefix_block(p))
    }

    /// Smallest prefix length for which the section is a single block.
    pub fn prefix_length_for_single_block(&self) -> Option<u8> {
        (0..=self.bit_count()).find(|&p| self.is_single_prefix_block(p))
    }

    pub fn to_prefix_block(&self, prefix: u8) -> Section {
        let prefix = prefix.min(self.bit_count());
        let segments: Vec<Segment> = self
            .prefixes(prefix)
            .map(|(s, p)| p.map_or(*s, |p| s.to_prefix_block(p)))
            .collect();
        Self::from_segments(self.family, segments, Some(prefix))
    }

    pub fn with_prefix_length(&self, prefix: u8) -> Section {
        Self::from_segments(self.family, self.segments.to_vec(), Some(prefix))
    }

    pub fn without_prefix_length(&self) -> Section {
        Self::from_segments(self.family, self.segments.to_vec(), None)
    }

    /// Expand to the prefix block when the host bits of both bounds are zero.
    pub(crate) fn zero_host_to_block(self) -> Section {
        let Some(prefix) = self.prefix else {
            return self;
        };
        let zero_host = self.prefixes(prefix).all(|(s, p)| match p {
            None => true,
            Some(p) => {
                let host = s.host_mask(p);
                s.lower & host == 0 && s.upper & host == 0
            }
        });
        if zero_host {
            self.to_prefix_block(prefix)
        } else {
            self
        }
    }

    /// Mask every segment; fails when a masked segment range is not sequential.
    pub fn mask(&self, mask: &Section) -> Result<Section, AddressError> {
        if self.family != mask.family {
            return Err(AddressError::Mismatch(self.family, mask.family));
        }
        let segments: Vec<Segment> = self
            .segments
            .iter()
            .zip(mask.segments.iter())
            .map(|(s, m)| s.mask(m.lower))
            .collect::<Result<Vec<Segment>, AddressError>>()
            .map_err(|_| AddressError::incompatible(ErrorKey::NonSequentialMask, format!("{self} & {mask}")))?;
        Ok(Self::from_segments(self.family, segments, self.prefix))
    }

    pub fn reverse_segments(&self) -> Section {
        let mut segments: Vec<Segment> = self.segments.to_vec();
        segments.reverse();
        Self::from_segments(self.family, segments, None)
    }

    pub fn reverse_bits(&self) -> Result<Section, AddressError> {
        let segments: Vec<Segment> = self
            .segments
            .iter()
            .rev()
            .map(Segment::reverse_bits)
            .collect::<Result<Vec<Segment>, AddressError>>()?;
        Ok(Self::from_segments(self.family, segments, None))
    }

    pub fn lower(&self) -> Section {
        let ranges: Vec<(SegInt, SegInt)> = self.segments.iter().map(|s| (s.lower, s.lower)).collect();
        Self::from_ranges(self.family, &ranges, self.prefix)
    }

    pub fn upper(&self) -> Section {
        let ranges: Vec<(SegInt, SegInt)> = self.segments.iter().map(|s| (s.upper, s.upper)).collect();
        Self::from_ranges(self.family, &ranges, self.prefix)
    }

    /// Big-endian bytes of the lower (`upper == false`) or upper bound.
    fn bytes(&self, upper: bool) -> Box<[u8]> {
        let seg_bytes = usize::from(self.family.segment_bits() / 8);
        let mut out: Vec<u8> = Vec::with_capacity(self.segments.len() * seg_bytes);
        for s in self.segments.iter() {
            let v = if upper { s.upper } else { s.lower };
            out.extend_from_slice(&v.to_be_bytes()[4 - seg_bytes..]);
        }
        out.into_boxed_slice()
    }

    fn write_segment(&self, f: &mut fmt::Formatter<'_>, lower: SegInt, upper: SegInt, full: bool) -> fmt::Result {
        let range_sep = if self.family.is_mac() { "|" } else { DASH };
        match self.family {
            _ if full => f.write_str(WILDCARD),
            Family::Ipv4 if lower == upper => write!(f, "{lower}"),
            Family::Ipv4 => write!(f, "{lower}{range_sep}{upper}"),
            Family::Ipv6 if lower == upper => write!(f, "{lower:x}"),
            Family::Ipv6 => write!(f, "{lower:x}{range_sep}{upper:x}"),
            _ if lower == upper => write!(f, "{lower:02x}"),
            _ => write!(f, "{lower:02x}{range_sep}{upper:02x}"),
        }
    }

    /// Canonical text: prefix blocks print their network portion only.
    pub(crate) fn write_canonical(&self, f: &mut fmt::Formatter<'_>, zone: Option<&Zone>) -> fmt::Result {
        let block = self.is_prefix_block();
        let shown: Vec<(SegInt, SegInt, bool)> = self
            .segments
            .iter()
            .map(|s| match (block, s.prefix) {
                (true, Some(p)) => {
                    let host = s.host_mask(p);
                    (s.lower & !host, s.upper & !host, false)
                }
                _ => (s.lower, s.upper, s.is_full_range()),
            })
            .collect();

        let (sep, compress) = match self.family {
            Family::Ipv4 => (".", None),
            Family::Ipv6 => (":", longest_zero_run(&shown)),
            _ => (":", None),
        };

        let mut i = 0;
        while i < shown.len() {
            if let Some((start, len)) = compress {
                if i == start {
                    f.write_str("::")?;
                    i += len;
                    continue;
                }
            }
            if i > 0 && compress.map_or(true, |(start, len)| i != start + len) {
                f.write_str(sep)?;
            }
            let (lower, upper, full) = shown[i];
            self.write_segment(f, lower, upper, full)?;
            i += 1;
        }

        if let Some(zone) = zone {
            zone.write_escaped(f)?;
        }
        if let Some(prefix) = self.prefix {
            write!(f, "{SLASH}{prefix}")?;
        }
        Ok(())
    }
}

/// Longest run (at least two) of single-valued zero segments, first one wins.
fn longest_zero_run(shown: &[(SegInt, SegInt, bool)]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < shown.len() {
        if shown[i].0 == 0 && shown[i].1 == 0 {
            let start = i;
            while i < shown.len() && shown[i].0 == 0 && shown[i].1 == 0 {
                i += 1;
            }
            let len = i - start;
            if len >= 2 && best.map_or(true, |(_, l)| len > l) {
                best = Some((start, len));
            }
        } else {
            i += 1;
        }
    }
    best
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.segments == other.segments
    }
}

impl Eq for Section {}

impl Hash for Section {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.segments.hash(state);
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_canonical(f, None)
    }
}

/* -------------------------------------------------------------------------- */

/// Values derived from an [Address] on first use, published once.
#[derive(Debug, Default)]
struct AddressCache {
    lower: OnceCell<Address>,
    upper: OnceCell<Address>,
    lower_bytes: OnceCell<Box<[u8]>>,
    upper_bytes: OnceCell<Box<[u8]>>,
    range: OnceCell<SequentialRange>,
    canonical: OnceCell<String>,
}

/// Compute outside the cell and publish; a racing thread's value is identical.
#[inline]
fn publish<T>(cell: &OnceCell<T>, compute: impl FnOnce() -> T) -> &T {
    if let Some(value) = cell.get() {
        return value;
    }
    let value: T = compute();
    cell.get_or_init(|| value)
}

/// An immutable address or subnet of any [Family], with an optional IPv6 zone.
#[derive(Clone, Debug)]
pub struct Address {
    section: Section,
    zone: Option<Zone>,
    cache: Arc<AddressCache>,
}

impl Address {
    pub fn new(section: Section) -> Self {
        Self::with_zone(section, None)
    }

    /// Zones are kept for IPv6 only.
    pub fn with_zone(section: Section, zone: Option<Zone>) -> Self {
        let zone = if section.family == Family::Ipv6 { zone } else { None };
        Address {
            section,
            zone,
            cache: Arc::default(),
        }
    }

    /// Seed the canonical string, for input already in canonical form.
    pub(crate) fn with_canonical(self, canonical: &str) -> Self {
        let _ = self.cache.canonical.set(canonical.to_string());
        self
    }

    pub fn family(&self) -> Family {
        self.section.family
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn segments(&self) -> &[Segment] {
        self.section.segments()
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.section.segment(index)
    }

    pub fn segment_count(&self) -> usize {
        self.section.segment_count()
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.section.prefix
    }

    pub fn is_ipv4(&self) -> bool {
        self.family() == Family::Ipv4
    }

    pub fn is_ipv6(&self) -> bool {
        self.family() == Family::Ipv6
    }

    pub fn is_mac(&self) -> bool {
        self.family().is_mac()
    }

    pub fn is_multiple(&self) -> bool {
        self.section.is_multiple()
    }

    /// Number of individual addresses. Saturating.
    pub fn count(&self) -> u128 {
        self.section.count()
    }

    pub fn is_sequential(&self) -> bool {
        self.section.is_sequential()
    }

    pub fn lower_value(&self) -> u128 {
        self.section.lower_value()
    }

    pub fn upper_value(&self) -> u128 {
        self.section.upper_value()
    }

    /// Lowest individual address, keeping prefix length and zone.
    pub fn lower(&self) -> &Address {
        publish(&self.cache.lower, || {
            Address::with_zone(self.section.lower(), self.zone.clone())
        })
    }

    pub fn upper(&self) -> &Address {
        publish(&self.cache.upper, || {
            Address::with_zone(self.section.upper(), self.zone.clone())
        })
    }

    pub fn lower_bytes(&self) -> &[u8] {
        publish(&self.cache.lower_bytes, || self.section.bytes(false)).as_ref()
    }

    pub fn upper_bytes(&self) -> &[u8] {
        publish(&self.cache.upper_bytes, || self.section.bytes(true)).as_ref()
    }

    /// The range from the lower to the upper address, gaps included.
    pub fn to_sequential_range(&self) -> &SequentialRange {
        publish(&self.cache.range, || {
            SequentialRange::from_values(self.family(), self.lower_value(), self.upper_value())
        })
    }

    /// Canonical string; also what [fmt::Display] prints.
    pub fn canonical(&self) -> &str {
        publish(&self.cache.canonical, || {
            struct Canonical<'a>(&'a Address);
            impl fmt::Display for Canonical<'_> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.section.write_canonical(f, self.0.zone.as_ref())
                }
            }
            Canonical(self).to_string()
        })
        .as_str()
    }

    pub fn contains(&self, other: &Address) -> bool {
        self.section.contains(&other.section) && (self.zone.is_none() || self.zone == other.zone)
    }

    pub fn contains_prefix_block(&self, prefix: u8) -> bool {
        self.section.contains_prefix_block(prefix)
    }

    pub fn is_single_prefix_block(&self, prefix: u8) -> bool {
        self.section.is_single_prefix_block(prefix)
    }

    pub fn is_prefix_block(&self) -> bool {
        self.section.is_prefix_block()
    }

    pub fn prefix_length_for_single_block(&self) -> Option<u8> {
        self.section.prefix_length_for_single_block()
    }

    fn derive(&self, section: Section) -> Address {
        Address::with_zone(section, self.zone.clone())
    }

    /// The block of `prefix` containing this address; `prefix` is clamped to the bit count.
    pub fn to_prefix_block(&self, prefix: u8) -> Address {
        self.derive(self.section.to_prefix_block(prefix))
    }

    /// The block of the address's own prefix length, or the address itself.
    pub fn to_own_prefix_block(&self) -> Address {
        match self.section.prefix {
            Some(prefix) => self.to_prefix_block(prefix),
            None => self.clone(),
        }
    }

    pub fn with_prefix_length(&self, prefix: u8) -> Address {
        self.derive(self.section.with_prefix_length(prefix))
    }

    pub fn without_prefix_length(&self) -> Address {
        self.derive(self.section.without_prefix_length())
    }

    /// Apply `mask` (its lower value) to every segment.
    pub fn mask(&self, mask: &Address) -> Result<Address, AddressError> {
        Ok(self.derive(self.section.mask(&mask.section)?))
    }

    pub fn reverse_segments(&self) -> Address {
        self.derive(self.section.reverse_segments())
    }

    pub fn reverse_bits(&self) -> Result<Address, AddressError> {
        Ok(self.derive(self.section.reverse_bits()?))
    }

    /// Iterate the individual addresses. Can be a lot of them, use with care.
    pub fn iter(&self) -> AddressIterator {
        AddressIterator::new(self)
    }

    pub fn as_ipv4(&self) -> Option<Ipv4View<'_>> {
        self.is_ipv4().then_some(Ipv4View(self))
    }

    pub fn as_ipv6(&self) -> Option<Ipv6View<'_>> {
        self.is_ipv6().then_some(Ipv6View(self))
    }

    pub fn as_mac(&self) -> Option<MacView<'_>> {
        self.is_mac().then_some(MacView(self))
    }

    /// The matching [IpNet] for a single address or a single prefix block.
    pub fn to_ip_net(&self) -> Option<IpNet> {
        let bits = self.section.bit_count();
        let prefix = match self.section.prefix {
            Some(p) if self.is_single_prefix_block(p) => p,
            _ if !self.is_multiple() => self.section.prefix.unwrap_or(bits),
            _ => return None,
        };
        match self.family() {
            Family::Ipv4 => {
                let addr = Ipv4Addr::from(self.lower_value() as u32);
                Ipv4Net::new(addr, prefix).ok().map(IpNet::V4)
            }
            Family::Ipv6 => {
                let addr = Ipv6Addr::from(self.lower_value());
                Ipv6Net::new(addr, prefix).ok().map(IpNet::V6)
            }
            _ => None,
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.section == other.section && self.zone == other.zone
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.section.hash(state);
        self.zone.hash(state);
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Address {
    /// Family first, then lower bound; a single value sorts before a range with the same lower bound.
    fn cmp(&self, other: &Self) -> Ordering {
        self.family()
            .cmp(&other.family())
            .then_with(|| self.lower_value().cmp(&other.lower_value()))
            .then_with(|| self.upper_value().cmp(&other.upper_value()))
            .then_with(|| self.segments().iter().map(|s| (s.lower, s.upper)).cmp(other.segments().iter().map(|s| (s.lower, s.upper))))
            .then_with(|| self.zone.cmp(&other.zone))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        let ranges: Vec<(SegInt, SegInt)> =
            addr.octets().iter().map(|&o| (SegInt::from(o), SegInt::from(o))).collect();
        Address::new(Section::from_ranges(Family::Ipv4, &ranges, None))
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        let ranges: Vec<(SegInt, SegInt)> =
            addr.segments().iter().map(|&s| (SegInt::from(s), SegInt::from(s))).collect();
        Address::new(Section::from_ranges(Family::Ipv6, &ranges, None))
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => a.into(),
            IpAddr::V6(a) => a.into(),
        }
    }
}

impl From<IpNet> for Address {
    /// Same prefix handling as parsing: a zero host becomes the whole block.
    fn from(net: IpNet) -> Self {
        let addr: Address = net.addr().into();
        let section = addr.section.with_prefix_length(net.prefix_len()).zero_host_to_block();
        Address::new(section)
    }
}

/* ---------------------------------- */

/// Regroup segments of one width into segments of another, e.g. IPv4 octets
/// into IPv6 hextets.
fn regroup(
    segments: &[Segment],
    from_bits: u8,
    to_family: Family,
    count: usize,
) -> Result<Vec<(SegInt, SegInt)>, AddressError> {
    let ranges: Vec<(SegInt, SegInt)> = segments.iter().map(|s| (s.lower, s.upper)).collect();
    let fail = || {
        let text: Vec<String> = ranges.iter().map(|(l, u)| format!("{l}{DASH}{u}")).collect();
        AddressError::incompatible(ErrorKey::InvalidRegrouping, text.join(" "))
    };
    let (lower, upper) = join_segments(&ranges, from_bits).ok_or_else(fail)?;
    split_range(lower, upper, count, to_family.segment_bits()).ok_or_else(fail)
}

/// IPv4 view of an [Address].
#[derive(Clone, Copy, Debug)]
pub struct Ipv4View<'a>(&'a Address);

impl Ipv4View<'_> {
    pub fn lower_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.0.lower_value() as u32)
    }

    pub fn upper_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.0.upper_value() as u32)
    }

    /// The single address, if the address is not a subnet.
    pub fn to_ipv4_addr(&self) -> Option<Ipv4Addr> {
        (!self.0.is_multiple()).then(|| self.lower_addr())
    }

    /// `::ffff:a.b.c.d`
    pub fn to_ipv4_mapped(&self) -> Result<Address, AddressError> {
        let low = regroup(self.0.segments(), IPV4_SEGMENT_BITS, Family::Ipv6, 2)?;
        let mut ranges: Vec<(SegInt, SegInt)> = vec![(0, 0); 5];
        ranges.push((0xffff, 0xffff));
        ranges.extend(low);
        let prefix = self.0.prefix_length().map(|p| p + (IPV6_BITS - IPV4_BITS));
        Ok(Address::new(Section::from_ranges(Family::Ipv6, &ranges, prefix)))
    }
}

/// IPv6 view of an [Address].
#[derive(Clone, Copy, Debug)]
pub struct Ipv6View<'a>(&'a Address);

impl Ipv6View<'_> {
    pub fn lower_addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.0.lower_value())
    }

    pub fn upper_addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.0.upper_value())
    }

    pub fn to_ipv6_addr(&self) -> Option<Ipv6Addr> {
        (!self.0.is_multiple()).then(|| self.lower_addr())
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.0.zone()
    }

    /// `::ffff:0:0/96`
    pub fn is_ipv4_mapped(&self) -> bool {
        let segs = self.0.segments();
        segs[..5].iter().all(|s| !s.is_multiple() && s.lower == 0)
            && !segs[5].is_multiple()
            && segs[5].lower == 0xffff
    }

    /// IPv4 address in the low 32 bits.
    pub fn embedded_ipv4(&self) -> Result<Address, AddressError> {
        let octets = regroup(&self.0.segments()[6..], IPV6_SEGMENT_BITS, Family::Ipv4, IPV4_SEGMENT_COUNT)?;
        let prefix = self
            .0
            .prefix_length()
            .and_then(|p| p.checked_sub(IPV6_BITS - IPV4_BITS));
        Ok(Address::new(Section::from_ranges(Family::Ipv4, &octets, prefix)))
    }
}

/// MAC view of an [Address].
#[derive(Clone, Copy, Debug)]
pub struct MacView<'a>(&'a Address);

impl MacView<'_> {
    pub fn is_eui64(&self) -> bool {
        self.0.family() == Family::Eui64
    }

    /// 8-byte form, inserting `ff:fe` in the middle of a 6-byte MAC.
    pub fn to_eui64(&self) -> Address {
        if self.is_eui64() {
            return self.0.clone();
        }
        let segs = self.0.segments();
        let mut ranges: Vec<(SegInt, SegInt)> = segs[..3].iter().map(|s| (s.lower, s.upper)).collect();
        ranges.push((0xff, 0xff));
        ranges.push((0xfe, 0xfe));
        ranges.extend(segs[3..].iter().map(|s| (s.lower, s.upper)));
        let prefix = self.0.prefix_length().map(|p| if p > 24 { p + 16 } else { p });
        Address::new(Section::from_ranges(Family::Eui64, &ranges, prefix))
    }
}

/* ---------------------------------- */

/// Iterator over the individual addresses of an [Address].
pub struct AddressIterator {
    family: Family,
    prefix: Option<u8>,
    zone: Option<Zone>,
    bounds: Vec<(SegInt, SegInt)>,
    current: Option<Vec<SegInt>>,
}

impl AddressIterator {
    pub fn new(addr: &Address) -> Self {
        let bounds = addr.section.ranges();
        AddressIterator {
            family: addr.family(),
            prefix: addr.prefix_length(),
            zone: addr.zone.clone(),
            current: Some(bounds.iter().map(|b| b.0).collect()),
            bounds,
        }
    }
}

impl Iterator for AddressIterator {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.as_mut()?;
        let ranges: Vec<(SegInt, SegInt)> = current.iter().map(|&v| (v, v)).collect();
        let addr = Address::with_zone(
            Section::from_ranges(self.family, &ranges, self.prefix),
            self.zone.clone(),
        );

        // odometer step from the last segment
        let mut done = true;
        for (value, &(lower, upper)) in current.iter_mut().zip(self.bounds.iter()).rev() {
            if *value < upper {
                *value += 1;
                done = false;
                break;
            }
            *value = lower;
        }
        if done {
            self.current = None;
        }
        Some(addr)
    }
}

impl IntoIterator for &Address {
    type Item = Address;
    type IntoIter = AddressIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addrtools::ErrorKind;

    fn v4(ranges: &[(SegInt, SegInt)], prefix: Option<u8>) -> Address {
        Address::new(Section::from_ranges(Family::Ipv4, ranges, prefix))
    }

    #[test]
    fn test_segment_prefix_markings() {
        assert_eq!(segment_prefix(0, 8, Some(24)), None);
        assert_eq!(segment_prefix(2, 8, Some(24)), None);
        assert_eq!(segment_prefix(3, 8, Some(24)), Some(0));
        assert_eq!(segment_prefix(1, 8, Some(12)), Some(4));
        assert_eq!(segment_prefix(2, 8, Some(12)), Some(0));
        assert_eq!(segment_prefix(0, 8, None), None);

        let a = v4(&[(10, 10), (1, 1), (0, 0), (0, 0)], Some(12));
        let p: Vec<Option<u8>> = a.segments().iter().map(|s| s.prefix_length()).collect();
        assert_eq!(p, vec![None, Some(4), Some(0), Some(0)]);
    }

    #[test]
    fn test_segment_basics() {
        let s = Segment::new_range(10, 4, 8);
        assert_eq!((s.lower(), s.upper()), (4, 10));
        assert!(s.is_multiple());
        assert_eq!(s.count(), 7);
        assert!(Segment::new_range(0, 255, 8).is_full_range());
        assert!(!Segment::new(4, 8).is_multiple());
    }

    #[test]
    fn test_segment_prefix_blocks() {
        let s = Segment::new_range(16, 31, 8);
        assert!(s.contains_prefix_block(4));
        assert!(s.is_single_prefix_block(4));
        assert!(!s.is_single_prefix_block(5) || s.contains_prefix_block(5));
        assert!(!s.is_prefix_block());
        assert!(s.with_prefix(Some(4)).is_prefix_block());
        let s = Segment::new_range(0, 63, 8);
        assert!(s.contains_prefix_block(4));
        assert!(!s.is_single_prefix_block(4));
        assert!(s.is_single_prefix_block(2));
        assert_eq!(Segment::new(20, 8).to_prefix_block(4), Segment::new_range(16, 31, 8));
    }

    #[test]
    fn test_segment_reverse_bits() {
        assert_eq!(Segment::new(1, 8).reverse_bits().unwrap().lower(), 0x80);
        assert_eq!(Segment::new(1, 16).reverse_bits().unwrap().lower(), 0x8000);
        assert!(Segment::new_range(0, 255, 8).reverse_bits().unwrap().is_full_range());
        let err = Segment::new_range(1, 2, 8).reverse_bits().unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::NonSequentialBits));
        assert_eq!(err.kind(), ErrorKind::Incompatible);
        assert_eq!(err.offset(), None);
        let ranged = v4(&[(1, 1), (2, 2), (3, 3), (1, 2)], None);
        assert!(ranged.reverse_bits().unwrap_err().is_incompatible());
    }

    #[test]
    fn test_split_and_join() {
        let r = split_range(256, 511, 4, 8).unwrap();
        assert_eq!(r, vec![(0, 0), (0, 0), (1, 1), (0, 255)]);
        assert!(split_range(200, 300, 4, 8).is_none());
        assert_eq!(split_range(0, u128::MAX, 8, 16).unwrap()[0], (0, 0xffff));

        assert_eq!(join_segments(&[(1, 2), (0, 255)], 8), Some((0x100, 0x2ff)));
        assert_eq!(join_segments(&[(1, 2), (5, 5)], 8), None);
        assert_eq!(join_segments(&[(1, 1), (5, 9)], 8), Some((0x105, 0x109)));
    }

    #[test]
    fn test_section_values_and_count() {
        let a = v4(&[(1, 1), (2, 2), (3, 3), (4, 10)], None);
        assert_eq!(a.lower_value(), 0x01020304);
        assert_eq!(a.upper_value(), 0x0102030a);
        assert_eq!(a.count(), 7);
        assert!(a.is_sequential());
        let b = v4(&[(1, 1), (2, 3), (3, 3), (4, 4)], None);
        assert!(!b.is_sequential());
        assert_eq!(b.count(), 2);
        let all = Address::new(Section::from_values(Family::Ipv6, 0, u128::MAX, None).unwrap());
        assert_eq!(all.count(), u128::MAX);
    }

    #[test]
    fn test_prefix_block_idempotent() {
        let a = v4(&[(1, 1), (2, 2), (3, 3), (4, 4)], Some(24));
        let block = a.to_prefix_block(24);
        assert_eq!(block.segment(3).unwrap().upper(), 255);
        assert!(block.is_prefix_block());
        assert!(block.is_single_prefix_block(24));
        assert_eq!(block.to_prefix_block(24), block);
        assert_eq!(block.prefix_length_for_single_block(), Some(24));
        assert_eq!(block.to_string(), "1.2.3.0/24");
    }

    #[test]
    fn test_zero_host_expansion() {
        let s = Section::from_ranges(Family::Ipv4, &[(1, 1), (2, 2), (0, 0), (0, 0)], Some(16));
        let s = s.zero_host_to_block();
        assert_eq!(s.segment(2).unwrap().upper(), 255);
        assert_eq!(s.segment(3).unwrap().upper(), 255);

        let s = Section::from_ranges(Family::Ipv4, &[(1, 1), (2, 2), (3, 3), (4, 4)], Some(16));
        assert!(!s.zero_host_to_block().is_multiple());
    }

    #[test]
    fn test_equality_ignores_prefix() {
        let a = v4(&[(1, 1), (2, 2), (3, 3), (4, 4)], Some(24));
        let b = v4(&[(1, 1), (2, 2), (3, 3), (4, 4)], None);
        assert_eq!(a, b);
        let c = v4(&[(1, 1), (2, 2), (3, 3), (4, 5)], None);
        assert!(b < c);
        assert!(b.lower() < c.upper());
    }

    #[test]
    fn test_cached_lower_upper() {
        let a = v4(&[(1, 1), (2, 2), (0, 255), (4, 4)], None);
        assert_eq!(a.lower().to_string(), "1.2.0.4");
        assert_eq!(a.upper().to_string(), "1.2.255.4");
        assert!(std::ptr::eq(a.lower(), a.lower()));
        assert_eq!(a.lower_bytes(), &[1, 2, 0, 4]);
        assert_eq!(a.upper_bytes(), &[1, 2, 255, 4]);
        let b = a.clone();
        assert!(std::ptr::eq(a.lower(), b.lower()));
    }

    #[test]
    fn test_mask_section() {
        let a = v4(&[(1, 1), (2, 2), (3, 3), (4, 20)], None);
        let m = v4(&[(255, 255), (255, 255), (255, 255), (0xf0, 0xf0)], None);
        let err = a.mask(&m).unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::NonSequentialMask));

        let m = v4(&[(255, 255), (255, 255), (0, 0), (0, 0)], None);
        assert_eq!(a.mask(&m).unwrap().to_string(), "1.2.0.0");

        let mac = Address::new(Section::from_values(Family::Mac, 1, 1, None).unwrap());
        assert!(matches!(a.mask(&mac), Err(AddressError::Mismatch(..))));
    }

    #[test]
    fn test_display_forms() {
        let a = Address::new(Section::from_values(Family::Ipv6, 1 << 112 | 2, 1 << 112 | 2, None).unwrap());
        assert_eq!(a.to_string(), "1::2");
        let a = Address::new(Section::from_values(Family::Ipv6, 0, 0, None).unwrap());
        assert_eq!(a.to_string(), "::");
        let a = Address::new(Section::from_ranges(
            Family::Ipv6,
            &[(1, 1), (0, 0), (1, 1), (0, 0), (0, 0), (0, 0), (0, 0xffff), (2, 3)],
            None,
        ));
        assert_eq!(a.to_string(), "1:0:1::*:2-3");
        let mac = Address::new(Section::from_values(Family::Mac, 0x0102030405ff, 0x0102030405ff, None).unwrap());
        assert_eq!(mac.to_string(), "01:02:03:04:05:ff");
        let v4 = v4(&[(1, 1), (2, 2), (0, 255), (4, 10)], None);
        assert_eq!(v4.to_string(), "1.2.*.4-10");
    }

    #[test]
    fn test_iterator() {
        let a = v4(&[(1, 1), (2, 3), (3, 3), (4, 5)], None);
        let all: Vec<String> = a.iter().map(|x| x.to_string()).collect();
        assert_eq!(all, vec!["1.2.3.4", "1.2.3.5", "1.3.3.4", "1.3.3.5"]);
        assert_eq!((&a).into_iter().count() as u128, a.count());
    }

    #[test]
    fn test_views() {
        let a = v4(&[(1, 1), (2, 2), (3, 3), (4, 4)], None);
        let view = a.as_ipv4().unwrap();
        assert_eq!(view.to_ipv4_addr(), Some(Ipv4Addr::new(1, 2, 3, 4)));
        let mapped = view.to_ipv4_mapped().unwrap();
        assert_eq!(mapped.to_string(), "::ffff:102:304");
        let v6 = mapped.as_ipv6().unwrap();
        assert!(v6.is_ipv4_mapped());
        assert_eq!(v6.embedded_ipv4().unwrap(), a);
        assert!(a.as_mac().is_none());

        let ranged = v4(&[(1, 1), (2, 3), (3, 3), (4, 4)], None);
        let err = ranged.as_ipv4().unwrap().to_ipv4_mapped().unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::InvalidRegrouping));
        assert!(err.is_incompatible());
        let wide = Address::new(Section::from_ranges(
            Family::Ipv6,
            &[(0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (0xffff, 0xffff), (1, 2), (3, 3)],
            None,
        ));
        let err = wide.as_ipv6().unwrap().embedded_ipv4().unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::InvalidRegrouping));

        let mac = Address::new(Section::from_values(Family::Mac, 0x0102030405ff, 0x0102030405ff, None).unwrap());
        let eui = mac.as_mac().unwrap().to_eui64();
        assert_eq!(eui.to_string(), "01:02:03:ff:fe:04:05:ff");
        assert!(eui.as_mac().unwrap().is_eui64());
    }

    #[test]
    fn test_ipnet_conversions() {
        let net: IpNet = "10.1.0.0/16".parse().unwrap();
        let a = Address::from(net);
        assert!(a.is_prefix_block());
        assert_eq!(a.to_string(), "10.1.0.0/16");
        assert_eq!(a.to_ip_net(), Some(net));

        let host: IpNet = "10.1.2.3/16".parse().unwrap();
        let a = Address::from(host);
        assert!(!a.is_multiple());
        assert_eq!(a.to_ip_net(), Some(host));

        let ranged = v4(&[(1, 1), (2, 3), (3, 3), (4, 4)], None);
        assert_eq!(ranged.to_ip_net(), None);

        let v6 = Address::from(IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert_eq!(v6.to_string(), "::1");
    }
}
