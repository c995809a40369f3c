// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Masking of value ranges.

Masking `[lower, upper]` bit by bit does not in general give an interval:
`[0b0100, 0b1011] & 0b1010` is `{0b0000, 0b0010, 0b1000, 0b1010}`. A masker
is computed once per (range, mask) pair and says whether the image is an
interval and how to get its bounds.

With `k` the highest bit in which `lower` and `upper` differ and `j` the
highest mask bit at or below `k`, the image is an interval iff every mask
bit below `j` is set, and either `j == k` or the range holds at least
`2^(j+1)` values (then bits `0..=j` take every value).
*/

/// Bounds of a masked range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MaskResult<T> {
    /// whether `{x & mask | x in [lower, upper]}` is exactly `[lower, upper]` below
    pub sequential: bool,
    pub lower: T,
    pub upper: T,
}

/// How a range reacts to a mask, for values up to 128 bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Analysis {
    /// bounds are `lower & mask` and `upper & mask`
    Default,
    /// bits covered by `low` span their full range after masking
    FullRange { low: u128 },
    NonSequential,
}

#[inline]
fn highest_bit(v: u128) -> u32 {
    127 - v.leading_zeros()
}

#[inline]
fn ones_through(bit: u32) -> u128 {
    if bit >= 127 {
        u128::MAX
    } else {
        (1u128 << (bit + 1)) - 1
    }
}

fn analyze(lower: u128, upper: u128, mask: u128, max: u128) -> Analysis {
    if lower == upper || mask == 0 || mask & max == max {
        return Analysis::Default;
    }
    let differing: u128 = lower ^ upper;
    let k: u32 = highest_bit(differing);
    let masked: u128 = mask & ones_through(k);
    if masked == 0 {
        // the differing bits are all masked away, a single value remains
        return Analysis::Default;
    }
    let j: u32 = highest_bit(masked);
    let below_j: u128 = (1u128 << j) - 1;
    if masked & below_j != below_j {
        return Analysis::NonSequential;
    }
    if j == k {
        return Analysis::Default;
    }
    let low: u128 = ones_through(j);
    if upper - lower >= low {
        Analysis::FullRange { low }
    } else {
        Analysis::NonSequential
    }
}

/* ---------------------------------- */

/// Range masker for values of up to 64 bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Masker(Analysis);

impl Masker {
    /// Masker for `[lower, upper]` under `mask`, in a domain whose largest value is `max`.
    pub fn new(lower: u64, upper: u64, mask: u64, max: u64) -> Self {
        Masker(analyze(
            u128::from(lower),
            u128::from(upper),
            u128::from(mask),
            u128::from(max),
        ))
    }

    pub fn is_sequential(&self) -> bool {
        self.0 != Analysis::NonSequential
    }

    pub fn masked_lower(&self, lower: u64, mask: u64) -> u64 {
        match self.0 {
            Analysis::FullRange { low } => (lower & mask) & !(low as u64),
            _ => lower & mask,
        }
    }

    pub fn masked_upper(&self, upper: u64, mask: u64) -> u64 {
        match self.0 {
            Analysis::FullRange { low } => (upper & mask) | low as u64,
            _ => upper & mask,
        }
    }

    /// One-shot masking of `[lower, upper]`.
    pub fn mask(lower: u64, upper: u64, mask: u64, max: u64) -> MaskResult<u64> {
        let masker = Self::new(lower, upper, mask, max);
        MaskResult {
            sequential: masker.is_sequential(),
            lower: masker.masked_lower(lower, mask),
            upper: masker.masked_upper(upper, mask),
        }
    }
}

/// Range masker for 128-bit values given as `(high, low)` 64-bit halves.
///
/// A difference in the high halves makes every low bit part of the varying
/// suffix, so the analysis runs over the joined value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtendedMasker(Analysis);

#[inline]
fn join(halves: (u64, u64)) -> u128 {
    (u128::from(halves.0) << 64) | u128::from(halves.1)
}

#[inline]
fn split(value: u128) -> (u64, u64) {
    ((value >> 64) as u64, value as u64)
}

impl ExtendedMasker {
    pub fn new(lower: (u64, u64), upper: (u64, u64), mask: (u64, u64), max: (u64, u64)) -> Self {
        ExtendedMasker(analyze(join(lower), join(upper), join(mask), join(max)))
    }

    pub fn is_sequential(&self) -> bool {
        self.0 != Analysis::NonSequential
    }

    pub fn masked_lower(&self, lower: (u64, u64), mask: (u64, u64)) -> (u64, u64) {
        let masked = join(lower) & join(mask);
        match self.0 {
            Analysis::FullRange { low } => split(masked & !low),
            _ => split(masked),
        }
    }

    pub fn masked_upper(&self, upper: (u64, u64), mask: (u64, u64)) -> (u64, u64) {
        let masked = join(upper) & join(mask);
        match self.0 {
            Analysis::FullRange { low } => split(masked | low),
            _ => split(masked),
        }
    }

    pub fn mask(
        lower: (u64, u64),
        upper: (u64, u64),
        mask: (u64, u64),
        max: (u64, u64),
    ) -> MaskResult<(u64, u64)> {
        let masker = Self::new(lower, upper, mask, max);
        MaskResult {
            sequential: masker.is_sequential(),
            lower: masker.masked_lower(lower, mask),
            upper: masker.masked_upper(upper, mask),
        }
    }
}

/// Mask a range of any width up to 128 bits, picking the masker by width.
pub(crate) fn mask_wide(lower: u128, upper: u128, mask: u128, bits: u32) -> MaskResult<u128> {
    let max: u128 = ones_through(bits.saturating_sub(1));
    if bits <= 64 {
        let r = Masker::mask(lower as u64, upper as u64, mask as u64, max as u64);
        MaskResult {
            sequential: r.sequential,
            lower: u128::from(r.lower),
            upper: u128::from(r.upper),
        }
    } else {
        let r = ExtendedMasker::mask(split(lower), split(upper), split(mask), split(max));
        MaskResult {
            sequential: r.sequential,
            lower: join(r.lower),
            upper: join(r.upper),
        }
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn brute(lower: u64, upper: u64, mask: u64) -> Option<(u64, u64)> {
        let mut image: Vec<u64> = (lower..=upper).map(|x| x & mask).collect();
        image.sort_unstable();
        image.dedup();
        let (lo, hi) = (image[0], image[image.len() - 1]);
        if (hi - lo + 1) as usize == image.len() {
            Some((lo, hi))
        } else {
            None
        }
    }

    #[test]
    fn test_non_contiguous_example() {
        let r = Masker::mask(0b0100, 0b1011, 0b1010, 0xff);
        assert!(!r.sequential);
    }

    #[test]
    fn test_range_spanning_mask_bit() {
        // 4-20 under 255.255.255.240
        assert!(!Masker::mask(4, 20, 0xf0, 0xff).sequential);
    }

    #[test]
    fn test_prefix_mask_on_full_range() {
        let r = Masker::mask(0, 255, 0, 0xff);
        assert!(r.sequential);
        assert_eq!((r.lower, r.upper), (0, 0));

        let r = Masker::mask(0, 255, 0xff, 0xff);
        assert_eq!((r.lower, r.upper), (0, 255));
    }

    #[test]
    fn test_full_range_result() {
        let r = Masker::mask(1, 6, 0b11, 0xff);
        assert!(r.sequential);
        assert_eq!((r.lower, r.upper), (0, 3));

        let r = Masker::mask(4, 7, 0b101, 0xff);
        assert_eq!((r.lower, r.upper), (4, 5));
    }

    #[test]
    fn test_exhaustive_small_domain() {
        for mask in 0..16u64 {
            for lower in 0..16u64 {
                for upper in lower..16u64 {
                    let r = Masker::mask(lower, upper, mask, 15);
                    match brute(lower, upper, mask) {
                        Some(bounds) => {
                            assert!(r.sequential, "{lower}-{upper} & {mask}");
                            assert_eq!((r.lower, r.upper), bounds, "{lower}-{upper} & {mask}");
                        }
                        None => assert!(!r.sequential, "{lower}-{upper} & {mask}"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_extended_high_half_differs() {
        let all = (u64::MAX, u64::MAX);

        // only the low half varies and the mask drops it
        let r = ExtendedMasker::mask((1, 0), (1, u64::MAX), (u64::MAX, 0), all);
        assert!(r.sequential);
        assert_eq!((r.lower, r.upper), ((1, 0), (1, 0)));

        // high half differs, so every low byte value is covered
        let r = ExtendedMasker::mask((0, 5), (1, 3), (0, 0xff), all);
        assert!(r.sequential);
        assert_eq!((r.lower, r.upper), ((0, 0), (0, 0xff)));

        // high half differs but the range is too short to cover the low byte
        let r = ExtendedMasker::mask((0, u64::MAX - 15), (1, 3), (0, 0xff), all);
        assert!(!r.sequential);

        // keeping only the high half of a range crossing it leaves gaps
        let r = ExtendedMasker::mask((1, 0), (2, u64::MAX), (u64::MAX, 0), all);
        assert!(!r.sequential);
    }

    #[test]
    fn test_mask_wide_dispatch() {
        let r = mask_wide(0x0100, 0x01ff, 0xff00, 16);
        assert!(r.sequential);
        assert_eq!((r.lower, r.upper), (0x0100, 0x0100));
        let r = mask_wide(0, u128::MAX, u128::MAX >> 64, 128);
        assert!(r.sequential);
        assert_eq!((r.lower, r.upper), (0, u128::MAX >> 64));
    }
}
