// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-segment scan results, filled by the scanner and consumed by the builder.

/// Flag set of a [SegmentSlot].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct SlotFlags(pub u16);

impl SlotFlags {
    /// `*`
    pub const WILDCARD: u16 = 1 << 0;
    /// one or more trailing `_`
    pub const SINGLE_WILDCARD: u16 = 1 << 1;
    /// the text is already in canonical form
    pub const STANDARD_STR: u16 = 1 << 2;
    /// both range bounds are canonical and in order
    pub const STANDARD_RANGE_STR: u16 = 1 << 3;
    /// the range came from wildcard characters
    pub const RANGE_WILDCARD: u16 = 1 << 4;
    /// `-b`: the lower bound was omitted
    pub const INFERRED_LOWER: u16 = 1 << 5;
    /// `a-`: the upper bound was omitted
    pub const INFERRED_UPPER: u16 = 1 << 6;
    /// joined from two octets of an embedded IPv4 address
    pub const MERGED_MIXED: u16 = 1 << 7;

    #[inline]
    pub fn has(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }
}

/// One segment as written in the string.
///
/// Values wider than 64 bits (IPv6 single segment) keep their high halves
/// in `extended_lower`/`extended_upper`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct SegmentSlot {
    pub lower: u64,
    pub upper: u64,
    pub extended_lower: u64,
    pub extended_upper: u64,
    pub lower_start: u32,
    pub lower_end: u32,
    pub upper_start: u32,
    pub upper_end: u32,
    /// index of the first significant digit of the lower bound
    pub digit_start: u32,
    pub lower_radix: u8,
    pub upper_radix: u8,
    /// resolved bit width of the slot
    pub bits: u8,
    pub flags: SlotFlags,
}

impl SegmentSlot {
    pub fn lower_wide(&self) -> u128 {
        (u128::from(self.extended_lower) << 64) | u128::from(self.lower)
    }

    pub fn upper_wide(&self) -> u128 {
        (u128::from(self.extended_upper) << 64) | u128::from(self.upper)
    }

    pub fn set_lower_wide(&mut self, value: u128) {
        self.lower = value as u64;
        self.extended_lower = (value >> 64) as u64;
    }

    pub fn set_upper_wide(&mut self, value: u128) {
        self.upper = value as u64;
        self.extended_upper = (value >> 64) as u64;
    }

    /// Text span of the whole segment.
    pub fn span(&self) -> (usize, usize) {
        let end = self.upper_end.max(self.lower_end);
        (self.lower_start as usize, end as usize)
    }
}

/// Scan-time storage for the segments of one address.
#[derive(Clone, Debug, Default)]
pub(crate) struct ParseBuffer {
    slots: Vec<SegmentSlot>,
}

impl ParseBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Reserve room once the address family is known.
    pub fn reserve_for(&mut self, capacity: usize) {
        if self.slots.capacity() < capacity {
            self.slots.reserve_exact(capacity - self.slots.len());
        }
    }

    pub fn push(&mut self, slot: SegmentSlot) -> usize {
        debug_assert!(slot.lower_wide() <= slot.upper_wide());
        self.slots.push(slot);
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&SegmentSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[SegmentSlot] {
        &self.slots
    }

    /// Whether every slot was written in canonical form.
    pub fn is_standard(&self) -> bool {
        self.slots.iter().all(|s| {
            s.flags.has(SlotFlags::STANDARD_STR) || s.flags.has(SlotFlags::STANDARD_RANGE_STR)
        })
    }
}

/* -------------------------------------------------------------------------- */
