// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv4, IPv6 and MAC address string parsing into segment ranges, plus the
//! masking and prefix-block arithmetic those ranges need.

mod addresses;
mod buffer;
mod builder;
mod chars;
mod collapsing;
mod masker;
mod options;
mod qualifier;
mod scanner;
mod strings;
mod structs;

use std::{error, fmt};
use strings::*;

pub use addresses::*;
pub use collapsing::SequentialRange;
pub use masker::{ExtendedMasker, MaskResult, Masker};
pub use options::{IpParseOptions, Ipv4Options, Ipv6Options, MacParseOptions, MacSize, RangeOptions};
pub use qualifier::{Qualifier, Zone};
pub use structs::{
    Address, AddressIterator, Family, IpFam, Ipv4View, Ipv6View, MacView, Section, SegInt, Segment,
};

pub(crate) const IPV4_BITS: u8 = 32;
pub(crate) const IPV6_BITS: u8 = 128;
pub(crate) const MAC_BITS: u8 = 48;
pub(crate) const EUI64_BITS: u8 = 64;
pub(crate) const IPV4_SEGMENT_BITS: u8 = 8;
pub(crate) const IPV6_SEGMENT_BITS: u8 = 16;
pub(crate) const MAC_SEGMENT_BITS: u8 = 8;
pub(crate) const IPV4_SEGMENT_COUNT: usize = 4;
pub(crate) const IPV6_SEGMENT_COUNT: usize = 8;
pub(crate) const MAC_SEGMENT_COUNT: usize = 6;
pub(crate) const EUI64_SEGMENT_COUNT: usize = 8;
pub(crate) const MAX_SERVICE_LEN: usize = 15;

/// Broad classification of an [ErrorKey].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// segment counts, separators, stray characters
    Structural,
    /// values, digit counts, radixes
    Numeric,
    /// range syntax and ordering
    Range,
    /// prefix lengths and masks
    Mask,
    /// IPv6 zones
    Zone,
    /// syntax that the parse options switch off
    Capability,
    /// valid syntax whose value cannot be represented
    Incompatible,
}

/// Message key of an [AddressError]. [ErrorKey::message] looks up its text.
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKey {
    InvalidCharacter, EmptySegment, TooManySegments, TooFewSegments,
    TrailingSeparator, MultipleCompression, MixedSeparators, MixedPosition,
    InvalidPort, InvalidService, MissingPort,

    TooManyDigits, SegmentTooLarge, LeadingZeros, InvalidDigit, MissingDigits,

    WildcardMixed, RangeWithWildcard, MultipleRanges, ReversedRange, RangeDigitMismatch,

    PrefixTooLarge, InvalidPrefix, MaskVersionMismatch, SingleSegmentMask,

    InvalidZoneCharacter, EmptyZone, ZoneNotIpv6, InvalidZoneEncoding,

    WildcardDisallowed, SingleWildcardDisallowed, RangeDisallowed, InferredBoundaryDisallowed,
    SingleSegmentDisallowed, EmptyDisallowed, AllDisallowed, PrefixOnlyDisallowed,
    Ipv4Disallowed, Ipv6Disallowed, MixedDisallowed, BinaryDisallowed, HexDisallowed,
    MaskDisallowed, ZoneDisallowed, MacFormatDisallowed,

    NonSequentialMask, InvalidJoinedRange, NonSequentialBits, InvalidRegrouping,
}

impl ErrorKey {
    /// Text of the message catalog entry for this key.
    pub fn message(&self) -> &'static str {
        use ErrorKey::*;
        match self {
            InvalidCharacter => ERR_INVALID_CHAR,
            EmptySegment => ERR_EMPTY_SEGMENT,
            TooManySegments => ERR_TOO_MANY_SEGMENTS,
            TooFewSegments => ERR_TOO_FEW_SEGMENTS,
            TrailingSeparator => ERR_TRAILING_SEP,
            MultipleCompression => ERR_MULTIPLE_COMPRESSION,
            MixedSeparators => ERR_MIXED_SEPARATORS,
            MixedPosition => ERR_MIXED_POSITION,
            InvalidPort => ERR_INVALID_PORT,
            InvalidService => ERR_INVALID_SERVICE,
            MissingPort => ERR_MISSING_PORT,
            TooManyDigits => ERR_TOO_MANY_DIGITS,
            SegmentTooLarge => ERR_SEGMENT_TOO_LARGE,
            LeadingZeros => ERR_LEADING_ZEROS,
            InvalidDigit => ERR_INVALID_DIGIT,
            MissingDigits => ERR_MISSING_DIGITS,
            WildcardMixed => ERR_WILDCARD_MIXED,
            RangeWithWildcard => ERR_RANGE_WILDCARD,
            MultipleRanges => ERR_MULTIPLE_RANGES,
            ReversedRange => ERR_REVERSED_RANGE,
            RangeDigitMismatch => ERR_RANGE_DIGITS,
            PrefixTooLarge => ERR_PREFIX_TOO_LARGE,
            InvalidPrefix => ERR_INVALID_PREFIX,
            MaskVersionMismatch => ERR_MASK_VERSION,
            SingleSegmentMask => ERR_SINGLE_SEGMENT_MASK,
            InvalidZoneCharacter => ERR_INVALID_ZONE,
            EmptyZone => ERR_EMPTY_ZONE,
            ZoneNotIpv6 => ERR_ZONE_NOT_IPV6,
            InvalidZoneEncoding => ERR_ZONE_ENCODING,
            WildcardDisallowed => ERR_NO_WILDCARD,
            SingleWildcardDisallowed => ERR_NO_SINGLE_WILDCARD,
            RangeDisallowed => ERR_NO_RANGE,
            InferredBoundaryDisallowed => ERR_NO_INFERRED,
            SingleSegmentDisallowed => ERR_NO_SINGLE_SEGMENT,
            EmptyDisallowed => ERR_NO_EMPTY,
            AllDisallowed => ERR_NO_ALL,
            PrefixOnlyDisallowed => ERR_NO_PREFIX_ONLY,
            Ipv4Disallowed => ERR_NO_IPV4,
            Ipv6Disallowed => ERR_NO_IPV6,
            MixedDisallowed => ERR_NO_MIXED,
            BinaryDisallowed => ERR_NO_BINARY,
            HexDisallowed => ERR_NO_HEX,
            MaskDisallowed => ERR_NO_MASK,
            ZoneDisallowed => ERR_NO_ZONE,
            MacFormatDisallowed => ERR_NO_MAC_FORMAT,
            NonSequentialMask => ERR_NON_SEQUENTIAL_MASK,
            InvalidJoinedRange => ERR_JOINED_RANGE,
            NonSequentialBits => ERR_NON_SEQUENTIAL_BITS,
            InvalidRegrouping => ERR_REGROUPING,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        use ErrorKey::*;
        match self {
            InvalidCharacter | EmptySegment | TooManySegments | TooFewSegments
            | TrailingSeparator | MultipleCompression | MixedSeparators | MixedPosition
            | InvalidPort | InvalidService | MissingPort => ErrorKind::Structural,

            TooManyDigits | SegmentTooLarge | LeadingZeros | InvalidDigit | MissingDigits => {
                ErrorKind::Numeric
            }

            WildcardMixed | RangeWithWildcard | MultipleRanges | ReversedRange
            | RangeDigitMismatch => ErrorKind::Range,

            PrefixTooLarge | InvalidPrefix | MaskVersionMismatch | SingleSegmentMask => {
                ErrorKind::Mask
            }

            InvalidZoneCharacter | EmptyZone | ZoneNotIpv6 | InvalidZoneEncoding => {
                ErrorKind::Zone
            }

            NonSequentialMask | InvalidJoinedRange | NonSequentialBits | InvalidRegrouping => {
                ErrorKind::Incompatible
            }

            _ => ErrorKind::Capability,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// the string is not a valid address under the parse options
    Parse {
        key: ErrorKey,
        input: String,
        /// byte offset of the offending character, when there is one
        offset: Option<usize>,
    },
    /// the string is valid but its value cannot be represented
    Incompatible { key: ErrorKey, input: String },
    /// operands belong to different address families
    Mismatch(Family, Family),
}

impl AddressError {
    pub(crate) fn parse(key: ErrorKey, input: &str, offset: Option<usize>) -> Self {
        AddressError::Parse {
            key,
            input: input.to_string(),
            offset,
        }
    }

    pub(crate) fn at(key: ErrorKey, input: &str, offset: usize) -> Self {
        Self::parse(key, input, Some(offset))
    }

    pub(crate) fn incompatible(key: ErrorKey, input: impl Into<String>) -> Self {
        AddressError::Incompatible {
            key,
            input: input.into(),
        }
    }

    /// The message key, if the error has one.
    pub fn key(&self) -> Option<ErrorKey> {
        match self {
            AddressError::Parse { key, .. } | AddressError::Incompatible { key, .. } => Some(*key),
            AddressError::Mismatch(..) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AddressError::Parse { key, .. } | AddressError::Incompatible { key, .. } => key.kind(),
            AddressError::Mismatch(..) => ErrorKind::Incompatible,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            AddressError::Parse { offset, .. } => *offset,
            _ => None,
        }
    }

    pub fn is_incompatible(&self) -> bool {
        self.kind() == ErrorKind::Incompatible
    }
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::Parse {
                key,
                input,
                offset: Some(offset),
            } => {
                write!(f, "{key}: '{input}' at index {offset}")
            }
            AddressError::Parse { key, input, .. } => {
                write!(f, "{key}: '{input}'")
            }
            AddressError::Incompatible { key, input } => {
                write!(f, "{key}: '{input}'")
            }
            AddressError::Mismatch(a, b) => {
                write!(f, "{ERR_MISMATCH}: {a} - {b}")
            }
        }
    }
}

impl error::Error for AddressError {}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_offset() {
        let err = AddressError::at(ErrorKey::InvalidCharacter, "1.2.x.4", 4);
        assert_eq!(err.to_string(), format!("{ERR_INVALID_CHAR}: '1.2.x.4' at index 4"));
        assert_eq!(err.offset(), Some(4));
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ErrorKey::ReversedRange.kind(), ErrorKind::Range);
        assert_eq!(ErrorKey::LeadingZeros.kind(), ErrorKind::Numeric);
        assert_eq!(ErrorKey::EmptyZone.kind(), ErrorKind::Zone);
        assert_eq!(ErrorKey::AllDisallowed.kind(), ErrorKind::Capability);
        assert_eq!(ErrorKey::PrefixTooLarge.kind(), ErrorKind::Mask);
        assert!(AddressError::incompatible(ErrorKey::NonSequentialMask, "x").is_incompatible());
    }

    #[test]
    fn test_mismatch_display() {
        let err = AddressError::Mismatch(Family::Ipv4, Family::Ipv6);
        assert_eq!(err.to_string(), format!("{ERR_MISMATCH}: IPv4 - IPv6"));
        assert_eq!(err.key(), None);
    }
}
