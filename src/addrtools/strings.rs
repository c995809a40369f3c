// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static SLASH: &str = "/";
pub(crate) static PERCENT: &str = "%";
pub(crate) static WILDCARD: &str = "*";
pub(crate) static DASH: &str = "-";
pub(crate) static ARROW: &str = " -> ";

// structural
pub(crate) static ERR_INVALID_CHAR: &str = "invalid character in address";
pub(crate) static ERR_EMPTY_SEGMENT: &str = "address has an empty segment";
pub(crate) static ERR_TOO_MANY_SEGMENTS: &str = "too many segments in address";
pub(crate) static ERR_TOO_FEW_SEGMENTS: &str = "too few segments in address";
pub(crate) static ERR_TRAILING_SEP: &str = "address ends or begins with a lone separator";
pub(crate) static ERR_MULTIPLE_COMPRESSION: &str = "more than one '::' compression in address";
pub(crate) static ERR_MIXED_SEPARATORS: &str = "address mixes different segment separators";
pub(crate) static ERR_MIXED_POSITION: &str = "embedded IPv4 must be at the end of an IPv6 address";
pub(crate) static ERR_INVALID_PORT: &str = "invalid port number";
pub(crate) static ERR_INVALID_SERVICE: &str = "invalid service name";
pub(crate) static ERR_MISSING_PORT: &str = "missing port or service after ':'";

// numeric
pub(crate) static ERR_TOO_MANY_DIGITS: &str = "segment has too many digits";
pub(crate) static ERR_SEGMENT_TOO_LARGE: &str = "segment value exceeds the maximum for the address";
pub(crate) static ERR_LEADING_ZEROS: &str = "leading zeros are not allowed";
pub(crate) static ERR_INVALID_DIGIT: &str = "invalid digit for segment radix";
pub(crate) static ERR_MISSING_DIGITS: &str = "radix prefix is not followed by digits";

// range
pub(crate) static ERR_WILDCARD_MIXED: &str = "wildcard mixed with other characters in a segment";
pub(crate) static ERR_RANGE_WILDCARD: &str = "range cannot have a wildcarded side";
pub(crate) static ERR_MULTIPLE_RANGES: &str = "segment has more than one range separator";
pub(crate) static ERR_REVERSED_RANGE: &str = "range lower bound exceeds upper bound";
pub(crate) static ERR_RANGE_DIGITS: &str = "range bounds have mismatched digit counts";

// mask and prefix
pub(crate) static ERR_PREFIX_TOO_LARGE: &str = "prefix length exceeds the address bit count";
pub(crate) static ERR_INVALID_PREFIX: &str = "invalid prefix length";
pub(crate) static ERR_MASK_VERSION: &str = "mask version does not match the address version";
pub(crate) static ERR_SINGLE_SEGMENT_MASK: &str = "single-segment mask is not allowed";

// zone
pub(crate) static ERR_INVALID_ZONE: &str = "invalid character in zone";
pub(crate) static ERR_EMPTY_ZONE: &str = "zone is empty";
pub(crate) static ERR_ZONE_NOT_IPV6: &str = "only IPv6 addresses may have a zone";
pub(crate) static ERR_ZONE_ENCODING: &str = "invalid percent-encoding in zone";

// capability
pub(crate) static ERR_NO_WILDCARD: &str = "wildcards are not allowed";
pub(crate) static ERR_NO_SINGLE_WILDCARD: &str = "single-digit wildcards are not allowed";
pub(crate) static ERR_NO_RANGE: &str = "ranges are not allowed";
pub(crate) static ERR_NO_INFERRED: &str = "ranges with an omitted bound are not allowed";
pub(crate) static ERR_NO_SINGLE_SEGMENT: &str = "single-segment addresses are not allowed";
pub(crate) static ERR_NO_EMPTY: &str = "empty address is not allowed";
pub(crate) static ERR_NO_ALL: &str = "all-address wildcard is not allowed";
pub(crate) static ERR_NO_PREFIX_ONLY: &str = "prefix length without an address is not allowed";
pub(crate) static ERR_NO_IPV4: &str = "IPv4 addresses are not allowed";
pub(crate) static ERR_NO_IPV6: &str = "IPv6 addresses are not allowed";
pub(crate) static ERR_NO_MIXED: &str = "mixed IPv6/IPv4 addresses are not allowed";
pub(crate) static ERR_NO_BINARY: &str = "binary segments are not allowed";
pub(crate) static ERR_NO_HEX: &str = "hexadecimal segments are not allowed";
pub(crate) static ERR_NO_MASK: &str = "masks are not allowed";
pub(crate) static ERR_NO_ZONE: &str = "zones are not allowed";
pub(crate) static ERR_NO_MAC_FORMAT: &str = "MAC address format is not allowed";

// incompatible
pub(crate) static ERR_NON_SEQUENTIAL_MASK: &str = "mask applied to range yields a non-sequential range";
pub(crate) static ERR_JOINED_RANGE: &str = "range cannot be split into segment ranges";
pub(crate) static ERR_NON_SEQUENTIAL_BITS: &str = "bit reversal of range is not a range";
pub(crate) static ERR_REGROUPING: &str = "range cannot be regrouped into the target segments";

pub(crate) static ERR_MISMATCH: &str = "cannot combine addresses of different families";
