// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::structs::IpFam;
use serde::{Deserialize, Serialize};

/// Which range-like syntax a segment may use.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeOptions {
    /// `*` for a whole segment
    pub wildcard: bool,
    /// `a-b`
    pub range: bool,
    /// `b-a` is accepted and swapped
    pub reverse_range: bool,
    /// `-b`, `a-` and `-`
    pub inferred_boundary: bool,
    /// `_` as a trailing single-digit wildcard
    pub single_wildcard: bool,
}

impl RangeOptions {
    pub const NO_RANGE: RangeOptions = RangeOptions {
        wildcard: false,
        range: false,
        reverse_range: false,
        inferred_boundary: false,
        single_wildcard: false,
    };

    pub const WILDCARD_ONLY: RangeOptions = RangeOptions {
        wildcard: true,
        range: false,
        reverse_range: false,
        inferred_boundary: false,
        single_wildcard: true,
    };

    pub const WILDCARD_AND_RANGE: RangeOptions = RangeOptions {
        wildcard: true,
        range: true,
        reverse_range: true,
        inferred_boundary: true,
        single_wildcard: true,
    };

    /// Whether any multi-valued syntax is allowed at all.
    pub fn allows_any(&self) -> bool {
        self.wildcard || self.range || self.single_wildcard
    }
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self::WILDCARD_AND_RANGE
    }
}

/* ---------------------------------- */

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ipv4Options {
    pub leading_zeros: bool,
    /// digit count is not limited by the segment width (`0000001.2.3.4`)
    pub unlimited_leading_zeros: bool,
    /// `0x` prefixed segments
    pub inet_aton_hex: bool,
    /// a leading `0` marks an octal segment
    pub inet_aton_octal: bool,
    /// fewer than four segments, the last one absorbing the rest (`1.2.3`)
    pub inet_aton_joined: bool,
    /// a bare number after `/` that is too large for a prefix is a mask value
    pub inet_aton_single_segment_mask: bool,
    /// `0b` prefixed segments
    pub binary: bool,
    pub range: RangeOptions,
}

impl Default for Ipv4Options {
    fn default() -> Self {
        Self {
            leading_zeros: true,
            unlimited_leading_zeros: false,
            inet_aton_hex: true,
            inet_aton_octal: false,
            inet_aton_joined: true,
            inet_aton_single_segment_mask: false,
            binary: false,
            range: RangeOptions::default(),
        }
    }
}

impl Ipv4Options {
    /// Four dotted decimal segments, nothing else.
    pub fn strict() -> Self {
        Self {
            leading_zeros: false,
            unlimited_leading_zeros: false,
            inet_aton_hex: false,
            inet_aton_octal: false,
            inet_aton_joined: false,
            inet_aton_single_segment_mask: false,
            binary: false,
            range: RangeOptions::NO_RANGE,
        }
    }

    /// Options for the IPv4 tail of a mixed IPv6 address.
    pub(crate) fn embedded(&self) -> Self {
        Self {
            inet_aton_joined: false,
            inet_aton_single_segment_mask: false,
            ..*self
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ipv6Options {
    pub leading_zeros: bool,
    pub unlimited_leading_zeros: bool,
    /// trailing embedded IPv4 (`::ffff:1.2.3.4`)
    pub mixed: bool,
    pub zone: bool,
    pub binary: bool,
    pub range: RangeOptions,
    /// options for the embedded IPv4 part of a mixed address
    pub embedded_ipv4: Ipv4Options,
}

impl Default for Ipv6Options {
    fn default() -> Self {
        Self {
            leading_zeros: true,
            unlimited_leading_zeros: false,
            mixed: true,
            zone: true,
            binary: false,
            range: RangeOptions::default(),
            embedded_ipv4: Ipv4Options::default().embedded(),
        }
    }
}

impl Ipv6Options {
    pub fn strict() -> Self {
        Self {
            leading_zeros: true,
            unlimited_leading_zeros: false,
            mixed: true,
            zone: true,
            binary: false,
            range: RangeOptions::NO_RANGE,
            embedded_ipv4: Ipv4Options::strict(),
        }
    }
}

/* ---------------------------------- */

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpParseOptions {
    /// `""` parses to an empty result
    pub empty: bool,
    /// `*` parses to all addresses
    pub all: bool,
    /// a whole address written as one run of digits
    pub single_segment: bool,
    /// `/24` without an address
    pub prefix_only: bool,
    /// `/255.255.0.0`
    pub mask: bool,
    /// prefix lengths above the bit count are clamped instead of rejected
    pub prefix_beyond_size: bool,
    /// `None` disallows IPv4
    pub ipv4: Option<Ipv4Options>,
    /// `None` disallows IPv6
    pub ipv6: Option<Ipv6Options>,
    /// version used when the string itself does not decide one
    pub preferred_version: IpFam,
}

impl Default for IpParseOptions {
    fn default() -> Self {
        Self {
            empty: true,
            all: true,
            single_segment: true,
            prefix_only: true,
            mask: true,
            prefix_beyond_size: false,
            ipv4: Some(Ipv4Options::default()),
            ipv6: Some(Ipv6Options::default()),
            preferred_version: IpFam::V6,
        }
    }
}

impl IpParseOptions {
    /// Plain RFC forms only: no ranges, no inet_aton, no single segments.
    pub fn strict() -> Self {
        Self {
            empty: false,
            all: false,
            single_segment: false,
            prefix_only: false,
            mask: true,
            prefix_beyond_size: false,
            ipv4: Some(Ipv4Options::strict()),
            ipv6: Some(Ipv6Options::strict()),
            preferred_version: IpFam::V6,
        }
    }

    pub fn ipv4_only() -> Self {
        Self {
            ipv6: None,
            preferred_version: IpFam::V4,
            ..Self::default()
        }
    }

    pub fn ipv6_only() -> Self {
        Self {
            ipv4: None,
            ..Self::default()
        }
    }

    /// Options for a mask after `/` on an address of version `fam`.
    pub(crate) fn for_mask(&self, fam: IpFam) -> Self {
        let ipv4 = match (fam, self.ipv4) {
            (IpFam::V4, Some(v4)) => Some(Ipv4Options {
                range: RangeOptions::NO_RANGE,
                inet_aton_joined: v4.inet_aton_single_segment_mask,
                ..v4
            }),
            _ => None,
        };
        let ipv6 = match (fam, self.ipv6) {
            (IpFam::V6, Some(v6)) => Some(Ipv6Options {
                range: RangeOptions::NO_RANGE,
                zone: false,
                embedded_ipv4: Ipv4Options {
                    range: RangeOptions::NO_RANGE,
                    ..v6.embedded_ipv4
                },
                ..v6
            }),
            _ => None,
        };
        Self {
            empty: false,
            all: false,
            single_segment: match fam {
                IpFam::V4 => ipv4.is_some_and(|o| o.inet_aton_single_segment_mask),
                IpFam::V6 => self.single_segment,
            },
            prefix_only: false,
            mask: false,
            prefix_beyond_size: false,
            ipv4,
            ipv6,
            preferred_version: fam,
        }
    }

    pub(crate) fn allows(&self, fam: IpFam) -> bool {
        match fam {
            IpFam::V4 => self.ipv4.is_some(),
            IpFam::V6 => self.ipv6.is_some(),
        }
    }
}

/* ---------------------------------- */

/// Accepted MAC address lengths.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MacSize {
    Any,
    /// 6 bytes only
    Mac48,
    /// 8 bytes only
    Eui64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacParseOptions {
    pub empty: bool,
    pub all: bool,
    /// `aabbccddeeff`
    pub single_segment: bool,
    /// `aa-bb-cc-dd-ee-ff` and `aabbcc-ddeeff`
    pub dashed: bool,
    /// `aa:bb:cc:dd:ee:ff`
    pub colon: bool,
    /// `aabb.ccdd.eeff`
    pub dotted: bool,
    /// `aa bb cc dd ee ff`
    pub space: bool,
    pub size: MacSize,
    /// digit count is not limited by the segment width
    pub unlimited_leading_zeros: bool,
    pub binary: bool,
    /// `/n` prefix lengths
    pub prefix: bool,
    pub range: RangeOptions,
}

impl Default for MacParseOptions {
    fn default() -> Self {
        Self {
            empty: true,
            all: true,
            single_segment: true,
            dashed: true,
            colon: true,
            dotted: true,
            space: true,
            size: MacSize::Any,
            unlimited_leading_zeros: false,
            binary: false,
            prefix: true,
            range: RangeOptions::default(),
        }
    }
}

impl MacParseOptions {
    pub(crate) fn allows_count(&self, bytes: usize) -> bool {
        match self.size {
            MacSize::Any => bytes == 6 || bytes == 8,
            MacSize::Mac48 => bytes == 6,
            MacSize::Eui64 => bytes == 8,
        }
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let opts = IpParseOptions::default();
        assert!(opts.allows(IpFam::V4));
        assert!(opts.allows(IpFam::V6));
        assert!(opts.ipv4.unwrap().inet_aton_joined);
        assert!(!opts.ipv6.unwrap().embedded_ipv4.inet_aton_joined);
        assert_eq!(opts.preferred_version, IpFam::V6);
    }

    #[test]
    fn test_mask_options_disallow_ranges() {
        let opts = IpParseOptions::default().for_mask(IpFam::V4);
        assert!(opts.ipv6.is_none());
        assert_eq!(opts.ipv4.unwrap().range, RangeOptions::NO_RANGE);
        assert!(!opts.single_segment);
        assert!(!opts.mask);
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{ "all": false, "ipv4": { "binary": true }, "preferred_version": "V4" }"#;
        let opts: IpParseOptions = serde_json::from_str(json).unwrap();
        assert!(!opts.all);
        assert!(opts.empty);
        let v4 = opts.ipv4.unwrap();
        assert!(v4.binary);
        assert!(v4.leading_zeros);
        assert_eq!(v4.range, RangeOptions::WILDCARD_AND_RANGE);
        assert_eq!(opts.preferred_version, IpFam::V4);
    }

    #[test]
    fn test_mac_sizes() {
        let mut opts = MacParseOptions::default();
        assert!(opts.allows_count(6) && opts.allows_count(8));
        opts.size = MacSize::Mac48;
        assert!(!opts.allows_count(8));
    }
}
