// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    builder::{self, BuiltAddress},
    options::{IpParseOptions, MacParseOptions, MacSize},
    qualifier::{parse_port_or_service, Qualifier},
    scanner::{scan_range, ScanTarget, ScannedAddress, Shape},
    structs::{max_for_bits, wide_max, Address, Family, IpFam, SegInt, Section},
    AddressError, ErrorKey,
};
use once_cell::sync::OnceCell;
use tracing::trace;

/// What an address string turned out to hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParsedKind {
    /// `""`
    Empty,
    /// `*`, every address of whichever version is asked for
    All,
    /// `/24`, a prefix length without an address
    PrefixOnly,
    Address,
}

/**
Result of parsing an IP address string.

The address itself is built on first use. For `*` and bare prefix lengths
the string does not decide the IP version, so the address is produced for
the preferred version of the parse options, or any version through
[ParsedIpAddress::address_for].
*/
#[derive(Debug)]
pub struct ParsedIpAddress {
    input: String,
    start: usize,
    end: usize,
    options: IpParseOptions,
    scanned: ScannedAddress,
    built: OnceCell<(Result<Address, AddressError>, Result<Address, AddressError>)>,
    ipv4: OnceCell<Result<Address, AddressError>>,
    ipv6: OnceCell<Result<Address, AddressError>>,
}

/// Parse an IP address string; the address is built when first asked for.
pub fn parse_ip(input: &str, options: &IpParseOptions) -> Result<ParsedIpAddress, AddressError> {
    parse_ip_in(input, 0, input.len(), options)
}

fn parse_ip_in(
    input: &str,
    start: usize,
    end: usize,
    options: &IpParseOptions,
) -> Result<ParsedIpAddress, AddressError> {
    let scanned = scan_range(input, start, end, ScanTarget::Ip(options)).map_err(|err| {
        trace!(input, %err, "IP address rejected");
        err
    })?;
    trace!(input, shape = ?scanned.shape, "IP address scanned");
    Ok(ParsedIpAddress {
        input: input.to_string(),
        start,
        end,
        options: options.clone(),
        scanned,
        built: OnceCell::new(),
        ipv4: OnceCell::new(),
        ipv6: OnceCell::new(),
    })
}

/// Parse an IP address with the default (permissive) options.
pub fn parse_ip_address(input: &str) -> Result<Address, AddressError> {
    parse_ip_address_with(input, &IpParseOptions::default())
}

/// Parse an IP address; an empty string, having no address, is an error.
pub fn parse_ip_address_with(input: &str, options: &IpParseOptions) -> Result<Address, AddressError> {
    parse_ip(input, options)?
        .address()?
        .ok_or_else(|| AddressError::parse(ErrorKey::EmptyDisallowed, input, None))
}

impl ParsedIpAddress {
    pub fn kind(&self) -> ParsedKind {
        match self.scanned.shape {
            Shape::Empty => ParsedKind::Empty,
            Shape::All => ParsedKind::All,
            Shape::PrefixOnly => ParsedKind::PrefixOnly,
            _ => ParsedKind::Address,
        }
    }

    pub fn qualifier(&self) -> &Qualifier {
        &self.scanned.qualifier
    }

    /// The version written in the string, `None` when the string does not decide one.
    pub fn version(&self) -> Option<IpFam> {
        self.scanned.family.and_then(|f| f.ip_fam())
    }

    fn text(&self) -> &str {
        &self.input[self.start..self.end]
    }

    fn built(&self) -> &(Result<Address, AddressError>, Result<Address, AddressError>) {
        self.built.get_or_init(|| {
            let BuiltAddress { address, host } = builder::build(&self.scanned, &self.input);
            let canonical = builder::is_canonical_text(&self.scanned);
            let wrap = |section: Result<Section, AddressError>| {
                section.map(|s| {
                    let addr = Address::with_zone(s, self.scanned.qualifier.zone().cloned());
                    if canonical {
                        addr.with_canonical(self.text())
                    } else {
                        addr
                    }
                })
            };
            (wrap(address), wrap(host))
        })
    }

    /// Version used for `*` and bare prefixes.
    fn default_version(&self) -> IpFam {
        let preferred = self.options.preferred_version;
        let fits_v4 = self
            .scanned
            .qualifier
            .prefix_length()
            .map_or(true, |p| p <= IpFam::V4.bit_count());
        match preferred {
            IpFam::V4 if fits_v4 && self.options.allows(IpFam::V4) => IpFam::V4,
            IpFam::V6 if !self.options.allows(IpFam::V6) && fits_v4 => IpFam::V4,
            _ => IpFam::V6,
        }
    }

    /**
    The address, masked by any mask in the string and expanded to the prefix
    block when its host bits are zero.

    `Ok(None)` for the empty string. A range that a mask turns into a
    non-sequential set fails with an [ErrorKind::Incompatible] error; the
    [ParsedIpAddress::host_address] is still available then.

    [ErrorKind::Incompatible]: super::ErrorKind::Incompatible
    */
    pub fn address(&self) -> Result<Option<Address>, AddressError> {
        match self.kind() {
            ParsedKind::Empty => Ok(None),
            ParsedKind::Address => self.built().0.clone().map(Some),
            ParsedKind::All | ParsedKind::PrefixOnly => self.address_for(self.default_version()),
        }
    }

    /// The address for IP version `fam`: `None` when the string holds the other version.
    pub fn address_for(&self, fam: IpFam) -> Result<Option<Address>, AddressError> {
        match self.kind() {
            ParsedKind::Empty => Ok(None),
            ParsedKind::Address => match self.version() == Some(fam) {
                true => self.address(),
                false => Ok(None),
            },
            ParsedKind::All | ParsedKind::PrefixOnly => {
                let cell = match fam {
                    IpFam::V4 => &self.ipv4,
                    IpFam::V6 => &self.ipv6,
                };
                cell.get_or_init(|| self.provide(fam)).clone().map(Some)
            }
        }
    }

    /// The written address values with the prefix length, never masked.
    pub fn host_address(&self) -> Result<Option<Address>, AddressError> {
        match self.kind() {
            ParsedKind::Address => self.built().1.clone().map(Some),
            _ => self.address(),
        }
    }

    /// Address of a string that does not decide its own version.
    fn provide(&self, fam: IpFam) -> Result<Address, AddressError> {
        if !self.options.allows(fam) {
            let key = match fam {
                IpFam::V4 => ErrorKey::Ipv4Disallowed,
                IpFam::V6 => ErrorKey::Ipv6Disallowed,
            };
            return Err(AddressError::parse(key, self.text(), None));
        }
        let family = fam.family();
        let prefix = self.scanned.qualifier.prefix_length();
        if prefix.is_some_and(|p| p > family.bit_count()) {
            return Err(AddressError::parse(ErrorKey::PrefixTooLarge, self.text(), None));
        }
        let section = match self.kind() {
            ParsedKind::PrefixOnly => {
                let bits = u32::from(family.bit_count());
                let host = u32::from(prefix.unwrap_or(family.bit_count()));
                let mask = wide_max(bits) ^ wide_max(bits - host);
                Section::from_values(family, mask, mask, prefix)?
            }
            _ => all_section(family, prefix),
        };
        trace!(input = self.text(), %family, "address provided");
        Ok(Address::new(section))
    }
}

/// Every address of `family`.
fn all_section(family: Family, prefix: Option<u8>) -> Section {
    let max: SegInt = max_for_bits(family.segment_bits());
    let ranges: Vec<(SegInt, SegInt)> = vec![(0, max); family.segment_count()];
    Section::from_ranges(family, &ranges, prefix)
}

/* ---------------------------------- */

/// Result of parsing a MAC address string.
#[derive(Clone, Debug)]
pub struct ParsedMacAddress {
    kind: ParsedKind,
    address: Option<Address>,
    qualifier: Qualifier,
}

impl ParsedMacAddress {
    pub fn kind(&self) -> ParsedKind {
        self.kind
    }

    /// `None` for the empty string.
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }
}

pub fn parse_mac(input: &str, options: &MacParseOptions) -> Result<ParsedMacAddress, AddressError> {
    let scanned = scan_range(input, 0, input.len(), ScanTarget::Mac(options)).map_err(|err| {
        trace!(input, %err, "MAC address rejected");
        err
    })?;
    let prefix = scanned.qualifier.prefix_length();
    let (kind, address) = match scanned.shape {
        Shape::Empty => (ParsedKind::Empty, None),
        Shape::All => {
            let family = match options.size {
                MacSize::Eui64 => Family::Eui64,
                _ => Family::Mac,
            };
            (ParsedKind::All, Some(Address::new(all_section(family, prefix))))
        }
        _ => {
            let section = builder::build(&scanned, input).address?;
            let mut address = Address::new(section);
            if builder::is_canonical_text(&scanned) {
                address = address.with_canonical(input);
            }
            (ParsedKind::Address, Some(address))
        }
    };
    trace!(input, ?kind, "MAC address parsed");
    Ok(ParsedMacAddress {
        kind,
        address,
        qualifier: scanned.qualifier,
    })
}

pub fn parse_mac_address(input: &str) -> Result<Address, AddressError> {
    parse_mac_address_with(input, &MacParseOptions::default())
}

pub fn parse_mac_address_with(input: &str, options: &MacParseOptions) -> Result<Address, AddressError> {
    parse_mac(input, options)?
        .address
        .ok_or_else(|| AddressError::parse(ErrorKey::EmptyDisallowed, input, None))
}

/* ---------------------------------- */

/// An IP address with an optional port or service name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    address: Address,
    qualifier: Qualifier,
}

impl Endpoint {
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn port(&self) -> Option<u16> {
        self.qualifier.port()
    }

    pub fn service(&self) -> Option<&str> {
        self.qualifier.service()
    }

    /// Prefix, mask and zone of the address, with the port or service.
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }
}

/**
Parse `[ipv6]:port`, `ipv4:port`, `[ipv6]:service` or a plain address.

Without brackets a single `:` separates the port; more colons make the whole
string an IPv6 address.
*/
pub fn parse_endpoint(input: &str, options: &IpParseOptions) -> Result<Endpoint, AddressError> {
    let (start, end, port_at) = if let Some(rest) = input.strip_prefix('[') {
        let close = rest
            .find(']')
            .map(|p| p + 1)
            .ok_or_else(|| AddressError::at(ErrorKey::InvalidCharacter, input, 0))?;
        match &input[close + 1..] {
            "" => (1, close, None),
            tail if tail.starts_with(':') => (1, close, Some(close + 2)),
            _ => return Err(AddressError::at(ErrorKey::InvalidCharacter, input, close + 1)),
        }
    } else {
        match input.match_indices(':').count() {
            1 => {
                let colon = input.find(':').unwrap_or(input.len());
                (0, colon, Some(colon + 1))
            }
            _ => (0, input.len(), None),
        }
    };

    let parsed = parse_ip_in(input, start, end, options)?;
    let address = parsed
        .address()?
        .ok_or_else(|| AddressError::at(ErrorKey::EmptyDisallowed, input, start))?;
    let mut qualifier = parsed.qualifier().clone();
    if let Some(at) = port_at {
        let (port, service) = parse_port_or_service(input, at)?;
        qualifier.set_endpoint(port, service);
    }
    trace!(input, port = ?qualifier.port(), service = ?qualifier.service(), "endpoint parsed");
    Ok(Endpoint { address, qualifier })
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addrtools::{ErrorKind, Ipv4Options, RangeOptions};

    const TST_V4: &str = "1.2.3.4";
    const TST_V4_RANGE: &str = "1.2.3.4-10";
    const TST_V6: &str = "1::2";
    const TST_WILDCARD: &str = "1.2.*.4";
    const TST_BAD_MASK: &str = "1.2.3.4-20/255.255.255.240";
    const TST_MAC: &str = "010203040506";

    fn bounds(a: &Address) -> Vec<(SegInt, SegInt)> {
        a.segments().iter().map(|s| (s.lower(), s.upper())).collect()
    }

    #[test]
    fn test_plain_ipv4() {
        let a = parse_ip_address(TST_V4).unwrap();
        assert_eq!(bounds(&a), vec![(1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(a.prefix_length(), None);
        assert!(!a.is_multiple());
        assert_eq!(a.to_string(), TST_V4);
    }

    #[test]
    fn test_ipv4_range() {
        let a = parse_ip_address(TST_V4_RANGE).unwrap();
        assert_eq!(bounds(&a)[3], (4, 10));
        let multiple: Vec<bool> = a.segments().iter().map(|s| s.is_multiple()).collect();
        assert_eq!(multiple, vec![false, false, false, true]);
        assert_eq!(a.count(), 7);
    }

    #[test]
    fn test_ipv6_compression() {
        let a = parse_ip_address(TST_V6).unwrap();
        let lowers: Vec<SegInt> = a.segments().iter().map(|s| s.lower()).collect();
        assert_eq!(lowers, vec![1, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(a.to_string(), TST_V6);
    }

    #[test]
    fn test_wildcard_segment() {
        let a = parse_ip_address(TST_WILDCARD).unwrap();
        assert_eq!(bounds(&a)[2], (0, 255));
    }

    #[test]
    fn test_mask_producing_error() {
        let parsed = parse_ip(TST_BAD_MASK, &IpParseOptions::default()).unwrap();
        let err = parsed.address().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Incompatible);
        assert_eq!(err.key(), Some(ErrorKey::NonSequentialMask));
        let host = parsed.host_address().unwrap().unwrap();
        assert_eq!(bounds(&host)[3], (4, 20));
        assert!(parse_ip_address(TST_BAD_MASK).unwrap_err().is_incompatible());
    }

    #[test]
    fn test_single_segment_mac() {
        let a = parse_mac_address(TST_MAC).unwrap();
        let lowers: Vec<SegInt> = a.segments().iter().map(|s| s.lower()).collect();
        assert_eq!(lowers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(a.family(), Family::Mac);
        assert_eq!(a.to_string(), "01:02:03:04:05:06");
    }

    #[test]
    fn test_reversed_range() {
        let a = parse_ip_address("1.2.3.10-1").unwrap();
        let b = parse_ip_address("1.2.3.1-10").unwrap();
        assert_eq!(a, b);
        let opts = IpParseOptions {
            ipv4: Some(Ipv4Options {
                range: RangeOptions {
                    reverse_range: false,
                    ..RangeOptions::default()
                },
                ..Ipv4Options::default()
            }),
            ..IpParseOptions::default()
        };
        let err = parse_ip_address_with("1.2.3.10-1", &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_canonical_seeded_and_computed() {
        assert_eq!(parse_ip_address("1.2.*.4-10").unwrap().canonical(), "1.2.*.4-10");
        let alt = parse_ip_address("1.2.3.4»10").unwrap();
        assert_eq!(alt, parse_ip_address("1.2.3.4-10").unwrap());
        assert_eq!(alt.canonical(), "1.2.3.4-10");
        assert_eq!(parse_ip_address("001.2.3.4").unwrap().canonical(), "1.2.3.4");
        assert_eq!(parse_ip_address("1.*").unwrap().canonical(), "1.*.*.*");
        assert_eq!(parse_ip_address("1:0:0:0:0:0:0:2").unwrap().canonical(), TST_V6);
        assert_eq!(parse_ip_address("1.2.0.0/16").unwrap().canonical(), "1.2.0.0/16");
    }

    #[test]
    fn test_prefix_and_mask() {
        let a = parse_ip_address("1.2.3.4/255.255.0.0").unwrap();
        assert_eq!(a.prefix_length(), Some(16));
        assert!(a.is_prefix_block());
        let parsed = parse_ip("1.2.3.4/255.255.0.0", &IpParseOptions::default()).unwrap();
        assert_eq!(parsed.host_address().unwrap().unwrap().lower_value(), 0x0102_0304);
        assert!(parsed.qualifier().mask().is_some());
    }

    #[test]
    fn test_empty_and_all() {
        let parsed = parse_ip("", &IpParseOptions::default()).unwrap();
        assert_eq!(parsed.kind(), ParsedKind::Empty);
        assert_eq!(parsed.address().unwrap(), None);
        assert!(parse_ip_address("").is_err());

        let parsed = parse_ip("*", &IpParseOptions::default()).unwrap();
        assert_eq!(parsed.kind(), ParsedKind::All);
        let v6 = parsed.address().unwrap().unwrap();
        assert_eq!(v6.family(), Family::Ipv6);
        assert_eq!(v6.count(), u128::MAX);
        let v4 = parsed.address_for(IpFam::V4).unwrap().unwrap();
        assert_eq!(v4.to_string(), "*.*.*.*");
        assert_eq!(v4.count(), 1 << 32);

        // a prefixed `*` is already every address, shown as its network portion
        let block = parse_ip_address("*/24").unwrap();
        assert_eq!(block.family(), Family::Ipv6);
        assert!(block.is_prefix_block());
        assert_eq!((block.lower_value(), block.upper_value()), (0, u128::MAX));
        assert_eq!(block.canonical(), "*:0-ff00::/24");
        assert_eq!(parse_ip_address(block.canonical()).unwrap(), block);
        assert_eq!(block.to_prefix_block(24), block);
    }

    #[test]
    fn test_prefix_only() {
        let parsed = parse_ip("/24", &IpParseOptions::ipv4_only()).unwrap();
        assert_eq!(parsed.kind(), ParsedKind::PrefixOnly);
        let mask = parsed.address().unwrap().unwrap();
        assert_eq!(mask.lower_value(), 0xffff_ff00);
        assert_eq!(mask.prefix_length(), Some(24));

        let parsed = parse_ip("/64", &IpParseOptions::default()).unwrap();
        let mask = parsed.address().unwrap().unwrap();
        assert_eq!(mask.family(), Family::Ipv6);
        assert_eq!(mask.upper_value(), u128::MAX << 64);
        assert!(parsed.address_for(IpFam::V4).unwrap_err().key() == Some(ErrorKey::PrefixTooLarge));
    }

    #[test]
    fn test_address_for_other_version() {
        let parsed = parse_ip(TST_V4, &IpParseOptions::default()).unwrap();
        assert_eq!(parsed.version(), Some(IpFam::V4));
        assert!(parsed.address_for(IpFam::V6).unwrap().is_none());
        assert!(parsed.address_for(IpFam::V4).unwrap().is_some());
    }

    #[test]
    fn test_zone() {
        let a = parse_ip_address("fe80::1%eth0").unwrap();
        assert_eq!(a.zone().map(|z| z.as_str()), Some("eth0"));
        assert_eq!(a.to_string(), "fe80::1%eth0");
        assert_ne!(a, parse_ip_address("fe80::1").unwrap());
    }

    #[test]
    fn test_mac_forms() {
        for s in ["01:02:03:04:05:06", "01-02-03-04-05-06", "0102.0304.0506", "010203-040506"] {
            assert_eq!(parse_mac_address(s).unwrap().to_string(), "01:02:03:04:05:06", "{s}");
        }
        let a = parse_mac_address("01:02:03:04:05:06:07:08").unwrap();
        assert_eq!(a.family(), Family::Eui64);
        let parsed = parse_mac("", &MacParseOptions::default()).unwrap();
        assert_eq!(parsed.kind(), ParsedKind::Empty);
        assert!(parsed.address().is_none());
        let all = parse_mac("*", &MacParseOptions::default()).unwrap();
        assert_eq!(all.address().map(|a| a.count()), Some(1 << 48));
    }

    #[test]
    fn test_endpoints() {
        let opts = IpParseOptions::default();
        let e = parse_endpoint("[::1]:8080", &opts).unwrap();
        assert_eq!(e.address().to_string(), "::1");
        assert_eq!(e.port(), Some(8080));
        let e = parse_endpoint("1.2.3.4:http", &opts).unwrap();
        assert_eq!(e.service(), Some("http"));
        assert_eq!(e.port(), None);
        let e = parse_endpoint("1::2", &opts).unwrap();
        assert_eq!(e.port(), None);
        let e = parse_endpoint("[fe80::1%eth0]", &opts).unwrap();
        assert_eq!(e.address().zone().map(|z| z.as_str()), Some("eth0"));

        let err = parse_endpoint("[::1]:0", &opts).unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::InvalidPort));
        let err = parse_endpoint("[::1]x", &opts).unwrap_err();
        assert_eq!(err.offset(), Some(5));
        let err = parse_endpoint("[::1", &opts).unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::InvalidCharacter));
        let err = parse_endpoint("[1::x]:80", &opts).unwrap_err();
        assert_eq!(err.offset(), Some(4));
        let err = parse_endpoint("1.2.3.4:-http", &opts).unwrap_err();
        assert_eq!(err.key(), Some(ErrorKey::InvalidService));
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.offset(), Some(8));
    }
}
