// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    builder,
    chars::{hex_value, is_reserved_zone_byte},
    options::IpParseOptions,
    scanner::{scan_range, ScanTarget},
    strings::*,
    structs::{Address, Family, IpFam, Section},
    AddressError, ErrorKey, MAX_SERVICE_LEN,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    // letters, digits and single inner hyphens
    static ref SERVICE_NAME: Option<Regex> = Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$").ok();
}

/// IPv6 scope identifier, stored decoded.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Zone(String);

impl Zone {
    /// Zone from raw (not percent-encoded) text.
    pub fn new(text: &str) -> Result<Zone, AddressError> {
        if text.is_empty() {
            return Err(AddressError::parse(ErrorKey::EmptyZone, text, None));
        }
        if let Some(i) = text.bytes().position(is_reserved_zone_byte) {
            return Err(AddressError::at(ErrorKey::InvalidZoneCharacter, text, i));
        }
        Ok(Zone(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `%zone`, escaped so that parsing it back gives the same zone.
    pub(crate) fn write_escaped(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > 2 && self.0.starts_with("25") {
            write!(f, "{PERCENT}25{}", self.0)
        } else {
            write!(f, "{PERCENT}{}", self.0)
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Zone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/* ---------------------------------- */

/// Trailing metadata of an address string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Qualifier {
    prefix: Option<u8>,
    mask: Option<Address>,
    zone: Option<Zone>,
    port: Option<u16>,
    service: Option<String>,
}

impl Qualifier {
    /// Prefix length, written or implied by a CIDR mask.
    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix
    }

    pub fn mask(&self) -> Option<&Address> {
        self.mask.as_ref()
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == Qualifier::default()
    }

    pub(crate) fn set_endpoint(&mut self, port: Option<u16>, service: Option<String>) {
        self.port = port;
        self.service = service;
    }
}

/* ---------------------------------- */

/**
Resolve `input[start..end]`, which begins with `/` or `%`.

`family` is the family of the address text before the qualifier, `None`
when there is none (a bare `/24`).
*/
pub(crate) fn parse_qualifier(
    input: &str,
    start: usize,
    end: usize,
    family: Option<Family>,
    target: &ScanTarget<'_>,
) -> Result<Qualifier, AddressError> {
    let bytes = input.as_bytes();
    let mut q = Qualifier::default();
    let mut i = start;

    let opts: &IpParseOptions = match target {
        ScanTarget::Mask(..) => return Err(AddressError::at(ErrorKey::InvalidCharacter, input, start)),
        ScanTarget::Mac(mac) => {
            if bytes[i] == b'%' {
                return Err(AddressError::at(ErrorKey::ZoneNotIpv6, input, i));
            }
            if !mac.prefix {
                return Err(AddressError::at(ErrorKey::InvalidCharacter, input, i));
            }
            let bits = family.map_or(Family::Eui64.bit_count(), |f| f.bit_count());
            q.prefix = Some(parse_prefix_digits(input, i + 1, end, bits, false)?);
            return Ok(q);
        }
        ScanTarget::Ip(opts) => opts,
    };

    if bytes[i] == b'%' {
        if family != Some(Family::Ipv6) {
            return Err(AddressError::at(ErrorKey::ZoneNotIpv6, input, i));
        }
        if !opts.ipv6.is_some_and(|o| o.zone) {
            return Err(AddressError::at(ErrorKey::ZoneDisallowed, input, i));
        }
        let zone_end = input[i + 1..end].find(SLASH).map_or(end, |p| i + 1 + p);
        q.zone = Some(parse_zone(input, i + 1, zone_end)?);
        i = zone_end;
    }
    if i >= end {
        return Ok(q);
    }

    // bytes[i] == b'/'
    let text_start = i + 1;
    let text = &input[text_start..end];
    if text.is_empty() {
        return Err(AddressError::at(ErrorKey::InvalidPrefix, input, text_start));
    }
    if text.bytes().all(|c| c.is_ascii_digit()) {
        let bits = family.map_or(IpFam::V6.bit_count(), |f| f.bit_count());
        let single_mask = family == Some(Family::Ipv4)
            && opts.ipv4.is_some_and(|o| o.inet_aton_single_segment_mask);
        if text.len() > 3 && !single_mask {
            return Err(AddressError::at(ErrorKey::PrefixTooLarge, input, text_start));
        }
        let value = parse_decimal(input, text_start, end)?;
        if text.len() <= 3 && value <= u128::from(bits) {
            q.prefix = Some(value as u8);
        } else if single_mask {
            q.mask = Some(single_segment_mask(input, text_start, value)?);
            q.prefix = cidr_prefix(q.mask.as_ref());
        } else if text.len() <= 3 && opts.prefix_beyond_size {
            q.prefix = Some(bits);
        } else {
            return Err(AddressError::at(ErrorKey::PrefixTooLarge, input, text_start));
        }
        return Ok(q);
    }

    let Some(fam) = family.and_then(|f| f.ip_fam()) else {
        return Err(AddressError::at(ErrorKey::InvalidPrefix, input, text_start));
    };
    if !opts.mask {
        return Err(AddressError::at(ErrorKey::MaskDisallowed, input, text_start));
    }
    let mask = parse_mask(input, text_start, end, fam, opts)?;
    q.prefix = cidr_prefix(Some(&mask));
    q.mask = Some(mask);
    Ok(q)
}

/// Decimal prefix length of at most three digits in `input[start..end]`, clamped to `bits` when `clamp`.
fn parse_prefix_digits(input: &str, start: usize, end: usize, bits: u8, clamp: bool) -> Result<u8, AddressError> {
    let text = &input[start..end];
    if text.is_empty() || !text.bytes().all(|c| c.is_ascii_digit()) {
        return Err(AddressError::at(ErrorKey::InvalidPrefix, input, start));
    }
    if text.len() > 3 {
        return Err(AddressError::at(ErrorKey::PrefixTooLarge, input, start));
    }
    let value: u16 = text
        .parse()
        .map_err(|_| AddressError::at(ErrorKey::InvalidPrefix, input, start))?;
    match value {
        v if v <= u16::from(bits) => Ok(v as u8),
        _ if clamp => Ok(bits),
        _ => Err(AddressError::at(ErrorKey::PrefixTooLarge, input, start)),
    }
}

fn parse_decimal(input: &str, start: usize, end: usize) -> Result<u128, AddressError> {
    input[start..end]
        .parse::<u128>()
        .map_err(|_| AddressError::at(ErrorKey::SegmentTooLarge, input, start))
}

/// IPv4 mask written as one decimal number.
fn single_segment_mask(input: &str, start: usize, value: u128) -> Result<Address, AddressError> {
    if value > u128::from(u32::MAX) {
        return Err(AddressError::at(ErrorKey::SegmentTooLarge, input, start));
    }
    Ok(Address::new(Section::from_values(Family::Ipv4, value, value, None)?))
}

/// Full mask address after `/`, scanned with range-free options of the address version.
fn parse_mask(
    input: &str,
    start: usize,
    end: usize,
    fam: IpFam,
    opts: &IpParseOptions,
) -> Result<Address, AddressError> {
    let mask_opts = opts.for_mask(fam);
    let scanned = scan_range(input, start, end, ScanTarget::Mask(&mask_opts, fam))?;
    // range-free options leave every mask a single value
    let section = builder::build(&scanned, input).host?;
    Ok(Address::new(section))
}

/// Prefix length equivalent to a CIDR mask, `None` for other masks.
pub(crate) fn cidr_prefix(mask: Option<&Address>) -> Option<u8> {
    let mask = mask?;
    let bits = u32::from(mask.section().bit_count());
    let value: u128 = mask.lower_value() << (128 - bits);
    let ones = value.leading_ones();
    let expected: u128 = value.checked_shl(ones).unwrap_or(0);
    (expected == 0).then_some(ones as u8)
}

/// Zone in `input[start..end]`; `25` followed by more text is percent-encoded.
pub(crate) fn parse_zone(input: &str, start: usize, end: usize) -> Result<Zone, AddressError> {
    let text = &input[start..end];
    if text.is_empty() {
        return Err(AddressError::at(ErrorKey::EmptyZone, input, start));
    }
    if text.len() > 2 && text.starts_with("25") {
        return decode_zone(input, start + 2, end);
    }
    if let Some(p) = text.bytes().position(is_reserved_zone_byte) {
        return Err(AddressError::at(ErrorKey::InvalidZoneCharacter, input, start + p));
    }
    Ok(Zone(text.to_string()))
}

fn decode_zone(input: &str, start: usize, end: usize) -> Result<Zone, AddressError> {
    let bytes = &input.as_bytes()[start..end];
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value);
            let lo = bytes.get(i + 2).copied().and_then(hex_value);
            let (Some(hi), Some(lo)) = (hi, lo) else {
                return Err(AddressError::at(ErrorKey::InvalidZoneEncoding, input, start + i));
            };
            let decoded = (hi << 4 | lo) as u8;
            if is_reserved_zone_byte(decoded) {
                return Err(AddressError::at(ErrorKey::InvalidZoneCharacter, input, start + i));
            }
            out.push(decoded);
            i += 3;
            continue;
        }
        if is_reserved_zone_byte(c) {
            return Err(AddressError::at(ErrorKey::InvalidZoneCharacter, input, start + i));
        }
        out.push(c);
        i += 1;
    }
    String::from_utf8(out)
        .map(Zone)
        .map_err(|_| AddressError::at(ErrorKey::InvalidZoneEncoding, input, start))
}

/// Port (1-65535) or service name in `input[start..]`.
pub(crate) fn parse_port_or_service(
    input: &str,
    start: usize,
) -> Result<(Option<u16>, Option<String>), AddressError> {
    let text = &input[start..];
    if text.is_empty() {
        return Err(AddressError::at(ErrorKey::MissingPort, input, start));
    }
    if text.bytes().all(|c| c.is_ascii_digit()) {
        return match text.parse::<u16>() {
            Ok(port) if port > 0 => Ok((Some(port), None)),
            _ => Err(AddressError::at(ErrorKey::InvalidPort, input, start)),
        };
    }
    let valid = text.len() <= MAX_SERVICE_LEN
        && text.bytes().any(|c| c.is_ascii_alphabetic())
        && SERVICE_NAME.as_ref().is_some_and(|re| re.is_match(text));
    if !valid {
        return Err(AddressError::at(ErrorKey::InvalidService, input, start));
    }
    Ok((None, Some(text.to_string())))
}

/* -------------------------------------------------------------------------- */
