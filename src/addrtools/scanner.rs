// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Single forward pass over an address string.

The scanner writes one [SegmentSlot] per segment into a [ParseBuffer] and
hands the trailing `/...` or `%...` text to qualifier resolution. The first
separator decides the family; a string without separators is classified at
the end as a single-segment address.
*/

use super::{
    buffer::{ParseBuffer, SegmentSlot, SlotFlags},
    chars::{self, digit_count, digit_value, is, is_alt_range, is_radix_marker},
    options::{IpParseOptions, Ipv4Options, Ipv6Options, MacParseOptions, MacSize, RangeOptions},
    qualifier::{parse_qualifier, Qualifier},
    structs::{wide_max, Family, IpFam},
    AddressError, ErrorKey, IPV4_BITS, IPV4_SEGMENT_BITS, IPV4_SEGMENT_COUNT, IPV6_BITS,
    IPV6_SEGMENT_BITS, IPV6_SEGMENT_COUNT, MAC_SEGMENT_BITS,
};
use tracing::trace;

/// What the string is expected to be.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ScanTarget<'a> {
    Ip(&'a IpParseOptions),
    Mac(&'a MacParseOptions),
    /// mask after `/` on an address of the given version
    Mask(&'a IpParseOptions, IpFam),
}

impl<'a> ScanTarget<'a> {
    fn ip_options(&self) -> Option<&'a IpParseOptions> {
        match *self {
            ScanTarget::Ip(opts) | ScanTarget::Mask(opts, _) => Some(opts),
            ScanTarget::Mac(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Shape {
    Empty,
    All,
    PrefixOnly,
    Ipv4,
    Ipv6,
    Mac,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MacFormat {
    /// `aa:bb:cc:dd:ee:ff`
    Colon,
    /// `aa-bb-cc-dd-ee-ff`
    Dash,
    /// `aabb.ccdd.eeff`
    Dot,
    /// `aa bb cc dd ee ff`
    Space,
    /// `aabbcc-ddeeff`
    DoubleDash,
    /// `aabbccddeeff`
    Single,
}

impl MacFormat {
    fn segment_bits(&self) -> u32 {
        match self {
            MacFormat::Colon | MacFormat::Dash | MacFormat::Space => u32::from(MAC_SEGMENT_BITS),
            MacFormat::Dot => 16,
            MacFormat::DoubleDash => 24,
            MacFormat::Single => 64,
        }
    }

    fn max_segments(&self) -> usize {
        match self {
            MacFormat::Colon | MacFormat::Dash | MacFormat::Space => 8,
            MacFormat::Dot => 4,
            MacFormat::DoubleDash => 2,
            MacFormat::Single => 1,
        }
    }

    fn allowed(&self, opts: &MacParseOptions) -> bool {
        match self {
            MacFormat::Colon => opts.colon,
            MacFormat::Dash | MacFormat::DoubleDash => opts.dashed,
            MacFormat::Dot => opts.dotted,
            MacFormat::Space => opts.space,
            MacFormat::Single => opts.single_segment,
        }
    }
}

/// Scan output, consumed by the builder.
#[derive(Clone, Debug)]
pub(crate) struct ScannedAddress {
    pub shape: Shape,
    /// concrete family for address shapes
    pub family: Option<Family>,
    pub buffer: ParseBuffer,
    /// slot index where `::` stands
    pub compress_at: Option<usize>,
    /// the last four slots are embedded IPv4 octets
    pub mixed: bool,
    pub mac_format: Option<MacFormat>,
    pub single_segment: bool,
    pub qualifier: Qualifier,
    /// every segment was written in canonical form
    pub is_standard: bool,
}

/* ---------------------------------- */

/// Text of one range side of a segment.
#[derive(Clone, Copy, Debug)]
struct Token {
    start: usize,
    end: usize,
    /// first digit after a `0x` marker
    digit_start: usize,
    digits: u32,
    marker: bool,
    upper_hex: bool,
    wildcard: bool,
    single_wildcards: u32,
}

impl Token {
    fn new(at: usize) -> Self {
        Token {
            start: at,
            end: at,
            digit_start: at,
            digits: 0,
            marker: false,
            upper_hex: false,
            wildcard: false,
            single_wildcards: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// digits plus single wildcards
    fn width(&self) -> usize {
        (self.digits + self.single_wildcards) as usize
    }

    fn is_plain_wildcard(&self) -> bool {
        self.wildcard
    }
}

/// Digit rules of one family's segments.
#[derive(Clone, Copy, Debug)]
struct Dialect {
    radix: u32,
    hex_marker: bool,
    octal: bool,
    binary: bool,
    leading_zeros: bool,
    unlimited_zeros: bool,
    /// canonical digit count, 0 when canonical means "no leading zeros"
    pad: usize,
    range: RangeOptions,
}

impl Dialect {
    fn ipv4(o: &Ipv4Options) -> Self {
        Dialect {
            radix: 10,
            hex_marker: o.inet_aton_hex,
            octal: o.inet_aton_octal,
            binary: o.binary,
            leading_zeros: o.leading_zeros,
            unlimited_zeros: o.unlimited_leading_zeros,
            pad: 0,
            range: o.range,
        }
    }

    fn ipv6(o: &Ipv6Options, single_segment: bool) -> Self {
        Dialect {
            radix: 16,
            hex_marker: single_segment,
            octal: false,
            binary: o.binary,
            leading_zeros: o.leading_zeros,
            unlimited_zeros: o.unlimited_leading_zeros,
            pad: 0,
            range: o.range,
        }
    }

    fn mac(o: &MacParseOptions, pad: usize) -> Self {
        Dialect {
            radix: 16,
            hex_marker: false,
            octal: false,
            binary: o.binary,
            leading_zeros: true,
            unlimited_zeros: o.unlimited_leading_zeros,
            pad,
            range: o.range,
        }
    }
}

/// One evaluated range side.
#[derive(Clone, Copy, Debug)]
struct Side {
    lower: u128,
    upper: u128,
    radix: u32,
    flags: u16,
}

/* ---------------------------------- */

struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    start: usize,
    /// end of the address text, where a qualifier starts
    addr_end: usize,
    end: usize,
    target: ScanTarget<'a>,
    shape: Option<Shape>,
    mac_format: Option<MacFormat>,
    buffer: ParseBuffer,
    compress_at: Option<usize>,
    mixed: bool,
    token: Token,
    front: Option<Token>,
    after_compression: bool,
    single_segment: bool,
}

#[cfg(test)]
pub(crate) fn scan(input: &str, target: ScanTarget<'_>) -> Result<ScannedAddress, AddressError> {
    scan_range(input, 0, input.len(), target)
}

/// Scan `input[start..end]`; error offsets are relative to the whole `input`.
pub(crate) fn scan_range(
    input: &str,
    start: usize,
    end: usize,
    target: ScanTarget<'_>,
) -> Result<ScannedAddress, AddressError> {
    let addr_end = input[start..end]
        .find(|c| c == '/' || c == '%')
        .map_or(end, |p| start + p);
    let mut scanner = Scanner {
        input,
        bytes: input.as_bytes(),
        start,
        addr_end,
        end,
        target,
        shape: None,
        mac_format: None,
        buffer: ParseBuffer::with_capacity(IPV4_SEGMENT_COUNT),
        compress_at: None,
        mixed: false,
        token: Token::new(start),
        front: None,
        after_compression: false,
        single_segment: false,
    };
    let mut i = start;
    while i < addr_end {
        i = scanner.step(i)?;
    }
    scanner.finish()
}

impl<'a> Scanner<'a> {
    fn err(&self, key: ErrorKey, at: usize) -> AddressError {
        AddressError::at(key, self.input, at)
    }

    fn is_mac(&self) -> bool {
        matches!(self.target, ScanTarget::Mac(_))
    }

    fn step(&mut self, i: usize) -> Result<usize, AddressError> {
        let c = self.bytes[i];
        if is_alt_range(self.bytes, i) && !self.is_mac() {
            self.on_range_separator(i, 2)?;
            return Ok(i + 2);
        }
        if is(c, chars::HEX) {
            self.on_digit(i, c)?;
            return Ok(i + 1);
        }
        if is_radix_marker(c) {
            self.on_radix_marker(i)?;
            return Ok(i + 1);
        }
        match c {
            b'*' => self.on_wildcard(i)?,
            b'_' => self.on_single_wildcard(i)?,
            b'-' => return self.on_dash(i),
            b'|' if self.is_mac() => self.on_range_separator(i, 1)?,
            _ if is(c, chars::SEPARATOR) => return self.on_segment_separator(i, c),
            _ => return Err(self.err(ErrorKey::InvalidCharacter, i)),
        }
        Ok(i + 1)
    }

    /* ---- character classes ---- */

    fn on_digit(&mut self, i: usize, c: u8) -> Result<(), AddressError> {
        if self.token.wildcard || self.token.single_wildcards > 0 {
            return Err(self.err(ErrorKey::WildcardMixed, i));
        }
        self.token.digits += 1;
        self.token.upper_hex |= is(c, chars::UPPER_HEX);
        self.token.end = i + 1;
        Ok(())
    }

    /// `x` is only valid as the second character of `0x`.
    fn on_radix_marker(&mut self, i: usize) -> Result<(), AddressError> {
        let t = &self.token;
        let after_zero = t.digits == 1 && !t.marker && self.bytes[t.start] == b'0' && t.end == i;
        if !after_zero || self.is_mac() || self.shape == Some(Shape::Ipv6) {
            return Err(self.err(ErrorKey::InvalidCharacter, i));
        }
        self.token.marker = true;
        self.token.digits = 0;
        self.token.digit_start = i + 1;
        self.token.end = i + 1;
        Ok(())
    }

    fn on_wildcard(&mut self, i: usize) -> Result<(), AddressError> {
        if self.front.is_some() {
            return Err(self.err(ErrorKey::RangeWithWildcard, i));
        }
        if !self.token.is_empty() {
            return Err(self.err(ErrorKey::WildcardMixed, i));
        }
        self.token.wildcard = true;
        self.token.end = i + 1;
        Ok(())
    }

    fn on_single_wildcard(&mut self, i: usize) -> Result<(), AddressError> {
        if self.front.is_some() {
            return Err(self.err(ErrorKey::RangeWithWildcard, i));
        }
        if self.token.wildcard || self.token.marker && self.token.digits == 0 {
            return Err(self.err(ErrorKey::WildcardMixed, i));
        }
        self.token.single_wildcards += 1;
        self.token.end = i + 1;
        Ok(())
    }

    fn on_range_separator(&mut self, i: usize, len: usize) -> Result<(), AddressError> {
        if self.front.is_some() {
            return Err(self.err(ErrorKey::MultipleRanges, i));
        }
        if self.token.wildcard || self.token.single_wildcards > 0 {
            return Err(self.err(ErrorKey::RangeWithWildcard, i));
        }
        self.front = Some(self.token);
        self.token = Token::new(i + len);
        Ok(())
    }

    /// `-` is a range in IP addresses and a segment separator in dashed MACs.
    fn on_dash(&mut self, i: usize) -> Result<usize, AddressError> {
        let separator = match (self.target, self.mac_format) {
            // a 12 or 16 digit run is a whole single-segment MAC
            (ScanTarget::Mac(_), None) => !matches!(self.token.digits, 12 | 16),
            // ranges in `aabbcc-ddeeff` are written with `|`
            (ScanTarget::Mac(_), Some(MacFormat::DoubleDash)) => {
                return Err(self.err(ErrorKey::TooManySegments, i));
            }
            (ScanTarget::Mac(_), Some(format)) => format == MacFormat::Dash,
            _ => false,
        };
        if separator {
            return self.on_segment_separator(i, b'-');
        }
        self.on_range_separator(i, 1)?;
        Ok(i + 1)
    }

    fn on_segment_separator(&mut self, i: usize, c: u8) -> Result<usize, AddressError> {
        if self.is_mac() {
            return self.on_mac_separator(i, c);
        }
        match (c, self.shape) {
            (b'.', None) => {
                self.admit(IpFam::V4, i)?;
                self.shape = Some(Shape::Ipv4);
            }
            (b'.', Some(Shape::Ipv6)) => return self.on_embedded_ipv4(i),
            (b'.', _) => {}
            (b':', None) => {
                self.admit(IpFam::V6, i)?;
                self.shape = Some(Shape::Ipv6);
                self.buffer.reserve_for(IPV6_SEGMENT_COUNT);
            }
            (b':', Some(Shape::Ipv4)) => return Err(self.err(ErrorKey::MixedSeparators, i)),
            (b':', _) => {}
            _ => return Err(self.err(ErrorKey::InvalidCharacter, i)),
        }
        if c == b':' && self.bytes.get(i + 1) == Some(&b':') {
            return self.on_compression(i);
        }
        self.close_segment(i)?;
        Ok(i + 1)
    }

    fn on_mac_separator(&mut self, i: usize, c: u8) -> Result<usize, AddressError> {
        let format = match c {
            b':' => MacFormat::Colon,
            b'.' => MacFormat::Dot,
            b' ' => MacFormat::Space,
            _ if self.buffer.is_empty() && self.front.is_none() && self.token.digits == 6 => {
                MacFormat::DoubleDash
            }
            _ => MacFormat::Dash,
        };
        match (self.mac_format, self.target) {
            (None, ScanTarget::Mac(opts)) => {
                if !format.allowed(opts) {
                    return Err(self.err(ErrorKey::MacFormatDisallowed, i));
                }
                self.mac_format = Some(format);
                self.shape = Some(Shape::Mac);
                self.buffer.reserve_for(format.max_segments());
            }
            (Some(current), _) if current == format => {}
            _ => return Err(self.err(ErrorKey::MixedSeparators, i)),
        }
        self.close_segment(i)?;
        Ok(i + 1)
    }

    fn on_compression(&mut self, i: usize) -> Result<usize, AddressError> {
        if self.compress_at.is_some() {
            return Err(self.err(ErrorKey::MultipleCompression, i));
        }
        if !self.token.is_empty() || self.front.is_some() {
            self.close_segment(i)?;
        } else if i != self.start {
            return Err(self.err(ErrorKey::EmptySegment, i));
        }
        self.compress_at = Some(self.buffer.len());
        self.after_compression = true;
        self.token = Token::new(i + 2);
        Ok(i + 2)
    }

    /// IPv4 tail of an IPv6 address, scanned recursively and spliced in as octet slots.
    fn on_embedded_ipv4(&mut self, i: usize) -> Result<usize, AddressError> {
        let Some(v6) = self.target.ip_options().and_then(|o| o.ipv6) else {
            return Err(self.err(ErrorKey::Ipv6Disallowed, i));
        };
        if !v6.mixed {
            return Err(self.err(ErrorKey::MixedDisallowed, i));
        }
        if let Some(p) = self.input[i..self.addr_end].find(':') {
            return Err(self.err(ErrorKey::MixedPosition, i + p));
        }
        let seg_start = self.front.map_or(self.token.start, |f| f.start);
        if self.ipv6_count() + 2 > IPV6_SEGMENT_COUNT {
            return Err(self.err(ErrorKey::TooManySegments, seg_start));
        }
        let embedded = IpParseOptions {
            empty: false,
            all: false,
            single_segment: false,
            prefix_only: false,
            mask: false,
            prefix_beyond_size: false,
            ipv4: Some(v6.embedded_ipv4.embedded()),
            ipv6: None,
            preferred_version: IpFam::V4,
        };
        let sub = scan_range(self.input, seg_start, self.addr_end, ScanTarget::Ip(&embedded))?;
        trace!(input = self.input, at = seg_start, "embedded IPv4");
        for slot in sub.buffer.slots() {
            let mut slot = *slot;
            slot.flags.set(SlotFlags::MERGED_MIXED);
            self.buffer.push(slot);
        }
        self.mixed = true;
        self.front = None;
        self.token = Token::new(self.addr_end);
        self.after_compression = false;
        Ok(self.addr_end)
    }

    /* ---- segment bookkeeping ---- */

    fn admit(&self, fam: IpFam, at: usize) -> Result<(), AddressError> {
        if let ScanTarget::Mask(_, want) = self.target {
            if want != fam {
                return Err(self.err(ErrorKey::MaskVersionMismatch, at));
            }
        }
        let allowed = self.target.ip_options().is_some_and(|o| o.allows(fam));
        match (allowed, fam) {
            (true, _) => Ok(()),
            (false, IpFam::V4) => Err(self.err(ErrorKey::Ipv4Disallowed, at)),
            (false, IpFam::V6) => Err(self.err(ErrorKey::Ipv6Disallowed, at)),
        }
    }

    /// IPv6 segments so far, embedded IPv4 counting as two.
    fn ipv6_count(&self) -> usize {
        if self.mixed {
            self.buffer.len() - 2
        } else {
            self.buffer.len()
        }
    }

    fn max_segments(&self) -> usize {
        match (self.shape, self.mac_format) {
            (Some(Shape::Ipv4), _) => IPV4_SEGMENT_COUNT,
            (_, Some(format)) => format.max_segments(),
            _ => IPV6_SEGMENT_COUNT,
        }
    }

    fn segment_bits(&self) -> u32 {
        match (self.shape, self.mac_format) {
            (Some(Shape::Ipv4), _) => u32::from(IPV4_SEGMENT_BITS),
            (_, Some(format)) => format.segment_bits(),
            _ => u32::from(IPV6_SEGMENT_BITS),
        }
    }

    fn dialect(&self) -> Dialect {
        match (self.target, self.shape) {
            (ScanTarget::Mac(opts), _) => {
                let pad = self.mac_format.map_or(2, |f| f.segment_bits() as usize / 4);
                Dialect::mac(opts, pad)
            }
            (_, Some(Shape::Ipv4)) => {
                let o = self.target.ip_options().and_then(|o| o.ipv4).unwrap_or_else(Ipv4Options::strict);
                Dialect::ipv4(&o)
            }
            _ => {
                let o = self.target.ip_options().and_then(|o| o.ipv6).unwrap_or_else(Ipv6Options::strict);
                Dialect::ipv6(&o, false)
            }
        }
    }

    /// Close the segment ended by a separator at `i`; another segment follows.
    fn close_segment(&mut self, i: usize) -> Result<(), AddressError> {
        if self.token.is_empty() && self.front.is_none() {
            let key = if i == self.start {
                ErrorKey::TrailingSeparator
            } else {
                ErrorKey::EmptySegment
            };
            return Err(self.err(key, i));
        }
        if self.buffer.len() + 1 >= self.max_segments() {
            return Err(self.err(ErrorKey::TooManySegments, i));
        }
        let slot = self.evaluate_token(self.front, self.token, self.segment_bits(), &self.dialect())?;
        self.buffer.push(slot);
        self.front = None;
        self.token = Token::new(i + 1);
        self.after_compression = false;
        Ok(())
    }

    /// Close the last segment with an explicit width.
    fn close_last(&mut self, bits: u32, dialect: &Dialect) -> Result<(), AddressError> {
        let slot = self.evaluate_token(self.front, self.token, bits, dialect)?;
        self.buffer.push(slot);
        self.front = None;
        Ok(())
    }

    /// Expand a trailing `*` over the `missing` segments after it.
    fn expand_wildcard(&mut self, count: usize, bits: u32) -> Result<(), AddressError> {
        let dialect = self.dialect();
        let slot = self.evaluate_token(None, self.token, bits, &dialect)?;
        for _ in 0..count {
            self.buffer.push(slot);
        }
        Ok(())
    }

    fn trailing_wildcard(&self) -> bool {
        self.front.is_none() && self.token.is_plain_wildcard()
    }

    /* ---- token evaluation ---- */

    /// Resolve one range side of a segment of width `bits`. `None` for an omitted side.
    fn evaluate_side(&self, t: &Token, bits: u32, d: &Dialect) -> Result<Option<Side>, AddressError> {
        if t.is_empty() {
            return Ok(None);
        }
        let max = wide_max(bits);
        if t.wildcard {
            if !d.range.wildcard {
                return Err(self.err(ErrorKey::WildcardDisallowed, t.start));
            }
            return Ok(Some(Side {
                lower: 0,
                upper: max,
                radix: d.radix,
                flags: SlotFlags::WILDCARD | SlotFlags::RANGE_WILDCARD | SlotFlags::STANDARD_STR,
            }));
        }

        let w = t.single_wildcards;
        let digits_end = t.end - w as usize;
        let mut at = t.digit_start;
        let mut text = &self.input[at..digits_end];
        let mut radix = d.radix;

        if t.marker {
            if !d.hex_marker {
                let key = if d.radix == 16 {
                    ErrorKey::InvalidCharacter
                } else {
                    ErrorKey::HexDisallowed
                };
                return Err(self.err(key, t.start));
            }
            radix = 16;
        } else if let Some(rest) = binary_digits(text) {
            let full_width = rest.len() + w as usize == bits as usize;
            if d.radix == 10 || (d.binary && full_width) {
                if !d.binary {
                    return Err(self.err(ErrorKey::BinaryDisallowed, t.start));
                }
                radix = 2;
                text = rest;
                at += 2;
            }
        } else if d.octal && text.len() > 1 && text.starts_with('0') {
            radix = 8;
            text = &text[1..];
            at += 1;
        }

        let width = text.len() + w as usize;
        if width == 0 {
            return Err(self.err(ErrorKey::MissingDigits, t.start));
        }
        let zero_led = text.len() > 1 && text.starts_with('0');
        if radix == d.radix && !t.marker && !d.leading_zeros && zero_led {
            return Err(self.err(ErrorKey::LeadingZeros, t.start));
        }
        if !d.unlimited_zeros && width as u32 > digit_count(max, radix) {
            return Err(self.err(ErrorKey::TooManyDigits, t.start));
        }

        let mut value: u128 = 0;
        for (k, c) in text.bytes().enumerate() {
            let digit = digit_value(c, radix).ok_or_else(|| self.err(ErrorKey::InvalidDigit, at + k))?;
            value = value
                .checked_mul(u128::from(radix))
                .and_then(|v| v.checked_add(u128::from(digit)))
                .ok_or_else(|| self.err(ErrorKey::SegmentTooLarge, t.start))?;
        }

        if w > 0 {
            if !d.range.single_wildcard {
                return Err(self.err(ErrorKey::SingleWildcardDisallowed, digits_end));
            }
            let (lower, upper) = match u128::from(radix).checked_pow(w) {
                Some(m) => {
                    let lower = value
                        .checked_mul(m)
                        .ok_or_else(|| self.err(ErrorKey::SegmentTooLarge, t.start))?;
                    (lower, lower.saturating_add(m - 1))
                }
                None if value == 0 => (0, max),
                None => return Err(self.err(ErrorKey::SegmentTooLarge, t.start)),
            };
            if lower > max {
                return Err(self.err(ErrorKey::SegmentTooLarge, t.start));
            }
            // upper bounds past the maximum are clamped, not rejected
            return Ok(Some(Side {
                lower,
                upper: upper.min(max),
                radix,
                flags: SlotFlags::SINGLE_WILDCARD | SlotFlags::RANGE_WILDCARD,
            }));
        }

        if value > max {
            return Err(self.err(ErrorKey::SegmentTooLarge, t.start));
        }
        let canonical_digits = if d.pad > 0 {
            text.len() == d.pad
        } else {
            !zero_led
        };
        let standard = radix == d.radix && !t.marker && !t.upper_hex && canonical_digits;
        Ok(Some(Side {
            lower: value,
            upper: value,
            radix,
            flags: if standard { SlotFlags::STANDARD_STR } else { 0 },
        }))
    }

    /// Combine the front and back sides of a segment into a slot.
    fn evaluate_token(
        &self,
        front: Option<Token>,
        back: Token,
        bits: u32,
        d: &Dialect,
    ) -> Result<SegmentSlot, AddressError> {
        let mut slot = SegmentSlot {
            upper_start: back.start as u32,
            upper_end: back.end as u32,
            bits: bits as u8,
            ..Default::default()
        };
        let Some(f) = front else {
            let side = self
                .evaluate_side(&back, bits, d)?
                .ok_or_else(|| self.err(ErrorKey::EmptySegment, back.start))?;
            slot.lower_start = back.start as u32;
            slot.lower_end = back.end as u32;
            slot.digit_start = back.digit_start as u32;
            slot.lower_radix = side.radix as u8;
            slot.upper_radix = side.radix as u8;
            slot.set_lower_wide(side.lower);
            slot.set_upper_wide(side.upper);
            slot.flags = SlotFlags(side.flags);
            return Ok(slot);
        };

        if !d.range.range {
            return Err(self.err(ErrorKey::RangeDisallowed, f.end));
        }
        let lo = self.evaluate_side(&f, bits, d)?;
        let hi = self.evaluate_side(&back, bits, d)?;
        if (lo.is_none() || hi.is_none()) && !d.range.inferred_boundary {
            return Err(self.err(ErrorKey::InferredBoundaryDisallowed, f.end));
        }
        let max = wide_max(bits);
        let mut flags = SlotFlags::default();
        let (mut lower, mut upper) = (0, max);
        match lo {
            Some(s) => {
                lower = s.lower;
                slot.lower_radix = s.radix as u8;
            }
            None => {
                flags.set(SlotFlags::INFERRED_LOWER);
                slot.lower_radix = d.radix as u8;
            }
        }
        match hi {
            Some(s) => {
                upper = s.upper;
                slot.upper_radix = s.radix as u8;
            }
            None => {
                flags.set(SlotFlags::INFERRED_UPPER);
                slot.upper_radix = d.radix as u8;
            }
        }
        let reversed = lower > upper;
        if reversed {
            if !d.range.reverse_range {
                return Err(self.err(ErrorKey::ReversedRange, f.start));
            }
            std::mem::swap(&mut lower, &mut upper);
            std::mem::swap(&mut slot.lower_radix, &mut slot.upper_radix);
        }
        let both_standard = [lo, hi]
            .iter()
            .all(|s| s.is_some_and(|s| s.flags & SlotFlags::STANDARD_STR != 0));
        // canonical ranges are written with a single ASCII dash
        let dashed = back.start == f.end + 1 && self.bytes.get(f.end) == Some(&b'-');
        if both_standard && dashed && !reversed && lower != upper && !(lower == 0 && upper == max) {
            flags.set(SlotFlags::STANDARD_RANGE_STR);
        }
        slot.lower_start = f.start as u32;
        slot.lower_end = f.end as u32;
        slot.digit_start = f.digit_start as u32;
        slot.set_lower_wide(lower);
        slot.set_upper_wide(upper);
        slot.flags = flags;
        Ok(slot)
    }

    /* ---- end of input ---- */

    fn finish(mut self) -> Result<ScannedAddress, AddressError> {
        let current = self.shape;
        let shape = match current {
            None if self.start == self.addr_end => return self.finish_without_address(),
            None if self.trailing_wildcard() => {
                let allowed = match self.target {
                    ScanTarget::Mac(opts) => opts.all,
                    ScanTarget::Ip(opts) => opts.all,
                    ScanTarget::Mask(..) => false,
                };
                if !allowed {
                    return Err(self.err(ErrorKey::AllDisallowed, self.start));
                }
                Shape::All
            }
            None => self.finish_single_segment()?,
            Some(Shape::Ipv4) => self.finish_ipv4()?,
            Some(Shape::Ipv6) => self.finish_ipv6()?,
            Some(_) => self.finish_mac()?,
        };
        self.shape = Some(shape);

        let family = self.family();
        let qualifier = if self.addr_end < self.end {
            parse_qualifier(self.input, self.addr_end, self.end, family, &self.target)?
        } else {
            Qualifier::default()
        };
        let is_standard = !self.buffer.is_empty() && self.buffer.is_standard() && self.compress_at.is_none();
        Ok(ScannedAddress {
            shape,
            family,
            buffer: self.buffer,
            compress_at: self.compress_at,
            mixed: self.mixed,
            mac_format: self.mac_format,
            single_segment: self.single_segment,
            qualifier,
            is_standard,
        })
    }

    fn family(&self) -> Option<Family> {
        match self.shape? {
            Shape::Ipv4 => Some(Family::Ipv4),
            Shape::Ipv6 => Some(Family::Ipv6),
            Shape::Mac => {
                let bytes: u32 = self.buffer.slots().iter().map(|s| u32::from(s.bits) / 8).sum();
                Some(Family::mac_for_count(bytes as usize))
            }
            _ => None,
        }
    }

    /// Empty string, or a qualifier with no address before it.
    fn finish_without_address(self) -> Result<ScannedAddress, AddressError> {
        let (allow_empty, ip_opts) = match self.target {
            ScanTarget::Ip(opts) => (opts.empty, Some(opts)),
            ScanTarget::Mac(opts) => (opts.empty, None),
            ScanTarget::Mask(..) => (false, None),
        };
        let (shape, qualifier) = if self.addr_end == self.end {
            if !allow_empty {
                return Err(self.err(ErrorKey::EmptyDisallowed, self.start));
            }
            (Shape::Empty, Qualifier::default())
        } else {
            let Some(opts) = ip_opts else {
                return Err(self.err(ErrorKey::InvalidCharacter, self.start));
            };
            let qualifier = parse_qualifier(self.input, self.addr_end, self.end, None, &self.target)?;
            if !opts.prefix_only {
                return Err(self.err(ErrorKey::PrefixOnlyDisallowed, self.start));
            }
            (Shape::PrefixOnly, qualifier)
        };
        Ok(ScannedAddress {
            shape,
            family: None,
            buffer: self.buffer,
            compress_at: None,
            mixed: false,
            mac_format: None,
            single_segment: false,
            qualifier,
            is_standard: false,
        })
    }

    fn finish_ipv4(&mut self) -> Result<Shape, AddressError> {
        if self.token.is_empty() && self.front.is_none() {
            return Err(self.err(ErrorKey::TrailingSeparator, self.addr_end - 1));
        }
        let count = self.buffer.len() + 1;
        let bits = u32::from(IPV4_SEGMENT_BITS);
        if count < IPV4_SEGMENT_COUNT && self.trailing_wildcard() {
            self.expand_wildcard(IPV4_SEGMENT_COUNT - self.buffer.len(), bits)?;
            return Ok(Shape::Ipv4);
        }
        let dialect = self.dialect();
        if count < IPV4_SEGMENT_COUNT {
            let joined = self
                .target
                .ip_options()
                .and_then(|o| o.ipv4)
                .is_some_and(|o| o.inet_aton_joined);
            if !joined {
                return Err(self.err(ErrorKey::TooFewSegments, self.addr_end));
            }
            let last_bits = u32::from(IPV4_BITS) - bits * (count as u32 - 1);
            self.close_last(last_bits, &dialect)?;
        } else {
            self.close_last(bits, &dialect)?;
        }
        Ok(Shape::Ipv4)
    }

    fn finish_ipv6(&mut self) -> Result<Shape, AddressError> {
        let bits = u32::from(IPV6_SEGMENT_BITS);
        if self.token.is_empty() && self.front.is_none() {
            if !self.after_compression && !self.mixed {
                return Err(self.err(ErrorKey::TrailingSeparator, self.addr_end - 1));
            }
        } else if self.compress_at.is_none()
            && self.trailing_wildcard()
            && self.ipv6_count() + 1 < IPV6_SEGMENT_COUNT
        {
            self.expand_wildcard(IPV6_SEGMENT_COUNT - self.ipv6_count(), bits)?;
        } else {
            let dialect = self.dialect();
            self.close_last(bits, &dialect)?;
        }

        let count = self.ipv6_count();
        if self.compress_at.is_some() && count >= IPV6_SEGMENT_COUNT {
            return Err(self.err(ErrorKey::TooManySegments, self.addr_end));
        }
        if self.compress_at.is_none() && count < IPV6_SEGMENT_COUNT {
            return Err(self.err(ErrorKey::TooFewSegments, self.addr_end));
        }
        Ok(Shape::Ipv6)
    }

    fn finish_mac(&mut self) -> Result<Shape, AddressError> {
        let ScanTarget::Mac(opts) = self.target else {
            return Err(self.err(ErrorKey::InvalidCharacter, self.start));
        };
        let Some(format) = self.mac_format else {
            return Err(self.err(ErrorKey::InvalidCharacter, self.start));
        };
        if self.token.is_empty() && self.front.is_none() {
            return Err(self.err(ErrorKey::TrailingSeparator, self.addr_end - 1));
        }
        let dialect = self.dialect();

        if format == MacFormat::DoubleDash {
            let width = self.front.map_or(0, |f| f.width()).max(self.token.width());
            let bits = match (width, self.token.wildcard) {
                (_, true) if opts.size == MacSize::Eui64 => 40,
                (_, true) | (6, _) => 24,
                (10, _) => 40,
                (w, _) if w < 6 => return Err(self.err(ErrorKey::TooFewSegments, self.token.start)),
                _ => return Err(self.err(ErrorKey::TooManyDigits, self.token.start)),
            };
            self.close_last(bits, &Dialect { pad: bits as usize / 4, ..dialect })?;
        } else {
            let per_segment = format.segment_bits() as usize / 8;
            let expected = (if opts.size == MacSize::Eui64 { 8 } else { 6 }) / per_segment;
            if self.trailing_wildcard() && self.buffer.len() + 1 < expected {
                self.expand_wildcard(expected - self.buffer.len(), format.segment_bits())?;
            } else {
                self.close_last(format.segment_bits(), &dialect)?;
            }
            let bytes = self.buffer.len() * per_segment;
            if !opts.allows_count(bytes) {
                let key = if bytes < 6 || (bytes < 8 && opts.size == MacSize::Eui64) {
                    ErrorKey::TooFewSegments
                } else {
                    ErrorKey::TooManySegments
                };
                return Err(self.err(key, self.addr_end));
            }
            return Ok(Shape::Mac);
        }
        let bytes: usize = self.buffer.slots().iter().map(|s| usize::from(s.bits) / 8).sum();
        if !opts.allows_count(bytes) {
            return Err(self.err(ErrorKey::MacFormatDisallowed, self.addr_end));
        }
        Ok(Shape::Mac)
    }

    /// The whole address as one run of digits.
    fn finish_single_segment(&mut self) -> Result<Shape, AddressError> {
        let (front, back) = (self.front, self.token);
        let sides: Vec<&Token> = front.iter().chain([&back]).filter(|t| !t.is_empty()).collect();

        if let ScanTarget::Mac(opts) = self.target {
            if !opts.single_segment {
                return Err(self.err(ErrorKey::SingleSegmentDisallowed, self.start));
            }
            let width = sides.first().map_or(0, |t| t.width());
            if sides.iter().any(|t| t.width() != width) {
                return Err(self.err(ErrorKey::RangeDigitMismatch, back.start));
            }
            let bits = match width {
                12 => 48,
                16 => 64,
                w if w < 12 => return Err(self.err(ErrorKey::TooFewSegments, self.start)),
                _ => return Err(self.err(ErrorKey::TooManyDigits, self.start)),
            };
            if !opts.allows_count(bits / 8) {
                return Err(self.err(ErrorKey::MacFormatDisallowed, self.start));
            }
            self.mac_format = Some(MacFormat::Single);
            self.single_segment = true;
            self.close_last(bits as u32, &Dialect::mac(opts, width))?;
            return Ok(Shape::Mac);
        }

        let is_v6 = |t: &Token| -> bool {
            let text = &self.input[t.digit_start..t.end];
            match binary_digits(text) {
                _ if t.marker => t.width() == 32,
                Some(rest) if rest.len() + t.single_wildcards as usize == usize::from(IPV6_BITS) => true,
                _ => t.width() == 32,
            }
        };
        let v6 = sides.first().is_some_and(|&t| is_v6(t));
        if sides.iter().any(|&t| is_v6(t) != v6) {
            return Err(self.err(ErrorKey::RangeDigitMismatch, back.start));
        }
        let masking = matches!(self.target, ScanTarget::Mask(..));
        let opts = self.target.ip_options().ok_or_else(|| self.err(ErrorKey::InvalidCharacter, self.start))?;
        let disallowed = if masking {
            ErrorKey::SingleSegmentMask
        } else {
            ErrorKey::SingleSegmentDisallowed
        };
        if !opts.single_segment {
            return Err(self.err(disallowed, self.start));
        }
        self.single_segment = true;
        if v6 {
            self.admit(IpFam::V6, self.start)?;
            let o = opts.ipv6.unwrap_or_else(Ipv6Options::strict);
            self.shape = Some(Shape::Ipv6);
            self.close_last(u32::from(IPV6_BITS), &Dialect::ipv6(&o, true))?;
            return Ok(Shape::Ipv6);
        }
        self.admit(IpFam::V4, self.start)?;
        let o = opts.ipv4.unwrap_or_else(Ipv4Options::strict);
        if !o.inet_aton_joined {
            return Err(self.err(disallowed, self.start));
        }
        self.shape = Some(Shape::Ipv4);
        self.close_last(u32::from(IPV4_BITS), &Dialect::ipv4(&o))?;
        Ok(Shape::Ipv4)
    }
}

/// Digits after a `0b` prefix, when they are all binary.
fn binary_digits(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B"))?;
    (!rest.is_empty() && rest.bytes().all(|c| c == b'0' || c == b'1')).then_some(rest)
}

/* -------------------------------------------------------------------------- */
