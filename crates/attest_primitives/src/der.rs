//! Minimal DER (X.690) codec.
//!
//! Only the subset needed by the attestation format: single-byte tags, definite
//! lengths, and the universal types listed in [`crate::constants`]. Encoders are
//! infallible and return complete TLVs. The reader borrows from its input and keeps
//! the raw bytes of every element so callers can re-emit them verbatim.

use core::fmt;
use thiserror::Error;

use crate::constants::{
    TAG_BIT_STRING, TAG_BOOLEAN, TAG_GENERALIZED_TIME, TAG_IA5_STRING, TAG_INTEGER, TAG_NULL,
    TAG_OCTET_STRING, TAG_OID, TAG_PRINTABLE_STRING, TAG_SEQUENCE, TAG_SET, TAG_UTC_TIME,
    TAG_UTF8_STRING, tag_explicit,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerError {
    #[error("unexpected end of input")]
    Truncated,

    #[error("unexpected tag: expected {expected:#04x} got {got:#04x}")]
    UnexpectedTag { expected: u8, got: u8 },

    #[error("high-number tags are not supported")]
    UnsupportedTag,

    #[error("indefinite or oversized length")]
    UnsupportedLength,

    #[error("non-minimal length encoding")]
    NonMinimalLength,

    #[error("non-minimal integer encoding")]
    NonMinimalInteger,

    #[error("integer does not fit in 64 bits")]
    IntegerOverflow,

    #[error("trailing bytes after element")]
    TrailingBytes,

    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Append a definite-form length.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// `tag || len || content`
#[must_use]
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(content.len() + 6);
    v.push(tag);
    encode_length(content.len(), &mut v);
    v.extend_from_slice(content);
    v
}

/// SEQUENCE over already-encoded elements, in order.
#[must_use]
pub fn sequence(parts: &[&[u8]]) -> Vec<u8> {
    tlv(TAG_SEQUENCE, &parts.concat())
}

/// SEQUENCE over owned encodings.
#[must_use]
pub fn sequence_of(items: &[Vec<u8>]) -> Vec<u8> {
    tlv(TAG_SEQUENCE, &items.concat())
}

/// SET over already-encoded elements. Elements are emitted in the order given.
#[must_use]
pub fn set(parts: &[&[u8]]) -> Vec<u8> {
    tlv(TAG_SET, &parts.concat())
}

/// `[n] EXPLICIT inner`
#[must_use]
pub fn explicit(n: u8, inner: &[u8]) -> Vec<u8> {
    tlv(tag_explicit(n), inner)
}

/// Minimal two's-complement INTEGER.
#[must_use]
pub fn integer_i64(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0usize;
    while start < bytes.len() - 1 {
        let (b0, b1) = (bytes[start], bytes[start + 1]);
        if (b0 == 0x00 && b1 & 0x80 == 0) || (b0 == 0xff && b1 & 0x80 != 0) {
            start += 1;
        } else {
            break;
        }
    }
    tlv(TAG_INTEGER, &bytes[start..])
}

/// Minimal two's-complement content bytes of a non-negative big-endian magnitude.
///
/// Zero becomes `[0x00]`; a set top bit gets a `0x00` sign byte.
#[must_use]
pub fn unsigned_to_twos_complement(be: &[u8]) -> Vec<u8> {
    let trimmed = crate::strip_leading_zeros(be);
    if trimmed.is_empty() {
        return vec![0x00];
    }
    let mut v = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        v.push(0x00);
    }
    v.extend_from_slice(trimmed);
    v
}

/// Inverse of [`unsigned_to_twos_complement`]. Accepts redundant leading zeros
/// and rejects negative values.
pub fn twos_complement_to_unsigned(bytes: &[u8]) -> Result<&[u8], DerError> {
    if bytes.is_empty() {
        return Err(DerError::InvalidValue("empty integer"));
    }
    if bytes[0] & 0x80 != 0 {
        return Err(DerError::InvalidValue("negative integer"));
    }
    Ok(crate::strip_leading_zeros(bytes))
}

/// INTEGER from a non-negative big-endian magnitude.
#[must_use]
pub fn integer_unsigned(be: &[u8]) -> Vec<u8> {
    tlv(TAG_INTEGER, &unsigned_to_twos_complement(be))
}

#[must_use]
pub fn octet_string(bytes: &[u8]) -> Vec<u8> {
    tlv(TAG_OCTET_STRING, bytes)
}

/// BIT STRING with zero unused bits.
#[must_use]
pub fn bit_string(bytes: &[u8]) -> Vec<u8> {
    let mut content = Vec::with_capacity(bytes.len() + 1);
    content.push(0x00);
    content.extend_from_slice(bytes);
    tlv(TAG_BIT_STRING, &content)
}

#[must_use]
pub fn null() -> Vec<u8> {
    vec![TAG_NULL, 0x00]
}

#[must_use]
pub fn boolean(value: bool) -> Vec<u8> {
    vec![TAG_BOOLEAN, 0x01, if value { 0xff } else { 0x00 }]
}

#[must_use]
pub fn utf8_string(s: &str) -> Vec<u8> {
    tlv(TAG_UTF8_STRING, s.as_bytes())
}

/// GeneralizedTime from its textual form, e.g. `20210101000000Z`.
#[must_use]
pub fn generalized_time(text: &str) -> Vec<u8> {
    tlv(TAG_GENERALIZED_TIME, text.as_bytes())
}

// ---------------------------------------------------------------------------
// Object identifiers
// ---------------------------------------------------------------------------

/// An OBJECT IDENTIFIER, held as its validated DER content bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    content: Vec<u8>,
}

fn push_base128(mut v: u64, out: &mut Vec<u8>) {
    let mut tmp = [0u8; 10];
    let mut i = tmp.len();
    loop {
        i -= 1;
        tmp[i] = u8::try_from(v & 0x7f).unwrap_or(0);
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    let last = tmp.len() - 1;
    for (j, b) in tmp.iter().enumerate().skip(i) {
        out.push(if j == last { *b } else { *b | 0x80 });
    }
}

fn decode_arcs(content: &[u8]) -> Result<Vec<u64>, DerError> {
    if content.is_empty() {
        return Err(DerError::InvalidValue("empty object identifier"));
    }
    let mut subids = Vec::new();
    let mut acc: u64 = 0;
    let mut at_start = true;
    for &b in content {
        if at_start && b == 0x80 {
            return Err(DerError::InvalidValue("non-minimal object identifier arc"));
        }
        if acc > (u64::MAX >> 7) {
            return Err(DerError::IntegerOverflow);
        }
        acc = (acc << 7) | u64::from(b & 0x7f);
        at_start = false;
        if b & 0x80 == 0 {
            subids.push(acc);
            acc = 0;
            at_start = true;
        }
    }
    if !at_start {
        return Err(DerError::Truncated);
    }
    let first = subids[0];
    let (a0, a1) = match first {
        0..=39 => (0, first),
        40..=79 => (1, first - 40),
        _ => (2, first - 80),
    };
    let mut arcs = Vec::with_capacity(subids.len() + 1);
    arcs.push(a0);
    arcs.push(a1);
    arcs.extend_from_slice(&subids[1..]);
    Ok(arcs)
}

impl ObjectIdentifier {
    /// Parse dotted-decimal notation.
    pub fn new(dotted: &str) -> Result<Self, DerError> {
        let arcs = dotted
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DerError::InvalidValue("object identifier arc is not a number"))?;
        if arcs.len() < 2 || arcs[0] > 2 || (arcs[0] < 2 && arcs[1] >= 40) {
            return Err(DerError::InvalidValue("object identifier root arcs out of range"));
        }
        let first = arcs[0]
            .checked_mul(40)
            .and_then(|x| x.checked_add(arcs[1]))
            .ok_or(DerError::IntegerOverflow)?;
        let mut content = Vec::with_capacity(arcs.len() * 2);
        push_base128(first, &mut content);
        for &arc in &arcs[2..] {
            push_base128(arc, &mut content);
        }
        Ok(Self { content })
    }

    /// Identifier for a dotted literal known at compile time.
    ///
    /// An invalid literal yields an empty identifier that matches nothing and
    /// encodes as an empty OID, which every decoder in this crate rejects.
    #[must_use]
    pub fn known(dotted: &'static str) -> Self {
        Self::new(dotted).unwrap_or(Self { content: Vec::new() })
    }

    /// Validate raw content bytes (the V of an OID TLV).
    pub fn from_content(content: &[u8]) -> Result<Self, DerError> {
        decode_arcs(content)?;
        Ok(Self { content: content.to_vec() })
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        tlv(TAG_OID, &self.content)
    }

    #[must_use]
    pub fn arcs(&self) -> Vec<u64> {
        decode_arcs(&self.content).unwrap_or_default()
    }

    /// True when this identifier equals the dotted form `dotted`.
    #[must_use]
    pub fn matches(&self, dotted: &str) -> bool {
        Self::new(dotted).is_ok_and(|other| other == *self)
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arcs = self.arcs();
        for (i, arc) in arcs.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectIdentifier({self})")
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// One decoded element. `raw` is the full TLV, `content` the V part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub content: &'a [u8],
    pub raw: &'a [u8],
}

/// Sequential reader over concatenated TLVs.
#[derive(Debug, Clone)]
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[must_use]
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Read the next element.
    pub fn read(&mut self) -> Result<Tlv<'a>, DerError> {
        let start = self.pos;
        let tag = *self.data.get(start).ok_or(DerError::Truncated)?;
        if tag & 0x1f == 0x1f {
            return Err(DerError::UnsupportedTag);
        }
        let first = *self.data.get(start + 1).ok_or(DerError::Truncated)?;
        let mut off = start + 2;
        let len = if first < 0x80 {
            usize::from(first)
        } else {
            let n = usize::from(first & 0x7f);
            if n == 0 || n > 4 {
                return Err(DerError::UnsupportedLength);
            }
            let bytes = self.data.get(off..off + n).ok_or(DerError::Truncated)?;
            if bytes[0] == 0 {
                return Err(DerError::NonMinimalLength);
            }
            let len = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
            if len < 0x80 {
                return Err(DerError::NonMinimalLength);
            }
            off += n;
            len
        };
        let end = off.checked_add(len).ok_or(DerError::UnsupportedLength)?;
        let content = self.data.get(off..end).ok_or(DerError::Truncated)?;
        self.pos = end;
        Ok(Tlv { tag, content, raw: &self.data[start..end] })
    }

    /// Read the next element and require `tag`.
    pub fn read_expected(&mut self, tag: u8) -> Result<Tlv<'a>, DerError> {
        self.read()?.expect(tag)
    }

    /// Read the next element only when its tag is `tag`.
    pub fn read_optional(&mut self, tag: u8) -> Result<Option<Tlv<'a>>, DerError> {
        if self.peek_tag() == Some(tag) {
            self.read().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Error unless every byte has been consumed.
    pub const fn finish(&self) -> Result<(), DerError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DerError::TrailingBytes)
        }
    }
}

/// Parse exactly one element spanning all of `data`.
pub fn parse_single(data: &[u8]) -> Result<Tlv<'_>, DerError> {
    let mut r = DerReader::new(data);
    let tlv = r.read()?;
    r.finish()?;
    Ok(tlv)
}

impl<'a> Tlv<'a> {
    pub const fn expect(self, tag: u8) -> Result<Self, DerError> {
        if self.tag == tag {
            Ok(self)
        } else {
            Err(DerError::UnexpectedTag { expected: tag, got: self.tag })
        }
    }

    /// Reader over the children of a constructed element.
    #[must_use]
    pub const fn children(&self) -> DerReader<'a> {
        DerReader::new(self.content)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.tag == TAG_NULL && self.content.is_empty()
    }

    pub fn to_i64(&self) -> Result<i64, DerError> {
        let c = self.expect(TAG_INTEGER)?.content;
        check_minimal_integer(c)?;
        if c.len() > 8 {
            return Err(DerError::IntegerOverflow);
        }
        let fill = if c[0] & 0x80 != 0 { 0xff } else { 0x00 };
        let mut buf = [fill; 8];
        buf[8 - c.len()..].copy_from_slice(c);
        Ok(i64::from_be_bytes(buf))
    }

    /// Big-endian magnitude of a non-negative INTEGER (sign byte removed).
    pub fn to_unsigned(&self) -> Result<&'a [u8], DerError> {
        let c = self.expect(TAG_INTEGER)?.content;
        check_minimal_integer(c)?;
        twos_complement_to_unsigned(c)
    }

    pub fn to_octets(&self) -> Result<&'a [u8], DerError> {
        Ok(self.expect(TAG_OCTET_STRING)?.content)
    }

    /// Payload of a byte-aligned BIT STRING.
    pub fn to_bit_string(&self) -> Result<&'a [u8], DerError> {
        let c = self.expect(TAG_BIT_STRING)?.content;
        match c.split_first() {
            Some((0, rest)) => Ok(rest),
            Some(_) => Err(DerError::InvalidValue("bit string with unused bits")),
            None => Err(DerError::Truncated),
        }
    }

    pub fn to_bool(&self) -> Result<bool, DerError> {
        match self.expect(TAG_BOOLEAN)?.content {
            [0x00] => Ok(false),
            [0xff] => Ok(true),
            _ => Err(DerError::InvalidValue("boolean must be 0x00 or 0xff")),
        }
    }

    pub fn to_oid(&self) -> Result<ObjectIdentifier, DerError> {
        ObjectIdentifier::from_content(self.expect(TAG_OID)?.content)
    }

    /// Text of a UTF8String, PrintableString, IA5String or time element.
    pub fn to_text(&self) -> Result<&'a str, DerError> {
        match self.tag {
            TAG_UTF8_STRING | TAG_PRINTABLE_STRING | TAG_IA5_STRING | TAG_UTC_TIME
            | TAG_GENERALIZED_TIME => core::str::from_utf8(self.content)
                .map_err(|_| DerError::InvalidValue("string is not valid UTF-8")),
            got => Err(DerError::UnexpectedTag { expected: TAG_UTF8_STRING, got }),
        }
    }
}

fn check_minimal_integer(c: &[u8]) -> Result<(), DerError> {
    match c {
        [] => Err(DerError::InvalidValue("empty integer")),
        [0x00, b1, ..] if b1 & 0x80 == 0 => Err(DerError::NonMinimalInteger),
        [0xff, b1, ..] if b1 & 0x80 != 0 => Err(DerError::NonMinimalInteger),
        _ => Ok(()),
    }
}
