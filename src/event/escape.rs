/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This module exports function(s) for decoding the escape
//! sequences of double quoted scalars, which the scanner
//! deliberately leaves unexpanded.

use crate::{
    scan::{ScanError, ScanResult as Result},
    token::Slice,
};

/// Unescape the raw contents of a double quoted scalar as
/// defined in [Section 5.7][Link]. Specifically, YAML
/// defines 18 'special' escapes, and 3 methods of encoding
/// 8, 16 and 32 bit unicode points.
///
/// The common case -- no escapes at all -- borrows the
/// input unchanged; otherwise the unescaped content is
/// built in a fresh buffer. The function is pure and does
/// not touch parser state.
///
/// [Link]: https://yaml.org/spec/1.2/spec.html#c-escape
pub(in crate::event) fn unescape(raw: Slice<'_>) -> Result<Slice<'_>>
{
    // Not an escape sequence in sight, early exit
    if !raw.contains('\\')
    {
        return Ok(raw);
    }

    let mut scratch = String::with_capacity(raw.len());
    let mut buffer = raw.as_ref();

    while let Some(at) = buffer.find('\\')
    {
        scratch.push_str(&buffer[..at]);

        let amt = unescape_one(&buffer[at..], &mut scratch)?;
        buffer = &buffer[at + amt..];
    }

    scratch.push_str(buffer);

    Ok(Slice::Owned(scratch))
}

/// Expand the single escape sequence starting .buffer,
/// writing the replacement to .scratch and returning the
/// length of .buffer consumed. It expects .buffer->0 is a
/// backslash (\\), as this is the only valid start of an
/// escape sequence.
fn unescape_one(buffer: &str, scratch: &mut String) -> Result<usize>
{
    let mut escape_len: Option<u8> = None;

    // See 5.7: Escaped Characters
    // yaml.org/spec/1.2/spec.html#id2776092
    match buffer.as_bytes()
    {
        [b'\\', b'0', ..] => scratch.push('\0'),
        [b'\\', b'a', ..] => scratch.push('\x07'),
        [b'\\', b'b', ..] => scratch.push('\x08'),
        [b'\\', b't', ..] | [b'\\', b'\t', ..] => scratch.push('\x09'),
        [b'\\', b'n', ..] => scratch.push('\x0A'),
        [b'\\', b'v', ..] => scratch.push('\x0B'),
        [b'\\', b'f', ..] => scratch.push('\x0C'),
        [b'\\', b'r', ..] => scratch.push('\x0D'),
        [b'\\', b'e', ..] => scratch.push('\x1B'),
        [b'\\', b' ', ..] => scratch.push('\x20'),
        [b'\\', b'"', ..] => scratch.push('"'),
        // Forward slashes are not supported in the 1.1 spec
        [b'\\', b'/', ..] => scratch.push('/'),
        [b'\\', b'\\', ..] => scratch.push('\\'),
        [b'\\', b'N', ..] => scratch.push(NEL),
        [b'\\', b'_', ..] => scratch.push(NBS),
        [b'\\', b'L', ..] => scratch.push(LS),
        [b'\\', b'P', ..] => scratch.push(PS),
        // An escaped line break folds away entirely
        [b'\\', b'\n', ..] =>
        {},
        [b'\\', b'x', ..] => escape_len = Some(2),
        [b'\\', b'u', ..] => escape_len = Some(4),
        [b'\\', b'U', ..] => escape_len = Some(8),
        [b'\\'] => return Err(ScanError::UnexpectedEOF),
        _ =>
        {
            // The scanner validates escapes before handing the scalar
            // over, so hitting this arm is a scanner bug
            debug_assert!(false, "scanner accepted an escape this decoder does not know");

            return Err(ScanError::UnknownEscape);
        },
    }

    match escape_len
    {
        Some(sequence) => write_unicode_point(&buffer[2..], scratch, sequence).map(|amt| 2 + amt),
        None => Ok(2),
    }
}

/// Parse .codepoint_len hex digits from .base into a
/// unicode code point, pushing it to the scratch space
fn write_unicode_point(base: &str, scratch: &mut String, codepoint_len: u8) -> Result<usize>
{
    let mut value: u32 = 0;

    let digits = base
        .as_bytes()
        .get(..codepoint_len as usize)
        .ok_or(ScanError::UnexpectedEOF)?;

    for b in digits
    {
        if !b.is_ascii_hexdigit()
        {
            debug_assert!(false, "scanner accepted a non hex digit in a unicode escape");

            return Err(ScanError::UnknownEscape);
        }

        value = (value << 4) + as_hex(*b) as u32;
    }

    // Surrogate halves and out of range points have no char
    // representation
    let point = char::from_u32(value).ok_or(ScanError::UnknownEscape)?;
    scratch.push(point);

    Ok(codepoint_len as usize)
}

/*
 * Inclusive range suggested by clippy here is 5-10%
 * slower than doing it by hand, see
 *
 * github.com/rust-lang/rust/issues/45222
 */
#[allow(clippy::manual_range_contains)]
#[inline]
fn as_hex(b: u8) -> u8
{
    if b >= b'A' && b <= b'F'
    {
        b - b'A' + 10
    }
    else if b >= b'a' && b <= b'f'
    {
        b - b'a' + 10
    }
    else
    {
        b - b'0'
    }
}

/// <Next Line> (U+0085)
const NEL: char = '\u{0085}';
/// <No-Break Space> (U+00A0)
const NBS: char = '\u{00A0}';
/// <Line Separator> (U+2028)
const LS: char = '\u{2028}';
/// <Paragraph Separator> (U+2029)
const PS: char = '\u{2029}';
