/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The token vocabulary shared between the parser and any
//! upstream scanner. A scanner produces [`Token`]s, each a
//! [`TokenData`] payload bracketed by two source [`Mark`]s,
//! and the parser consumes them through the interface in
//! [`crate::scan`].

use std::fmt;

pub type Slice<'a> = std::borrow::Cow<'a, str>;

/// A position in the source byte stream. Copied from tokens
/// onto every event, and attached to errors for
/// diagnostics.
///
/// Ordering is by byte .index first, so marks compare in
/// stream order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark
{
    /// Byte offset into the stream
    pub index:  usize,
    /// Line of the stream, zero indexed
    pub line:   usize,
    /// Offset into the line, zero indexed
    pub column: usize,
}

impl Mark
{
    pub fn new(index: usize, line: usize, column: usize) -> Self
    {
        Self {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for Mark
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

/// A single unit of scanner output: the token's payload
/// plus the marks bracketing the matched bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de>
{
    pub data:  TokenData<'de>,
    pub start: Mark,
    pub end:   Mark,
}

impl<'de> Token<'de>
{
    pub fn new(data: TokenData<'de>, start: Mark, end: Mark) -> Self
    {
        Self { data, start, end }
    }

    /// The discriminant of this token's payload
    pub fn kind(&self) -> TokenKind
    {
        self.data.kind()
    }
}

/// Payloads of tokens that may be emitted by a YAML scanner
#[derive(Debug, Clone, PartialEq)]
pub enum TokenData<'de>
{
    /// The stream's start, with the detected byte encoding
    /// [virtual]
    StreamStart(StreamEncoding),
    /// The stream's end [virtual]
    StreamEnd,
    /// A %YAML, %TAG or reserved directive. The .divider is
    /// the byte index into .value separating the tag handle
    /// from its prefix; it is meaningless for %YAML and
    /// reserved directives
    Directive
    {
        kind:    DirectiveKind,
        value:   Slice<'de>,
        divider: u32,
    },
    /// A '---'
    DocumentStart,
    /// A '...'
    DocumentEnd,
    /// Indentation increase for a block (sequence)
    BlockSequenceStart,
    /// Indentation increase for a block (map)
    BlockMappingStart,
    /// Indentation decrease for a block
    BlockEnd,
    /// A '['
    FlowSequenceStart,
    /// A ']'
    FlowSequenceEnd,
    /// A '{'
    FlowMappingStart,
    /// A '}'
    FlowMappingEnd,
    /// A '-'
    BlockEntry,
    /// A ','
    FlowEntry,
    /// Either a '?' or nothing
    Key,
    /// A ':'
    Value,
    /// An alias (*anchor)
    Alias(Slice<'de>),
    /// An anchor (&anchor)
    Anchor(Slice<'de>),
    /// A tag. The .divider is the byte index into .value
    /// separating the handle from the suffix; a divider of
    /// zero indicates the verbatim (!<uri>) form
    Tag
    {
        value:   Slice<'de>,
        divider: u32,
    },
    /// A scalar's raw bytes and its style. Double quoted
    /// scalars are unescaped by the parser, not the scanner
    Scalar(Slice<'de>, ScalarStyle),
}

impl<'de> TokenData<'de>
{
    pub fn kind(&self) -> TokenKind
    {
        match self
        {
            TokenData::StreamStart(_) => TokenKind::StreamStart,
            TokenData::StreamEnd => TokenKind::StreamEnd,
            TokenData::Directive { .. } => TokenKind::Directive,
            TokenData::DocumentStart => TokenKind::DocumentStart,
            TokenData::DocumentEnd => TokenKind::DocumentEnd,
            TokenData::BlockSequenceStart => TokenKind::BlockSequenceStart,
            TokenData::BlockMappingStart => TokenKind::BlockMappingStart,
            TokenData::BlockEnd => TokenKind::BlockEnd,
            TokenData::FlowSequenceStart => TokenKind::FlowSequenceStart,
            TokenData::FlowSequenceEnd => TokenKind::FlowSequenceEnd,
            TokenData::FlowMappingStart => TokenKind::FlowMappingStart,
            TokenData::FlowMappingEnd => TokenKind::FlowMappingEnd,
            TokenData::BlockEntry => TokenKind::BlockEntry,
            TokenData::FlowEntry => TokenKind::FlowEntry,
            TokenData::Key => TokenKind::Key,
            TokenData::Value => TokenKind::Value,
            TokenData::Alias(_) => TokenKind::Alias,
            TokenData::Anchor(_) => TokenKind::Anchor,
            TokenData::Tag { .. } => TokenKind::Tag,
            TokenData::Scalar(..) => TokenKind::Scalar,
        }
    }
}

/// Token discriminant, used for lookahead type checks and
/// error strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind
{
    StreamStart,
    StreamEnd,
    Directive,
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    Alias,
    Anchor,
    Tag,
    Scalar,
}

impl TokenKind
{
    /// Human readable name of the token kind, as it appears
    /// in error messages
    pub fn name(self) -> &'static str
    {
        match self
        {
            TokenKind::StreamStart => "stream start",
            TokenKind::StreamEnd => "stream end",
            TokenKind::Directive => "directive",
            TokenKind::DocumentStart => "document start",
            TokenKind::DocumentEnd => "document end",
            TokenKind::BlockSequenceStart => "block sequence start",
            TokenKind::BlockMappingStart => "block mapping start",
            TokenKind::BlockEnd => "block end",
            TokenKind::FlowSequenceStart => "flow sequence start",
            TokenKind::FlowSequenceEnd => "flow sequence end",
            TokenKind::FlowMappingStart => "flow mapping start",
            TokenKind::FlowMappingEnd => "flow mapping end",
            TokenKind::BlockEntry => "block entry",
            TokenKind::FlowEntry => "flow entry",
            TokenKind::Key => "key",
            TokenKind::Value => "value",
            TokenKind::Alias => "alias",
            TokenKind::Anchor => "anchor",
            TokenKind::Tag => "tag",
            TokenKind::Scalar => "scalar",
        }
    }
}

/// Kind of a directive token, as classified by the scanner.
/// Reserved directives are surfaced so the parser can skip
/// them silently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind
{
    Yaml,
    Tag,
    Other,
}

/// Byte encoding detected at the head of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamEncoding
{
    UTF8,
    UTF16LE,
    UTF16BE,
    UTF32LE,
    UTF32BE,
}

/// Presentation style of a scalar token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle
{
    Plain,
    SingleQuote,
    DoubleQuote,
    Literal,
    Folded,
}
