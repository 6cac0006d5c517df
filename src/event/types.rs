/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Contains the various types used by [`Event`]s to
//! represent YAML.

use std::borrow::Cow;

use crate::token::{Mark, ScalarStyle, StreamEncoding};

pub type Slice<'a> = crate::token::Slice<'a>;

/// The two tag shorthands every YAML document understands
/// without declaring them
pub const DEFAULT_TAGS: [TagDirective<'static>; 2] = [
    TagDirective {
        handle: Cow::Borrowed("!"),
        prefix: Cow::Borrowed("!"),
    },
    TagDirective {
        handle: Cow::Borrowed("!!"),
        prefix: Cow::Borrowed("tag:yaml.org,2002:"),
    },
];

/// The scalar synthesised wherever the grammar implies a
/// node that is not present in the stream
pub const EMPTY_SCALAR: Scalar<'static> = Scalar::empty();

/// Specific YAML productions found in the YAML stream. Each
/// Event has a start and end mark indicating the range
/// represented by the given Event. See [`EventData`] for
/// all of the possible Event variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<'de>
{
    start_mark: Mark,
    end_mark:   Mark,
    inner:      EventData<'de>,
}

impl<'de> Event<'de>
{
    pub fn new(start_mark: Mark, end_mark: Mark, event: EventData<'de>) -> Self
    {
        Self {
            start_mark,
            end_mark,
            inner: event,
        }
    }

    pub fn start(&self) -> Mark
    {
        self.start_mark
    }

    pub fn end(&self) -> Mark
    {
        self.end_mark
    }

    pub fn data(&self) -> &EventData<'de>
    {
        &self.inner
    }

    pub fn data_mut(&mut self) -> &mut EventData<'de>
    {
        &mut self.inner
    }

    pub fn into_data(self) -> EventData<'de>
    {
        self.inner
    }

    /// The discriminant of this event's payload
    pub fn kind(&self) -> EventKind
    {
        self.inner.kind()
    }
}

/// The possible variants of an [`Event`]. See the
/// documentation on each variant for an explanation of what
/// each variant represents.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData<'de>
{
    /// Beginning of the event stream, always the first
    /// event produced, and only produced once per stream
    StreamStart(StreamStart),
    /// End of events, always the last event produced, and
    /// no more events will be produced after seeing this
    /// event
    StreamEnd,

    /// Start of document content, once seen, all future
    /// events belong to this document's scope, and any tag
    /// resolution or version specific behavior should use
    /// the attached directives
    DocumentStart(DocumentStart<'de>),
    /// End of document content, this event may be followed
    /// either by another DocumentStart, or StreamEnd event
    DocumentEnd(DocumentEnd),

    /// An alias point connected to a previously seen
    /// `Scalar`, `MappingStart`, or `SequenceStart`
    /// anchor; the caller must keep track of this
    /// information
    Alias(Alias<'de>),
    /// A scalar leaf node, fully unescaped
    Scalar(Node<'de, Scalar<'de>>),

    /// Start of a YAML key value production, followed by
    /// zero or more node event pairs until a `MappingEnd`
    /// is reached
    MappingStart(Node<'de, Mapping>),
    /// End of a YAML key value production
    MappingEnd,
    /// Start of a YAML array production, followed by zero
    /// or more node events until a `SequenceEnd` is reached
    SequenceStart(Node<'de, Sequence>),
    /// End of a YAML array production
    SequenceEnd,
}

impl<'de> EventData<'de>
{
    pub fn kind(&self) -> EventKind
    {
        match self
        {
            EventData::StreamStart(_) => EventKind::StreamStart,
            EventData::StreamEnd => EventKind::StreamEnd,
            EventData::DocumentStart(_) => EventKind::DocumentStart,
            EventData::DocumentEnd(_) => EventKind::DocumentEnd,
            EventData::Alias(_) => EventKind::Alias,
            EventData::Scalar(_) => EventKind::Scalar,
            EventData::MappingStart(_) => EventKind::MappingStart,
            EventData::MappingEnd => EventKind::MappingEnd,
            EventData::SequenceStart(_) => EventKind::SequenceStart,
            EventData::SequenceEnd => EventKind::SequenceEnd,
        }
    }
}

/// Event discriminant, used with
/// [`check_event`][crate::event::Parser#method.check_event]
/// to filter the upcoming event by type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind
{
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias,
    Scalar,
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
}

/// Wrapper around [`Event`] variants that correspond to a
/// YAML node production -- that is, those that may carry an
/// anchor or a tag.
///
/// One of:
///
///   `[Scalar, MappingStart, SequenceStart]`
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'de, T: 'de>
{
    /// The anchor applied to this node (if any)
    pub anchor:  Option<Slice<'de>>,
    /// The tag applied to this node (if any), fully
    /// resolved against the document's tag directives
    pub tag:     Option<Slice<'de>>,
    /// The node's content if simple, or a hint about the
    /// complex structure type
    pub content: T,
}

/// Representation of a YAML scalar node, with its style as
/// written in the stream and the implicit resolution pair
/// the downstream schema uses to type it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar<'de>
{
    /// The scalar's unescaped unicode content
    pub value: Slice<'de>,
    /// Style the scalar was written in
    pub style: ScalarStyle,

    /// May the scalar be resolved by content, as if it had
    /// no tag?
    pub plain_implicit:  bool,
    /// May the scalar be resolved by its quoting style
    /// alone?
    pub quoted_implicit: bool,
}

impl Scalar<'static>
{
    pub const fn empty() -> Self
    {
        Self {
            value:           Slice::Borrowed(""),
            style:           ScalarStyle::Plain,
            plain_implicit:  true,
            quoted_implicit: false,
        }
    }
}

/// MappingStart [`Event`] contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping
{
    /// Was a tag written out for this mapping?
    pub implicit: bool,
    /// Block or flow presentation
    pub style:    CollectionStyle,
}

/// SequenceStart [`Event`] contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence
{
    /// Was a tag written out for this sequence?
    pub implicit: bool,
    /// Block or flow presentation
    pub style:    CollectionStyle,
}

/// YAML's indentation based vs bracketed syntactic styles;
/// events carry the style they were parsed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionStyle
{
    Block,
    Flow,
}

/// StreamStart [`Event`] contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStart
{
    /// Encoding used in the YAML byte stream
    pub encoding: StreamEncoding,
}

/// DocumentStart [`Event`] contents
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStart<'de>
{
    /// Was this event inferred, or present in the stream?
    pub implicit:   bool,
    /// The %YAML directive's version string, if the
    /// document declared one
    pub version:    Option<Slice<'de>>,
    /// The %TAG directives declared by this document. The
    /// built in defaults are never listed here, though they
    /// stay active for tag resolution
    pub directives: Vec<TagDirective<'de>>,
}

/// DocumentEnd [`Event`] contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentEnd
{
    /// Was this event inferred, or present in the stream?
    pub implicit: bool,
}

/// Alias [`Event`] contents
#[derive(Debug, Clone, PartialEq)]
pub struct Alias<'de>
{
    /// Name of the anchor this alias refers to. Never
    /// empty
    pub name: Slice<'de>,
}

/// A single %TAG directive: a handle shorthand and the
/// prefix it expands to. Handles always start and end with
/// '!'
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective<'de>
{
    pub handle: Slice<'de>,
    pub prefix: Slice<'de>,
}

impl<'de> TagDirective<'de>
{
    pub fn new(handle: Slice<'de>, prefix: Slice<'de>) -> Self
    {
        Self { handle, prefix }
    }
}
