/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This module exposes the [`Parser`] struct and related
//! types. The Parser takes a sequence of [`Token`]s
//! produced by a generic [`Scan`] interface, and converts
//! them into a series of [`Event`]s. These events are the
//! core of higher level functionality exposed by this
//! library.
//!
//! ## Invoking the Parser
//!
//! Each [`Parser`] owns the [`Scan`] source it was created
//! with, and is driven through three methods:
//!
//! 1. [`check_event`](Parser#method.check_event)
//! 2. [`peek_event`](Parser#method.peek_event)
//! 3. [`next_event`](Parser#method.next_event)
//!
//! The first checks the upcoming event's kind without
//! consuming it and is always safe to call; the second
//! borrows the upcoming event; the third returns it and
//! advances. At most one event is ever computed ahead of
//! the caller.
//!
//! An [`Iterator`] interface is also available, either
//! borrowing via [`iter`](Parser#method.iter) or owning via
//! [`IntoIterator`], ending cleanly once the stream
//! finishes.
//!
//! [`Token`]: struct@crate::token::Token
//! [`Scan`]: trait@crate::scan::Scan

#[macro_use]
mod macros;

use crate::{
    event::{
        directive::{process_directives, resolve_tag},
        error::{ParseError as Error, ParseResult},
        escape::unescape,
        state::{Flags, State, StateMachine, O_EMPTY, O_FIRST, O_IMPLICIT, O_NIL},
        types::{
            self, CollectionStyle, Event, EventData, EventKind, Slice, TagDirective,
            EMPTY_SCALAR,
        },
    },
    scan::Scan,
    token::{Mark, ScalarStyle, TokenKind},
};

/// The [`Parser`] translates any [`Token`] stream produced
/// by a [`Scan`] source into higher level [`Event`]s,
/// enforcing YAML's grammar along the way.
///
/// Between events the parser is reentrant: each call runs
/// the grammar exactly far enough to produce one event,
/// resuming where the previous call left off. A stream is
/// finished once [`EventData::StreamEnd`] has been
/// returned; requesting further events past that point is a
/// caller bug (except through
/// [`check_event`](#method.check_event), which simply
/// reports false).
///
/// [`Token`]: struct@crate::token::Token
/// [`Scan`]: trait@crate::scan::Scan
#[derive(Debug)]
pub struct Parser<'de, S>
{
    scanner: S,
    state:   StateMachine,
    pending: Option<Event<'de>>,

    version:    Option<Slice<'de>>,
    directives: Vec<TagDirective<'de>>,
    done:       bool,
}

impl<'de, S> Parser<'de, S>
where
    S: Scan<'de>,
{
    /// Instantiate a new [`Parser`], taking ownership of
    /// its token source.
    pub fn new(scanner: S) -> Self
    {
        Self {
            scanner,
            state: StateMachine::default(),
            pending: None,

            version: None,
            directives: Vec::new(),
            done: false,
        }
    }

    /// Check whether the upcoming [`Event`]'s kind is one
    /// of .kinds, computing it if necessary. An empty
    /// .kinds set matches any event.
    ///
    /// Unlike the other methods on this struct, it is
    /// always safe to call this; a finished stream just
    /// returns false.
    pub fn check_event(&mut self, kinds: &[EventKind]) -> crate::error::Result<bool>
    {
        if self.pending.is_none()
        {
            if self.done
            {
                return Ok(false);
            }

            let event = self.produce()?;
            self.pending = Some(event);
        }

        Ok(self
            .pending
            .as_ref()
            .map_or(false, |event| kinds.is_empty() || kinds.contains(&event.kind())))
    }

    /// Borrow the upcoming [`Event`], computing it if
    /// necessary.
    ///
    /// ## Panics
    ///
    /// If the stream has already finished. Use
    /// [`check_event`](#method.check_event) to detect the
    /// end of the stream.
    pub fn peek_event(&mut self) -> crate::error::Result<&Event<'de>>
    {
        if self.pending.is_none()
        {
            let event = self.produce()?;
            self.pending = Some(event);
        }

        match &self.pending
        {
            Some(event) => Ok(event),
            None => unreachable!("a pending event was just materialized"),
        }
    }

    /// Return the next [`Event`], advancing the stream.
    ///
    /// ## Panics
    ///
    /// If the stream has already finished. Use
    /// [`check_event`](#method.check_event) to detect the
    /// end of the stream.
    pub fn next_event(&mut self) -> crate::error::Result<Event<'de>>
    {
        match self.pending.take()
        {
            Some(event) => Ok(event),
            None => Ok(self.produce()?),
        }
    }

    /// The version string declared by the current
    /// document's %YAML directive, unset outside of
    /// documents (and inside ones that didn't declare it)
    pub fn version(&self) -> Option<&Slice<'de>>
    {
        self.version.as_ref()
    }

    /// Return an iterator which borrows from this
    /// [`Parser`].
    pub fn iter<'a>(&'a mut self) -> EventIterRef<'a, 'de, S>
    {
        EventIterRef { parser: self }
    }

    /// Runs the state machine far enough to produce the
    /// next [`Event`].
    ///
    /// The first error is fatal: the parser latches
    /// finished and will not run the grammar again.
    fn produce(&mut self) -> ParseResult<Event<'de>>
    {
        assert!(
            !self.done,
            "event requested after the event stream finished"
        );

        let result = self.state_transition();

        if result.is_err()
        {
            self.done = true;
        }

        result
    }

    /// Process the next event in the state machine, running
    /// the associated routine
    fn state_transition(&mut self) -> ParseResult<Event<'de>>
    {
        match *self.state.top()
        {
            State::StreamStart => self.stream_start(),
            State::DocumentStart(opts) => self.document_start(opts),
            State::DocumentContent => self.document_content(),
            State::DocumentEnd => self.document_end(),
            State::BlockNode => self.node(BLOCK_CONTEXT, !INDENTLESS),
            State::BlockNodeOrIndentlessSequence => self.node(BLOCK_CONTEXT, INDENTLESS),
            State::FlowNode => self.node(!BLOCK_CONTEXT, !INDENTLESS),
            State::BlockSequenceEntry(opts) => self.block_sequence_entry(opts),
            State::IndentlessSequenceEntry => self.indentless_sequence_entry(),
            State::BlockMappingKey(opts) => self.block_mapping_key(opts),
            State::BlockMappingValue => self.block_mapping_value(),
            State::FlowSequenceEntry(opts) => self.flow_sequence_entry(opts),
            State::FlowSequenceMappingKey => self.flow_sequence_entry_mapping_key(),
            State::FlowSequenceMappingValue => self.flow_sequence_entry_mapping_value(),
            State::FlowSequenceMappingEnd => self.flow_sequence_entry_mapping_end(),
            State::FlowMappingKey(opts) => self.flow_mapping_key(opts),
            State::FlowMappingValue(opts) => self.flow_mapping_value(opts),

            // State machine terminus, .done latches before this is
            // reachable
            State::StreamEnd => unreachable!("the finished state machine was reinvoked"),
        }
    }

    /// Start of token stream, ensure the underlying token
    /// source hasn't been tampered with, and return the
    /// associated Event
    fn stream_start(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, _, kind) = peek!(self)?;

        let event = match kind
        {
            TokenKind::StreamStart => initEvent!(@consume StreamStart => self),
            _ => Err(Error::CorruptStream { mark: start }),
        }?;

        state!(~self, -> State::DocumentStart(O_IMPLICIT | O_FIRST));

        Ok(event)
    }

    /// Start of a new document, process any directives,
    /// determine if it's explicit and prime the state
    /// machine accordingly, returning the associated Event;
    /// or, if the stream has no more documents, the stream
    /// end Event
    fn document_start(&mut self, opts: Flags) -> ParseResult<Event<'de>>
    {
        let implicit = opts.contains(O_IMPLICIT);
        let first = opts.contains(O_FIRST);

        // If the document is explicit we need to skip any extra
        // DocumentEnd tokens ('...')
        if !implicit
        {
            while peek!(~self)? == TokenKind::DocumentEnd
            {
                pop!(self)?;
            }
        }

        let (start, _, kind) = peek!(self)?;
        let markers = matches!(
            kind,
            TokenKind::Directive | TokenKind::DocumentStart | TokenKind::StreamEnd
        );

        // Implicit, non empty document, no directives
        if implicit && !markers
        {
            self.version = None;
            self.directives = types::DEFAULT_TAGS.to_vec();

            let event = initEvent!(@event DocumentStart => (start, start, (None, Vec::new(), true)));

            // Enqueue State.DocumentEnd, set active to State.BlockNode
            state!(~self, >> State::DocumentEnd, -> State::BlockNode);

            Ok(event)
        }
        // Explicit document, maybe with directives
        else if kind != TokenKind::StreamEnd
        {
            // Retrieve any directives for the current document,
            // rebuilding the active tag map
            let (version, directives) =
                process_directives(&mut self.scanner, &mut self.directives)?;

            self.version = version.clone();

            // Ensure we have an explicit DocumentStart indicator
            let (found_start, _, found) = peek!(self)?;

            if found != TokenKind::DocumentStart
            {
                return Err(Error::MissingDocumentStart {
                    found: found.name(),
                    mark:  found_start,
                });
            }

            let token = pop!(self)?;
            let event =
                initEvent!(@event DocumentStart => (start, token.end, (version, directives, false)));

            // Enqueue State.DocumentEnd, set active to
            // State.DocumentContent
            state!(~self, >> State::DocumentEnd, -> State::DocumentContent);

            Ok(event)
        }
        // We always return at least one document event pair, even
        // if the stream is empty
        else if first
        {
            self.version = None;
            self.directives = types::DEFAULT_TAGS.to_vec();

            let event = initEvent!(@event DocumentStart => (start, start, (None, Vec::new(), true)));

            // DocumentContent synthesises the empty root node
            // before DocumentEnd returns control to us
            state!(~self, >> State::DocumentEnd, -> State::DocumentContent);

            Ok(event)
        }
        // Stream end, transition the state machine to its final
        // state
        else
        {
            let token = pop!(self)?;

            debug_assert!(self.state.stacks_empty());

            state!(~self, -> State::StreamEnd);
            self.done = true;

            Ok(initEvent!(@event StreamEnd => (token.start, token.end, ())))
        }
    }

    /// Handle an explicit, maybe empty document returning
    /// the root node [`Event`], or an empty scalar if the
    /// document has no content.
    fn document_content(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, _, kind) = peek!(self)?;

        // Check if the next token indicates an empty document
        let empty = matches!(
            kind,
            TokenKind::Directive
                | TokenKind::DocumentStart
                | TokenKind::DocumentEnd
                | TokenKind::StreamEnd
        );

        // The document is empty, so its root node is an implied
        // empty scalar
        if empty
        {
            state!(~self, << None);

            Ok(self.empty_scalar(start))
        }
        // Otherwise, process the document's node graph
        else
        {
            self.node(BLOCK_CONTEXT, !INDENTLESS)
        }
    }

    /// End of document, determine if its explicit, and
    /// return the associated Event
    fn document_end(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, mut end, kind) = peek!(self)?;
        let mut implicit = true;

        if kind == TokenKind::DocumentEnd
        {
            pop!(self)?;
            implicit = false;
        }
        else
        {
            // If the token isn't a DocumentEnd, then this Event is
            // "virtual" and has no real length
            end = start;
        }

        // The version is document scoped
        self.version = None;

        // Any following document must announce itself explicitly
        state!(~self, -> State::DocumentStart(O_NIL));

        Ok(initEvent!(@event DocumentEnd => (start, end, implicit)))
    }

    /// Produce a node or alias [`Event`], gathering any
    /// anchor and tag ahead of the node's content.
    ///
    /// .block selects between the block and flow grammar,
    /// and .indentless allows the node to be a sequence
    /// written at its parent mapping's indentation level
    fn node(&mut self, block: bool, indentless: bool) -> ParseResult<Event<'de>>
    {
        let (token_start, _, kind) = peek!(self)?;

        // If the node is an alias, return it
        if kind == TokenKind::Alias
        {
            state!(~self, << None);

            return initEvent!(@consume Alias => self);
        }

        // Look for any anchor or tag in the token stream. At most
        // one of each, in either order
        let mut anchor = None;
        let mut tag_token = None;
        let mut start = token_start;
        let mut end = token_start;

        match kind
        {
            TokenKind::Anchor =>
            {
                let (s, e, name) = consume!(self, Anchor)?;
                start = s;
                end = e;
                anchor = Some(name);

                if peek!(~self)? == TokenKind::Tag
                {
                    let (tag_mark, e, tag) = consume!(self, Tag)?;
                    end = e;
                    tag_token = Some((tag, tag_mark));
                }
            },
            TokenKind::Tag =>
            {
                let (s, e, tag) = consume!(self, Tag)?;
                start = s;
                end = e;
                tag_token = Some((tag, s));

                if peek!(~self)? == TokenKind::Anchor
                {
                    let (_, e, name) = consume!(self, Anchor)?;
                    end = e;
                    anchor = Some(name);
                }
            },
            _ =>
            {},
        }

        // Rewrite the tag through the document's active directives
        let tag = match tag_token
        {
            Some(((value, divider), tag_mark)) =>
            {
                Some(resolve_tag(&self.directives, value, divider, start, tag_mark)?)
            },
            None => None,
        };

        let implicit = tag.is_none() || tag.as_deref() == Some("!");

        // Refresh our current token view
        let (next_start, next_end, kind) = peek!(self)?;

        // Handle possible node variants
        match kind
        {
            // An indentless sequence entry; only mapping values may
            // start one, and the entry token stays in the stream
            TokenKind::BlockEntry if indentless =>
            {
                let event = initEvent!(@event SequenceStart => (start, next_end, (anchor, tag, implicit, CollectionStyle::Block)));

                state!(~self, -> State::IndentlessSequenceEntry);

                Ok(event)
            },
            // Non empty scalar
            TokenKind::Scalar =>
            {
                let (_, scalar_end, (value, style)) = consume!(self, Scalar)?;

                // The scanner leaves double quoted escapes unexpanded
                let value = match style
                {
                    ScalarStyle::DoubleQuote => unescape(value)?,
                    _ => value,
                };

                let plain_implicit = (style == ScalarStyle::Plain && tag.is_none())
                    || tag.as_deref() == Some("!");
                let quoted_implicit = !plain_implicit && tag.is_none();

                let content = types::Scalar {
                    value,
                    style,
                    plain_implicit,
                    quoted_implicit,
                };

                state!(~self, << None);

                Ok(initEvent!(@event Scalar => (start, scalar_end, (anchor, tag, content))))
            },
            // Start of sequence (flow)
            TokenKind::FlowSequenceStart =>
            {
                let event = initEvent!(@event SequenceStart => (start, next_end, (anchor, tag, implicit, CollectionStyle::Flow)));

                state!(~self, -> State::FlowSequenceEntry(O_FIRST));

                Ok(event)
            },
            // Start of mapping (flow)
            TokenKind::FlowMappingStart =>
            {
                let event = initEvent!(@event MappingStart => (start, next_end, (anchor, tag, implicit, CollectionStyle::Flow)));

                state!(~self, -> State::FlowMappingKey(O_FIRST));

                Ok(event)
            },
            // Start of sequence (block)
            TokenKind::BlockSequenceStart if block =>
            {
                let event = initEvent!(@event SequenceStart => (start, next_end, (anchor, tag, implicit, CollectionStyle::Block)));

                state!(~self, -> State::BlockSequenceEntry(O_FIRST));

                Ok(event)
            },
            // Start of mapping (block)
            TokenKind::BlockMappingStart if block =>
            {
                let event = initEvent!(@event MappingStart => (start, next_end, (anchor, tag, implicit, CollectionStyle::Block)));

                state!(~self, -> State::BlockMappingKey(O_FIRST));

                Ok(event)
            },
            // Implicit, empty scalar; note we do not consume the
            // unknown token here
            _ if anchor.is_some() || tag.is_some() =>
            {
                let content = types::Scalar {
                    plain_implicit: implicit,
                    ..EMPTY_SCALAR
                };

                state!(~self, << None);

                Ok(initEvent!(@event Scalar => (start, end, (anchor, tag, content))))
            },
            // Otherwise the YAML stream is invalid
            _ => Err(Error::Syntax {
                context:      if block { "a block node" } else { "a flow node" },
                context_mark: start,
                problem:      "expected node content",
                found:        kind.name(),
                mark:         next_start,
            }),
        }
    }

    /// Block context sequence entry, return the associated
    /// node or sequence end [`Event`]
    fn block_sequence_entry(&mut self, opts: Flags) -> ParseResult<Event<'de>>
    {
        // Handle the sequence start if this is the first entry,
        // recording the opener's mark for error attribution
        if opts.contains(O_FIRST)
        {
            let token = pop!(self)?;

            debug_assert!(token.kind() == TokenKind::BlockSequenceStart);

            self.state.push_mark(token.start);
        }

        let (start, end, kind) = peek!(self)?;

        match kind
        {
            // Sequence entry
            TokenKind::BlockEntry =>
            {
                pop!(self)?;

                match peek!(~self)?
                {
                    /*
                     * Handles productions with empty implicit nodes, e.g
                     *
                     *  sequence:
                     *    -
                     *  # ^------- Entry (-) implies content exists
                     *    - 1
                     *    - N...
                     */
                    TokenKind::BlockEntry | TokenKind::BlockEnd =>
                    {
                        state!(~self, -> State::BlockSequenceEntry(O_NIL));

                        Ok(self.empty_scalar(end))
                    },
                    // Otherwise send it on to the YAML Node handler, saving our state to the stack
                    _ =>
                    {
                        state!(~self, >> State::BlockSequenceEntry(O_NIL));

                        self.node(BLOCK_CONTEXT, !INDENTLESS)
                    },
                }
            },
            // End of sequence, produce the SequenceEnd event
            TokenKind::BlockEnd =>
            {
                pop!(self)?;
                state!(~self, << None);
                self.state.pop_mark();

                Ok(initEvent!(@event SequenceEnd => (start, end, ())))
            },
            // Otherwise the YAML stream is invalid
            _ => Err(Error::Syntax {
                context:      "a block collection",
                context_mark: self.state.pop_mark().unwrap_or_default(),
                problem:      "expected block end",
                found:        kind.name(),
                mark:         start,
            }),
        }
    }

    /// Entry of a sequence written at its parent mapping's
    /// indentation level. Such sequences have no opening or
    /// closing token: they end at the first token that
    /// cannot continue them
    fn indentless_sequence_entry(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, end, kind) = peek!(self)?;

        if kind == TokenKind::BlockEntry
        {
            pop!(self)?;

            match peek!(~self)?
            {
                TokenKind::BlockEntry
                | TokenKind::Key
                | TokenKind::Value
                | TokenKind::BlockEnd =>
                {
                    state!(~self, -> State::IndentlessSequenceEntry);

                    Ok(self.empty_scalar(end))
                },
                _ =>
                {
                    state!(~self, >> State::IndentlessSequenceEntry);

                    self.node(BLOCK_CONTEXT, !INDENTLESS)
                },
            }
        }
        else
        {
            // No mark was pushed for this sequence, and the end
            // event is zero width at whatever follows
            state!(~self, << None);

            Ok(initEvent!(@event SequenceEnd => (start, start, ())))
        }
    }

    /// Block context mapping key, return the appropriate
    /// node or mapping end [`Event`], pushing a mapping
    /// value state to the stack in the former case
    fn block_mapping_key(&mut self, opts: Flags) -> ParseResult<Event<'de>>
    {
        // If we're starting a new mapping we need to skip the
        // opening token, recording its mark
        if opts.contains(O_FIRST)
        {
            let token = pop!(self)?;

            debug_assert!(token.kind() == TokenKind::BlockMappingStart);

            self.state.push_mark(token.start);
        }

        let (start, end, kind) = peek!(self)?;

        match kind
        {
            // Found the start of a mapping KV set
            TokenKind::Key =>
            {
                pop!(self)?;

                // Any token other than the below is either a possible Node
                // token sequence, or an error which node() will catch
                match peek!(~self)?
                {
                    // Otherwise something strange is going on, could be an implied key or an error
                    TokenKind::Key | TokenKind::Value | TokenKind::BlockEnd =>
                    {
                        state!(~self, -> State::BlockMappingValue);

                        Ok(self.empty_scalar(end))
                    },
                    _ =>
                    {
                        state!(~self, >> State::BlockMappingValue);

                        self.node(BLOCK_CONTEXT, INDENTLESS)
                    },
                }
            },
            // End of this mapping, pop the state stack
            TokenKind::BlockEnd =>
            {
                pop!(self)?;
                state!(~self, << None);
                self.state.pop_mark();

                Ok(initEvent!(@event MappingEnd => (start, end, ())))
            },
            // Otherwise its an error
            _ => Err(Error::Syntax {
                context:      "a block mapping",
                context_mark: self.state.pop_mark().unwrap_or_default(),
                problem:      "expected key or block end",
                found:        kind.name(),
                mark:         start,
            }),
        }
    }

    /// Block context mapping value, return the appropriate
    /// node [`Event`], synthesising an empty scalar if the
    /// value is implied
    fn block_mapping_value(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, end, kind) = peek!(self)?;

        match kind
        {
            // Found a value in a KV mapping set
            TokenKind::Value =>
            {
                pop!(self)?;

                match peek!(~self)?
                {
                    // An implied value
                    TokenKind::Key | TokenKind::Value | TokenKind::BlockEnd =>
                    {
                        state!(~self, -> State::BlockMappingKey(O_NIL));

                        Ok(self.empty_scalar(end))
                    },
                    _ =>
                    {
                        state!(~self, >> State::BlockMappingKey(O_NIL));

                        self.node(BLOCK_CONTEXT, INDENTLESS)
                    },
                }
            },
            // Because we are processing a KV value here, we have already processed a KV key, and
            // therefore a value is automatically implied, regardless of what token follows.
            _ =>
            {
                state!(~self, -> State::BlockMappingKey(O_NIL));

                Ok(self.empty_scalar(start))
            },
        }
    }

    /// Flow context sequence entry, return the associated
    /// node or sequence end [`Event`]
    fn flow_sequence_entry(&mut self, opts: Flags) -> ParseResult<Event<'de>>
    {
        let first = opts.contains(O_FIRST);

        // If this is the first entry, we need to skip the
        // SequenceStart token, recording its mark
        if first
        {
            let token = pop!(self)?;

            debug_assert!(token.kind() == TokenKind::FlowSequenceStart);

            self.state.push_mark(token.start);
        }

        let (start, _, kind) = peek!(self)?;

        // If its not the end of a sequence, we need to determine
        // the next state
        if kind != TokenKind::FlowSequenceEnd
        {
            /*
             * If its not the first entry, there *must* be a
             * FlowEntry indicator (',') e.g:
             *
             * [ one, two, three]
             *  ^   ^    ^
             *  |   But the rest must have an entry
             *  Okay to skip the first ','
             */
            if !first
            {
                match kind
                {
                    TokenKind::FlowEntry => pop!(self).map(drop)?,
                    _ =>
                    {
                        return Err(Error::Syntax {
                            context:      "a flow sequence",
                            context_mark: self.state.pop_mark().unwrap_or_default(),
                            problem:      "expected ',' or ']'",
                            found:        kind.name(),
                            mark:         start,
                        })
                    },
                }
            }

            // Refresh our token view
            let (_, _, kind) = peek!(self)?;

            match kind
            {
                /*
                 * Start of a "compact" flow context mapping
                 *
                 * Note here, we *haven't* seen a FlowMappingStart, we've seen a Key...
                 * That is, we're looking at a production like this:
                 *
                 *  [  key: value ,  entryN... ]
                 *    ^----------^ Note the lack of '{' '}'s
                 *
                 *  YAML allows this *only* inside a flow sequence with
                 *  exactly 1 KV pair, and it is also how sets are
                 *  written with explicit '?' keys.
                 *
                 *  See:
                 *      yaml.org/spec/1.2.2/#example-flow-mapping-adjacent-values
                 */
                TokenKind::Key =>
                {
                    let token = pop!(self)?;
                    let event = initEvent!(@event MappingStart => (token.start, token.end, (NO_ANCHOR, NO_TAG, true, CollectionStyle::Flow)));

                    state!(~self, -> State::FlowSequenceMappingKey);

                    return Ok(event);
                },
                // If its not a mapping, or a sequence end, then it must be a node
                k if k != TokenKind::FlowSequenceEnd =>
                {
                    // Save our sequence state to the stack
                    state!(~self, >> State::FlowSequenceEntry(O_NIL));

                    // Forward to node() to determine our next state
                    return self.node(!BLOCK_CONTEXT, !INDENTLESS);
                },
                // Otherwise, this must be a sequence end
                _ =>
                {},
            }
        }

        let token = pop!(self)?;

        state!(~self, << None);
        self.state.pop_mark();

        Ok(initEvent!(@event SequenceEnd => (token.start, token.end, ())))
    }

    /// Flow mapping key with parent flow sequence, return
    /// the associated node [`Event`] and prep the tight
    /// state loop for flow_sequence->flow_mapping token
    /// sequences
    fn flow_sequence_entry_mapping_key(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, _, kind) = peek!(self)?;

        /*
         * If the token is one of these, then we must add an
         * empty key as one is implied by the stream,
         * e.g:
         *
         * [  : a value, ]
         *   ^ key is implied here
         */
        let empty = matches!(
            kind,
            TokenKind::Value | TokenKind::FlowEntry | TokenKind::FlowSequenceEnd
        );

        // Not empty, save our state to the stack, and forward to
        // node()
        if !empty
        {
            state!(~self, >> State::FlowSequenceMappingValue);

            self.node(!BLOCK_CONTEXT, !INDENTLESS)
        }
        // Otherwise, return an empty scalar as the key
        else
        {
            state!(~self, -> State::FlowSequenceMappingValue);

            Ok(self.empty_scalar(start))
        }
    }

    /// Flow mapping value with parent flow sequence, return
    /// the associated node [`Event`].
    ///
    /// Note it is an invariant of this function that it
    /// must *always* leave a FlowSequenceMappingEnd at the
    /// top of the state machine -- excluding error cases.
    fn flow_sequence_entry_mapping_value(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, _, kind) = peek!(self)?;

        if kind == TokenKind::Value
        {
            pop!(self)?;

            let (next_start, _, next) = peek!(self)?;

            // A real value follows
            if !matches!(next, TokenKind::FlowEntry | TokenKind::FlowSequenceEnd)
            {
                state!(~self, >> State::FlowSequenceMappingEnd);

                return self.node(!BLOCK_CONTEXT, !INDENTLESS);
            }

            state!(~self, -> State::FlowSequenceMappingEnd);

            Ok(self.empty_scalar(next_start))
        }
        // Otherwise it must be an empty, implied value
        else
        {
            state!(~self, -> State::FlowSequenceMappingEnd);

            Ok(self.empty_scalar(start))
        }
    }

    /// Clean up after a flow_sequence->flow_mapping state
    /// loop, returning the appropriate mapping end
    /// [`Event`] -- zero width, as no token exists for it
    fn flow_sequence_entry_mapping_end(&mut self) -> ParseResult<Event<'de>>
    {
        let (start, _, _) = peek!(self)?;

        // Revert to parsing the next entry in the parent sequence
        state!(~self, -> State::FlowSequenceEntry(O_NIL));

        Ok(initEvent!(@event MappingEnd => (start, start, ())))
    }

    /// Flow context mapping key, return the appropriate
    /// node or mapping end [`Event`], pushing a mapping
    /// value state to the stack in the former case
    fn flow_mapping_key(&mut self, opts: Flags) -> ParseResult<Event<'de>>
    {
        let first = opts.contains(O_FIRST);

        // If this is the first entry, we need to skip the
        // MappingStart token, recording its mark
        if first
        {
            let token = pop!(self)?;

            debug_assert!(token.kind() == TokenKind::FlowMappingStart);

            self.state.push_mark(token.start);
        }

        let (start, _, kind) = peek!(self)?;

        // If this isn't the end of the mapping, process KV entries
        if kind != TokenKind::FlowMappingEnd
        {
            /*
             * If its not the first entry, there *must* be a
             * FlowEntry indicator (',') e.g:
             *
             * { key: value, another: key }
             *  ^          ^
             *  |          But the rest must have an entry
             *  Okay to skip the first ','
             */
            if !first
            {
                match kind
                {
                    TokenKind::FlowEntry => pop!(self).map(drop)?,
                    _ =>
                    {
                        return Err(Error::Syntax {
                            context:      "a flow mapping",
                            context_mark: self.state.pop_mark().unwrap_or_default(),
                            problem:      "expected ',' or '}'",
                            found:        kind.name(),
                            mark:         start,
                        })
                    },
                }
            }

            // Refresh our token view
            let (_, _, kind) = peek!(self)?;

            match kind
            {
                // Definitely have a key, determine what kind
                TokenKind::Key =>
                {
                    pop!(self)?;

                    let (next_start, _, next) = peek!(self)?;

                    /*
                     * If the token is one of these, then we must add an
                     * empty key as one is implied by the stream,
                     * e.g:
                     *
                     * { : a value, another: value }
                     *  ^ key is implied here
                     */
                    let empty = matches!(
                        next,
                        TokenKind::Value | TokenKind::FlowEntry | TokenKind::FlowMappingEnd
                    );

                    // Not empty, push state to stack and forward to node()
                    if !empty
                    {
                        state!(~self, >> State::FlowMappingValue(O_NIL));

                        return self.node(!BLOCK_CONTEXT, !INDENTLESS);
                    }

                    // Empty, generate an empty scalar
                    state!(~self, -> State::FlowMappingValue(O_NIL));

                    return Ok(self.empty_scalar(next_start));
                },
                /*
                 * Here we catch a strange edge case in flow mappings:
                 *
                 * { hello }
                 *        ^ Note the complete lack of *both* entry and
                 *          value indicators.
                 *
                 * YAML allows this, translated to:
                 *
                 * { hello: "" }
                 *
                 * as the value is "implied" by the lack of an entry
                 * (',') delimiter and the closing brace.
                 */
                k if k != TokenKind::FlowMappingEnd =>
                {
                    // Set the value state handler to return an empty scalar and
                    // return control to this handler
                    state!(~self, >> State::FlowMappingValue(O_EMPTY));

                    return self.node(!BLOCK_CONTEXT, !INDENTLESS);
                },
                // Else we fetch the mapping end
                _ =>
                {},
            }
        }

        let token = pop!(self)?;

        state!(~self, << None);
        self.state.pop_mark();

        Ok(initEvent!(@event MappingEnd => (token.start, token.end, ())))
    }

    /// Flow context mapping value, return the appropriate
    /// node [`Event`], synthesising an empty scalar if the
    /// value is implied
    fn flow_mapping_value(&mut self, opts: Flags) -> ParseResult<Event<'de>>
    {
        let (start, _, kind) = peek!(self)?;

        // If we're handling the edge case empty value, just return
        // it
        if opts.contains(O_EMPTY)
        {
            state!(~self, -> State::FlowMappingKey(O_NIL));

            return Ok(self.empty_scalar(start));
        }

        // Got an actual value
        if kind == TokenKind::Value
        {
            pop!(self)?;

            let (next_start, _, next) = peek!(self)?;

            /*
             * Check that the value is real not implied, e.g:
             *
             * { key: } or {key: , another: key }
             *       ^          ^
             *       Implied values
             */
            if !matches!(next, TokenKind::FlowEntry | TokenKind::FlowMappingEnd)
            {
                state!(~self, >> State::FlowMappingKey(O_NIL));

                return self.node(!BLOCK_CONTEXT, !INDENTLESS);
            }

            state!(~self, -> State::FlowMappingKey(O_NIL));

            return Ok(self.empty_scalar(next_start));
        }

        state!(~self, -> State::FlowMappingKey(O_NIL));

        Ok(self.empty_scalar(start))
    }

    /// Produce an empty scalar node [`Event`] at the given
    /// zero width .mark
    fn empty_scalar(&mut self, mark: Mark) -> Event<'static>
    {
        initEvent!(@event Scalar => (mark, mark, (NO_ANCHOR, NO_TAG, EMPTY_SCALAR)))
    }
}

impl<'de, S> IntoIterator for Parser<'de, S>
where
    S: Scan<'de>,
{
    type IntoIter = EventIter<'de, S>;
    type Item = crate::error::Result<Event<'de>>;

    fn into_iter(self) -> Self::IntoIter
    {
        EventIter { parser: self }
    }
}

/// Owning iterator over a [`Parser`]'s events. Ends cleanly
/// after the stream end event, or after the first error.
#[derive(Debug)]
pub struct EventIter<'de, S>
{
    parser: Parser<'de, S>,
}

impl<'de, S> EventIter<'de, S>
where
    S: Scan<'de>,
{
    /// Retrieve the underlying [`Parser`], discarding this
    /// iterator
    pub fn into_inner(self) -> Parser<'de, S>
    {
        self.parser
    }
}

impl<'de, S> Iterator for EventIter<'de, S>
where
    S: Scan<'de>,
{
    type Item = crate::error::Result<Event<'de>>;

    fn next(&mut self) -> Option<Self::Item>
    {
        match self.parser.check_event(&[])
        {
            Ok(true) => Some(self.parser.next_event()),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Borrowing iterator over a [`Parser`]'s events. Ends
/// cleanly after the stream end event, or after the first
/// error.
#[derive(Debug)]
pub struct EventIterRef<'a, 'de, S>
{
    parser: &'a mut Parser<'de, S>,
}

impl<'a, 'de, S> Iterator for EventIterRef<'a, 'de, S>
where
    S: Scan<'de>,
{
    type Item = crate::error::Result<Event<'de>>;

    fn next(&mut self) -> Option<Self::Item>
    {
        match self.parser.check_event(&[])
        {
            Ok(true) => Some(self.parser.next_event()),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

const BLOCK_CONTEXT: bool = true;
const INDENTLESS: bool = true;
const NO_ANCHOR: Option<Slice<'static>> = None;
const NO_TAG: Option<Slice<'static>> = None;

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        scan::TokenQueue,
        token::{DirectiveKind, ScalarStyle::*, StreamEncoding, Token, TokenData::*},
    };

    #[macro_use]
    mod macros;

    /// Unwraps the Parser's Option-returning internals for
    /// a test friendly view of the event stream
    struct ParseIter<'de>
    {
        parser: Parser<'de, TokenQueue<'de>>,
    }

    impl<'de> ParseIter<'de>
    {
        fn new(tokens: TokenQueue<'de>) -> Self
        {
            Self {
                parser: Parser::new(tokens),
            }
        }

        fn next_event(&mut self) -> ParseResult<Option<Event<'de>>>
        {
            if let Some(event) = self.parser.pending.take()
            {
                return Ok(Some(event));
            }

            if self.parser.done
            {
                return Ok(None);
            }

            self.parser.produce().map(Some)
        }
    }

    #[test]
    fn empty_stream()
    {
        let tokens = tokens![StreamStart(StreamEncoding::UTF8), StreamEnd];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        )
    }

    #[test]
    fn empty_document_explicit()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            DocumentStart,
            DocumentEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart @explicit }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ DocumentEnd @explicit }),
            | event!({ StreamEnd }),
            @ None
        )
    }

    #[test]
    fn simple_scalar()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Scalar(cow!("Scalar only YAML document"), SingleQuote),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!("Scalar only YAML document", SingleQuote)) }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn simple_sequence()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockSequenceStart,
            BlockEntry,
            Scalar(cow!("Entry #1"), DoubleQuote),
            BlockEntry,
            Scalar(cow!("Entry #2"), DoubleQuote),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("Entry #1", DoubleQuote)) }),
            | event!({ Scalar node!(scalar!("Entry #2", DoubleQuote)) }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn nested_sequence()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockSequenceStart,
            BlockEntry,
            BlockSequenceStart,
            BlockEntry,
            Scalar(cow!("inner"), Plain),
            BlockEnd,
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart block }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("inner")) }),
            | event!({ SequenceEnd }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn simple_mapping()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockMappingStart,
            Key,
            Scalar(cow!("a key"), Plain),
            Value,
            Scalar(cow!("a value"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart block }),
            | event!({ Scalar node!(scalar!("a key")) }),
            | event!({ Scalar node!(scalar!("a value")) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn block_sequence_entry_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockSequenceStart,
            BlockEntry,
            Scalar(cow!("a"), Plain),
            BlockEntry,
            /* Scalar, */
            BlockEntry,
            Scalar(cow!("c"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("a")) }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ Scalar node!(scalar!("c")) }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn block_mapping_key_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockMappingStart,
            Key,
            /* Scalar, */
            Value,
            Scalar(cow!("value 1"), Plain),
            Key,
            Scalar(cow!("key 2"), Plain),
            Value,
            Scalar(cow!("value 2"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart block }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ Scalar node!(scalar!("value 1")) }),
            | event!({ Scalar node!(scalar!("key 2")) }),
            | event!({ Scalar node!(scalar!("value 2")) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn block_mapping_value_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockMappingStart,
            Key,
            Scalar(cow!("key 1"), Plain),
            Value,
            /* Scalar, */
            Key,
            Scalar(cow!("key 2"), Plain),
            /* Value, */
            /* Scalar, */
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart block }),
            | event!({ Scalar node!(scalar!("key 1")) }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ Scalar node!(scalar!("key 2")) }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn indentless_sequence()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockMappingStart,
            Key,
            Scalar(cow!("seq"), Plain),
            Value,
            BlockEntry,
            Scalar(cow!("one"), Plain),
            BlockEntry,
            Scalar(cow!("two"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart block }),
            | event!({ Scalar node!(scalar!("seq")) }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("one")) }),
            | event!({ Scalar node!(scalar!("two")) }),
            | event!({ SequenceEnd }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn indentless_sequence_entry_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockMappingStart,
            Key,
            Scalar(cow!("seq"), Plain),
            Value,
            BlockEntry,
            /* Scalar, */
            BlockEntry,
            Scalar(cow!("last"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart block }),
            | event!({ Scalar node!(scalar!("seq")) }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ Scalar node!(scalar!("last")) }),
            | event!({ SequenceEnd }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_sequence_empty()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_sequence()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            Scalar(cow!("one"), Plain),
            FlowEntry,
            Scalar(cow!("two"), Plain),
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            | event!({ Scalar node!(scalar!("one")) }),
            | event!({ Scalar node!(scalar!("two")) }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_sequence_compact_mapping()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            /* FlowMappingStart */
            Key,
            Scalar(cow!("a"), Plain),
            Value,
            Scalar(cow!("b"), Plain),
            /* FlowMappingEnd */
            FlowEntry,
            Scalar(cow!("c"), Plain),
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("a")) }),
            | event!({ Scalar node!(scalar!("b")) }),
            | event!({ MappingEnd }),
            | event!({ Scalar node!(scalar!("c")) }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_sequence_compact_mapping_key_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            /* FlowMappingStart */
            Key,
            /* Scalar */
            Value,
            Scalar(cow!("compact mapping value"), DoubleQuote),
            /* FlowMappingEnd */
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ Scalar node!(scalar!("compact mapping value", DoubleQuote)) }),
            | event!({ MappingEnd }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_sequence_compact_mapping_value_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            /* FlowMappingStart */
            Key,
            Scalar(cow!("compact mapping key"), DoubleQuote),
            Value,
            /* Scalar */
            /* FlowMappingEnd */
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("compact mapping key", DoubleQuote)) }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ MappingEnd }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_mapping()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowMappingStart,
            Key,
            Scalar(cow!("key 1"), Plain),
            Value,
            Scalar(cow!("value 1"), Plain),
            FlowEntry,
            Key,
            Scalar(cow!("key 2"), Plain),
            Value,
            Scalar(cow!("value 2"), Plain),
            FlowMappingEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("key 1")) }),
            | event!({ Scalar node!(scalar!("value 1")) }),
            | event!({ Scalar node!(scalar!("key 2")) }),
            | event!({ Scalar node!(scalar!("value 2")) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_mapping_key_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowMappingStart,
            Key,
            /* Scalar */
            Value,
            Scalar(cow!("value 1"), SingleQuote),
            FlowMappingEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ Scalar node!(scalar!("value 1", SingleQuote)) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_mapping_value_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowMappingStart,
            Key,
            Scalar(cow!("key 1"), SingleQuote),
            Value,
            /* Scalar */
            FlowMappingEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("key 1", SingleQuote)) }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn flow_mapping_key_singleton()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowMappingStart,
            /* Key */
            Scalar(cow!("singleton key"), SingleQuote),
            /* Value */
            /* Scalar */
            FlowMappingEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart flow }),
            | event!({ Scalar node!(scalar!("singleton key", SingleQuote)) }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn double_quoted_escapes()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Scalar(cow!(r#"\x41\u00e9"#), DoubleQuote),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!("Aé", DoubleQuote)) }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn tags()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Tag {
                value:   cow!("!!map"),
                divider: 2,
            },
            BlockMappingStart,
            Key,
            Tag {
                value:   cow!("!!str"),
                divider: 2,
            },
            Scalar(cow!("a key"), Plain),
            Value,
            Tag {
                value:   cow!("!!str"),
                divider: 2,
            },
            Scalar(cow!("a value"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ MappingStart block @"tag:yaml.org,2002:map" }),
            | event!({ Scalar node!(scalar!("a key", Plain, false, false), @"tag:yaml.org,2002:str") }),
            | event!({ Scalar node!(scalar!("a value", Plain, false, false), @"tag:yaml.org,2002:str") }),
            | event!({ MappingEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn tag_non_specific()
    {
        // A bare '!' resolves to itself and leaves the node
        // resolvable by content
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Tag {
                value:   cow!("!"),
                divider: 1,
            },
            Scalar(cow!("scalar"), DoubleQuote),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!("scalar", DoubleQuote, true, false), @"!") }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn tag_local()
    {
        // '!suffix' expands through the '!' default
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Tag {
                value:   cow!("!local"),
                divider: 1,
            },
            Scalar(cow!("scalar"), Plain),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!("scalar", Plain, false, false), @"!local") }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn node_anchor()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Anchor(cow!("name")),
            Scalar(cow!("anchored"), Plain),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!("anchored"), &"name") }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn node_anchor_implied()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Anchor(cow!("empty")),
            /* Scalar */
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ Scalar node!(scalar!(""), &"empty") }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn node_alias()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockSequenceStart,
            BlockEntry,
            Anchor(cow!("a")),
            Scalar(cow!("anchored"), Plain),
            BlockEntry,
            Alias(cow!("a")),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("anchored"), &"a") }),
            | event!({ Alias "a" }),
            | event!({ SequenceEnd }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        );
    }

    #[test]
    fn multi_document_explicit()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            DocumentStart,
            Scalar(cow!("Document 1"), SingleQuote),
            DocumentEnd,
            DocumentStart,
            Scalar(cow!("Document 2"), SingleQuote),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart @explicit }),
            | event!({ Scalar node!(scalar!("Document 1", SingleQuote)) }),
            | event!({ DocumentEnd @explicit }),
            | event!({ DocumentStart @explicit }),
            | event!({ Scalar node!(scalar!("Document 2", SingleQuote)) }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        )
    }

    #[test]
    fn multi_document_directives()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Directive {
                kind:    DirectiveKind::Yaml,
                value:   cow!("1.1"),
                divider: 0,
            },
            Directive {
                kind:    DirectiveKind::Tag,
                value:   cow!("!yaml!tag:yaml.org,2002:"),
                divider: 6,
            },
            DocumentStart,
            Tag {
                value:   cow!("!yaml!str"),
                divider: 6,
            },
            Scalar(cow!("foo"), Plain),
            DocumentEnd,
            Directive {
                kind:    DirectiveKind::Tag,
                value:   cow!("!test!doc2:"),
                divider: 6,
            },
            DocumentStart,
            DocumentEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart @explicit %"1.1" [{"!yaml!", "tag:yaml.org,2002:"}] }),
            | event!({ Scalar node!(scalar!("foo", Plain, false, false), @"tag:yaml.org,2002:str") }),
            | event!({ DocumentEnd @explicit }),
            | event!({ DocumentStart @explicit [{"!test!", "doc2:"}] }),
            | event!({ Scalar node!(scalar!("")) }),
            | event!({ DocumentEnd @explicit }),
            | event!({ StreamEnd }),
            @ None
        )
    }

    #[test]
    fn reserved_directive_skipped()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Directive {
                kind:    DirectiveKind::Other,
                value:   cow!("FOO bar baz"),
                divider: 0,
            },
            DocumentStart,
            Scalar(cow!("content"), Plain),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart @explicit }),
            | event!({ Scalar node!(scalar!("content")) }),
            | event!({ DocumentEnd }),
            | event!({ StreamEnd }),
            @ None
        )
    }

    #[test]
    fn error_undefined_tag_handle()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Tag {
                value:   cow!("!foo!bar"),
                divider: 5,
            },
            Scalar(cow!("baz"), Plain),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            > Error::UndefinedTagHandle {
                handle:       "!foo!".into(),
                context_mark: Default::default(),
                mark:         Default::default(),
            },
        );
    }

    #[test]
    fn error_undefined_tag_handle_marks()
    {
        fn mk(index: usize) -> Mark
        {
            Mark::new(index, 0, index)
        }

        let mut queue = TokenQueue::new();

        vec![
            Token::new(StreamStart(StreamEncoding::UTF8), mk(0), mk(0)),
            Token::new(Anchor(cow!("a")), mk(0), mk(2)),
            Token::new(
                Tag {
                    value:   cow!("!foo!bar"),
                    divider: 5,
                },
                mk(3),
                mk(11),
            ),
            Token::new(Scalar(cow!("baz"), Plain), mk(12), mk(15)),
            Token::new(StreamEnd, mk(16), mk(16)),
        ]
        .into_iter()
        .for_each(|token| queue.push(token));

        let mut iter = ParseIter::new(queue);

        iter.next_event().expect("stream start");
        iter.next_event().expect("document start");

        // The context blames the node's start, the problem
        // the tag itself
        assert_eq!(
            iter.next_event(),
            Err(Error::UndefinedTagHandle {
                handle:       "!foo!".into(),
                context_mark: mk(0),
                mark:         mk(3),
            })
        );
    }

    #[test]
    fn error_duplicate_version()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Directive {
                kind:    DirectiveKind::Yaml,
                value:   cow!("1.1"),
                divider: 0,
            },
            Directive {
                kind:    DirectiveKind::Yaml,
                value:   cow!("1.2"),
                divider: 0,
            },
            DocumentStart,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            > Error::DuplicateVersion {
                mark: Default::default()
            },
        );
    }

    #[test]
    fn error_missing_document_start()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            DocumentStart,
            Scalar(cow!("Document 1"), Plain),
            DocumentEnd,
            /* DocumentStart, */
            Scalar(cow!("Document 2"), Plain),
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart @explicit }),
            | event!({ Scalar node!(scalar!("Document 1")) }),
            | event!({ DocumentEnd @explicit }),
            > Error::MissingDocumentStart {
                found: "scalar",
                mark:  Default::default(),
            },
        );
    }

    #[test]
    fn error_block_collection_unterminated()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            BlockSequenceStart,
            BlockEntry,
            Scalar(cow!("a"), Plain),
            Key,
            Scalar(cow!("b"), Plain),
            Value,
            Scalar(cow!("c"), Plain),
            BlockEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart block }),
            | event!({ Scalar node!(scalar!("a")) }),
            > Error::Syntax {
                context:      "a block collection",
                context_mark: Default::default(),
                problem:      "expected block end",
                found:        "key",
                mark:         Default::default(),
            },
        );
    }

    #[test]
    fn error_flow_sequence_missing_entry()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            Scalar(cow!("a"), Plain),
            /* FlowEntry, */
            Scalar(cow!("b"), Plain),
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            | event!({ Scalar node!(scalar!("a")) }),
            > Error::Syntax {
                context:      "a flow sequence",
                context_mark: Default::default(),
                problem:      "expected ',' or ']'",
                found:        "scalar",
                mark:         Default::default(),
            },
        );
    }

    #[test]
    fn error_missing_node_content()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            FlowSequenceStart,
            Value,
            FlowSequenceEnd,
            StreamEnd
        ];

        events!(tokens =>
            | event!({ StreamStart }),
            | event!({ DocumentStart }),
            | event!({ SequenceStart flow }),
            > Error::Syntax {
                context:      "a flow node",
                context_mark: Default::default(),
                problem:      "expected node content",
                found:        "value",
                mark:         Default::default(),
            },
        );
    }

    #[test]
    fn event_marks_follow_tokens()
    {
        fn mk(index: usize) -> Mark
        {
            Mark::new(index, 0, index)
        }

        let mut queue = TokenQueue::new();

        vec![
            Token::new(StreamStart(StreamEncoding::UTF8), mk(0), mk(0)),
            Token::new(BlockSequenceStart, mk(0), mk(0)),
            Token::new(BlockEntry, mk(0), mk(1)),
            Token::new(Scalar(cow!("a"), Plain), mk(2), mk(3)),
            Token::new(BlockEntry, mk(4), mk(5)),
            /* Scalar, */
            Token::new(BlockEntry, mk(6), mk(7)),
            Token::new(Scalar(cow!("c"), Plain), mk(8), mk(9)),
            Token::new(BlockEnd, mk(10), mk(10)),
            Token::new(StreamEnd, mk(10), mk(10)),
        ]
        .into_iter()
        .for_each(|token| queue.push(token));

        let mut iter = ParseIter::new(queue);
        let mut spans = Vec::new();

        while let Ok(Some(event)) = iter.next_event()
        {
            assert!(event.start() <= event.end());

            spans.push((event.start().index, event.end().index));
        }

        assert_eq!(
            spans,
            vec![
                (0, 0),   // stream start
                (0, 0),   // document start (virtual)
                (0, 0),   // sequence start
                (2, 3),   // 'a'
                (5, 5),   // implied empty entry
                (8, 9),   // 'c'
                (10, 10), // sequence end
                (10, 10), // document end (virtual)
                (10, 10), // stream end
            ]
        );
    }

    #[test]
    fn check_peek_next_triad()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Scalar(cow!("x"), Plain),
            StreamEnd
        ];
        let mut parser = Parser::new(tokens);

        assert!(parser.check_event(&[EventKind::StreamStart]).unwrap());
        assert!(!parser.check_event(&[EventKind::Scalar]).unwrap());
        assert!(parser.check_event(&[]).unwrap());

        // Peeking must not consume
        let peeked = parser.peek_event().unwrap().clone();
        let next = parser.next_event().unwrap();

        assert_eq!(peeked, next);
        assert_eq!(next.kind(), EventKind::StreamStart);

        // Drain the remaining events
        let mut kinds = Vec::new();

        while parser.check_event(&[]).unwrap()
        {
            kinds.push(parser.next_event().unwrap().kind());
        }

        assert_eq!(
            kinds,
            vec![
                EventKind::DocumentStart,
                EventKind::Scalar,
                EventKind::DocumentEnd,
                EventKind::StreamEnd,
            ]
        );

        // A finished stream reports false forever, without
        // erroring
        assert!(!parser.check_event(&[]).unwrap());
        assert!(!parser.check_event(&[EventKind::Scalar]).unwrap());
    }

    #[test]
    #[should_panic(expected = "after the event stream finished")]
    fn next_event_after_finish_panics()
    {
        let tokens = tokens![StreamStart(StreamEncoding::UTF8), StreamEnd];
        let mut parser = Parser::new(tokens);

        while parser.check_event(&[]).unwrap()
        {
            parser.next_event().unwrap();
        }

        let _ = parser.next_event();
    }

    #[test]
    fn error_latches_finished()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Directive {
                kind:    DirectiveKind::Yaml,
                value:   cow!("2.0"),
                divider: 0,
            },
            DocumentStart,
            StreamEnd
        ];
        let mut parser = Parser::new(tokens);

        parser.next_event().expect("stream start");

        assert!(parser.next_event().is_err());
        assert!(!parser.check_event(&[]).unwrap());
    }

    #[test]
    fn deterministic()
    {
        let data = || {
            tokens![
                StreamStart(StreamEncoding::UTF8),
                FlowMappingStart,
                Key,
                Scalar(cow!("k"), Plain),
                Value,
                FlowSequenceStart,
                Scalar(cow!(r#"\t"#), DoubleQuote),
                FlowSequenceEnd,
                FlowMappingEnd,
                StreamEnd
            ]
        };
        let run = |queue| {
            let mut iter = ParseIter::new(queue);
            let mut events = Vec::new();

            while let Ok(Some(event)) = iter.next_event()
            {
                events.push(event);
            }

            events
        };

        assert_eq!(run(data()), run(data()));
    }

    #[test]
    fn version_accessor()
    {
        let tokens = tokens![
            StreamStart(StreamEncoding::UTF8),
            Directive {
                kind:    DirectiveKind::Yaml,
                value:   cow!("1.2"),
                divider: 0,
            },
            DocumentStart,
            Scalar(cow!("content"), Plain),
            DocumentEnd,
            StreamEnd
        ];
        let mut parser = Parser::new(tokens);

        assert_eq!(parser.version(), None);

        parser.next_event().expect("stream start");
        parser.next_event().expect("document start");

        assert_eq!(parser.version(), Some(&cow!("1.2")));

        parser.next_event().expect("scalar");
        parser.next_event().expect("document end");

        // Versions are document scoped
        assert_eq!(parser.version(), None);
    }
}
