/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This module exposes methods for transforming YAML token
//! streams into event streams.
//!
//! ## Understanding Events
//!
//! Each event produced represents an important semantic
//! change in the underlying YAML stream. Broadly, these can
//! be categorized into three spaces:
//!
//! 1. Virtual / Marker
//!     - [`StreamStart`]
//!     - [`StreamEnd`]
//!     - [`DocumentStart`]
//!     - [`DocumentEnd`]
//!
//! 2. Nesting change (+-)
//!     - [`MappingStart`]
//!     - [`MappingEnd`]
//!     - [`SequenceStart`]
//!     - [`SequenceEnd`]
//!
//! 3. Data / Alias
//!     - [`Scalar`]
//!     - [`Alias`]
//!
//! Together, these are used to produce the following
//! productions:
//!
//! ```text
//! stream          := StreamStart document+ StreamEnd
//! document        := DocumentStart content? DocumentEnd
//! content         := Scalar | collection
//! collection      := sequence | mapping
//! sequence        := SequenceStart node* SequenceEnd
//! mapping         := MappingStart (node node)* MappingEnd
//! node            := Alias | content
//!
//! ?               => 0 or 1 of prefix
//! *               => 0 or more of prefix
//! +               => 1 or more of prefix
//! ()              => production grouping
//! |               => production logical OR
//! ```
//!
//! Every event also carries the pair of stream [`Mark`]s it
//! spans, so callers can attribute output to input without
//! keeping their own offsets.
//!
//! [`StreamStart`]:    type@types::EventData::StreamStart
//! [`StreamEnd`]:      type@types::EventData::StreamEnd
//! [`DocumentStart`]:  type@types::EventData::DocumentStart
//! [`DocumentEnd`]:    type@types::EventData::DocumentEnd
//! [`MappingStart`]:   type@types::EventData::MappingStart
//! [`MappingEnd`]:     type@types::EventData::MappingEnd
//! [`SequenceStart`]:  type@types::EventData::SequenceStart
//! [`SequenceEnd`]:    type@types::EventData::SequenceEnd
//! [`Scalar`]:         type@types::EventData::Scalar
//! [`Alias`]:          type@types::EventData::Alias
//! [`Mark`]:           struct@crate::token::Mark

mod directive;
mod escape;
mod parser;
mod state;

pub(crate) mod error;

pub mod types;

pub use parser::{EventIter, EventIterRef, Parser};

use crate::scan::Scan;

/// Instantiates a new [`Parser`] over the given token
/// source.
///
/// The [`Event`][types::Event]s produced have their
/// lifetime bound to the source's backing storage, and
/// remain valid for as long as that `'de` borrow is live.
///
/// ## Examples
///
/// ```rust
/// use yamel::{
///     event::{from_scanner, types::EventData},
///     scan::TokenQueue,
///     token::{Mark, ScalarStyle, StreamEncoding, Token, TokenData},
/// };
///
/// let m = Mark::default();
/// let tokens: TokenQueue = vec![
///     Token::new(TokenData::StreamStart(StreamEncoding::UTF8), m, m),
///     Token::new(TokenData::Scalar("a scalar".into(), ScalarStyle::Plain), m, m),
///     Token::new(TokenData::StreamEnd, m, m),
/// ]
/// .into_iter()
/// .collect();
///
/// let events = from_scanner(tokens);
///
/// let expected: Vec<fn(&EventData) -> bool> = vec![
///     // Start of stream housekeeping
///     |e| matches!(e, EventData::StreamStart(_)),
///     |e| matches!(e, EventData::DocumentStart(_)),
///     // 'a scalar'
///     |e| matches!(e, EventData::Scalar(_)),
///     // End of stream housekeeping
///     |e| matches!(e, EventData::DocumentEnd(_)),
///     |e| matches!(e, EventData::StreamEnd),
/// ];
///
/// for (event, check) in events.into_iter().filter_map(Result::ok).zip(expected)
/// {
///     assert!(check(event.data()));
/// }
/// ```
pub fn from_scanner<'de, S>(scanner: S) -> Parser<'de, S>
where
    S: Scan<'de>,
{
    Parser::new(scanner)
}
