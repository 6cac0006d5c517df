/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This module contains the errors that may surface while
//! parsing a YAML token stream into events.
//!
//! Every error is fatal: the parser makes no attempt at
//! recovery, and latches finished after returning one.

use std::fmt;

use crate::{scan::ScanError, token::Mark};

/// Result type returned by [`yamel::event`](super)
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Possible errors that can be encountered while parsing
/// YAML events.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError
{
    /// The token stream did not begin with a stream start
    /// token.
    ///
    /// Typically, this only happens if a [`Scan`] source
    /// was partially drained before being handed to the
    /// parser.
    ///
    /// [`Scan`]: trait@crate::scan::Scan
    CorruptStream
    {
        /// Position of the offending token
        mark: Mark,
    },

    /// The grammar expected one token kind and the scanner
    /// produced another.
    ///
    /// Carries two positions: the .context_mark names the
    /// opening of the enclosing collection (or the start of
    /// the node being parsed), the .mark the token that
    /// disagreed with the grammar.
    ///
    /// ## Examples
    ///
    /// ```yaml
    /// - 1
    /// - 2
    /// foo: bar # should be: '- foo: bar'
    /// #^^ expected block end
    /// ```
    Syntax
    {
        /// The production being parsed, e.g "a block
        /// collection"
        context:      &'static str,
        /// Where that production was opened
        context_mark: Mark,
        /// What the grammar wanted, e.g "expected block
        /// end"
        problem:      &'static str,
        /// Human readable kind of the token found instead
        found:        &'static str,
        /// Position of the offending token
        mark:         Mark,
    },

    /// Directives were not followed by a DocumentStart
    /// ('---') indicator.
    ///
    /// ## Examples
    ///
    /// ```yaml
    /// %YAML 1.2
    /// document: 1 # should be preceded by '---'
    /// ```
    MissingDocumentStart
    {
        /// Human readable kind of the token found instead
        found: &'static str,
        /// Position of the offending token
        mark:  Mark,
    },

    /// More than one `%YAML` directive was found inside a
    /// single document's context.
    ///
    /// ## Examples
    ///
    /// ```yaml
    /// %YAML 1.2
    /// %YAML 1.2
    /// #^^^^^^^^ DuplicateVersion
    /// ---
    /// ```
    DuplicateVersion
    {
        /// Position of the second %YAML directive
        mark: Mark,
    },

    /// A `%YAML` directive declared a major version other
    /// than 1.
    ///
    /// ## Examples
    ///
    /// ```yaml
    /// %YAML 2.0
    /// #^^^^^^^^ IncompatibleVersion
    /// ---
    /// ```
    IncompatibleVersion
    {
        /// The version string as written
        version: String,
        /// Position of the directive
        mark:    Mark,
    },

    /// More than one `%TAG` directive was found _for the
    /// same handle_ inside a single document's context.
    ///
    /// ## Examples
    ///
    /// ```yaml
    /// %TAG !handle! my:custom:tag/
    /// %TAG !handle! my:other:tag/
    /// #    ^^^^^^^^ DuplicateTagHandle
    /// ---
    /// ```
    DuplicateTagHandle
    {
        /// The handle declared twice
        handle: String,
        /// Position of the second declaration
        mark:   Mark,
    },

    /// A node's tag referenced a handle that has not been
    /// defined.
    ///
    /// ## Examples
    ///
    /// ```yaml
    /// key: !handle! value
    /// #    ^^^^^^^^ UndefinedTagHandle
    /// ```
    UndefinedTagHandle
    {
        /// The handle as written
        handle:       String,
        /// Start of the node carrying the tag
        context_mark: Mark,
        /// Position of the tag itself
        mark:         Mark,
    },

    /// The parser was expecting more tokens, but the token
    /// stream finished unexpectedly.
    UnexpectedEOF,

    /// An issue occurred in the scanner layer, propagated
    /// unchanged.
    Scanner(ScanError),
}

impl ParseError
{
    /// The position the error blames, if it carries one
    pub fn mark(&self) -> Option<Mark>
    {
        match self
        {
            Self::CorruptStream { mark }
            | Self::Syntax { mark, .. }
            | Self::MissingDocumentStart { mark, .. }
            | Self::DuplicateVersion { mark }
            | Self::IncompatibleVersion { mark, .. }
            | Self::DuplicateTagHandle { mark, .. }
            | Self::UndefinedTagHandle { mark, .. } => Some(*mark),
            Self::UnexpectedEOF | Self::Scanner(_) => None,
        }
    }

    /// The position of the enclosing production, for errors
    /// that record one
    pub fn context_mark(&self) -> Option<Mark>
    {
        match self
        {
            Self::Syntax { context_mark, .. }
            | Self::UndefinedTagHandle { context_mark, .. } => Some(*context_mark),
            _ => None,
        }
    }
}

impl From<ScanError> for ParseError
{
    fn from(e: ScanError) -> Self
    {
        match e
        {
            ScanError::UnexpectedEOF => Self::UnexpectedEOF,
            other => Self::Scanner(other),
        }
    }
}

impl fmt::Display for ParseError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            Self::CorruptStream { mark } =>
            {
                write!(f, "expected stream start at {}", mark)
            },
            Self::Syntax {
                context,
                context_mark,
                problem,
                found,
                mark,
            } =>
            {
                write!(
                    f,
                    "while parsing {} at {}: {}, but found: {} at {}",
                    context, context_mark, problem, found, mark
                )
            },
            Self::MissingDocumentStart { found, mark } =>
            {
                write!(f, "expected document start, but found: {} at {}", found, mark)
            },
            Self::DuplicateVersion { mark } =>
            {
                write!(f, "duplicate %YAML directive at {}", mark)
            },
            Self::IncompatibleVersion { version, mark } =>
            {
                write!(
                    f,
                    "incompatible document version {} (version 1.x is required) at {}",
                    version, mark
                )
            },
            Self::DuplicateTagHandle { handle, mark } =>
            {
                write!(f, "duplicate tag handle: {} at {}", handle, mark)
            },
            Self::UndefinedTagHandle {
                handle,
                context_mark,
                mark,
            } =>
            {
                write!(
                    f,
                    "while parsing a node at {}: found undefined tag handle: {} at {}",
                    context_mark, handle, mark
                )
            },
            Self::UnexpectedEOF => f.write_str("unexpected end of token stream"),
            Self::Scanner(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ParseError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        match self
        {
            Self::Scanner(e) => Some(e),
            _ => None,
        }
    }
}
