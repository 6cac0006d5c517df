/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{error::Error as StdError, fmt};

use crate::{event::error::ParseError, token::Mark};

/// Result typedef used throughout this library's public API
pub type Result<T> = std::result::Result<T, Error>;

/// Opaque type representing all possible errors which can
/// occur during library usage.
///
/// The underlying cause is boxed to keep `Result`s cheap to
/// pass around; interrogate it through
/// [`classify`](#method.classify) and the mark accessors.
pub struct Error
{
    inner: Box<ParseError>,
}

impl Error
{
    /// The position in the stream the error blames, if the
    /// error carries one.
    pub fn mark(&self) -> Option<Mark>
    {
        self.inner.mark()
    }

    /// The position of the enclosing production ("while
    /// parsing a ... here"), for errors that record one.
    pub fn context_mark(&self) -> Option<Mark>
    {
        self.inner.context_mark()
    }

    /// Categorize the error into one of the following:
    ///
    /// - [`Category::Syntax`] The token stream disagreed
    ///   with YAML's grammar
    /// - [`Category::Directive`] A document's directives
    ///   were invalid, or a tag couldn't resolve
    /// - [`Category::EOF`] The token stream ended
    ///   unexpectedly
    pub fn classify(&self) -> Category
    {
        match *self.inner
        {
            ParseError::CorruptStream { .. }
            | ParseError::Syntax { .. }
            | ParseError::MissingDocumentStart { .. } => Category::Syntax,
            ParseError::DuplicateVersion { .. }
            | ParseError::IncompatibleVersion { .. }
            | ParseError::DuplicateTagHandle { .. }
            | ParseError::UndefinedTagHandle { .. } => Category::Directive,
            ParseError::UnexpectedEOF | ParseError::Scanner(_) => Category::EOF,
        }
    }
}

/// Rough category of an [`Error`].
///
/// Useful for making decisions upon encountering an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category
{
    /// The token stream was not syntactically valid YAML
    Syntax,

    /// A %YAML or %TAG directive was invalid, or a node's
    /// tag handle couldn't be resolved
    Directive,

    /// The token stream unexpectedly terminated before it
    /// was appropriate to do so
    EOF,
}

impl From<ParseError> for Error
{
    fn from(err: ParseError) -> Self
    {
        Self {
            inner: Box::new(err),
        }
    }
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl StdError for Error
{
    fn source(&self) -> Option<&(dyn StdError + 'static)>
    {
        self.inner.source()
    }
}
