/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Errors that belong to the scanner layer of the pipeline.
//! The parser propagates these unchanged.

use std::fmt;

/// Result type returned by [`Scan`][super::Scan]
/// implementations
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Possible failures of a token source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError
{
    /// A token was requested past the end of the stream.
    ///
    /// A well formed token stream ends with a StreamEnd
    /// token, so the parser only hits this if the scanner
    /// terminated early.
    UnexpectedEOF,

    /// The raw bytes of a double quoted scalar contained an
    /// escape sequence the scanner should have rejected.
    UnknownEscape,
}

impl fmt::Display for ScanError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            Self::UnexpectedEOF => f.write_str("unexpected end of token stream"),
            Self::UnknownEscape =>
            {
                f.write_str("unknown escape sequence in a double quoted scalar")
            },
        }
    }
}

impl std::error::Error for ScanError {}
