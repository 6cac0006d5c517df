/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The contract between the parser and its token source.
//!
//! A scanner is anything that can lazily yield a [`Token`]
//! sequence with one token of lookahead. The parser drives
//! it exclusively through the three methods of [`Scan`],
//! and never reaches around the interface.
//!
//! This module also ships [`TokenQueue`], an in-memory
//! implementation over already scanned tokens. It is the
//! bridge type an upstream scanner can push into, and what
//! this crate's own test suites script token streams with.

mod error;
mod queue;

pub use error::{ScanError, ScanResult};
pub use queue::TokenQueue;

use crate::token::{Token, TokenKind};

/// Interface over the functionality that produces
/// [`Token`]s for the parser, one at a time.
///
/// The `'de` lifetime is the lifetime of the underlying
/// byte source; token slices borrowed from it remain valid
/// independently of the implementor.
pub trait Scan<'de>: std::fmt::Debug
{
    /// Borrow the next token without consuming it
    fn peek_token(&mut self) -> ScanResult<&Token<'de>>;

    /// Consume and return the next token, transferring its
    /// string slices to the caller
    fn get_token(&mut self) -> ScanResult<Token<'de>>;

    /// Check the next token's kind without consuming it.
    /// An empty .kinds set matches any token
    fn check_token(&mut self, kinds: &[TokenKind]) -> ScanResult<bool>
    {
        let token = self.peek_token()?;

        Ok(kinds.is_empty() || kinds.contains(&token.kind()))
    }
}
