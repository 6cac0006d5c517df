/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This library exposes methods for transforming YAML token
//! streams into flat streams of parse events, ready for a
//! downstream composer to turn into a node graph.
//!
//! The interesting entry point is [`event::Parser`], which
//! consumes any [`scan::Scan`] token source and enforces
//! YAML's grammar over it: document boundaries, block and
//! flow collections, tag directive resolution and double
//! quoted escape decoding. Scanning bytes into tokens, and
//! composing events into values, belong to the layers
//! around this crate.

#![allow(dead_code)]
#![allow(clippy::suspicious_else_formatting)]

pub mod event;
pub mod scan;
pub mod token;

pub mod error;
