// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This is a parser and formatter for *named* S-Expressions: every
//! parenthesized expression starts with its name, followed by string
//! and expression parameters:
//!
//! ```text
//! (config
//!     (server "main host" 8080)
//!     (log debug))
//! ```
//!
//! * `nsexpr::lexer` gives direct access to the token stream, with
//!   the exact source text and the start position of every token.
//!
//! * `nsexpr::parse` builds a [Tree](tree::Tree) from it, checking
//!   that every expression has a name and that there is exactly one
//!   root expression. Errors carry precise location information.
//!
//! * Trees can be searched breadth-first by name or any predicate
//!   (`nsexpr::query`), edited (`nsexpr::tree`), and written back as
//!   text that reads as the same tree (`nsexpr::write`).
//!
//! Strings are just strings: there are no escapes, no comments, and
//! numbers are only interpreted on request (`nsexpr::number`).

pub mod buffered_chars;
pub mod context;
pub mod lexer;
pub mod number;
pub mod parse;
pub mod pos;
pub mod query;
pub mod queue;
pub mod settings;
pub mod tree;
pub mod write;

pub use parse::{parse, parse_file, parse_str};
pub use tree::{Node, NodeId, Param, StringLeaf, Tree};
