// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building a [Tree](../tree/struct.Tree.html) from a token stream.

//! Every expression must start with its name (a bare or quoted
//! string), followed by any number of strings and nested expressions.
//! The input must hold exactly one expression, or nothing but
//! whitespace. The first error ends parsing; there is no recovery and
//! no partial tree.

use crate::pos::Pos;
use crate::context::{self, Context};
use crate::lexer::{lexer, LexError, Token, TokenKind};
use crate::settings::{ParseSettings, DEFAULT_PARSE_SETTINGS};
use crate::tree::{NodeId, StringLeaf, Tree};
use std::fmt::{Formatter, Display};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use kstring::KString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unexpected open")]
    UnexpectedOpen,
    #[error("unexpected close")]
    UnexpectedClose,
    #[error("unexpected string '{0}'")]
    UnexpectedToken(KString),
    #[error("unexpected EOF")]
    UnexpectedEof,
    #[error("expression without name")]
    ExpressionWithoutName,
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("{0}")]
    Lex(LexError),
}

#[derive(Error, Debug)]
#[error("{err} at {pos}")]
pub struct ParseErrorWithPos {
    pub err: ParseError,
    pub pos: Pos
}

impl ParseError {
    fn at(self, p: Pos) -> ParseErrorWithPos {
        ParseErrorWithPos {
            err: self,
            pos: p
        }
    }
}

#[derive(Error, Debug)]
pub struct ParseErrorWithPosContext {
    err_with_pos: ParseErrorWithPos,
    container: Box<dyn Context>
}

impl ParseErrorWithPosContext {
    pub fn error(&self) -> &ParseErrorWithPos {
        &self.err_with_pos
    }
}

impl Display for ParseErrorWithPosContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} ",
                                 self.err_with_pos.err))?;
        self.container.format_with_pos(self.err_with_pos.pos, f)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ParseErrorWithLocation {
    #[error("{0}")]
    PC(Box<ParseErrorWithPosContext>),
    #[error("{}: {0}", .1.to_string_without_pos())]
    IO(std::io::Error, Box<dyn Context>),
}

impl ParseErrorWithLocation {
    /// The parse error, if this isn't an error opening the input.
    pub fn parse_error(&self) -> Option<&ParseErrorWithPos> {
        match self {
            ParseErrorWithLocation::PC(e) => Some(e.error()),
            ParseErrorWithLocation::IO(_, _) => None,
        }
    }
}

/// What the parser expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing but whitespace seen so far.
    AwaitingRoot,
    /// An expression was opened, its name must come next.
    AwaitingName,
    /// Inside a named expression.
    AwaitingParamsOrClose,
    /// The root expression is complete, only whitespace may follow.
    RootClosed,
}

enum Progress {
    Empty,
    Open {
        tree: Tree,
        // the enclosing expressions of `current`, outermost first
        parents: Vec<NodeId>,
        current: NodeId,
        named: bool,
    },
    Closed(Tree),
}

/// The parser state machine. Feed it tokens in order until `feed`
/// returns `Ok(true)`, then take the result via `finish`.
pub struct Parser<'s> {
    settings: &'s ParseSettings,
    progress: Progress,
}

impl<'s> Parser<'s> {
    pub fn new(settings: &'s ParseSettings) -> Self {
        Parser {
            settings,
            progress: Progress::Empty,
        }
    }

    pub fn state(&self) -> State {
        match &self.progress {
            Progress::Empty => State::AwaitingRoot,
            Progress::Open { named: false, .. } => State::AwaitingName,
            Progress::Open { named: true, .. } => State::AwaitingParamsOrClose,
            Progress::Closed(_) => State::RootClosed,
        }
    }

    /// The number of currently open expressions.
    pub fn depth(&self) -> usize {
        match &self.progress {
            Progress::Open { parents, .. } => parents.len() + 1,
            Progress::Empty | Progress::Closed(_) => 0,
        }
    }

    /// Returns `Ok(true)` once the end of the input was reached
    /// legally.
    pub fn feed(&mut self, mut token: Token) -> Result<bool, ParseErrorWithPos> {
        let pos = token.pos;
        tracing::trace!(kind = ?token.kind, %pos, state = ?self.state(), "token");
        if let Some(e) = token.error.take() {
            return Err(ParseError::Lex(e).at(pos))
        }
        match token.kind {
            TokenKind::Whitespace => Ok(false),
            TokenKind::Open => self.open(pos).map(|()| false),
            TokenKind::Close => self.close(pos).map(|()| false),
            TokenKind::BareString | TokenKind::QuotedString =>
                self.string(&token).map(|()| false),
            TokenKind::EndOfInput => match self.progress {
                Progress::Open { .. } => Err(ParseError::UnexpectedEof.at(pos)),
                Progress::Empty | Progress::Closed(_) => Ok(true),
            }
            // (the lexer always attaches the error, handled above)
            TokenKind::Error => Err(ParseError::UnexpectedToken(token.content).at(pos)),
        }
    }

    /// The tree, if an expression was read completely.
    pub fn finish(self) -> Option<Tree> {
        match self.progress {
            Progress::Closed(tree) => Some(tree),
            Progress::Empty | Progress::Open { .. } => None,
        }
    }

    fn open(&mut self, pos: Pos) -> Result<(), ParseErrorWithPos> {
        if let Progress::Empty = self.progress {
            let tree = Tree::unnamed(pos);
            let root = tree.root();
            self.progress = Progress::Open {
                tree,
                parents: Vec::new(),
                current: root,
                named: false,
            };
            return Ok(())
        }
        match &mut self.progress {
            Progress::Open { tree, parents, current, named } => {
                if ! *named {
                    return Err(ParseError::UnexpectedOpen.at(pos))
                }
                if parents.len() + 1 >= self.settings.nesting_limit {
                    return Err(ParseError::NestingTooDeep.at(pos))
                }
                // linked right away, so children are in document order
                let child = tree.push_unnamed_child(*current, pos);
                parents.push(*current);
                *current = child;
                *named = false;
                Ok(())
            }
            Progress::Empty | Progress::Closed(_) =>
                Err(ParseError::UnexpectedOpen.at(pos)),
        }
    }

    fn close(&mut self, pos: Pos) -> Result<(), ParseErrorWithPos> {
        match &mut self.progress {
            Progress::Open { named: false, .. } =>
                return Err(ParseError::ExpressionWithoutName.at(pos)),
            Progress::Open { parents, current, .. } => {
                if let Some(parent) = parents.pop() {
                    *current = parent;
                    return Ok(())
                }
            }
            Progress::Empty | Progress::Closed(_) =>
                return Err(ParseError::UnexpectedClose.at(pos)),
        }
        // the root expression is complete
        if let Progress::Open { tree, .. } =
            std::mem::replace(&mut self.progress, Progress::Empty)
        {
            self.progress = Progress::Closed(tree);
        }
        Ok(())
    }

    fn string(&mut self, token: &Token) -> Result<(), ParseErrorWithPos> {
        let pos = token.pos;
        match &mut self.progress {
            Progress::Open { tree, current, named, .. } => {
                let s = token.unquoted();
                if *named {
                    let quoted = token.kind == TokenKind::QuotedString;
                    tree.push_leaf(*current, StringLeaf::quoted(s, quoted).at(pos));
                } else if s.is_empty() {
                    // `("" ...)`
                    return Err(ParseError::ExpressionWithoutName.at(pos))
                } else {
                    tree.name_node(*current, s);
                    *named = true;
                }
                Ok(())
            }
            Progress::Empty | Progress::Closed(_) =>
                Err(ParseError::UnexpectedToken(token.content.clone()).at(pos)),
        }
    }
}

pub fn parse_with_settings(
    fh: impl Read,
    settings: &ParseSettings,
) -> Result<Option<Tree>, ParseErrorWithPos>
{
    let mut ts = lexer(fh);
    let mut parser = Parser::new(settings);
    loop {
        match parser.feed(ts.next_token()) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => {
                tracing::debug!(err = %e, "parse failed");
                return Err(e)
            }
        }
    }
    let tree = parser.finish();
    tracing::debug!(nodes = tree.as_ref().map_or(0, Tree::len), "parsed");
    Ok(tree)
}

/// `Ok(None)` if the input is empty or only whitespace.
pub fn parse(fh: impl Read) -> Result<Option<Tree>, ParseErrorWithPos> {
    parse_with_settings(fh, &DEFAULT_PARSE_SETTINGS)
}

pub fn parse_str(s: &str) -> Result<Option<Tree>, ParseErrorWithPos> {
    parse(s.as_bytes())
}

/// Like `parse_with_settings`, but errors mention where the input
/// came from.
pub fn parse_with_context(
    fh: impl Read,
    container: Box<dyn Context>,
    settings: &ParseSettings,
) -> Result<Option<Tree>, ParseErrorWithLocation>
{
    parse_with_settings(fh, settings).map_err(|err_with_pos| {
        ParseErrorWithLocation::PC(Box::new(
            ParseErrorWithPosContext { err_with_pos, container }))
    })
}

pub fn parse_file(path: &Path) -> Result<Option<Tree>, ParseErrorWithLocation> {
    let container = || Box::new(context::FileContext { path: path.to_path_buf() });
    let fh = File::open(path)
        .map_err(|e| ParseErrorWithLocation::IO(e, container()))?;
    parse_with_context(fh, container(), &DEFAULT_PARSE_SETTINGS)
}
