// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating a character stream to a token stream. Strings are not
//! interpreted here (no escapes, no numbers); the token content is the
//! exact source text. The only tokens that denote nesting are
//! `TokenKind::Open` and `TokenKind::Close`. See
//! [parse](../parse/index.html) if interested in trees rather than
//! tokens.

use crate::pos::Pos;
use crate::buffered_chars::{buffered_chars, PushbackChars, UnreadError};
use kstring::KString;
use thiserror::Error;
use std::io::Read;

#[derive(Error, Debug)]
pub enum LexError {
    #[error("IO error ({0})")]
    IOError(anyhow::Error),
    #[error("unterminated quoted string")]
    UnterminatedQuotedString,
    #[error("{0}")]
    Unread(#[from] UnreadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Open,
    Close,
    BareString,
    QuotedString,
    EndOfInput,
    Error,
}

impl TokenKind {
    pub fn is_terminal(self) -> bool {
        matches!(self, TokenKind::EndOfInput | TokenKind::Error)
    }

    fn label(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "WS",
            TokenKind::Open => "OPEN",
            TokenKind::Close => "CLOSE",
            TokenKind::BareString => "STRING",
            TokenKind::QuotedString => "QSTRING",
            TokenKind::EndOfInput => "EOF",
            TokenKind::Error => "ERROR",
        }
    }
}

/// `pos` is where the token starts. `content` is the source text of
/// the token, for `QuotedString` including the two quote characters.
#[derive(Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub content: KString,
    pub pos: Pos,
    pub error: Option<LexError>,
}

impl Token {
    fn new(kind: TokenKind, content: &str, pos: Pos) -> Token {
        Token {
            kind,
            content: KString::from_ref(content),
            pos,
            error: None
        }
    }

    fn error(err: LexError, content: &str, pos: Pos) -> Token {
        Token {
            kind: TokenKind::Error,
            content: KString::from_ref(content),
            pos,
            error: Some(err)
        }
    }

    /// The content of a `QuotedString` token without its quotes; the
    /// content of any other token as is.
    pub fn unquoted(&self) -> &str {
        match self.kind {
            TokenKind::QuotedString => {
                let s = self.content.as_str();
                // both delimiters are 1 byte each
                &s[1..s.len() - 1]
            }
            _ => self.content.as_str()
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match &self.error {
            Some(e) => f.write_fmt(format_args!("{} {} {}",
                                                self.kind.label(), self.pos, e)),
            None => f.write_fmt(format_args!("{} {} {}",
                                             self.kind.label(), self.pos,
                                             self.content))
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || c.is_whitespace()
}

pub struct Lexer<I> {
    cs: PushbackChars<I>,
    content: String,
    done: bool,
}

/// Create a lexer reading from anything implementing `Read`.
pub fn lexer<R: Read>(
    fh: R
) -> Lexer<impl Iterator<Item = anyhow::Result<(char, Pos)>>> {
    Lexer::new(buffered_chars(fh))
}

impl<I> Lexer<I>
    where I: Iterator<Item = anyhow::Result<(char, Pos)>>
{
    pub fn new(cs: I) -> Self {
        Lexer {
            cs: PushbackChars::new(cs),
            content: String::new(),
            done: false,
        }
    }

    /// Once an `EndOfInput` or `Error` token has been returned, all
    /// further calls return `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        let start = self.cs.pos();
        if self.done {
            return Token::new(TokenKind::EndOfInput, "", start);
        }
        self.content.clear();
        let token = match self.scan() {
            Ok(kind) => Token::new(kind, &self.content, start),
            Err(e) => Token::error(e, &self.content, start),
        };
        if token.kind.is_terminal() {
            self.done = true;
        }
        token
    }

    fn scan(&mut self) -> Result<TokenKind, LexError> {
        match self.read()? {
            None => Ok(TokenKind::EndOfInput),
            Some('(') => Ok(TokenKind::Open),
            Some(')') => Ok(TokenKind::Close),
            Some(c) if c.is_whitespace() => {
                self.accept_while(char::is_whitespace)?;
                Ok(TokenKind::Whitespace)
            }
            Some('"') => {
                loop {
                    match self.read()? {
                        None => return Err(LexError::UnterminatedQuotedString),
                        Some('"') => return Ok(TokenKind::QuotedString),
                        Some(_) => {}
                    }
                }
            }
            Some(_) => {
                self.accept_while(|c| ! is_delimiter(c))?;
                Ok(TokenKind::BareString)
            }
        }
    }

    fn read(&mut self) -> Result<Option<char>, LexError> {
        match self.cs.read() {
            Err(e) => Err(LexError::IOError(e)),
            Ok(None) => Ok(None),
            Ok(Some((c, _pos))) => {
                self.content.push(c);
                Ok(Some(c))
            }
        }
    }

    fn unread(&mut self) -> Result<(), LexError> {
        self.cs.unread()?;
        self.content.pop();
        Ok(())
    }

    // Consume characters while `accepted` holds; the first rejected
    // character is pushed back.
    fn accept_while(&mut self, accepted: fn(char) -> bool)
                    -> Result<(), LexError> {
        loop {
            match self.read()? {
                None => return Ok(()),
                Some(c) => {
                    if ! accepted(c) {
                        return self.unread()
                    }
                }
            }
        }
    }
}

impl<I> Iterator for Lexer<I>
    where I: Iterator<Item = anyhow::Result<(char, Pos)>>
{
    type Item = Token;

    /// Yields tokens up to and including the first `EndOfInput` or
    /// `Error` token.
    fn next(&mut self) -> Option<Token> {
        if self.done {
            None
        } else {
            Some(self.next_token())
        }
    }
}
