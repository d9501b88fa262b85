// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Get characters and their positions from anything implementing
//! `Read`, and give them back one at a time.

use crate::pos::Pos;
use std::io::{self, Read};
use anyhow::{Result, anyhow};
use utf8::BufReadDecoder;
use genawaiter::rc::Gen;
use thiserror::Error;


pub fn buffered_chars<R>(
    fh: R
) -> impl Iterator<Item=Result<(char, Pos)>>
    where R: Read
{
    Gen::new(|co| async move {
        let mut inp = BufReadDecoder::new(io::BufReader::new(fh));
        let mut pos = Pos::START;
        loop {
            if let Some(r) = inp.next_strict() {
                match r {
                    Ok(x) => {
                        for c in x.chars() {
                            co.yield_(Ok((c, pos))).await;
                            pos = pos.advance(c);
                        }
                    },
                    Err(e) => {
                        co.yield_(Err(anyhow!("buffered_chars: {}", e))).await;
                        return;
                    }
                }
            } else {
                return;
            }
        }
    }).into_iter()
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreadError {
    #[error("unread before any character was read")]
    NothingToUnread,
    #[error("unread called twice in a row")]
    AlreadyUnread,
}

/// Wraps a character iterator with a single-level pushback: after
/// `read`, the character just read can be handed back with `unread`
/// exactly once.
pub struct PushbackChars<I> {
    inner: I,
    last: Option<(char, Pos)>,
    pushed_back: bool,
    next_pos: Pos,
    eof: bool,
}

impl<I> PushbackChars<I>
    where I: Iterator<Item=Result<(char, Pos)>>
{
    pub fn new(inner: I) -> Self {
        PushbackChars {
            inner,
            last: None,
            pushed_back: false,
            next_pos: Pos::START,
            eof: false,
        }
    }

    /// Returns `Ok(None)` at EOF (repeatedly).
    pub fn read(&mut self) -> Result<Option<(char, Pos)>> {
        if self.pushed_back {
            self.pushed_back = false;
            return Ok(self.last);
        }
        if self.eof {
            self.last = None;
            return Ok(None);
        }
        match self.inner.next() {
            Some(Ok((c, pos))) => {
                self.last = Some((c, pos));
                self.next_pos = pos.advance(c);
                Ok(Some((c, pos)))
            }
            Some(Err(e)) => {
                self.last = None;
                // the generator has returned after yielding the error
                self.eof = true;
                Err(e)
            }
            None => {
                self.last = None;
                // avoid calling next() again!
                self.eof = true;
                Ok(None)
            }
        }
    }

    pub fn unread(&mut self) -> Result<(), UnreadError> {
        if self.pushed_back {
            return Err(UnreadError::AlreadyUnread)
        }
        if self.last.is_none() {
            return Err(UnreadError::NothingToUnread)
        }
        self.pushed_back = true;
        Ok(())
    }

    /// The position of the character the next `read` will return, or
    /// the position just past the input when at EOF.
    pub fn pos(&self) -> Pos {
        match self.last {
            Some((_, pos)) if self.pushed_back => pos,
            _ => self.next_pos
        }
    }
}
