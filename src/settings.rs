// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for both reading (parsing) and writing (serializing)
//! data.

#[derive(Debug, Clone, Copy)]
pub struct ParseSettings {
    /// How many expressions may be open at the same time.
    pub nesting_limit: usize,
}

pub const DEFAULT_PARSE_SETTINGS : ParseSettings = ParseSettings {
    nesting_limit: 500,
};

impl Default for ParseSettings {
    fn default() -> Self {
        DEFAULT_PARSE_SETTINGS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Nested expressions on their own lines, indented; leaves stay
    /// on the line of their parent.
    Pretty,
    /// Everything on one line.
    Compact,
}

#[derive(Debug, Clone, Copy)]
pub struct WriteSettings<'t> {
    pub layout: Layout,
    /// Indentation per nesting level (Pretty only).
    pub indent: &'t str,
}

pub const PRETTY : WriteSettings<'static> = WriteSettings {
    layout: Layout::Pretty,
    indent: "\t",
};

pub const COMPACT : WriteSettings<'static> = WriteSettings {
    layout: Layout::Compact,
    indent: "",
};

impl Default for WriteSettings<'static> {
    fn default() -> Self {
        PRETTY
    }
}
