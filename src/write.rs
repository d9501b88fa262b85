// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turning trees back into text that [parse](../parse/index.html)
//! reads as the same tree.

//! With the default `Pretty` layout, leaves are written on the line
//! of the node they belong to, each nested node on its own line
//! indented one level deeper, and the closing paren of a node whose
//! last parameter is a node on a line of its own. `(a b (c d) (e (f)))`
//! becomes:
//!
//! ```text
//! (a b
//! 	(c d)
//! 	(e
//! 		(f)
//! 	)
//! )
//! ```
//!
//! (with `\t` standing for a tab).

use crate::settings::{Layout, WriteSettings, PRETTY};
use crate::tree::{needs_quoting, NodeId, Param, Tree};
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;

// Names don't remember whether they were quoted in the source; they
// are only quoted when they could not be read back otherwise.
fn write_name(out: &mut impl fmt::Write, name: &str) -> fmt::Result {
    if needs_quoting(name) {
        out.write_char('"')?;
        out.write_str(name)?;
        out.write_char('"')
    } else {
        out.write_str(name)
    }
}

fn write_indent(out: &mut impl fmt::Write, indent: &str, level: usize)
                -> fmt::Result {
    for _ in 0..level {
        out.write_str(indent)?;
    }
    Ok(())
}

fn write_node(
    out: &mut impl fmt::Write,
    tree: &Tree,
    id: NodeId,
    settings: &WriteSettings,
    level: usize,
) -> fmt::Result {
    let node = tree.node(id);
    out.write_char('(')?;
    write_name(out, node.name())?;
    let mut last_was_node = false;
    for param in node.params() {
        match param {
            Param::Leaf(leaf) => {
                out.write_char(' ')?;
                write!(out, "{}", leaf)?;
                last_was_node = false;
            }
            Param::Node(child) => {
                match settings.layout {
                    Layout::Pretty => {
                        out.write_char('\n')?;
                        write_indent(out, settings.indent, level + 1)?;
                    }
                    Layout::Compact => out.write_char(' ')?,
                }
                write_node(out, tree, *child, settings, level + 1)?;
                last_was_node = true;
            }
        }
    }
    if last_was_node && settings.layout == Layout::Pretty {
        out.write_char('\n')?;
        write_indent(out, settings.indent, level)?;
    }
    out.write_char(')')
}

impl Tree {
    /// The root node, in the default (`Pretty`) layout.
    pub fn serialize(&self) -> String {
        self.serialize_node(self.root())
    }

    pub fn serialize_node(&self, id: NodeId) -> String {
        self.serialize_with(id, &PRETTY)
    }

    pub fn serialize_with(&self, id: NodeId, settings: &WriteSettings) -> String {
        let mut out = String::new();
        // writing to a String can't fail
        let _ = write_node(&mut out, self, id, settings, 0);
        out
    }

    pub fn fmt_node(&self, id: NodeId, settings: &WriteSettings,
                    f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, id, settings, 0)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root(), &PRETTY, f)
    }
}

/// Write the tree followed by a newline.
pub fn write_all(
    mut out: impl io::Write,
    tree: &Tree,
    settings: &WriteSettings,
) -> Result<(), io::Error> {
    writeln!(out, "{}", tree.serialize_with(tree.root(), settings))?;
    out.flush()
}

pub fn write_file(path: &Path, tree: &Tree, settings: &WriteSettings)
                  -> Result<(), io::Error> {
    write_all(BufWriter::new(File::create(path)?), tree, settings)
}
