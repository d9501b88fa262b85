// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use nsexpr::context::{Context, FileContext, SpecialContext};
use nsexpr::lexer::{lexer, TokenKind};
use nsexpr::parse::parse_with_context;
use nsexpr::settings::{COMPACT, DEFAULT_PARSE_SETTINGS, PRETTY};
use nsexpr::write::write_all;
use clap::Parser as ClapParser;
use std::io::{stdin, stdout, BufWriter, Read};
use std::path::PathBuf;
use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;


fn indentstr(i: usize) -> Option<&'static str> {
    "                                                                  ".get(0..i)
}

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Stream the tokens instead of building a tree
    #[clap(short, long, value_parser)]
    tokens: bool,
    /// Print the parsed data
    #[clap(long, value_parser)]
    print: bool,
    /// Print on a single line (only without --tokens)
    #[clap(long, value_parser)]
    compact: bool,
    /// Show the whitespace (only with --tokens)
    #[clap(short, long, value_parser)]
    whitespace: bool,
    /// Print the expressions with the given name, breadth-first
    #[clap(long, value_parser)]
    find: Option<String>,
    /// How deep --find searches (default: unbounded)
    #[clap(long, value_parser)]
    depth: Option<usize>,
    /// Path to the input file, `-` for stdin
    #[clap(value_parser, required(true))]
    input_path: PathBuf,
}

fn open_input(path: &PathBuf) -> Result<(Box<dyn Read>, Box<dyn Context>)> {
    if path.as_os_str() == "-" {
        Ok((Box::new(stdin()), Box::new(SpecialContext::new("stdin"))))
    } else {
        let fh = std::fs::File::open(path)?;
        Ok((Box::new(fh), Box::new(FileContext { path: path.clone() })))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (fh, container) = open_input(&args.input_path)?;

    if args.tokens {

        // Read through the token stream and just do some bookkeeping
        // and optionally print the tokens.

        let mut count_open = 0;
        let mut depth: usize = 0;
        for token in lexer(fh) {
            let indentlevel;
            match token.kind {
                TokenKind::Open => {
                    count_open += 1;
                    indentlevel = depth;
                    depth += 1;
                }
                TokenKind::Close => {
                    depth = depth.saturating_sub(1);
                    indentlevel = depth;
                }
                TokenKind::Error => {
                    bail!("{} {}", token.error.map_or_else(String::new, |e| e.to_string()),
                          container_pos(&*container, token.pos))
                }
                TokenKind::Whitespace if ! args.whitespace => continue,
                _ => {
                    indentlevel = depth;
                }
            }
            if args.print {
                if let Some(indent) = indentstr(indentlevel) {
                    println!("{indent}{token}");
                } else {
                    bail!("expressions nested too deeply {}",
                          container_pos(&*container, token.pos))
                }
            }
        }
        println!(";; count_open = {count_open}");

    } else {

        // Slurp in the whole input as a tree, then optionally print
        // (parts of) it.

        let tree = match parse_with_context(fh, container, &DEFAULT_PARSE_SETTINGS)? {
            Some(tree) => tree,
            None => {
                eprintln!(";; empty input");
                return Ok(())
            }
        };
        let settings = if args.compact { &COMPACT } else { &PRETTY };
        if let Some(name) = &args.find {
            for id in tree.find_children_by_name(tree.root(), name, args.depth) {
                println!("{}", tree.serialize_with(id, settings));
            }
        } else if args.print {
            write_all(BufWriter::new(stdout()), &tree, settings)?;
        }

    }
    Ok(())
}

fn container_pos(container: &dyn Context, pos: nsexpr::pos::Pos) -> String {
    struct WithPos<'t>(&'t dyn Context, nsexpr::pos::Pos);
    impl<'t> std::fmt::Display for WithPos<'t> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            self.0.format_with_pos(self.1, f)
        }
    }
    WithPos(container, pos).to_string()
}
