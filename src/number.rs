// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Optional coercion of leaf strings to numbers. The parser never does
//! this by itself; all leaves are strings.

use num::BigInt;

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    Real(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Number::Integer(n) => f.write_fmt(format_args!("{}", n)),
            Number::Real(x) => f.write_fmt(format_args!("{}", x)),
        }
    }
}

fn read_integer(is_neg: bool, s: &str) -> Option<BigInt> {
    if s.is_empty() {
        return None
    }
    let mut n: BigInt = 0.into();
    for c in s.chars() {
        n = n * 10 + c.to_digit(10)?;
    }
    Some(if is_neg { -n } else { n })
}

/// Integers are decimal digits with an optional sign, of any size.
/// Anything else that starts like a number (digit, sign or dot) is
/// tried as a float; "inf", "NaN" and the like are not numbers here.
pub fn parse_number(s: &str) -> Option<Number> {
    let (is_neg, digits) =
        if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };
    if let Some(n) = read_integer(is_neg, digits) {
        return Some(Number::Integer(n))
    }
    let c0 = digits.chars().next()?;
    if c0.is_ascii_digit() || c0 == '.' {
        s.parse::<f64>().ok().map(Number::Real)
    } else {
        None
    }
}
