// Copyright 2015 Axel Rasmussen
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::*;
use std::str::FromStr;

/// FromText is the capability an option or operand payload type must have
/// to be parsed from a command-line token. The whole token must be consumed
/// by a valid representation of the type, or the conversion fails.
///
/// Instances are provided for the integer primitives (decimal or, when the
/// token contains an `x` / `X` anywhere, hexadecimal), for `f32` / `f64`,
/// and for `String` (identity, no trimming). Embedding code can implement
/// this trait for its own types to use them as payloads; `parse_from_str`
/// is usually all such an implementation needs.
pub trait FromText: Sized {
    /// Convert the given textual token into a value of this type.
    fn from_text(text: &str) -> Result<Self>;
}

/// ToText is the counterpart capability: rendering a value back to text.
/// This is only ever used to display an argument's default value in help
/// output, never during parsing.
pub trait ToText {
    /// Render this value as text, as it should appear in help output.
    fn to_text(&self) -> String;
}

/// Parse a value via its FromStr implementation, with the whitespace
/// semantics argbind uses for non-integer built-ins: whitespace on either
/// side of the token is tolerated, but the entire remainder must be
/// consumed by the conversion. This is the recommended building block for
/// custom FromText implementations.
pub fn parse_from_str<T: FromStr>(text: &str) -> Result<T> {
    match text.trim().parse::<T>() {
        Ok(value) => Ok(value),
        Err(_) => return Err(::failure::err_msg(format!("Cannot parse value: {}", text)).into()),
    }
}

/// Integer tokens are hexadecimal whenever they contain an `x` or `X`
/// anywhere; everything else is decimal. A leading zero never selects
/// octal.
fn integer_base(text: &str) -> u32 {
    match text.contains(|c| c == 'x' || c == 'X') {
        true => 16,
        false => 10,
    }
}

/// Scan an integer token: optional leading whitespace, an optional sign, an
/// optional `0x` / `0X` prefix in base 16, then one or more digits reaching
/// the end of the token. Returns the sign and the magnitude, or None if the
/// token doesn't have this shape or the magnitude overflows the wide
/// accumulator.
fn scan_integer(text: &str, base: u32) -> Option<(bool, u128)> {
    let mut s = text.trim_start();

    let negative = if s.starts_with('-') {
        s = &s[1..];
        true
    } else {
        if s.starts_with('+') {
            s = &s[1..];
        }
        false
    };

    if base == 16 && (s.starts_with("0x") || s.starts_with("0X")) {
        s = &s[2..];
    }
    if s.is_empty() {
        return None;
    }

    let mut magnitude: u128 = 0;
    for c in s.chars() {
        let digit = c.to_digit(base)? as u128;
        magnitude = magnitude
            .checked_mul(base as u128)?
            .checked_add(digit)?;
    }
    Some((negative, magnitude))
}

macro_rules! impl_signed_integer_text {
    ($($t:ty),+) => {$(
        impl FromText for $t {
            fn from_text(text: &str) -> Result<Self> {
                if let Some((negative, magnitude)) = scan_integer(text, integer_base(text)) {
                    if magnitude <= i128::max_value() as u128 {
                        let value = match negative {
                            true => -(magnitude as i128),
                            false => magnitude as i128,
                        };
                        if value >= <$t>::min_value() as i128 && value <= <$t>::max_value() as i128 {
                            return Ok(value as $t);
                        }
                    }
                }
                return Err(::failure::err_msg(format!("Cannot parse integer: {}", text)).into());
            }
        }

        impl ToText for $t {
            fn to_text(&self) -> String {
                format!("{}", self)
            }
        }
    )+}
}

macro_rules! impl_unsigned_integer_text {
    ($($t:ty),+) => {$(
        impl FromText for $t {
            fn from_text(text: &str) -> Result<Self> {
                // Reject a literal '-' up front, so negative input can't
                // wrap around into a huge unsigned value.
                if text.contains('-') {
                    return Err(
                        ::failure::err_msg(format!("Cannot parse unsigned integer: {}", text)).into(),
                    );
                }
                if let Some((_, magnitude)) = scan_integer(text, integer_base(text)) {
                    if magnitude <= <$t>::max_value() as u128 {
                        return Ok(magnitude as $t);
                    }
                }
                return Err(::failure::err_msg(format!("Cannot parse integer: {}", text)).into());
            }
        }

        impl ToText for $t {
            fn to_text(&self) -> String {
                format!("{}", self)
            }
        }
    )+}
}

impl_signed_integer_text!(i8, i16, i32, i64, isize);
impl_unsigned_integer_text!(u8, u16, u32, u64, usize);

macro_rules! impl_float_text {
    ($($t:ty),+) => {$(
        impl FromText for $t {
            fn from_text(text: &str) -> Result<Self> {
                parse_from_str(text)
            }
        }

        impl ToText for $t {
            fn to_text(&self) -> String {
                format!("{}", self)
            }
        }
    )+}
}

impl_float_text!(f32, f64);

impl FromText for String {
    fn from_text(text: &str) -> Result<Self> {
        Ok(text.to_owned())
    }
}

impl ToText for String {
    fn to_text(&self) -> String {
        // Quote strings, so an empty default is still visible in help text.
        format!("\"{}\"", self)
    }
}
