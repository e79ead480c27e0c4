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

use failure::Fail;

/// Error denotes all of the possible kinds of errors argbind can produce.
///
/// Note that a fired signal argument is deliberately *not* an Error. Signals
/// represent an explicit early exit (help / version style flags), so they
/// are reported through the parse outcome instead of the error channel; see
/// `Signal` below.
#[derive(Fail, Debug)]
pub enum Error {
    /// An error encountered while formatting help text, e.g. because the
    /// underlying output sink rejected a write.
    #[fail(display = "{}", _0)]
    Fmt(#[cause] ::std::fmt::Error),
    /// Malformed command-line input: an unknown option name, a missing or
    /// unexpected option value, an out-of-place option-looking token, a
    /// leftover token, a missing required argument, or a value the codec
    /// could not convert.
    #[fail(display = "{}", _0)]
    Parse(::failure::Error),
}

impl From<::std::fmt::Error> for Error {
    fn from(e: ::std::fmt::Error) -> Self {
        Error::Fmt(e)
    }
}

// If we try! or ? a generic failure::Error (e.g. from bail!), treat it as a
// parse error; everything constructed that way in this crate is one.
impl From<::failure::Error> for Error {
    fn from(e: ::failure::Error) -> Self {
        Error::Parse(e)
    }
}

/// A Result type which uses argbind's internal Error type.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Signal identifies a signal argument which fired during parsing.
///
/// A signal is not a defect: it means the user explicitly asked for the
/// short-circuit behavior the argument was declared with (typically help or
/// version output). The identity carried here is the declared short and
/// long name of the matched argument, so callers can branch on which signal
/// fired. Signals always win over a missing-required-argument failure,
/// since parsing stops the moment one is matched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signal {
    /// The fired argument's declared short name, if any.
    pub short_name: Option<char>,
    /// The fired argument's declared long name, if any.
    pub long_name: Option<String>,
}
