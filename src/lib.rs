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

#![deny(
    anonymous_parameters,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![warn(bare_trait_objects, unreachable_pub, unused_qualifications)]

//! argbind is a minimal command-line argument parsing library. Callers
//! declare options and positional operands bound to their own variables,
//! parse one invocation token sequence into them, and render a
//! word-wrapped usage/help message from the same declarations.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

/// argument defines the argument model: caller-owned value bindings, the
/// four argument kinds (signal, boolean, value, sink), and the registry of
/// declared options and operands.
pub mod argument;
/// error defines argbind's Error type, its Result alias, and the Signal
/// identity reported when a short-circuiting argument fires.
pub mod error;
mod help;
/// io provides the process-global selection of where argbind writes help
/// output (stdout, stderr, the log, or nowhere).
pub mod io;
/// main_impl provides a convenience entry point which parses the process
/// arguments and turns failures and signals into help output and an exit
/// code.
pub mod main_impl;
/// parser defines the Parser itself: the declaration API, the syntax and
/// help configuration, and the token parse engine.
pub mod parser;
/// value defines the textual value codec: the FromText / ToText capability
/// traits and their built-in instances.
pub mod value;

#[cfg(test)]
mod tests;

// Re-export most commonly used symbols, to allow using this library with
// just one "use".

pub use crate::argument::{binding, Binding};
pub use crate::error::{Error, Result, Signal};
pub use crate::main_impl::parse_or_exit;
pub use crate::parser::{Outcome, Parser};
pub use crate::value::{FromText, ToText};
