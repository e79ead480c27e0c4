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

use crate::parser::{Outcome, Parser};
use std::process;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

fn print_help_or_log(parser: &Parser) {
    if let Err(e) = parser.print_help() {
        error!("{}", e);
    }
}

/// Parses this process's command-line arguments with the given Parser,
/// returning normally once the caller's bound variables hold their final
/// values. If a signal argument fires, help text is printed via the global
/// writer (see `io::set_writer_impl`) and the process exits with a zero
/// status; if parsing fails, the error is logged, help text is printed, and
/// the process exits with a nonzero status.
///
/// In the exit cases this behaves like `std::process::exit`: because the
/// process terminates, no destructors on the current stack or any other
/// thread's stack will be run. Callers for whom that matters should use
/// `Parser::parse_env` directly and handle the outcome themselves.
pub fn parse_or_exit(parser: &mut Parser) {
    match parser.parse_env() {
        Ok(Outcome::Parsed) => (),
        Ok(Outcome::Signal(_)) => {
            print_help_or_log(parser);
            process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            error!("{}", e);
            print_help_or_log(parser);
            process::exit(EXIT_FAILURE);
        }
    }
}
