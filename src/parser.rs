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

use crate::argument::{Argument, Binding, Registry};
use crate::error::*;
use crate::help;
use crate::value::{FromText, ToText};
use std::env;
use std::fmt;
use std::result;

/// The successful outcome of a parse call.
///
/// A fired signal is neither a success in the ordinary sense nor a defect,
/// so it gets its own variant rather than an error: callers match on the
/// outcome to distinguish "arguments bound, proceed" from "the user asked
/// for help/version-style behavior".
#[derive(Debug)]
pub enum Outcome {
    /// All tokens were consumed and every required argument was satisfied;
    /// the bound targets hold their final values.
    Parsed,
    /// A signal argument fired, aborting the parse immediately (before any
    /// required-argument check). The carried identity names the declared
    /// argument which fired.
    Signal(Signal),
}

/// Internal control flow for a parse attempt. A signal is raised from deep
/// inside the engine exactly like an error, but it must not surface as one,
/// so the two are kept apart until parse_tokens converts them into the
/// public Result<Outcome> shape.
enum Stop {
    Signal(Signal),
    Error(Error),
}

impl From<Error> for Stop {
    fn from(e: Error) -> Self {
        Stop::Error(e)
    }
}

// Lets bail! work inside engine functions, same as in functions returning
// the crate Result.
impl From<::failure::Error> for Stop {
    fn from(e: ::failure::Error) -> Self {
        Stop::Error(e.into())
    }
}

type Attempt<T> = result::Result<T, Stop>;

/// The mutable state of one parse attempt: the token cursor, the sticky
/// terminated flag, and per-argument satisfied flags. Built fresh inside
/// every parse call, so repeated parsing on one Parser never leaks attempt
/// state between calls.
struct ParseState {
    pos: usize,
    terminated: bool,
    options_done: Vec<bool>,
    operands_done: Vec<bool>,
}

impl ParseState {
    fn new(options: usize, operands: usize) -> ParseState {
        ParseState {
            pos: 0,
            terminated: false,
            options_done: vec![false; options],
            operands_done: vec![false; operands],
        }
    }
}

/// A Parser holds a set of declared arguments along with the syntax and
/// help-formatting configuration, parses invocation token sequences into
/// the caller's bound variables, and renders a usage/help message from the
/// same declarations.
///
/// Parsing and help rendering are independent: help can be rendered before
/// parsing, after a failed parse, or without ever parsing at all.
pub struct Parser {
    registry: Registry,

    pub(crate) short_prefix: Option<char>,
    pub(crate) long_prefix: String,
    pub(crate) long_separator: Option<char>,
    pub(crate) terminator: String,

    pub(crate) help_prolog: String,
    pub(crate) help_epilog: String,
    pub(crate) usage_title: String,
    pub(crate) options_title: String,
    pub(crate) operands_title: String,
    pub(crate) utility_name: String,
    pub(crate) options_usage: String,
    pub(crate) operands_usage: String,
    pub(crate) default_intro: String,
    pub(crate) help_width: usize,
    pub(crate) help_indent: usize,
}

impl Parser {
    /// Construct a new Parser with default syntax (`-` / `--` / `=` / `--`)
    /// and the given help prolog and epilog paragraphs, either of which may
    /// be empty to omit that section.
    pub fn new(help_prolog: &str, help_epilog: &str) -> Parser {
        Parser {
            registry: Registry::new(),
            short_prefix: Some('-'),
            long_prefix: "--".to_owned(),
            long_separator: Some('='),
            terminator: "--".to_owned(),
            help_prolog: help_prolog.to_owned(),
            help_epilog: help_epilog.to_owned(),
            usage_title: "USAGE".to_owned(),
            options_title: "OPTIONS".to_owned(),
            operands_title: "OPERANDS".to_owned(),
            utility_name: String::new(),
            options_usage: String::new(),
            operands_usage: String::new(),
            default_intro: "default: ".to_owned(),
            help_width: 80,
            help_indent: 2,
        }
    }

    /// Declare a signal option. When matched, parsing aborts immediately
    /// and the parse call returns `Outcome::Signal` carrying the names
    /// given here; no other stage runs, including the required-argument
    /// check. Typically used for help and version flags.
    pub fn add_signal(
        &mut self,
        short_name: Option<char>,
        long_name: Option<&str>,
        description: &str,
    ) {
        self.registry
            .push_option(Argument::signal(short_name, long_name, description));
    }

    /// Declare a boolean option. Matching it (standalone, or combined with
    /// other short names in one cluster token) sets the bound target to
    /// true; absence leaves the target untouched.
    pub fn add_boolean(
        &mut self,
        target: &Binding<bool>,
        short_name: Option<char>,
        long_name: Option<&str>,
        description: &str,
        required: bool,
    ) {
        self.registry.push_option(Argument::boolean(
            target,
            short_name,
            long_name,
            description,
            required,
        ));
    }

    /// Declare a value option. The value may be supplied as the next token,
    /// merged after the long-option separator, or merged directly after the
    /// short name in the same token; all forms bind identically. The
    /// target's current value is rendered as the displayed default for
    /// optional options.
    pub fn add_option<T: FromText + ToText + 'static>(
        &mut self,
        target: &Binding<T>,
        short_name: Option<char>,
        long_name: Option<&str>,
        value_name: &str,
        description: &str,
        required: bool,
    ) {
        self.registry.push_option(Argument::value(
            target,
            short_name,
            long_name,
            value_name,
            description,
            required,
        ));
    }

    /// Declare a positional operand, matched by declaration order rather
    /// than by name. Consumes at most one token.
    pub fn add_operand<T: FromText + ToText + 'static>(
        &mut self,
        target: &Binding<T>,
        value_name: &str,
        description: &str,
        required: bool,
    ) {
        self.registry.push_operand(Argument::value(
            target,
            None,
            None,
            value_name,
            description,
            required,
        ));
    }

    /// Declare a positional sink operand, which appends every remaining
    /// positional value to the bound vector. Pre-existing elements are
    /// preserved. Only the last declared operand can meaningfully be a
    /// sink, since it consumes the rest of the input.
    pub fn add_operand_sink<T: FromText + 'static>(
        &mut self,
        target: &Binding<Vec<T>>,
        value_name: &str,
        description: &str,
        required: bool,
    ) {
        self.registry
            .push_operand(Argument::sink(target, value_name, description, required));
    }

    /// Set the single-character prefix which introduces short options
    /// (default `-`). None disables short-option recognition entirely.
    pub fn set_short_option_prefix(&mut self, prefix: Option<char>) {
        self.short_prefix = prefix;
    }

    /// Set the string prefix which introduces long options (default `--`).
    /// The empty string disables long-option recognition entirely.
    pub fn set_long_option_prefix(&mut self, prefix: &str) {
        self.long_prefix = prefix.to_owned();
    }

    /// Set the character which separates a long option's name from a merged
    /// value (default `=`). None disables merged values, in which case
    /// every long option's value must arrive as the next token.
    pub fn set_long_option_separator(&mut self, separator: Option<char>) {
        self.long_separator = separator;
    }

    /// Set the terminator token (default `--`). Once the first terminator
    /// is consumed, option recognition is disabled for the rest of the
    /// parse and all further tokens are treated as operand values. The
    /// empty string disables terminator recognition.
    pub fn set_option_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_owned();
    }

    /// Set the title of the usage section (default `USAGE`). An empty
    /// title skips the section.
    pub fn set_usage_title(&mut self, title: &str) {
        self.usage_title = title.to_owned();
    }

    /// Set the title of the options glossary (default `OPTIONS`). An empty
    /// title skips the section.
    pub fn set_options_title(&mut self, title: &str) {
        self.options_title = title.to_owned();
    }

    /// Set the title of the operands glossary (default `OPERANDS`). An
    /// empty title skips the section.
    pub fn set_operands_title(&mut self, title: &str) {
        self.operands_title = title.to_owned();
    }

    /// Set the utility name shown at the start of the usage line. When
    /// unset, the first parsed token fills it in.
    pub fn set_utility_name(&mut self, name: &str) {
        self.utility_name = name.to_owned();
    }

    /// Replace the auto-generated per-option usage tokens with one literal
    /// string.
    pub fn set_options_usage(&mut self, usage: &str) {
        self.options_usage = usage.to_owned();
    }

    /// Replace the auto-generated per-operand usage tokens with one literal
    /// string.
    pub fn set_operands_usage(&mut self, usage: &str) {
        self.operands_usage = usage.to_owned();
    }

    /// Set the label which introduces a displayed default value (default
    /// `default: `). The empty string disables default display entirely.
    pub fn set_default_value_intro(&mut self, intro: &str) {
        self.default_intro = intro.to_owned();
    }

    /// Set the column width help text is wrapped to (default 80). Zero is
    /// legal, and degenerates to one wrap token per line past the hanging
    /// indent.
    pub fn set_help_width(&mut self, width: usize) {
        self.help_width = width;
    }

    /// Set the indent used for help section bodies (default 2).
    pub fn set_help_indent(&mut self, indent: usize) {
        self.help_indent = indent;
    }

    /// Returns the declared arguments, for inspection alongside help
    /// rendering.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse an already-materialized token sequence. The first element is
    /// the program's invocation name, per the argv convention; an empty
    /// sequence simply parses nothing.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<Outcome> {
        let tokens: Vec<String> = argv.iter().map(|t| t.as_ref().to_owned()).collect();
        self.parse_tokens(&tokens)
    }

    /// Parse this process's command-line arguments, as reported by
    /// std::env::args().
    pub fn parse_env(&mut self) -> Result<Outcome> {
        let tokens: Vec<String> = env::args().collect();
        self.parse_tokens(&tokens)
    }

    /// Render this Parser's help message into the given formatter.
    pub fn write_help<W: fmt::Write>(&self, f: &mut W) -> fmt::Result {
        help::write_help(self, f)
    }

    /// Render this Parser's help message through the process-global writer
    /// selected via `io::set_writer_impl`.
    pub fn print_help(&self) -> Result<()> {
        let mut writer = crate::io::get_writer_impl();
        self.write_help(&mut writer)?;
        Ok(())
    }

    fn parse_tokens(&mut self, tokens: &[String]) -> Result<Outcome> {
        let mut state = ParseState::new(
            self.registry.options().len(),
            self.registry.operands().len(),
        );
        self.parse_utility(tokens, &mut state);
        match self.parse_remainder(tokens, &mut state) {
            Ok(()) => Ok(Outcome::Parsed),
            Err(Stop::Signal(signal)) => Ok(Outcome::Signal(signal)),
            Err(Stop::Error(e)) => Err(e),
        }
    }

    fn parse_remainder(&self, tokens: &[String], state: &mut ParseState) -> Attempt<()> {
        self.parse_options(tokens, state)?;
        self.parse_operands(tokens, state)?;
        self.parse_terminator(tokens, state);

        self.check_end(tokens, state)?;
        self.check_required(state)?;
        Ok(())
    }

    /// The first token names the utility; it is consumed even when an
    /// explicitly configured name makes its content irrelevant.
    fn parse_utility(&mut self, tokens: &[String], state: &mut ParseState) {
        if state.pos >= tokens.len() {
            return;
        }
        if self.utility_name.is_empty() {
            self.utility_name = tokens[state.pos].clone();
        }
        state.pos += 1;
    }

    /// Consume options until nothing matches. The terminator is tried
    /// first at every position, then a long option, then a short-option
    /// cluster, so a token matching both prefix forms takes the long
    /// interpretation.
    fn parse_options(&self, tokens: &[String], state: &mut ParseState) -> Attempt<()> {
        loop {
            let before = state.pos;

            self.parse_terminator(tokens, state);
            if state.pos != before {
                break;
            }

            self.parse_long_option(tokens, state)?;
            if state.pos != before {
                continue;
            }

            self.parse_short_options(tokens, state)?;
            if state.pos != before {
                continue;
            }

            break;
        }
        Ok(())
    }

    /// Consume the terminator token, if one is due: only the first
    /// terminator is ever consumed, and consuming it permanently disables
    /// option and terminator recognition for this attempt.
    fn parse_terminator(&self, tokens: &[String], state: &mut ParseState) {
        if state.pos >= tokens.len()
            || state.terminated
            || self.terminator.is_empty()
            || tokens[state.pos] != self.terminator
        {
            return;
        }
        state.terminated = true;
        state.pos += 1;
    }

    fn predict_long_option(&self, state: &ParseState, token: &str) -> bool {
        !state.terminated
            && !self.long_prefix.is_empty()
            && token.len() > self.long_prefix.len()
            && token.starts_with(&self.long_prefix)
    }

    fn parse_long_option(&self, tokens: &[String], state: &mut ParseState) -> Attempt<()> {
        if state.pos >= tokens.len() || !self.predict_long_option(state, &tokens[state.pos]) {
            return Ok(());
        }
        let token = &tokens[state.pos];
        state.pos += 1;

        let body = &token[self.long_prefix.len()..];
        let split = self
            .long_separator
            .and_then(|sep| body.find(sep).map(|at| (at, sep.len_utf8())));
        let (name, merged) = match split {
            Some((at, width)) => (&body[..at], Some(&body[at + width..])),
            None => (body, None),
        };

        let index = match self.registry.find_long(name) {
            Some(index) => index,
            None => return Err(::failure::err_msg(format!("Unknown option name: {}", name)).into()),
        };
        let option = &self.registry.options()[index];

        if option.takes_value() {
            match merged {
                // A merged value is used verbatim, even when it is empty or
                // contains further separator characters.
                Some(value) => option.accept(value)?,
                None => {
                    if state.pos >= tokens.len() {
                        return Err(
                            ::failure::err_msg(format!("Cannot find value for option: {}", token)).into(),
                        );
                    }
                    option.accept(&tokens[state.pos])?;
                    state.pos += 1;
                }
            }
        } else if merged.is_some() {
            return Err(::failure::err_msg(format!("Unexpected option value: {}", token)).into());
        }

        self.finish_option(index, state)
    }

    fn predict_short_option(&self, state: &ParseState, token: &str) -> bool {
        if state.terminated {
            return false;
        }
        let prefix = match self.short_prefix {
            Some(prefix) => prefix,
            None => return false,
        };
        let mut chars = token.chars();
        chars.next() == Some(prefix) && chars.next().is_some()
    }

    /// Walk a short-option cluster left to right. Value-less options let
    /// the walk continue (`-ac` combines two flags); a value-taking option
    /// consumes the cluster remainder as its value, or the next token when
    /// the cluster ends with it.
    fn parse_short_options(&self, tokens: &[String], state: &mut ParseState) -> Attempt<()> {
        if state.pos >= tokens.len() || !self.predict_short_option(state, &tokens[state.pos]) {
            return Ok(());
        }
        let token = &tokens[state.pos];
        state.pos += 1;

        let prefix_width = self.short_prefix.map_or(0, |p| p.len_utf8());
        let body = &token[prefix_width..];

        for (at, name) in body.char_indices() {
            let index = match self.registry.find_short(name) {
                Some(index) => index,
                None => return Err(::failure::err_msg(format!("Unknown option name: {}", name)).into()),
            };
            let option = &self.registry.options()[index];

            if option.takes_value() {
                let rest = &body[at + name.len_utf8()..];
                if !rest.is_empty() {
                    option.accept(rest)?;
                } else {
                    if state.pos >= tokens.len() {
                        return Err(
                            ::failure::err_msg(format!("Cannot find value for option: {}", token)).into(),
                        );
                    }
                    option.accept(&tokens[state.pos])?;
                    state.pos += 1;
                }
                return self.finish_option(index, state);
            }

            self.finish_option(index, state)?;
        }
        Ok(())
    }

    /// Operands are filled in declaration order. The terminator is tried
    /// before every operand token, and an unterminated token which still
    /// looks like an option is rejected rather than bound, which is what
    /// forces callers to use the terminator before option-shaped values.
    fn parse_operands(&self, tokens: &[String], state: &mut ParseState) -> Attempt<()> {
        for index in 0..self.registry.operands().len() {
            self.parse_operand_content(tokens, state, index)?;
        }
        Ok(())
    }

    fn parse_operand_content(
        &self,
        tokens: &[String],
        state: &mut ParseState,
        index: usize,
    ) -> Attempt<()> {
        let operand = &self.registry.operands()[index];
        loop {
            self.parse_terminator(tokens, state);
            if state.pos >= tokens.len() {
                break;
            }

            let token = &tokens[state.pos];
            if self.predict_long_option(state, token) || self.predict_short_option(state, token) {
                return Err(::failure::err_msg(format!("Unexpected option: {}", token)).into());
            }

            operand.accept(token)?;
            state.pos += 1;
            self.finish_operand(index, state)?;

            if !operand.is_sink() {
                break;
            }
        }
        Ok(())
    }

    fn check_end(&self, tokens: &[String], state: &ParseState) -> Result<()> {
        if state.pos < tokens.len() {
            return Err(::failure::err_msg(format!("Unexpected argument: {}", tokens[state.pos])).into());
        }
        Ok(())
    }

    /// Required options are checked before required operands, each set in
    /// declaration order, so the reported argument is deterministic.
    fn check_required(&self, state: &ParseState) -> Result<()> {
        let options = self.registry.options().iter().zip(state.options_done.iter());
        let operands = self
            .registry
            .operands()
            .iter()
            .zip(state.operands_done.iter());
        for (argument, done) in options.chain(operands) {
            if argument.is_required() && !done {
                return Err(::failure::err_msg(format!(
                    "Cannot find required argument: {}",
                    self.expand_name(argument)
                ))
                .into());
            }
        }
        Ok(())
    }

    /// The display name used to report an argument: prefixed short form if
    /// present, else prefixed long form, else the value-name label.
    fn expand_name(&self, argument: &Argument) -> String {
        if let Some(short) = argument.short_name() {
            let mut name = String::new();
            if let Some(prefix) = self.short_prefix {
                name.push(prefix);
            }
            name.push(short);
            return name;
        }
        if let Some(long) = argument.long_name() {
            return format!("{}{}", self.long_prefix, long);
        }
        argument.value_name().to_owned()
    }

    fn finish_option(&self, index: usize, state: &mut ParseState) -> Attempt<()> {
        state.options_done[index] = true;
        match self.registry.options()[index].finish() {
            Some(signal) => Err(Stop::Signal(signal)),
            None => Ok(()),
        }
    }

    fn finish_operand(&self, index: usize, state: &mut ParseState) -> Attempt<()> {
        state.operands_done[index] = true;
        match self.registry.operands()[index].finish() {
            Some(signal) => Err(Stop::Signal(signal)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        help::write_help(self, f)
    }
}
