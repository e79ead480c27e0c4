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
use crate::value::{FromText, ToText};
use std::cell::RefCell;
use std::rc::Rc;

/// A Binding is a caller-owned storage slot a parsed value is written into.
///
/// The caller keeps one handle and hands the parser a clone at declaration
/// time, so both sides see the same slot: the parser writes values through
/// it during a parse call, and the caller reads the result (or the
/// untouched initial value) through its own handle afterwards. Values
/// written before a failing parse aborts are not rolled back.
pub type Binding<T> = Rc<RefCell<T>>;

/// Construct a new Binding holding the given initial value. For optional
/// value arguments, this initial value is also what help output displays as
/// the default.
pub fn binding<T>(value: T) -> Binding<T> {
    Rc::new(RefCell::new(value))
}

/// The behavior of an argument, along with the captured binding it writes
/// through. Signal and Boolean arguments never take a value; Value and Sink
/// arguments parse each accepted token through the value codec.
enum Kind {
    Signal,
    Boolean(Binding<bool>),
    Value(Box<dyn Fn(&str) -> Result<()>>),
    Sink(Box<dyn Fn(&str) -> Result<()>>),
}

/// An Argument describes one declared option or positional operand: its
/// identity, its display metadata, whether it is required, and the behavior
/// it executes when the parser matches it. Arguments are constructed by the
/// Parser's declaration functions and owned by its Registry.
pub struct Argument {
    short_name: Option<char>,
    long_name: Option<String>,
    value_name: String,
    description: String,
    required: bool,
    kind: Kind,
    default_text: Option<String>,
}

impl Argument {
    pub(crate) fn signal(
        short_name: Option<char>,
        long_name: Option<&str>,
        description: &str,
    ) -> Argument {
        Argument {
            short_name: short_name,
            long_name: long_name.map(|n| n.to_owned()),
            value_name: String::new(),
            description: description.to_owned(),
            required: false,
            kind: Kind::Signal,
            default_text: None,
        }
    }

    pub(crate) fn boolean(
        target: &Binding<bool>,
        short_name: Option<char>,
        long_name: Option<&str>,
        description: &str,
        required: bool,
    ) -> Argument {
        Argument {
            short_name: short_name,
            long_name: long_name.map(|n| n.to_owned()),
            value_name: String::new(),
            description: description.to_owned(),
            required: required,
            kind: Kind::Boolean(target.clone()),
            default_text: None,
        }
    }

    pub(crate) fn value<T: FromText + ToText + 'static>(
        target: &Binding<T>,
        short_name: Option<char>,
        long_name: Option<&str>,
        value_name: &str,
        description: &str,
        required: bool,
    ) -> Argument {
        // The default is captured once, at declaration time, so later
        // mutation of the target can't change what help displays. Required
        // arguments have no meaningful default to show.
        let default_text = match required {
            true => None,
            false => Some(target.borrow().to_text()),
        };
        let captured = target.clone();
        Argument {
            short_name: short_name,
            long_name: long_name.map(|n| n.to_owned()),
            value_name: value_name.to_owned(),
            description: description.to_owned(),
            required: required,
            kind: Kind::Value(Box::new(move |text| {
                *captured.borrow_mut() = T::from_text(text)?;
                Ok(())
            })),
            default_text: default_text,
        }
    }

    pub(crate) fn sink<T: FromText + 'static>(
        target: &Binding<Vec<T>>,
        value_name: &str,
        description: &str,
        required: bool,
    ) -> Argument {
        let captured = target.clone();
        Argument {
            short_name: None,
            long_name: None,
            value_name: value_name.to_owned(),
            description: description.to_owned(),
            required: required,
            kind: Kind::Sink(Box::new(move |text| {
                captured.borrow_mut().push(T::from_text(text)?);
                Ok(())
            })),
            default_text: None,
        }
    }

    /// Returns the argument's declared single-character short name, if any.
    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    /// Returns the argument's declared long name, if any.
    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_ref().map(|n| n.as_str())
    }

    /// Returns the label help output uses for this argument's value.
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Returns the argument's free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if the argument must be satisfied for a parse to
    /// succeed.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true if matching this argument consumes a value token.
    pub fn takes_value(&self) -> bool {
        match self.kind {
            Kind::Value(_) | Kind::Sink(_) => true,
            _ => false,
        }
    }

    /// Returns true if this argument accepts unbounded repeated values.
    pub fn is_sink(&self) -> bool {
        match self.kind {
            Kind::Sink(_) => true,
            _ => false,
        }
    }

    /// Returns the declaration-time rendering of this argument's default
    /// value, if it has one to display.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_ref().map(|t| t.as_str())
    }

    /// Feed one value token to this argument, converting it through the
    /// value codec and writing the result into the bound target. A no-op
    /// for arguments which don't take values.
    pub(crate) fn accept(&self, text: &str) -> Result<()> {
        match &self.kind {
            Kind::Value(set) => set(text),
            Kind::Sink(append) => append(text),
            _ => Ok(()),
        }
    }

    /// Run the argument's mark-satisfied side effect. Boolean arguments
    /// flip their target to true; a signal argument returns its identity,
    /// which aborts the parse.
    pub(crate) fn finish(&self) -> Option<Signal> {
        match &self.kind {
            Kind::Signal => Some(Signal {
                short_name: self.short_name,
                long_name: self.long_name.clone(),
            }),
            Kind::Boolean(target) => {
                *target.borrow_mut() = true;
                None
            }
            _ => None,
        }
    }
}

/// The Registry holds a Parser's declared arguments: options in one ordered
/// sequence, positional operands in another. Declaration order is
/// significant both for help display and for positional assignment.
///
/// Name uniqueness is the caller's responsibility; lookups return the first
/// declaration that matches.
pub struct Registry {
    options: Vec<Argument>,
    operands: Vec<Argument>,
}

impl Registry {
    pub(crate) fn new() -> Registry {
        Registry {
            options: vec![],
            operands: vec![],
        }
    }

    pub(crate) fn push_option(&mut self, argument: Argument) {
        self.options.push(argument);
    }

    pub(crate) fn push_operand(&mut self, argument: Argument) {
        self.operands.push(argument);
    }

    /// Returns the declared options, in declaration order.
    pub fn options(&self) -> &[Argument] {
        &self.options
    }

    /// Returns the declared positional operands, in declaration order.
    pub fn operands(&self) -> &[Argument] {
        &self.operands
    }

    /// Locate the first declared option with the given long name. The empty
    /// string never matches anything.
    pub(crate) fn find_long(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.options.iter().position(|a| a.long_name() == Some(name))
    }

    /// Locate the first declared option with the given short name.
    pub(crate) fn find_short(&self, name: char) -> Option<usize> {
        self.options.iter().position(|a| a.short_name() == Some(name))
    }
}
