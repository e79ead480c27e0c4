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

use crate::argument::Argument;
use crate::parser::Parser;
use std::fmt;

/// Column widths are measured in characters, not bytes.
fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn spaces(n: usize) -> String {
    " ".repeat(n)
}

/// Split descriptive text into wrap tokens: words separated by runs of
/// spaces (which collapse), with every literal newline becoming its own
/// explicit break token so blank lines and forced breaks survive wrapping.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = vec![];
    let mut word = String::new();
    for c in text.chars() {
        match c {
            ' ' | '\n' => {
                if !word.is_empty() {
                    tokens.push(word);
                    word = String::new();
                }
                if c == '\n' {
                    tokens.push("\n".to_owned());
                }
            }
            _ => word.push(c),
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Emit tokens left to right, breaking before any token which would exceed
/// the width while the position is already past the hanging indent. The
/// indent guard is what lets a single overlong token still start a line
/// instead of breaking forever. After a break, the line is reseeded with
/// the hanging indent.
fn write_wrapped<W: fmt::Write>(
    f: &mut W,
    width: usize,
    tokens: &[String],
    initial_pos: usize,
    hanging_indent: usize,
) -> fmt::Result {
    let mut pos = initial_pos;
    let mut pending_spaces = 0;

    for token in tokens {
        let is_newline = token == "\n";
        let is_overflow = pos + pending_spaces + width_of(token) > width;

        if is_newline || (is_overflow && pos > hanging_indent) {
            f.write_char('\n')?;
            pos = 0;
            pending_spaces = hanging_indent;
            if is_newline {
                continue;
            }
        }

        f.write_str(&spaces(pending_spaces))?;
        f.write_str(token)?;
        pos += pending_spaces + width_of(token);
        pending_spaces = 1;
    }
    Ok(())
}

fn write_paragraph<W: fmt::Write>(parser: &Parser, f: &mut W, paragraph: &str) -> fmt::Result {
    if paragraph.is_empty() {
        return Ok(());
    }
    write_wrapped(f, parser.help_width, &tokenize(paragraph), 0, 0)?;
    f.write_str("\n\n")
}

/// One usage-line token per argument: the short-prefixed name if a short
/// name exists, else the long-prefixed name, else nothing; the value-name
/// label after a space for value-taking arguments; brackets around optional
/// arguments; a `...` suffix for sinks.
fn push_usage_tokens(parser: &Parser, tokens: &mut Vec<String>, arguments: &[Argument]) {
    for argument in arguments {
        let mut token = String::new();

        if let Some(short) = argument.short_name() {
            if let Some(prefix) = parser.short_prefix {
                token.push(prefix);
            }
            token.push(short);
        } else if let Some(long) = argument.long_name() {
            token.push_str(&parser.long_prefix);
            token.push_str(long);
        }

        if argument.takes_value() {
            if !token.is_empty() {
                token.push(' ');
            }
            token.push_str(argument.value_name());
        }

        if !argument.is_required() {
            token = format!("[{}]", token);
        }

        if argument.is_sink() {
            token.push_str("...");
        }

        tokens.push(token);
    }
}

fn write_usage<W: fmt::Write>(parser: &Parser, f: &mut W) -> fmt::Result {
    if parser.usage_title.is_empty() {
        return Ok(());
    }

    let mut tokens: Vec<String> = vec![];

    if !parser.utility_name.is_empty() {
        tokens.push(parser.utility_name.clone());
    }

    if !parser.options_usage.is_empty() {
        tokens.push(parser.options_usage.clone());
    } else {
        push_usage_tokens(parser, &mut tokens, parser.registry().options());
    }

    if !parser.operands_usage.is_empty() {
        tokens.push(parser.operands_usage.clone());
    } else {
        push_usage_tokens(parser, &mut tokens, parser.registry().operands());
    }

    f.write_str(&parser.usage_title)?;
    f.write_char('\n')?;
    f.write_str(&spaces(parser.help_indent))?;
    write_wrapped(
        f,
        parser.help_width,
        &tokens,
        parser.help_indent,
        parser.help_indent * 2,
    )?;
    f.write_str("\n\n")
}

fn has_any_short_name(arguments: &[Argument]) -> bool {
    arguments.iter().any(|a| a.short_name().is_some())
}

/// A glossary lists each argument's term (aligned into one column) next to
/// its wrapped description. The tab stop where descriptions begin is
/// derived from the widest term.
fn write_glossary<W: fmt::Write>(
    parser: &Parser,
    f: &mut W,
    title: &str,
    arguments: &[Argument],
) -> fmt::Result {
    if title.is_empty() || arguments.is_empty() {
        return Ok(());
    }

    let any_short = has_any_short_name(arguments);
    let mut entries: Vec<(String, Vec<String>)> = vec![];
    let mut max_term_width = 0;

    for argument in arguments {
        let mut term = String::new();
        let mut description = tokenize(argument.description());

        if any_short {
            match argument.short_name() {
                // The two-space filler stands in for an absent short form,
                // keeping long forms aligned within the list.
                None => term.push_str("  "),
                Some(short) => {
                    if let Some(prefix) = parser.short_prefix {
                        term.push(prefix);
                    }
                    term.push(short);
                }
            }
        }

        if let Some(long) = argument.long_name() {
            if any_short {
                term.push_str(match argument.short_name() {
                    Some(_) => ", ",
                    None => "  ",
                });
            }
            term.push_str(&parser.long_prefix);
            term.push_str(long);
        }

        if argument.takes_value() {
            if !term.is_empty() {
                term.push(' ');
            }
            term.push_str(argument.value_name());
        }

        if !parser.default_intro.is_empty() {
            if let Some(default) = argument.default_text() {
                if !default.is_empty() {
                    // One token, so the suffix never wraps internally.
                    description.push(format!("({}{})", parser.default_intro, default));
                }
            }
        }

        if width_of(&term) > max_term_width {
            max_term_width = width_of(&term);
        }
        entries.push((term, description));
    }

    f.write_str(title)?;
    f.write_char('\n')?;

    let tab = parser.help_indent + max_term_width + parser.help_indent;
    for (term, description) in &entries {
        f.write_str(&spaces(parser.help_indent))?;
        f.write_str(term)?;
        f.write_str(&spaces(tab - parser.help_indent - width_of(term)))?;
        write_wrapped(f, parser.help_width, description, tab, tab)?;
        f.write_char('\n')?;
    }

    f.write_char('\n')
}

/// Render the full help message: prolog, usage, the two glossaries, and
/// epilog, in that order, skipping any section with an empty title or an
/// empty argument list. Purely a function of the declarations and
/// configuration; rendering twice produces identical output.
pub(crate) fn write_help<W: fmt::Write>(parser: &Parser, f: &mut W) -> fmt::Result {
    write_paragraph(parser, f, &parser.help_prolog)?;
    write_usage(parser, f)?;
    write_glossary(parser, f, &parser.options_title, parser.registry().options())?;
    write_glossary(
        parser,
        f,
        &parser.operands_title,
        parser.registry().operands(),
    )?;
    write_paragraph(parser, f, &parser.help_epilog)
}
