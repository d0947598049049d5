//! Resumable sub-parsers, one per JSON value kind.
//!
//! Every sub-parser is a state machine fed with consecutive slices of the
//! input. A call to `resume` either consumes the whole slice and suspends, or
//! finishes a value and reports how many bytes of the slice it used; the
//! caller continues with the rest of the slice.

mod array;
mod literal;
mod number;
mod object;
mod string;

pub(crate) use array::ArrayParser;
pub(crate) use literal::LiteralParser;
pub(crate) use number::NumberParser;
pub(crate) use object::ObjectParser;
pub(crate) use string::StringParser;

use crate::{DecodeError, JsonValue};

/// Knobs shared by a sub-parser and all of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Let `0`, `-`, `true`, `false` and `null` open values.
    pub accept_literals: bool,
    /// Decode standard JSON escapes instead of passing the escaped character through.
    pub unescape_strings: bool,
    /// Deepest array/object nesting accepted.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            accept_literals: false,
            unescape_strings: false,
            max_depth: 128,
        }
    }
}

/// Outcome of feeding one slice to a sub-parser.
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// The whole slice was consumed and the value is not complete yet.
    Suspended,
    /// The value is complete after consuming this many bytes of the slice.
    Done(JsonValue, usize),
}

#[derive(Debug)]
pub(crate) enum SubParser {
    String(StringParser),
    Number(NumberParser),
    Literal(LiteralParser),
    Array(Box<ArrayParser>),
    Object(Box<ObjectParser>),
}

impl SubParser {
    pub(crate) fn resume(&mut self, input: &[u8]) -> Result<Step, DecodeError> {
        match self {
            SubParser::String(parser) => parser.resume(input),
            SubParser::Number(parser) => parser.resume(input),
            SubParser::Literal(parser) => parser.resume(input),
            SubParser::Array(parser) => parser.resume(input),
            SubParser::Object(parser) => parser.resume(input),
        }
    }

    /// Ends the input inside this parser. Only a number is complete without a
    /// terminator; anything else reports why the value is unfinished,
    /// looking through open children so an unterminated nested string is
    /// still a `MalformedString`.
    pub(crate) fn finish(&self) -> Result<JsonValue, DecodeError> {
        match self {
            SubParser::Number(parser) => parser.finish(),
            SubParser::String(_) => Err(DecodeError::MalformedString("unterminated string".into())),
            SubParser::Literal(_) => Err(DecodeError::IncompleteInput),
            SubParser::Array(parser) => Err(unfinished(parser.child())),
            SubParser::Object(parser) => Err(unfinished(parser.child())),
        }
    }
}

fn unfinished(child: Option<&SubParser>) -> DecodeError {
    match child.map(SubParser::finish) {
        Some(Err(e)) => e,
        _ => DecodeError::IncompleteInput,
    }
}

/// Picks the sub-parser for a value starting with `byte`, at nesting `depth`.
///
/// Returns `Ok(None)` when `byte` opens no value.
pub(crate) fn choose(
    byte: u8,
    options: ParseOptions,
    depth: usize,
) -> Result<Option<SubParser>, DecodeError> {
    let parser = match byte {
        b'"' => SubParser::String(StringParser::new(options)),
        b'1'..=b'9' => SubParser::Number(NumberParser::new()),
        b'0' | b'-' if options.accept_literals => SubParser::Number(NumberParser::new()),
        b't' | b'f' | b'n' if options.accept_literals => {
            SubParser::Literal(LiteralParser::new(byte))
        }
        b'[' | b'{' if depth >= options.max_depth => {
            return Err(DecodeError::DepthLimitExceeded(options.max_depth))
        }
        b'[' => SubParser::Array(Box::new(ArrayParser::new(options, depth + 1))),
        b'{' => SubParser::Object(Box::new(ObjectParser::new(options, depth + 1))),
        _ => return Ok(None),
    };
    Ok(Some(parser))
}

/// Like [`choose`], but a byte that opens nothing is an `UnexpectedCharacter`.
pub(crate) fn choose_required(
    byte: u8,
    options: ParseOptions,
    depth: usize,
) -> Result<SubParser, DecodeError> {
    choose(byte, options, depth)?.ok_or(DecodeError::UnexpectedCharacter(byte))
}

pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}
