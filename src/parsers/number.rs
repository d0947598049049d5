use super::Step;
use crate::{DecodeError, JsonValue};

/// Reads a number. Numbers carry no terminator, so the parser only completes
/// on the first byte that cannot belong to one; that byte is left unconsumed.
#[derive(Debug, Default)]
pub(crate) struct NumberParser {
    text: String,
}

impl NumberParser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn resume(&mut self, input: &[u8]) -> Result<Step, DecodeError> {
        for (pos, &byte) in input.iter().enumerate() {
            if !is_number_byte(byte) {
                let value = parse_number(&self.text)?;
                return Ok(Step::Done(JsonValue::Number(value), pos));
            }
            self.text.push(char::from(byte));
        }
        Ok(Step::Suspended)
    }

    /// Completes the number at end of input.
    pub(crate) fn finish(&self) -> Result<JsonValue, DecodeError> {
        parse_number(&self.text).map(JsonValue::Number)
    }
}

fn is_number_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
}

fn parse_number(text: &str) -> Result<f64, DecodeError> {
    if !is_json_number(text.as_bytes()) {
        return Err(DecodeError::InvalidNumber(format!("{text:?} is not a number")));
    }
    text.parse::<f64>()
        .map_err(|e| DecodeError::InvalidNumber(format!("{text:?}: {e}")))
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
fn is_json_number(text: &[u8]) -> bool {
    let mut rest = text;
    if let [b'-', tail @ ..] = rest {
        rest = tail;
    }
    rest = match rest {
        [b'0', tail @ ..] => tail,
        [b'1'..=b'9', ..] => skip_digits(rest),
        _ => return false,
    };
    if let [b'.', tail @ ..] = rest {
        let after = skip_digits(tail);
        if after.len() == tail.len() {
            return false;
        }
        rest = after;
    }
    if let [b'e' | b'E', tail @ ..] = rest {
        let tail = match tail {
            [b'+' | b'-', signed @ ..] => signed,
            _ => tail,
        };
        let after = skip_digits(tail);
        if after.len() == tail.len() {
            return false;
        }
        rest = after;
    }
    rest.is_empty()
}

fn skip_digits(text: &[u8]) -> &[u8] {
    let digits = text.iter().take_while(|b| b.is_ascii_digit()).count();
    &text[digits..]
}
