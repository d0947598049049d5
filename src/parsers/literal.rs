use super::Step;
use crate::{DecodeError, JsonValue};

/// Matches `true`, `false` or `null` byte by byte.
#[derive(Debug)]
pub(crate) struct LiteralParser {
    expected: &'static [u8],
    matched: usize,
}

impl LiteralParser {
    /// `first` must be `t`, `f` or `n`.
    pub(crate) fn new(first: u8) -> Self {
        let expected: &'static [u8] = match first {
            b't' => b"true",
            b'f' => b"false",
            _ => b"null",
        };
        Self { expected, matched: 0 }
    }

    pub(crate) fn resume(&mut self, input: &[u8]) -> Result<Step, DecodeError> {
        for (pos, &byte) in input.iter().enumerate() {
            if byte != self.expected[self.matched] {
                return Err(DecodeError::UnexpectedCharacter(byte));
            }
            self.matched += 1;
            if self.matched == self.expected.len() {
                return Ok(Step::Done(self.value(), pos + 1));
            }
        }
        Ok(Step::Suspended)
    }

    fn value(&self) -> JsonValue {
        match self.expected {
            b"true" => JsonValue::Bool(true),
            b"false" => JsonValue::Bool(false),
            _ => JsonValue::Null,
        }
    }
}
