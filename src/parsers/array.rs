use super::{choose_required, is_whitespace, ParseOptions, Step, SubParser};
use crate::{DecodeError, JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    ExpectingValue,
    ExpectingComma,
}

#[derive(Debug)]
pub(crate) struct ArrayParser {
    started: bool,
    items: Vec<JsonValue>,
    state: ArrayState,
    child: Option<SubParser>,
    options: ParseOptions,
    depth: usize,
}

impl ArrayParser {
    pub(crate) fn new(options: ParseOptions, depth: usize) -> Self {
        Self {
            started: false,
            items: Vec::new(),
            state: ArrayState::ExpectingValue,
            child: None,
            options,
            depth,
        }
    }

    /// The child value still being decoded, if any.
    pub(crate) fn child(&self) -> Option<&SubParser> {
        self.child.as_ref()
    }

    pub(crate) fn resume(&mut self, input: &[u8]) -> Result<Step, DecodeError> {
        let mut pos = 0;
        if !self.started {
            match input.first() {
                None => return Ok(Step::Suspended),
                Some(b'[') => {
                    self.started = true;
                    pos = 1;
                }
                Some(&other) => {
                    return Err(DecodeError::MalformedArray(format!(
                        "expected '[' but found {:?}",
                        char::from(other)
                    )))
                }
            }
        }

        while pos < input.len() {
            let byte = input[pos];

            // Between elements the array may close and whitespace is insignificant.
            if self.child.is_none() {
                if is_whitespace(byte) {
                    pos += 1;
                    continue;
                }
                if byte == b']' {
                    if self.state == ArrayState::ExpectingValue && !self.items.is_empty() {
                        return Err(DecodeError::MalformedArray("trailing comma before ']'".into()));
                    }
                    let items = std::mem::take(&mut self.items);
                    return Ok(Step::Done(JsonValue::Array(items), pos + 1));
                }
            }

            match self.state {
                ArrayState::ExpectingComma => {
                    if byte != b',' {
                        return Err(DecodeError::MalformedArray(format!(
                            "expected ',' or ']' but found {:?}",
                            char::from(byte)
                        )));
                    }
                    self.state = ArrayState::ExpectingValue;
                    pos += 1;
                }
                ArrayState::ExpectingValue => {
                    let mut child = match self.child.take() {
                        Some(child) => child,
                        None => choose_required(byte, self.options, self.depth)?,
                    };
                    match child.resume(&input[pos..])? {
                        Step::Suspended => {
                            self.child = Some(child);
                            return Ok(Step::Suspended);
                        }
                        Step::Done(value, consumed) => {
                            self.items.push(value);
                            self.state = ArrayState::ExpectingComma;
                            pos += consumed;
                        }
                    }
                }
            }
        }
        Ok(Step::Suspended)
    }
}
