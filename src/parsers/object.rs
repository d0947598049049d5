use indexmap::IndexMap;

use super::{choose_required, is_whitespace, ParseOptions, Step, StringParser, SubParser};
use crate::value::insert_last_write;
use crate::{DecodeError, JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    ExpectingKey,
    ExpectingColon,
    ExpectingValue,
    ExpectingComma,
}

#[derive(Debug)]
pub(crate) struct ObjectParser {
    started: bool,
    entries: IndexMap<String, JsonValue>,
    state: ObjectState,
    key: Option<String>,
    child: Option<SubParser>,
    options: ParseOptions,
    depth: usize,
}

impl ObjectParser {
    pub(crate) fn new(options: ParseOptions, depth: usize) -> Self {
        Self {
            started: false,
            entries: IndexMap::new(),
            state: ObjectState::ExpectingKey,
            key: None,
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
                Some(b'{') => {
                    self.started = true;
                    pos = 1;
                }
                Some(&other) => {
                    return Err(malformed(format!("expected '{{' but found {:?}", char::from(other))))
                }
            }
        }

        while pos < input.len() {
            let byte = input[pos];

            if self.child.is_none() {
                if is_whitespace(byte) {
                    pos += 1;
                    continue;
                }
                if byte == b'}' {
                    self.check_closable()?;
                    let entries = std::mem::take(&mut self.entries);
                    return Ok(Step::Done(JsonValue::Object(entries), pos + 1));
                }
            }

            match self.state {
                ObjectState::ExpectingComma => {
                    if byte != b',' {
                        return Err(malformed(format!(
                            "expected ',' or '}}' but found {:?}",
                            char::from(byte)
                        )));
                    }
                    self.state = ObjectState::ExpectingKey;
                    pos += 1;
                }
                ObjectState::ExpectingColon => {
                    if byte != b':' {
                        return Err(malformed(format!("expected ':' but found {:?}", char::from(byte))));
                    }
                    self.state = ObjectState::ExpectingValue;
                    pos += 1;
                }
                ObjectState::ExpectingKey => {
                    let mut child = match self.child.take() {
                        Some(child) => child,
                        None if byte == b'"' => SubParser::String(StringParser::new(self.options)),
                        None => {
                            return Err(malformed(format!(
                                "expected a string key but found {:?}",
                                char::from(byte)
                            )))
                        }
                    };
                    match child.resume(&input[pos..])? {
                        Step::Suspended => {
                            self.child = Some(child);
                            return Ok(Step::Suspended);
                        }
                        Step::Done(JsonValue::String(key), consumed) => {
                            self.key = Some(key);
                            self.state = ObjectState::ExpectingColon;
                            pos += consumed;
                        }
                        Step::Done(_, _) => return Err(malformed("object key is not a string".into())),
                    }
                }
                ObjectState::ExpectingValue => {
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
                            let key = self
                                .key
                                .take()
                                .ok_or_else(|| malformed("value completed before its key".into()))?;
                            insert_last_write(&mut self.entries, key, value);
                            self.state = ObjectState::ExpectingComma;
                            pos += consumed;
                        }
                    }
                }
            }
        }
        Ok(Step::Suspended)
    }

    /// `}` is only valid right after `{` or after a complete member.
    fn check_closable(&self) -> Result<(), DecodeError> {
        match self.state {
            ObjectState::ExpectingComma => Ok(()),
            ObjectState::ExpectingKey if self.entries.is_empty() => Ok(()),
            ObjectState::ExpectingKey => Err(malformed("trailing comma before '}'".into())),
            ObjectState::ExpectingColon | ObjectState::ExpectingValue => {
                Err(malformed("key without a value before '}'".into()))
            }
        }
    }
}

fn malformed(message: String) -> DecodeError {
    DecodeError::MalformedObject(message)
}
