use super::{ParseOptions, Step};
use crate::{DecodeError, JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Pending,
    /// Inside `\uXXXX`, `digits` hex digits read so far.
    Unicode { digits: u8, code: u32 },
}

/// Reads a `"`-delimited string.
///
/// By default a backslash only strips the special meaning of the next
/// character, which is kept verbatim (`\"` gives `"`, `\n` gives `n`). With
/// `unescape_strings` the standard JSON escapes are decoded instead.
#[derive(Debug)]
pub(crate) struct StringParser {
    started: bool,
    bytes: Vec<u8>,
    escape: Escape,
    unescape: bool,
    high_surrogate: Option<u32>,
}

impl StringParser {
    pub(crate) fn new(options: ParseOptions) -> Self {
        Self {
            started: false,
            bytes: Vec::new(),
            escape: Escape::None,
            unescape: options.unescape_strings,
            high_surrogate: None,
        }
    }

    pub(crate) fn resume(&mut self, input: &[u8]) -> Result<Step, DecodeError> {
        let mut pos = 0;
        if !self.started {
            match input.first() {
                None => return Ok(Step::Suspended),
                Some(b'"') => {
                    self.started = true;
                    pos = 1;
                }
                Some(&other) => {
                    return Err(DecodeError::MalformedString(format!(
                        "expected '\"' but found {:?}",
                        char::from(other)
                    )))
                }
            }
        }

        while pos < input.len() {
            let byte = input[pos];
            pos += 1;

            match self.escape {
                Escape::Pending => {
                    self.escape = Escape::None;
                    if self.unescape {
                        self.decode_escape(byte)?;
                    } else {
                        self.bytes.push(byte);
                    }
                    continue;
                }
                Escape::Unicode { digits, code } => {
                    self.push_hex_digit(byte, digits, code)?;
                    continue;
                }
                Escape::None => {}
            }

            match byte {
                b'\\' => self.escape = Escape::Pending,
                b'"' => {
                    self.reject_pending_surrogate()?;
                    let text = String::from_utf8(std::mem::take(&mut self.bytes))
                        .map_err(|e| DecodeError::MalformedString(format!("invalid UTF-8: {e}")))?;
                    return Ok(Step::Done(JsonValue::String(text), pos));
                }
                _ => {
                    self.reject_pending_surrogate()?;
                    self.bytes.push(byte);
                }
            }
        }
        Ok(Step::Suspended)
    }

    fn decode_escape(&mut self, byte: u8) -> Result<(), DecodeError> {
        if byte == b'u' {
            self.escape = Escape::Unicode { digits: 0, code: 0 };
            return Ok(());
        }
        self.reject_pending_surrogate()?;
        let decoded = match byte {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{08}',
            b'f' => '\u{0C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            other => {
                return Err(DecodeError::MalformedString(format!(
                    "unknown escape sequence \\{}",
                    char::from(other)
                )))
            }
        };
        self.push_char(decoded);
        Ok(())
    }

    fn push_hex_digit(&mut self, byte: u8, digits: u8, code: u32) -> Result<(), DecodeError> {
        let digit = char::from(byte).to_digit(16).ok_or_else(|| {
            DecodeError::MalformedString(format!("invalid hex digit {:?} in \\u escape", char::from(byte)))
        })?;
        let code = code * 16 + digit;
        if digits + 1 < 4 {
            self.escape = Escape::Unicode { digits: digits + 1, code };
            return Ok(());
        }
        self.escape = Escape::None;
        self.push_code_unit(code)
    }

    fn push_code_unit(&mut self, unit: u32) -> Result<(), DecodeError> {
        let scalar = match self.high_surrogate.take() {
            Some(high) if (0xDC00..=0xDFFF).contains(&unit) => {
                0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00)
            }
            Some(_) => return Err(unpaired_surrogate()),
            None if (0xD800..=0xDBFF).contains(&unit) => {
                self.high_surrogate = Some(unit);
                return Ok(());
            }
            None if (0xDC00..=0xDFFF).contains(&unit) => return Err(unpaired_surrogate()),
            None => unit,
        };
        let c = char::from_u32(scalar).ok_or_else(unpaired_surrogate)?;
        self.push_char(c);
        Ok(())
    }

    fn reject_pending_surrogate(&self) -> Result<(), DecodeError> {
        match self.high_surrogate {
            Some(_) => Err(unpaired_surrogate()),
            None => Ok(()),
        }
    }

    fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
}

fn unpaired_surrogate() -> DecodeError {
    DecodeError::MalformedString("unpaired UTF-16 surrogate in \\u escape".into())
}
