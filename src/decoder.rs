use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::parsers::{choose_required, is_whitespace, ParseOptions, Step, SubParser};
use crate::{metrics, DecodeError, DecoderConfig, JsonValue};

/// Incremental JSON decoder.
///
/// Bytes go in through [`Decoder::feed`] in chunks of any size, split
/// anywhere; every top-level value that becomes complete is queued and can be
/// pulled with [`Decoder::pop`] or [`Decoder::drain`]. Several values may follow
/// each other with nothing but optional whitespace in between.
///
/// ```
/// use json_event_stream::{Decoder, JsonValue};
///
/// let mut decoder = Decoder::new();
/// decoder.feed(br#"{"name": "Al"#).unwrap();
/// decoder.feed(br#"ice"} [1, 2"#).unwrap();
/// decoder.feed(b"]").unwrap();
/// decoder.finish().unwrap();
///
/// let values: Vec<JsonValue> = decoder.drain().collect();
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[0].get("name").and_then(JsonValue::as_str), Some("Alice"));
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    active: Option<SubParser>,
    queue: VecDeque<JsonValue>,
    options: ParseOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            active: None,
            queue: VecDeque::new(),
            options,
        }
    }

    pub fn with_config(config: &DecoderConfig) -> Self {
        Self::with_options(config.parse_options())
    }

    /// Feeds the next chunk of input.
    ///
    /// On error the value being decoded is abandoned; values completed earlier,
    /// including earlier in the same chunk, stay queued.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), DecodeError> {
        trace!(len = chunk.len(), "feeding chunk");
        let mut rest = chunk;
        while !rest.is_empty() {
            let mut parser = match self.active.take() {
                Some(parser) => parser,
                None => {
                    let Some(start) = rest.iter().position(|&b| !is_whitespace(b)) else {
                        return Ok(());
                    };
                    rest = &rest[start..];
                    choose_required(rest[0], self.options, 0).map_err(|e| self.fail(e))?
                }
            };

            match parser.resume(rest).map_err(|e| self.fail(e))? {
                Step::Suspended => {
                    self.active = Some(parser);
                    return Ok(());
                }
                Step::Done(value, consumed) => {
                    self.enqueue(value);
                    rest = &rest[consumed..];
                }
            }
        }
        Ok(())
    }

    pub fn feed_str(&mut self, chunk: &str) -> Result<(), DecodeError> {
        self.feed(chunk.as_bytes())
    }

    /// Signals the end of input.
    ///
    /// A trailing number completes as if whitespace followed it; any other
    /// value still open is an error.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        let Some(parser) = self.active.take() else {
            return Ok(());
        };
        let value = parser.finish().map_err(|e| self.fail(e))?;
        self.enqueue(value);
        Ok(())
    }

    /// Takes the oldest completed value.
    pub fn pop(&mut self) -> Option<JsonValue> {
        let value = self.queue.pop_front();
        metrics::set_queue_depth(self.queue.len());
        value
    }

    /// Yields queued values oldest first, one at a time. Values the consumer
    /// does not pull stay queued.
    pub fn drain(&mut self) -> impl Iterator<Item = JsonValue> + '_ {
        std::iter::from_fn(move || self.pop())
    }

    /// Number of completed values waiting to be pulled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether no value is partially decoded.
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    fn enqueue(&mut self, value: JsonValue) {
        debug!(pending = self.queue.len() + 1, "decoded JSON value");
        self.queue.push_back(value);
        metrics::record_decoded_value();
        metrics::set_queue_depth(self.queue.len());
    }

    fn fail(&mut self, error: DecodeError) -> DecodeError {
        warn!("Discarding partial JSON value: {}", error);
        self.active = None;
        metrics::record_decode_error();
        error
    }
}
