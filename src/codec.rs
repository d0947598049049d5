use bytes::{BufMut, BytesMut};
use tokio_util::codec;

use crate::{DecodeError, Decoder, DecoderConfig, JsonValue, StreamError};

/// Frames a byte stream as a sequence of JSON values.
///
/// Decoding accepts concatenated JSON with arbitrary framing. Encoding writes
/// each value compactly followed by a newline, so consecutive numbers stay
/// apart.
#[derive(Debug, Default)]
pub struct JsonCodec {
    decoder: Decoder,
    finished: bool,
    failed: Option<DecodeError>,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DecoderConfig) -> Self {
        Self {
            decoder: Decoder::with_config(config),
            finished: false,
            failed: None,
        }
    }

    /// Queued values first, then the decode error that ended the stream.
    fn next_frame(&mut self) -> Result<Option<JsonValue>, StreamError> {
        if let Some(value) = self.decoder.pop() {
            return Ok(Some(value));
        }
        match &self.failed {
            Some(e) => Err(e.clone().into()),
            None => Ok(None),
        }
    }
}

impl codec::Decoder for JsonCodec {
    type Item = JsonValue;
    type Error = StreamError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<JsonValue>, StreamError> {
        if self.failed.is_some() {
            // Input after a decode error is never decoded.
            src.clear();
        } else if !src.is_empty() {
            let chunk = src.split();
            self.failed = self.decoder.feed(&chunk).err();
        }
        self.next_frame()
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<JsonValue>, StreamError> {
        if let Some(value) = self.decode(src)? {
            return Ok(Some(value));
        }
        if !self.finished {
            self.finished = true;
            self.failed = self.decoder.finish().err();
        }
        self.next_frame()
    }
}

impl codec::Encoder<JsonValue> for JsonCodec {
    type Error = StreamError;

    fn encode(&mut self, item: JsonValue, dst: &mut BytesMut) -> Result<(), StreamError> {
        let encoded = simd_json::to_vec(&item)?;
        dst.reserve(encoded.len() + 1);
        dst.put_slice(&encoded);
        dst.put_u8(b'\n');
        Ok(())
    }
}
