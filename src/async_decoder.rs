use bytes::BytesMut;
use futures::Stream;
use serde::de::DeserializeOwned;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    time::timeout,
};
use tracing::{debug, instrument};

use crate::{DecodeError, Decoder, DecoderConfig, JsonValue, StreamError};

/// Pulls chunks from an `AsyncRead` and decodes the JSON values they carry.
///
/// The reader is only polled when a value is requested and none is queued, so
/// a slow consumer stops the transport from being read.
pub struct AsyncJsonDecoder<R> {
    reader: R,
    buffer: BytesMut,
    decoder: Decoder,
    config: DecoderConfig,
    eof: bool,
    /// Reported once the values completed before it have been handed out,
    /// then on every later call. The reader is never polled again.
    failed: Option<DecodeError>,
}

impl<R: AsyncRead + Unpin> AsyncJsonDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(config.buffer_size),
            decoder: Decoder::with_config(&config),
            config,
            eof: false,
            failed: None,
        }
    }

    pub fn into_stream(mut self) -> impl Stream<Item = Result<JsonValue, StreamError>> {
        async_stream::stream! {
            loop {
                match self.next_value().await {
                    Ok(Some(value)) => yield Ok(value),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        }
    }

    pub fn into_typed_stream<T: DeserializeOwned>(self) -> impl Stream<Item = Result<T, StreamError>> {
        let values = self.into_stream();
        async_stream::stream! {
            for await item in values {
                yield item.and_then(|value| value.deserialize_into::<T>().map_err(StreamError::from));
            }
        }
    }

    /// Reads one chunk into the buffer. `false` means the reader is exhausted.
    #[instrument(skip(self))]
    async fn fill_buffer(&mut self) -> Result<bool, StreamError> {
        self.buffer.clear();
        self.buffer.reserve(self.config.buffer_size);

        let mut limited = (&mut self.reader).take(self.config.buffer_size as u64);
        let read_fut = limited.read_buf(&mut self.buffer);
        let bytes_read = match self.config.timeout {
            Some(t) => timeout(t, read_fut)
                .await
                .map_err(|_| StreamError::Timeout)??,
            None => read_fut.await?,
        };
        debug!(bytes_read, "read chunk");
        Ok(bytes_read > 0)
    }

    /// The next decoded value, or `None` once the reader is exhausted and every
    /// value has been handed out.
    ///
    /// A decode error is fatal: values completed before it are still returned,
    /// after that every call fails with the same error.
    #[instrument(skip(self))]
    pub async fn next_value(&mut self) -> Result<Option<JsonValue>, StreamError> {
        loop {
            if let Some(value) = self.decoder.pop() {
                return Ok(Some(value));
            }
            if let Some(e) = &self.failed {
                return Err(e.clone().into());
            }
            if self.eof {
                return Ok(None);
            }
            let result = if self.fill_buffer().await? {
                self.decoder.feed(&self.buffer)
            } else {
                self.eof = true;
                self.decoder.finish()
            };
            self.failed = result.err();
        }
    }

    /// The next value deserialized into `T`.
    #[instrument(skip(self))]
    pub async fn next<T: DeserializeOwned>(&mut self) -> Result<T, StreamError> {
        match self.next_value().await? {
            Some(value) => Ok(value.deserialize_into()?),
            None => Err(StreamError::EndOfStream),
        }
    }

    /// Up to `batch_size` values; fewer only when the stream ends.
    #[instrument(skip(self))]
    pub async fn next_batch<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, StreamError> {
        let mut batch = Vec::with_capacity(self.config.batch_size);
        while batch.len() < self.config.batch_size {
            match self.next::<T>().await {
                Ok(item) => batch.push(item),
                Err(StreamError::EndOfStream) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(batch)
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
