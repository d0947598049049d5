//! # Incremental JSON decoding
//!
//! This library decodes JSON values from a byte stream that arrives in chunks
//! of any size, split at any point: in the middle of a string, a number, a
//! UTF-8 sequence or between nesting levels. Values are produced as soon as
//! they are complete, several values may follow each other in one stream, and
//! nothing beyond the value currently being decoded is buffered.
//!
//! On top of the synchronous [`Decoder`] sit an async pull decoder over any
//! `AsyncRead` ([`AsyncJsonDecoder`]), a `tokio-util` codec ([`JsonCodec`]) and
//! an [`EventRelay`] that exchanges `{"event": .., "args": [..]}` envelopes
//! with peers.
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use tokio::time::{sleep, Duration};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A channel simulates the transport.
//!     let (tx, reader) = json_event_stream::ChannelReader::channel(10);
//!     let mut decoder = json_event_stream::AsyncJsonDecoder::new(reader);
//!
//!     tokio::spawn(async move {
//!         let response = r#"{"name": "Alice", "age": 30} {"name": "Bob", "age": 25}"#;
//!         for part in response.as_bytes().chunks(7) {
//!             tx.send(Bytes::copy_from_slice(part)).await.unwrap();
//!             sleep(Duration::from_millis(20)).await;
//!         }
//!     });
//!
//!     let alice: Person = decoder.next().await?;
//!     let bob: Person = decoder.next().await?;
//!     println!("Parsed {:?} and {:?}", alice, bob);
//!     Ok(())
//! }
//! ```
//!
//! ## Dialect
//!
//! By default values may only start with `"`, `[`, `{` or a digit `1`-`9`, and
//! a backslash in a string keeps the following character verbatim. Both are
//! configurable through [`ParseOptions`] / [`DecoderConfig`].

#[cfg(test)]
mod tests;

mod error;
pub use error::*;

mod value;
pub use value::JsonValue;

mod parsers;
pub use parsers::ParseOptions;

mod decoder;
pub use decoder::*;

mod config;
pub use config::*;

mod reader;
pub use reader::*;

mod async_decoder;
pub use async_decoder::*;

mod codec;
pub use codec::*;

mod relay;
pub use relay::*;

mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::gather_metrics;
