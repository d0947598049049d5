/// Errors raised while decoding. All of them are fatal to the value being
/// decoded; the decoder drops its in-progress state and does not resynchronize.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unexpected character {:?} where a JSON value was expected", as_char(.0))]
    UnexpectedCharacter(u8),
    #[error("Malformed string: {0}")]
    MalformedString(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Malformed array: {0}")]
    MalformedArray(String),
    #[error("Malformed object: {0}")]
    MalformedObject(String),
    #[error("Incomplete JSON data: input ended inside a value")]
    IncompleteInput,
    #[error("Nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}

/// Errors of the async layers: readers, codec and relay.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON decoding error: {0}")]
    Decode(#[from] DecodeError),
    #[error("JSON conversion error: {0}")]
    Json(#[from] simd_json::Error),
    #[error("Timeout while waiting for data")]
    Timeout,
    #[error("Stream ended before another JSON value was available")]
    EndOfStream,
}
