use std::time::Duration;

use serde::Deserialize;

use crate::ParseOptions;

/// Default TCP port peers of an [`EventRelay`](crate::EventRelay) talk on.
pub const DEFAULT_PORT: u16 = 13567;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Bytes requested from the reader per chunk.
    pub buffer_size: usize,
    /// Give up when a single read takes longer than this.
    pub timeout: Option<Duration>,
    pub batch_size: usize,
    pub max_depth: usize,
    pub accept_literals: bool,
    pub unescape_strings: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            buffer_size: 1024,
            timeout: None,
            batch_size: 10,
            max_depth: options.max_depth,
            accept_literals: options.accept_literals,
            unescape_strings: options.unescape_strings,
        }
    }
}

impl DecoderConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            accept_literals: self.accept_literals,
            unescape_strings: self.unescape_strings,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Outgoing values buffered per peer before `emit` waits.
    pub peer_buffer: usize,
    pub decoder: DecoderConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            peer_buffer: 64,
            decoder: DecoderConfig::default(),
        }
    }
}

#[cfg(feature = "configs")]
pub mod configuration {
    use config::Config;

    use super::RelayConfig;

    /// Loads a [`RelayConfig`] from a file (any format the `config` crate
    /// understands); missing keys keep their defaults.
    pub fn load_config(path: &str) -> Result<RelayConfig, config::ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        settings.try_deserialize()
    }
}
