//! Choosing the active configuration at boot
//!
//! The embedded `indexer.toml` wins whenever it parses and validates. Flash
//! keeps a postcard copy of the last configuration that did, which is used
//! when the embedded one is rejected. Defaults are the last resort.

use super::toml::{parse_config, ParseError};
use super::types::{ConfigError, IndexerConfig};

/// Upper bound on the postcard form of [`IndexerConfig`]
pub const MAX_STORED_SIZE: usize = 256;

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSource {
    Embedded,
    Stored,
    Default,
}

/// Why the embedded configuration was not used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmbeddedError {
    Parse(ParseError),
    Invalid(ConfigError),
}

/// Outcome of [`resolve_config`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub config: IndexerConfig,
    pub source: ConfigSource,
    /// Set when the embedded config was rejected
    pub embedded_error: Option<EmbeddedError>,
    /// The stored copy is missing or differs and should be rewritten
    pub needs_store: bool,
}

/// Decode and validate a stored postcard config
pub fn decode_stored(bytes: &[u8]) -> Result<IndexerConfig, ConfigError> {
    let config = IndexerConfig::from_postcard(bytes)?;
    config.validate()?;
    Ok(config)
}

/// Pick the configuration to run with
///
/// `stored` is the raw flash item, if one was found.
pub fn resolve_config(embedded: &str, stored: Option<&[u8]>) -> ResolvedConfig {
    let stored = stored.and_then(|bytes| decode_stored(bytes).ok());

    let embedded_error = match parse_config(embedded) {
        Ok(config) => match config.validate() {
            Ok(()) => {
                return ResolvedConfig {
                    config,
                    source: ConfigSource::Embedded,
                    embedded_error: None,
                    needs_store: stored != Some(config),
                };
            }
            Err(e) => EmbeddedError::Invalid(e),
        },
        Err(e) => EmbeddedError::Parse(e),
    };

    match stored {
        Some(config) => ResolvedConfig {
            config,
            source: ConfigSource::Stored,
            embedded_error: Some(embedded_error),
            needs_store: false,
        },
        None => ResolvedConfig {
            config: IndexerConfig::default(),
            source: ConfigSource::Default,
            embedded_error: Some(embedded_error),
            needs_store: false,
        },
    }
}
