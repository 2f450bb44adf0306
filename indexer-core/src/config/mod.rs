//! Configuration types
//!
//! Board-agnostic configuration structures, the allocation-free reader for
//! `indexer.toml`, and with the `serde` feature a postcard binary form for
//! flash storage.

#[cfg(feature = "serde")]
pub mod stored;
pub mod toml;
pub mod types;

#[cfg(feature = "serde")]
pub use stored::{resolve_config, ConfigSource, EmbeddedError, ResolvedConfig, MAX_STORED_SIZE};
pub use self::toml::{parse_config, ParseError};
pub use types::*;
