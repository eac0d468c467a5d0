//! Reader configuration

use encoding_rs::Encoding;

use crate::core::lookahead::DEFAULT_BLOCK_SIZE;
use crate::core::numbers::extract_boolean;

/// Environment variable consulted by [`ReaderConfig::from_env`]
pub const SHOW_SKIPPED_TAGS_VAR: &str = "SHOW_SKIPPED_TAGS";

/// Per-reader options
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Log a warning naming every tag passed to `skip_tag`
    pub log_skipped_tags: bool,
    /// Treat unknown entity names and non-XML character references as
    /// well-formedness errors instead of passing them through
    pub strict_entities: bool,
    /// Bytes requested from the source per read
    pub block_size: usize,
    /// Decode with this encoding instead of detecting one
    pub encoding: Option<&'static Encoding>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            log_skipped_tags: false,
            strict_entities: false,
            block_size: DEFAULT_BLOCK_SIZE,
            encoding: None,
        }
    }
}

impl ReaderConfig {
    /// Defaults, with `log_skipped_tags` taken from `SHOW_SKIPPED_TAGS`
    pub fn from_env() -> Self {
        let log_skipped_tags = std::env::var(SHOW_SKIPPED_TAGS_VAR)
            .map(|value| extract_boolean(&value))
            .unwrap_or(false);
        ReaderConfig {
            log_skipped_tags,
            ..Self::default()
        }
    }

    pub fn with_log_skipped_tags(mut self, enabled: bool) -> Self {
        self.log_skipped_tags = enabled;
        self
    }

    pub fn with_strict_entities(mut self, enabled: bool) -> Self {
        self.strict_entities = enabled;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
}
