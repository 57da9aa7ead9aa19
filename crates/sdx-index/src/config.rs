//! Resolver configuration.

/// Content type stamped on stored index payloads.
pub const OPAQUE_CONTENT_TYPE: &str = "application/octet-stream";

/// Configuration for an [`IndexResolver`](crate::index::IndexResolver).
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Bucket the index objects live in.
    pub bucket: String,
    /// Content type of stored payloads. Must not be a `multipart/*` type.
    pub content_type: String,
    /// Store the merged set back after reading more than one sibling.
    pub write_back: bool,
    /// Log a warning when an index has more siblings than this.
    pub sibling_warn_threshold: usize,
}

impl ResolverConfig {
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            content_type: OPAQUE_CONTENT_TYPE.to_string(),
            write_back: true,
            sibling_warn_threshold: 25,
        }
    }
}

/// Builder for resolver configuration.
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    /// Content type stamped on stored and written-back payloads.
    ///
    /// `multipart/*` types are rejected when the resolver is built, since a
    /// written-back index must read as a single opaque value.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    pub fn write_back(mut self, enabled: bool) -> Self {
        self.config.write_back = enabled;
        self
    }

    pub fn sibling_warn_threshold(mut self, threshold: usize) -> Self {
        self.config.sibling_warn_threshold = threshold;
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

impl Default for ResolverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
