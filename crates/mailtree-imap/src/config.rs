//! Parser limits.

/// Default maximum nesting of body structures.
pub const DEFAULT_MAX_BODY_DEPTH: usize = 32;

/// Default maximum number of entries in one address list.
pub const DEFAULT_MAX_ADDRESSES: usize = 10_000;

/// Bounds applied to recursive or unbounded response structures.
///
/// Input beyond a limit fails with a structural error instead of
/// growing the stack or allocating without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of body structures. Each multipart level and each
    /// embedded `message/rfc822` body counts as one level.
    pub max_body_depth: usize,
    /// Maximum number of entries in one ENVELOPE address list.
    pub max_addresses: usize,
}

impl Limits {
    /// Creates limits with the default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_body_depth: DEFAULT_MAX_BODY_DEPTH,
            max_addresses: DEFAULT_MAX_ADDRESSES,
        }
    }

    /// Creates a limits builder.
    #[must_use]
    pub const fn builder() -> LimitsBuilder {
        LimitsBuilder::new()
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for parser limits.
#[derive(Debug, Clone, Copy)]
pub struct LimitsBuilder {
    max_body_depth: usize,
    max_addresses: usize,
}

impl LimitsBuilder {
    /// Creates a new builder with the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_body_depth: DEFAULT_MAX_BODY_DEPTH,
            max_addresses: DEFAULT_MAX_ADDRESSES,
        }
    }

    /// Sets the maximum body structure nesting.
    #[must_use]
    pub const fn max_body_depth(mut self, depth: usize) -> Self {
        self.max_body_depth = depth;
        self
    }

    /// Sets the maximum address list length.
    #[must_use]
    pub const fn max_addresses(mut self, count: usize) -> Self {
        self.max_addresses = count;
        self
    }

    /// Builds the limits.
    #[must_use]
    pub const fn build(self) -> Limits {
        Limits {
            max_body_depth: self.max_body_depth,
            max_addresses: self.max_addresses,
        }
    }
}

impl Default for LimitsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_body_depth, 32);
        assert_eq!(limits.max_addresses, 10_000);
    }

    #[test]
    fn test_limits_builder() {
        let limits = Limits::builder().max_body_depth(4).max_addresses(2).build();
        assert_eq!(limits.max_body_depth, 4);
        assert_eq!(limits.max_addresses, 2);
    }

    #[test]
    fn test_builder_keeps_unset_defaults() {
        let limits = Limits::builder().max_addresses(5).build();
        assert_eq!(limits.max_body_depth, DEFAULT_MAX_BODY_DEPTH);
        assert_eq!(limits.max_addresses, 5);
    }
}
