//! Ambient full page cache configuration.
//!
//! The split decision depends on two pieces of configuration that this crate
//! does not own: whether the full page cache is enabled at all, and which
//! backend serves it. Only the Varnish backend imposes the per-line length
//! limit that makes splitting necessary, so both are queried on every
//! `set_header` call through the [`PageCacheConfig`] seam.

/// Maximum byte length of a single emitted header value, roughly 8kb.
pub const DEFAULT_SPLIT_THRESHOLD: usize = 8000;

/// The backend serving the full page cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// The application's own cache storage, no line-length constraint.
    BuiltIn,
    /// A Varnish proxy in front of the application.
    Varnish,
}

/// Read-only view of the full page cache configuration.
///
/// Implementations are queried per invocation and must not block.
#[cfg_attr(test, mockall::automock)]
pub trait PageCacheConfig: Send + Sync {
    /// Whether full page caching is currently enabled.
    fn is_enabled(&self) -> bool;

    /// The currently active cache backend.
    fn backend(&self) -> CacheBackend;
}

/// A [`PageCacheConfig`] with fixed answers, for wiring and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPageCacheConfig {
    enabled: bool,
    backend: CacheBackend,
}

impl FixedPageCacheConfig {
    pub fn new(enabled: bool, backend: CacheBackend) -> Self {
        Self { enabled, backend }
    }

    /// Enabled full page cache served by Varnish.
    pub fn varnish() -> Self {
        Self::new(true, CacheBackend::Varnish)
    }
}

impl PageCacheConfig for FixedPageCacheConfig {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn backend(&self) -> CacheBackend {
        self.backend
    }
}
