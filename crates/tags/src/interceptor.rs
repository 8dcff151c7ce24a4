//! Response interception around the set-header operation.
//!
//! [`TagHeaderSplitter`] wraps the underlying set-header call: when the
//! cache-tag header is being set on a Varnish-backed full page cache and its
//! value is over the threshold, the value is cut into within-threshold
//! segments and each segment is appended as its own occurrence on the
//! response, bypassing the original operation. In every other case the call
//! is delegated unchanged, so all non-tag headers take the fast path.

use crate::codec::{MultiValueFold, MultiValueRegistry};
use crate::config::{CacheBackend, DEFAULT_SPLIT_THRESHOLD, PageCacheConfig};
use crate::error::HeaderError;
use crate::header::X_MAGENTO_TAGS;
use crate::split::split_tags;
use async_trait::async_trait;
use http::{HeaderName, HeaderValue, Response};
use tracing::{debug, error};

/// Which branch a [`TagHeaderSplitter::set_header`] call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetHeaderOutcome {
    /// The call was handed to the underlying set-header operation unchanged.
    Delegated,
    /// The value was split and applied locally; the underlying operation
    /// never ran.
    Split { segments: usize },
}

/// Splits oversized cache-tag headers into multiple occurrences.
pub struct TagHeaderSplitter<C> {
    config: C,
    /// Exact spelling a caller must use; the name guard is case-sensitive.
    header_name: &'static str,
    append_name: HeaderName,
    threshold: usize,
}

impl<C: PageCacheConfig> TagHeaderSplitter<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            header_name: X_MAGENTO_TAGS,
            append_name: HeaderName::from_static("x-magento-tags"),
            threshold: DEFAULT_SPLIT_THRESHOLD,
        }
    }

    /// Overrides the split threshold, mainly to keep tests readable.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Registers the tag header's comma-joined wire folding. Idempotent,
    /// meant to be called once when the serialization side is wired up.
    pub fn register_wire_format(&self, registry: &mut MultiValueRegistry) {
        registry.register(self.header_name, MultiValueFold::CommaJoined);
    }

    /// Intercepts a set-header request for `response`.
    ///
    /// Unless `name` is exactly the cache-tag header, full page caching is
    /// enabled, the Varnish backend is active and the value is over the
    /// threshold, the call is delegated to `proceed` with its arguments
    /// unchanged. Otherwise each segment of the split value is appended as a
    /// separate occurrence and `proceed` is never invoked.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::InvalidValue`] when a segment is not a valid
    /// header value; occurrences appended before the failure remain on the
    /// response.
    pub fn set_header<B, F>(
        &self,
        response: &mut Response<B>,
        name: &str,
        value: &str,
        replace: bool,
        proceed: F,
    ) -> Result<SetHeaderOutcome, HeaderError>
    where
        F: FnOnce(&str, &str, bool),
    {
        if !self.is_tag_header(name) || !self.config.is_enabled() || !self.is_varnish_backend() {
            proceed(name, value, replace);
            return Ok(SetHeaderOutcome::Delegated);
        }

        if value.len() <= self.threshold {
            proceed(name, value, replace);
            return Ok(SetHeaderOutcome::Delegated);
        }

        let segments = split_tags(value, self.threshold);
        debug!(length = value.len(), segments = segments.len(), "splitting oversized tag header");

        for segment in &segments {
            let value = HeaderValue::from_str(segment)
                .map_err(|e| HeaderError::invalid_value(format!("{e}: {segment:?}")))?;
            response.headers_mut().append(self.append_name.clone(), value);
        }

        Ok(SetHeaderOutcome::Split { segments: segments.len() })
    }

    fn is_tag_header(&self, name: &str) -> bool {
        name == self.header_name
    }

    fn is_varnish_backend(&self) -> bool {
        self.config.backend() == CacheBackend::Varnish
    }
}

/// Hook for rewriting outgoing responses.
#[async_trait]
pub trait Interceptor<B: Send>: Send + Sync {
    async fn on_response(&self, _resp: &mut Response<B>) {}
}

/// [`Interceptor`] that rewrites an already-set oversized tag header into
/// multiple occurrences.
///
/// This is the integration point for pipelines where headers land on the
/// response before interception runs; the guard and split semantics are the
/// same as [`TagHeaderSplitter::set_header`].
pub struct SplitTagsInterceptor<C> {
    splitter: TagHeaderSplitter<C>,
}

impl<C: PageCacheConfig> SplitTagsInterceptor<C> {
    pub fn new(splitter: TagHeaderSplitter<C>) -> Self {
        Self { splitter }
    }

    fn rewrite<B>(&self, response: &mut Response<B>) {
        let splitter = &self.splitter;

        if !splitter.config.is_enabled() || !splitter.is_varnish_backend() {
            return;
        }

        // fold every occurrence back into the full tag list before deciding
        // anything, a removal further down deletes all of them
        let mut parts = Vec::new();
        for value in response.headers().get_all(&splitter.append_name) {
            let Ok(part) = value.to_str() else {
                error!("tag header value is not valid utf-8, leaving it untouched");
                return;
            };
            parts.push(part);
        }

        if parts.is_empty() {
            return;
        }

        let tags = parts.join(",");
        if tags.len() <= splitter.threshold {
            return;
        }

        let segments = split_tags(&tags, splitter.threshold);
        debug!(length = tags.len(), segments = segments.len(), "splitting oversized tag header");

        response.headers_mut().remove(&splitter.append_name);
        for segment in segments {
            // segments of a valid header value are themselves valid
            match HeaderValue::from_str(segment) {
                Ok(value) => {
                    response.headers_mut().append(splitter.append_name.clone(), value);
                }
                Err(e) => error!(cause = %e, "failed to build tag header segment"),
            }
        }
    }
}

#[async_trait]
impl<C: PageCacheConfig, B: Send> Interceptor<B> for SplitTagsInterceptor<C> {
    async fn on_response(&self, resp: &mut Response<B>) {
        self.rewrite(resp);
    }
}
