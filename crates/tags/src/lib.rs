//! Splitting of oversized cache-tag response headers.
//!
//! Full page caches invalidate entries by cache tags, and a response's
//! `X-Magento-Tags` header lists every tag the cached entry depends on. On
//! large catalog pages that list easily outgrows the per-line header limit of
//! the Varnish proxy in front of the application, which then refuses the
//! whole response. This crate rewrites such a header into multiple header
//! occurrences, each within the limit, in a way that is fully reversible:
//! joining the occurrences with commas reproduces the original value byte
//! for byte, and no individual tag token is ever broken.
//!
//! # How it works
//!
//! The [`interceptor::TagHeaderSplitter`] wraps the set-header operation of a
//! response. Three guards decide whether it engages at all: the header being
//! set must be exactly the cache-tag header, full page caching must be
//! enabled, and the active backend must be Varnish. If any guard fails, or
//! the value already fits, the call is delegated unchanged to the underlying
//! operation. Only an oversized tag header is cut, by
//! [`split::split_tags`], at token boundaries into segments of at most the
//! configured threshold (8000 bytes by default) and applied as separate
//! occurrences.
//!
//! On the wire the occurrences fold back into one logical line. The
//! [`codec::HeaderEncoder`] consults a [`codec::MultiValueRegistry`] built at
//! startup to know which header names serialize that way.
//!
//! # Example
//!
//! ```
//! use varnish_tags::config::FixedPageCacheConfig;
//! use varnish_tags::header::X_MAGENTO_TAGS;
//! use varnish_tags::interceptor::{SetHeaderOutcome, TagHeaderSplitter};
//!
//! let splitter = TagHeaderSplitter::new(FixedPageCacheConfig::varnish()).with_threshold(11);
//! let mut response = http::Response::new(());
//!
//! let outcome = splitter
//!     .set_header(&mut response, X_MAGENTO_TAGS, "tag_1,tag_2,tag_3", false, |_, _, _| {
//!         unreachable!("oversized tag header is handled locally");
//!     })
//!     .unwrap();
//!
//! assert_eq!(outcome, SetHeaderOutcome::Split { segments: 2 });
//! let values: Vec<_> = response.headers().get_all("x-magento-tags").iter().collect();
//! assert_eq!(values, ["tag_1,tag_2", "tag_3"]);
//! ```
//!
//! # Scope
//!
//! The crate owns the split decision and the splitting algorithm. General
//! HTTP parsing, cache backend selection and the request/response lifecycle
//! belong to the host application; they are reached only through the small
//! seams in [`config`] and [`interceptor`].

pub mod codec;
pub mod config;
pub mod header;
pub mod interceptor;
pub mod split;

mod error;
mod utils;

pub use error::HeaderError;
pub(crate) use utils::ensure;
