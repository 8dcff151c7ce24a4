//! Wire serialization for header collections with multi-value occurrences.
//!
//! The registry tells the encoder which header names carry several
//! occurrences that must fold back into one comma-joined line on the wire.
//! Registration happens once at startup, replacing the hidden static map the
//! reference system mutated at runtime.

use crate::error::HeaderError;
use crate::header::X_MAGENTO_TAGS;
use bytes::{BufMut, BytesMut};
use http::HeaderMap;
use std::collections::HashMap;
use tokio_util::codec::Encoder;

/// Initial buffer size reserved for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// How occurrences of a registered header name fold into one wire line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiValueFold {
    /// Occurrence values joined with commas, in insertion order.
    CommaJoined,
}

/// Startup-time registry of header names with multi-value wire folding.
///
/// Keys are matched case-insensitively; the spelling passed to
/// [`register`](Self::register) is kept and used on the wire. Registering the
/// same name again is a no-op, so wiring code may call it freely.
#[derive(Debug, Default)]
pub struct MultiValueRegistry {
    entries: HashMap<String, (String, MultiValueFold)>,
}

impl MultiValueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the cache-tag header already registered.
    pub fn with_tag_header() -> Self {
        let mut registry = Self::new();
        registry.register(X_MAGENTO_TAGS, MultiValueFold::CommaJoined);
        registry
    }

    pub fn register(&mut self, name: &str, fold: MultiValueFold) {
        self.entries.entry(name.to_ascii_lowercase()).or_insert_with(|| (name.to_string(), fold));
    }

    /// Looks up the canonical spelling and fold style for `name`.
    pub fn lookup(&self, name: &str) -> Option<(&str, MultiValueFold)> {
        self.entries.get(&name.to_ascii_lowercase()).map(|(canonical, fold)| (canonical.as_str(), *fold))
    }
}

/// Encoder serializing a header collection into raw bytes.
///
/// Names known to the registry have all their occurrences folded into a
/// single line; every other name is written one line per occurrence as plain
/// `name: value\r\n`.
#[derive(Debug)]
pub struct HeaderEncoder {
    registry: MultiValueRegistry,
}

impl HeaderEncoder {
    pub fn new(registry: MultiValueRegistry) -> Self {
        Self { registry }
    }
}

impl<'a> Encoder<&'a HeaderMap> for HeaderEncoder {
    type Error = HeaderError;

    fn encode(&mut self, item: &'a HeaderMap, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        for name in item.keys() {
            match self.registry.lookup(name.as_str()) {
                Some((canonical, MultiValueFold::CommaJoined)) => {
                    dst.put_slice(canonical.as_bytes());
                    dst.put_slice(b": ");
                    let mut first = true;
                    for value in item.get_all(name) {
                        if !first {
                            dst.put_u8(b',');
                        }
                        first = false;
                        dst.put_slice(value.as_bytes());
                    }
                    dst.put_slice(b"\r\n");
                }
                None => {
                    for value in item.get_all(name) {
                        dst.put_slice(name.as_ref());
                        dst.put_slice(b": ");
                        dst.put_slice(value.as_bytes());
                        dst.put_slice(b"\r\n");
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    fn encode(registry: MultiValueRegistry, headers: &HeaderMap) -> String {
        let mut encoder = HeaderEncoder::new(registry);
        let mut dst = BytesMut::new();
        encoder.encode(headers, &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn registered_name_folds_occurrences_into_one_line() {
        let mut headers = HeaderMap::new();
        headers.append("x-magento-tags", HeaderValue::from_static("tag_1,tag_2"));
        headers.append("x-magento-tags", HeaderValue::from_static("tag_3"));

        let wire = encode(MultiValueRegistry::with_tag_header(), &headers);
        assert_eq!(wire, "X-Magento-Tags: tag_1,tag_2,tag_3\r\n");
    }

    #[test]
    fn unregistered_name_keeps_one_line_per_occurrence() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let wire = encode(MultiValueRegistry::new(), &headers);
        assert_eq!(wire, "set-cookie: a=1\r\nset-cookie: b=2\r\n");
    }

    #[test]
    fn folded_line_matches_unsplit_header() {
        let mut split = HeaderMap::new();
        split.append("x-magento-tags", HeaderValue::from_static("tag_1,tag_2"));
        split.append("x-magento-tags", HeaderValue::from_static("tag_3"));

        let mut unsplit = HeaderMap::new();
        unsplit.append("x-magento-tags", HeaderValue::from_static("tag_1,tag_2,tag_3"));

        let split_wire = encode(MultiValueRegistry::with_tag_header(), &split);
        let unsplit_wire = encode(MultiValueRegistry::with_tag_header(), &unsplit);
        assert_eq!(split_wire, unsplit_wire);
    }

    #[test]
    fn re_registration_is_idempotent() {
        let mut registry = MultiValueRegistry::with_tag_header();
        registry.register("x-magento-tags", MultiValueFold::CommaJoined);

        let (canonical, fold) = registry.lookup("X-MAGENTO-TAGS").unwrap();
        assert_eq!(canonical, "X-Magento-Tags");
        assert_eq!(fold, MultiValueFold::CommaJoined);
    }
}
