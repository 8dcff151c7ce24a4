//! The `X-Magento-Tags` header value object.
//!
//! Each instance holds one occurrence of the cache-tag header, a raw
//! comma-joined fragment of the full tag list. Several occurrences fold back
//! into a single wire line through [`XMagentoTags::to_multi_line`], which is
//! how the split header stays equivalent to the original unsplit one.

use crate::ensure;
use crate::error::HeaderError;
use http::HeaderValue;

/// Canonical field name of the cache-tag header.
pub const X_MAGENTO_TAGS: &str = "X-Magento-Tags";

/// A header occurrence that can be folded with others of the same type into
/// one comma-joined wire line.
pub trait MultiValueHeader {
    /// Canonical field name of this occurrence.
    fn field_name(&self) -> &str;

    /// Raw field value of this occurrence.
    fn field_value(&self) -> &str;
}

/// One occurrence of the `X-Magento-Tags` response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XMagentoTags {
    value: String,
}

impl XMagentoTags {
    /// Creates an occurrence from a raw tag list fragment.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::InvalidValue`] when the value is not a valid
    /// HTTP field value (control bytes, CR or LF).
    pub fn new<S: Into<String>>(value: S) -> Result<Self, HeaderError> {
        let value = value.into();
        if HeaderValue::from_str(&value).is_err() {
            return Err(HeaderError::invalid_value(format!("not a valid header value: {value:?}")));
        }
        Ok(Self { value })
    }

    /// Parses an occurrence from a full header line such as
    /// `X-Magento-Tags: tag_1,tag_2`.
    ///
    /// The name is matched case-insensitively at this layer, unlike the
    /// split guard which requires the exact canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::InvalidName`] for any other header name and
    /// [`HeaderError::InvalidValue`] for a line without a `:` separator or
    /// with an invalid value.
    pub fn from_line(line: &str) -> Result<Self, HeaderError> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HeaderError::invalid_value(format!("malformed header line: {line:?}")))?;

        ensure!(
            name.trim().eq_ignore_ascii_case(X_MAGENTO_TAGS),
            HeaderError::invalid_name(X_MAGENTO_TAGS, name.trim())
        );

        Self::new(value.trim_start())
    }

    /// Renders this single occurrence as a header line without line ending.
    pub fn to_line(&self) -> String {
        format!("{}: {}", X_MAGENTO_TAGS, self.value)
    }

    /// Folds this occurrence and `rest` (in order) into one wire line,
    /// `X-Magento-Tags: v1,v2,...\r\n`, equivalent to the unsplit header.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::TypeMismatch`] when any occurrence in `rest`
    /// carries a different field name; folding across header types is a
    /// caller bug, not something to paper over.
    pub fn to_multi_line(&self, rest: &[&dyn MultiValueHeader]) -> Result<String, HeaderError> {
        let mut values = Vec::with_capacity(rest.len() + 1);
        values.push(self.field_value());

        for header in rest {
            ensure!(
                header.field_name() == X_MAGENTO_TAGS,
                HeaderError::type_mismatch(X_MAGENTO_TAGS, header.field_name())
            );
            values.push(header.field_value());
        }

        Ok(format!("{}: {}\r\n", X_MAGENTO_TAGS, values.join(",")))
    }
}

impl MultiValueHeader for XMagentoTags {
    fn field_name(&self) -> &str {
        X_MAGENTO_TAGS
    }

    fn field_value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OtherHeader;

    impl MultiValueHeader for OtherHeader {
        fn field_name(&self) -> &str {
            "X-Other"
        }

        fn field_value(&self) -> &str {
            "value"
        }
    }

    #[test]
    fn from_line_accepts_case_insensitive_name() {
        let header = XMagentoTags::from_line("x-magento-tags: tag_1,tag_2").unwrap();
        assert_eq!(header.field_value(), "tag_1,tag_2");
        assert_eq!(header.field_name(), X_MAGENTO_TAGS);
    }

    #[test]
    fn from_line_rejects_foreign_name() {
        let err = XMagentoTags::from_line("X-Cache-Tags: tag_1").unwrap_err();
        assert!(matches!(err, HeaderError::InvalidName { .. }));
    }

    #[test]
    fn from_line_rejects_missing_separator() {
        let err = XMagentoTags::from_line("no separator here").unwrap_err();
        assert!(matches!(err, HeaderError::InvalidValue { .. }));
    }

    #[test]
    fn new_rejects_control_bytes() {
        let err = XMagentoTags::new("tag_1\r\ntag_2").unwrap_err();
        assert!(matches!(err, HeaderError::InvalidValue { .. }));
    }

    #[test]
    fn to_line_renders_canonical_name() {
        let header = XMagentoTags::new("tag_1,tag_2").unwrap();
        assert_eq!(header.to_line(), "X-Magento-Tags: tag_1,tag_2");
    }

    #[test]
    fn to_multi_line_joins_occurrences_in_order() {
        let first = XMagentoTags::new("tag_1,tag_2").unwrap();
        let second = XMagentoTags::new("tag_3").unwrap();
        let third = XMagentoTags::new("tag_4,tag_5").unwrap();

        let line = first.to_multi_line(&[&second, &third]).unwrap();
        assert_eq!(line, "X-Magento-Tags: tag_1,tag_2,tag_3,tag_4,tag_5\r\n");
    }

    #[test]
    fn to_multi_line_rejects_mixed_header_types() {
        let first = XMagentoTags::new("tag_1").unwrap();
        let err = first.to_multi_line(&[&OtherHeader]).unwrap_err();
        assert!(matches!(err, HeaderError::TypeMismatch { .. }));
    }
}
