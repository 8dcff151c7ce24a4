//! The tag list splitting algorithm.
//!
//! A tag list is a comma-separated sequence of opaque tokens. Splitting cuts
//! it into the minimum number of ordered segments, each at or under the
//! threshold, without ever breaking a token: every cut lands exactly on a
//! comma, and joining the segments with commas reproduces the input byte for
//! byte.

use tracing::warn;

/// Splits `tags` into ordered segments of at most `threshold` bytes each.
///
/// Returns borrowed sub-slices of the input, in order. An input at or under
/// the threshold comes back as a single segment equal to the input.
///
/// While the remaining value is over the threshold, the cut point is the last
/// comma at or before byte index `threshold` of the remainder, which yields
/// the largest prefix that still ends on a token boundary. The prefix
/// (excluding the comma) becomes a segment and the search restarts on the
/// suffix after the comma.
///
/// A single token longer than the threshold cannot be cut within the limit.
/// Rather than break the token, the cut moves to the first comma after it, so
/// only that token's segment exceeds the threshold; a remainder with no comma
/// at all is emitted whole. Both cases are logged.
pub fn split_tags(tags: &str, threshold: usize) -> Vec<&str> {
    if tags.len() <= threshold {
        return vec![tags];
    }

    let mut segments = Vec::with_capacity(tags.len() / threshold.max(1) + 1);
    let mut rest = tags;

    while rest.len() > threshold {
        // Commas are ascii, so searching bytes and slicing the str at a
        // comma index never lands inside a multi-byte character.
        let cut = match rest.as_bytes()[..=threshold].iter().rposition(|&b| b == b',') {
            Some(idx) => idx,
            None => {
                warn!(threshold, "tag token longer than split threshold, emitting oversized segment");
                match rest.as_bytes()[threshold + 1..].iter().position(|&b| b == b',') {
                    Some(idx) => threshold + 1 + idx,
                    // no token boundary left at all, the remainder is one token
                    None => break,
                }
            }
        };

        segments.push(&rest[..cut]);
        rest = &rest[cut + 1..];
    }

    segments.push(rest);
    segments
}

#[cfg(test)]
mod tests {
    use super::split_tags;

    fn join(segments: &[&str]) -> String {
        segments.join(",")
    }

    #[test]
    fn value_within_threshold_is_single_segment() {
        let segments = split_tags("tag_1,tag_2", 11);
        assert_eq!(segments, vec!["tag_1,tag_2"]);
    }

    #[test]
    fn value_over_threshold_cuts_on_token_boundary() {
        let segments = split_tags("tag_1,tag_2,tag_3", 11);
        assert_eq!(segments, vec!["tag_1,tag_2", "tag_3"]);
    }

    #[test]
    fn empty_value_is_single_empty_segment() {
        assert_eq!(split_tags("", 11), vec![""]);
    }

    #[test]
    fn value_exactly_at_threshold_is_not_split() {
        let tags = "a,b,c";
        assert_eq!(split_tags(tags, tags.len()), vec![tags]);
    }

    #[test]
    fn every_segment_within_threshold() {
        let tags = (0..200).map(|i| format!("cat_p_{i}")).collect::<Vec<_>>().join(",");
        let segments = split_tags(&tags, 64);

        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.len() <= 64, "segment too long: {segment:?}");
        }
    }

    #[test]
    fn joining_segments_reproduces_input() {
        let tags = (0..500).map(|i| format!("tag_{i}")).collect::<Vec<_>>().join(",");
        let segments = split_tags(&tags, 100);
        assert_eq!(join(&segments), tags);
    }

    #[test]
    fn no_segment_breaks_a_token() {
        let tags = (0..100).map(|i| format!("cms_block_{i}")).collect::<Vec<_>>().join(",");
        let segments = split_tags(&tags, 37);

        for segment in &segments {
            for token in segment.split(',') {
                assert!(token.starts_with("cms_block_"), "broken token: {token:?}");
            }
        }
    }

    #[test]
    fn consecutive_commas_round_trip_literally() {
        let tags = "a,,b,,,c,d,e,f,g,h";
        let segments = split_tags(tags, 5);
        assert_eq!(join(&segments), tags);
    }

    #[test]
    fn oversized_token_mid_list_gets_its_own_segment() {
        let tags = "tag_1,this_single_token_is_very_long,tag_2";
        let segments = split_tags(tags, 10);

        assert_eq!(segments, vec!["tag_1", "this_single_token_is_very_long", "tag_2"]);
        assert_eq!(join(&segments), tags);
    }

    #[test]
    fn oversized_trailing_token_emitted_whole() {
        let tags = "tag_1,this_single_token_is_very_long";
        let segments = split_tags(tags, 10);

        assert_eq!(segments, vec!["tag_1", "this_single_token_is_very_long"]);
    }

    #[test]
    fn single_oversized_token_without_commas_emitted_whole() {
        let tags = "one_enormous_token_with_no_delimiter_at_all";
        assert_eq!(split_tags(tags, 10), vec![tags]);
    }

    #[test]
    fn multi_byte_tokens_never_panic() {
        let tags = (0..50).map(|i| format!("catégorie_{i}")).collect::<Vec<_>>().join(",");
        let segments = split_tags(&tags, 29);

        assert_eq!(join(&segments), tags);
        for segment in &segments {
            assert!(segment.len() <= 29);
        }
    }
}
