//! Candidate suffix lists and suffix stripping.

/// Every suffix a search queries, in output order.
pub const CANDIDATE_SUFFIXES: &[&str] = &[
    ".com", ".co", ".io", ".net", ".org", ".dev", ".app", ".xyz", ".tech", ".ai", ".me", ".tv",
    ".online", ".store", ".shop", ".space", ".cloud", ".studio", ".sh", ".academy", ".agency",
    ".bike", ".bio", ".builders", ".careers", ".chat", ".accountants", ".actor", ".airforce",
    ".apartments", ".archi", ".army", ".associates", ".attorney", ".auction", ".band",
    ".bargains", ".bet", ".bingo", ".black", ".blue", ".boutique", ".broker", ".business", ".cab",
    ".cafe", ".camera", ".camp", ".capital", ".cards", ".care", ".cash", ".casino", ".catering",
    ".center", ".cheap",
];

/// Suffixes shown in the "top results" partition.
pub const FEATURED_SUFFIXES: &[&str] = &[".com", ".dev", ".app", ".io"];

/// Whether a suffix belongs in the featured partition.
#[must_use]
pub fn is_featured(suffix: &str) -> bool {
    FEATURED_SUFFIXES.contains(&suffix)
}

/// Split a query into `(name, suffix)` when it ends with a known suffix.
///
/// Matching ignores ASCII case. When several suffixes match (`.co` never
/// matches `x.com`, but a longer suffix could share a tail), the longest wins.
/// Returns `None` when the query has no known suffix.
#[must_use]
pub fn split_known_suffix(query: &str) -> Option<(&str, &'static str)> {
    CANDIDATE_SUFFIXES
        .iter()
        .filter(|suffix| ends_with_ignore_ascii_case(query, suffix))
        .max_by_key(|suffix| suffix.len())
        .and_then(|suffix| {
            let cut = query.len() - suffix.len();
            query.get(..cut).map(|name| (name, *suffix))
        })
}

/// Strip a trailing known suffix, returning the trimmed bare name.
#[must_use]
pub fn strip_known_suffix(query: &str) -> &str {
    split_known_suffix(query).map_or(query, |(name, _)| name).trim()
}

fn ends_with_ignore_ascii_case(haystack: &str, suffix: &str) -> bool {
    haystack.len() >= suffix.len()
        && haystack
            .get(haystack.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_list_shape() {
        assert_eq!(CANDIDATE_SUFFIXES.len(), 56);
        assert_eq!(CANDIDATE_SUFFIXES.first(), Some(&".com"));
        assert_eq!(CANDIDATE_SUFFIXES.last(), Some(&".cheap"));
        for featured in FEATURED_SUFFIXES {
            assert!(CANDIDATE_SUFFIXES.contains(featured));
        }
    }

    #[test]
    fn test_split_known_suffix() {
        assert_eq!(split_known_suffix("example.com"), Some(("example", ".com")));
        assert_eq!(split_known_suffix("example.co"), Some(("example", ".co")));
        assert_eq!(split_known_suffix("Example.COM"), Some(("Example", ".com")));
        assert_eq!(split_known_suffix("myshop.shop"), Some(("myshop", ".shop")));
        assert_eq!(split_known_suffix("example"), None);
        assert_eq!(split_known_suffix("example.design"), None);
    }

    #[test]
    fn test_strip_known_suffix() {
        assert_eq!(strip_known_suffix("example.com"), "example");
        assert_eq!(strip_known_suffix("my site .io"), "my site");
        assert_eq!(strip_known_suffix(".com"), "");
        assert_eq!(strip_known_suffix("plain"), "plain");
    }

    #[test]
    fn test_only_trailing_suffix_is_stripped() {
        assert_eq!(strip_known_suffix("com.example.net"), "com.example");
        assert_eq!(strip_known_suffix("a.com.b"), "a.com.b");
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(split_known_suffix("ñ"), None);
        assert_eq!(strip_known_suffix("café.com"), "café");
    }

    #[test]
    fn test_is_featured() {
        assert!(is_featured(".com"));
        assert!(is_featured(".io"));
        assert!(!is_featured(".net"));
    }
}
