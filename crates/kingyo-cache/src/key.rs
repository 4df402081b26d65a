//! Cache keys and key filters.

use std::fmt;

use serde::Serialize;

/// One segment of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeyPart {
    Str(String),
    Int(u64),
    /// An unset filter. Distinct from an empty string.
    None,
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<u64> for KeyPart {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        Self::Int(u64::from(value))
    }
}

impl<T: Into<Self>> From<Option<T>> for KeyPart {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::None => f.write_str("null"),
        }
    }
}

/// Ordered identity of a cached query, e.g. `["testcases", 3, 1, "", null]`.
///
/// The first part is the resource tag; parent ids, page and filters follow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self(vec![KeyPart::from(tag)])
    }

    /// Append a part.
    #[must_use]
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Whether `prefix` matches the leading parts of this key.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{part}")?;
        }
        f.write_str("]")
    }
}

/// Selects cache entries for invalidation or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFilter {
    Exact(QueryKey),
    Prefix(QueryKey),
}

impl QueryFilter {
    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Self::Exact(k) => k == key,
            Self::Prefix(p) => key.starts_with(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cases_key(plan: u64, page: u32) -> QueryKey {
        QueryKey::new("testcases")
            .with(plan)
            .with(page)
            .with("")
            .with(None::<&str>)
    }

    #[test]
    fn display_reads_like_a_tuple() {
        assert_eq!(cases_key(3, 1).to_string(), r#"["testcases", 3, 1, "", null]"#);
    }

    #[test]
    fn empty_string_and_unset_are_distinct() {
        let a = QueryKey::new("testplans").with("");
        let b = QueryKey::new("testplans").with(None::<String>);
        assert_ne!(a, b);
    }

    #[rstest]
    #[case(QueryFilter::Prefix(QueryKey::new("testcases").with(3_u64)), true)]
    #[case(QueryFilter::Prefix(QueryKey::new("testcases").with(4_u64)), false)]
    #[case(QueryFilter::Prefix(QueryKey::new("testcases")), true)]
    #[case(QueryFilter::Exact(QueryKey::new("testcases").with(3_u64)), false)]
    #[case(QueryFilter::Exact(cases_key(3, 1)), true)]
    fn filter_matching(#[case] filter: QueryFilter, #[case] expected: bool) {
        assert_eq!(filter.matches(&cases_key(3, 1)), expected);
    }

    #[test]
    fn tag_prefix_does_not_match_longer_tag() {
        let filter = QueryFilter::Prefix(QueryKey::new("testcase"));
        assert!(!filter.matches(&cases_key(3, 1)));
    }
}
