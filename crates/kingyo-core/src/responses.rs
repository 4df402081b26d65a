//! Response envelopes shared by the list endpoints.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One page of a paginated list (`?page=N`, 1-based).
///
/// `count` is the total number of rows across all pages and feeds the
/// pagination controls of list views.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Number of pages for a fixed page size, never less than one.
    #[must_use]
    pub const fn page_count(&self, page_size: u64) -> u64 {
        if page_size == 0 || self.count == 0 {
            return 1;
        }
        self.count.div_ceil(page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        let page: Page<u8> = Page {
            count: 21,
            next: Some("http://x/?page=2".into()),
            previous: None,
            results: vec![],
        };
        assert_eq!(page.page_count(10), 3);
        assert!(page.has_next());
    }

    #[test]
    fn empty_page_still_has_one_page() {
        let page: Page<u8> = serde_json::from_str(r#"{"count":0,"results":[]}"#).unwrap();
        assert_eq!(page.page_count(10), 1);
        assert!(!page.has_next());
    }
}
