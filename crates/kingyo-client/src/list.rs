//! Paginated list parameters and the observable state a list view renders.

use std::future::Future;

use kingyo_cache::{KeyPart, QueryKey};
use kingyo_core::Page;
use kingyo_http::QueryString;
use tokio::sync::watch;

use crate::error::ClientError;

/// Rows per page served by the list endpoints.
pub const PAGE_SIZE: u64 = 10;

/// Enum filters of one list endpoint.
pub trait ListFilters: Clone + Default + Send + Sync {
    /// One key part per filter, always in the same order. Unset filters are
    /// [`KeyPart::None`].
    fn key_parts(&self) -> Vec<KeyPart>;

    /// Add the set filters to `query`.
    fn apply(&self, query: QueryString) -> QueryString;
}

impl ListFilters for () {
    fn key_parts(&self) -> Vec<KeyPart> {
        Vec::new()
    }

    fn apply(&self, query: QueryString) -> QueryString {
        query
    }
}

/// Page, free-text title filter and enum filters of a list query.
///
/// Each distinct value is a distinct cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams<F> {
    pub page: u32,
    pub title: String,
    pub filters: F,
}

impl<F: ListFilters> Default for ListParams<F> {
    fn default() -> Self {
        Self {
            page: 1,
            title: String::new(),
            filters: F::default(),
        }
    }
}

impl<F: ListFilters> ListParams<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: F) -> Self {
        self.filters = filters;
        self
    }

    /// Pages are 1-based; 0 is read as the first page.
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.max(1)
    }

    /// `scope` extended with page, title and filter parts.
    #[must_use]
    pub fn key(&self, scope: QueryKey) -> QueryKey {
        self.filters.key_parts().into_iter().fold(
            scope.with(self.page_number()).with(self.title.as_str()),
            |key, part| key.with(part),
        )
    }

    /// Query string for the list endpoint. The title filter travels under
    /// `title_param`, which differs per resource.
    #[must_use]
    pub fn query(&self, title_param: &str) -> QueryString {
        let query = QueryString::new()
            .param("page", self.page_number())
            .param(title_param, &self.title);
        self.filters.apply(query)
    }
}

/// What a list view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<T> {
    pub rows: Vec<T>,
    /// A load is running; `rows` still hold the previous result.
    pub is_fetching: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            is_fetching: false,
            error: None,
        }
    }
}

/// Observable list state with the total row count on a separate channel.
///
/// Rows are only replaced when a load succeeds, so switching pages never
/// shows an empty list in between.
#[derive(Debug)]
pub struct ListView<T> {
    state: watch::Sender<ListState<T>>,
    count: watch::Sender<u64>,
}

impl<T: Clone> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ListView<T> {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ListState::default());
        let (count, _) = watch::channel(0);
        Self { state, count }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn subscribe_count(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<T> {
        self.state.borrow().rows.clone()
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    #[must_use]
    pub fn page_count(&self) -> u64 {
        let count = self.count();
        if count == 0 { 1 } else { count.div_ceil(PAGE_SIZE) }
    }

    /// Run one page load and publish its outcome.
    ///
    /// # Errors
    ///
    /// Returns the load's error after recording its message in the state.
    pub async fn load<Fut>(&self, page: Fut) -> Result<Page<T>, ClientError>
    where
        Fut: Future<Output = Result<Page<T>, ClientError>>,
    {
        self.state.send_modify(|s| s.is_fetching = true);
        match page.await {
            Ok(page) => {
                self.count.send_replace(page.count);
                self.state.send_modify(|s| {
                    s.rows.clone_from(&page.results);
                    s.is_fetching = false;
                    s.error = None;
                });
                Ok(page)
            }
            Err(error) => {
                self.state.send_modify(|s| {
                    s.is_fetching = false;
                    s.error = Some(error.to_string());
                });
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingyo_http::ApiError;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct StatusFilter(Option<&'static str>);

    impl ListFilters for StatusFilter {
        fn key_parts(&self) -> Vec<KeyPart> {
            vec![self.0.into()]
        }

        fn apply(&self, query: QueryString) -> QueryString {
            query.opt("status", self.0)
        }
    }

    fn page(rows: &[&str], count: u64) -> Page<String> {
        Page {
            count,
            next: None,
            previous: None,
            results: rows.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn key_appends_page_title_and_filters() {
        let params = ListParams::<StatusFilter>::new().page(2).title("login");
        assert_eq!(
            params.key(QueryKey::new("testcases").with(3_u64)).to_string(),
            r#"["testcases", 3, 2, "login", null]"#
        );
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let params = ListParams::<()>::new().page(0);
        assert_eq!(params.query("title").to_suffix(), "?page=1");
        assert_eq!(
            params.key(QueryKey::new("x")),
            ListParams::<()>::new().key(QueryKey::new("x"))
        );
    }

    #[test]
    fn query_skips_blank_title_and_unset_filters() {
        let params = ListParams::<StatusFilter>::new().filters(StatusFilter(Some("ready")));
        assert_eq!(params.query("title").to_suffix(), "?page=1&status=ready");
        let params = ListParams::<StatusFilter>::new().title("smoke test");
        assert_eq!(params.query("case").to_suffix(), "?page=1&case=smoke%20test");
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_rows() {
        let view = ListView::new();
        view.load(async { Ok(page(&["a", "b"], 12)) }).await.unwrap();
        assert_eq!(view.count(), 12);
        assert_eq!(view.page_count(), 2);

        let err = view
            .load(async {
                Err(ClientError::Api(ApiError::RequestFailed {
                    status: 500,
                    body: String::new(),
                }))
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));

        let state = view.snapshot();
        assert_eq!(state.rows, vec!["a".to_string(), "b".to_string()]);
        assert!(!state.is_fetching);
        assert!(state.error.is_some());
        assert_eq!(view.count(), 12);
    }

    #[tokio::test]
    async fn rows_stay_visible_while_the_next_page_loads() {
        let view = ListView::new();
        view.load(async { Ok(page(&["a"], 1)) }).await.unwrap();

        let mut rx = view.subscribe();
        let (tx, pending) = tokio::sync::oneshot::channel::<Page<String>>();
        let load = view.load(async move { Ok(pending.await.unwrap()) });
        let observe = async move {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            assert!(state.is_fetching);
            assert_eq!(state.rows, vec!["a".to_string()]);
            tx.send(page(&["b"], 1)).unwrap();
        };
        let (loaded, ()) = tokio::join!(load, observe);
        assert_eq!(loaded.unwrap().results, vec!["b".to_string()]);
        assert_eq!(view.rows(), vec!["b".to_string()]);
    }
}
