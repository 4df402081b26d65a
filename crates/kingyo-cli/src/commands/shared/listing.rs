use std::future::Future;

use kingyo_client::{ClientError, ListView};
use kingyo_core::Page;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::{PageView, output};

/// Load one page through a [`ListView`] and print it with its page count.
pub async fn print_page<T, Fut>(page: u32, load: Fut, flags: &GlobalFlags) -> anyhow::Result<()>
where
    T: Clone + Serialize,
    Fut: Future<Output = Result<Page<T>, ClientError>>,
{
    let view = ListView::new();
    view.load(load).await?;
    tracing::debug!(page, count = view.count(), "page loaded");
    output(
        &PageView {
            page: page.max(1),
            pages: view.page_count(),
            count: view.count(),
            rows: view.rows(),
        },
        flags.format,
    )
}
