use std::future::Future;

use backoffice_core::{AppResult, ListResult, Page};

/// Runs a list query and its matching count query together.
///
/// Both futures are polled concurrently; the first failure fails the page.
pub(crate) async fn fetch_page<T, ListFuture, CountFuture>(
    page: Page,
    list: ListFuture,
    count: CountFuture,
) -> AppResult<ListResult<T>>
where
    ListFuture: Future<Output = AppResult<Vec<T>>>,
    CountFuture: Future<Output = AppResult<u64>>,
{
    let (items, total) = tokio::try_join!(list, count)?;
    Ok(ListResult::new(items, total, page))
}
