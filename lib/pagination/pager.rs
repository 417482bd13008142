//! Async next/previous paging over a connection query.

use larder_api::models::{Connection, PageArgs, PageInfo};
use larder_api::{ConnectionQuery, HttpClient, LarderClient, LarderError, TenantContext};
use tracing::{debug, instrument};

use super::walker::{CursorWalker, Settled};

/// A paginated table view: one query, one tenant, and the cursors visited so far.
///
/// Each page is fetched with `first = page size` and `after` taken from the walker. A failed
/// fetch leaves the pager on the page it was showing.
pub struct ConnectionPager<C: HttpClient, Q: ConnectionQuery> {
    client: LarderClient<C>,
    tenant: TenantContext,
    query: Q,
    walker: CursorWalker,
    page_info: Option<PageInfo>,
}

impl<C: HttpClient, Q: ConnectionQuery> ConnectionPager<C, Q> {
    pub fn new(client: LarderClient<C>, tenant: TenantContext, query: Q) -> Self {
        Self {
            client,
            tenant,
            query,
            walker: CursorWalker::new(),
            page_info: None,
        }
    }

    /// Fetch the page at the walker's current position.
    ///
    /// The pager is borrowed mutably for the whole fetch, so the walker cannot move or reset
    /// before the response settles and the outcome is always [`Settled::Current`]. Callers that
    /// share one [`CursorWalker`] between concurrent fetches get the ticket fencing instead.
    #[instrument(name = "ConnectionPager::current", skip(self), fields(operation = Q::OPERATION, page = self.walker.page_number()))]
    pub async fn current(&mut self) -> Result<Connection<Q::Node>, LarderError> {
        let ticket = self.walker.ticket();
        let args = PageArgs::after(self.client.page_size(), self.walker.current_cursor());
        let conn = self.client.connection(&self.tenant, &self.query, &args).await?;

        let settled = self.walker.settle(ticket, conn.end_cursor());
        debug_assert_eq!(settled, Settled::Current);
        debug!(end_cursor = ?conn.end_cursor(), "page settled");
        self.page_info = Some(conn.page_info.clone());
        Ok(conn)
    }

    /// Advance and fetch the next page.
    ///
    /// `Ok(None)` when the last page fetched reported no next page, or did not report an end
    /// cursor to continue from.
    pub async fn next_page(&mut self) -> Result<Option<Connection<Q::Node>>, LarderError> {
        if !self.has_next() || !self.walker.on_next() {
            return Ok(None);
        }
        match self.current().await {
            Ok(conn) => Ok(Some(conn)),
            Err(err) => {
                self.walker.on_previous();
                Err(err)
            }
        }
    }

    /// Step back and fetch the previous page. `Ok(None)` on the first page.
    pub async fn previous_page(&mut self) -> Result<Option<Connection<Q::Node>>, LarderError> {
        if !self.walker.on_previous() {
            return Ok(None);
        }
        match self.current().await {
            Ok(conn) => Ok(Some(conn)),
            Err(err) => {
                self.walker.on_next();
                Err(err)
            }
        }
    }

    /// Replace the query. Cursors are tied to the filter they were issued under, so a different
    /// query starts over from the first page.
    ///
    /// Returns whether the query changed.
    pub fn set_query(&mut self, query: Q) -> bool {
        if query == self.query {
            return false;
        }
        self.query = query;
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.walker.reset();
        self.page_info = None;
    }

    /// Page info of the last page returned, `None` before the first fetch or after a reset.
    #[must_use]
    pub fn page_info(&self) -> Option<&PageInfo> {
        self.page_info.as_ref()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page_info.as_ref().is_some_and(|p| p.has_next_page)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.walker.has_previous()
    }

    #[must_use]
    pub fn page_number(&self) -> usize {
        self.walker.page_number()
    }

    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    #[must_use]
    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }
}
