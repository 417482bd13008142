//! Connection queries and forward-only streaming over them.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::client::{ClientInner, LarderClient};
use crate::error::LarderError;
use crate::graphql::{GraphQlRequest, OperationKind};
use crate::http_client::HttpClient;
use crate::models::{Connection, PageArgs};
use crate::tenant::TenantContext;

/// A GraphQL query whose aliased `result` field is a [`Connection`].
///
/// Implementors carry everything except the tenant and the page arguments: filters, sort, and
/// parent IDs. Two queries comparing unequal select different result sets, so cursors obtained
/// under one are meaningless under the other.
pub trait ConnectionQuery: Clone + PartialEq + Send + Sync {
    type Node: DeserializeOwned + Send;

    const OPERATION: &'static str;
    const DOCUMENT: &'static str;

    /// Operation-specific variables, merged over the tenant scope.
    fn variables(&self) -> Result<Map<String, Value>, serde_json::Error>;
}

fn connection_variables<Q: ConnectionQuery>(
    tenant: &TenantContext,
    query: &Q,
    page: &PageArgs,
) -> Result<Value, serde_json::Error> {
    let mut vars = tenant.variables();
    vars.extend(query.variables()?);
    vars.insert("first".to_owned(), page.first.into());
    if let Some(after) = &page.after {
        vars.insert("after".to_owned(), after.clone().into());
    }
    Ok(Value::Object(vars))
}

impl<C: HttpClient> ClientInner<C> {
    pub(crate) async fn fetch_connection<Q: ConnectionQuery>(
        &self,
        tenant: &TenantContext,
        query: &Q,
        page: &PageArgs,
    ) -> Result<Connection<Q::Node>, LarderError> {
        let request = GraphQlRequest {
            query: Q::DOCUMENT,
            operation_name: Q::OPERATION,
            variables: connection_variables(tenant, query, page)?,
        };
        let conn: Connection<Q::Node> = self.execute(OperationKind::Query, &request).await?;
        debug!(
            operation = Q::OPERATION,
            nodes = conn.len(),
            has_next_page = conn.has_next_page(),
            "fetched page"
        );
        Ok(conn)
    }
}

impl<C: HttpClient> LarderClient<C> {
    /// Fetch a single page of `query`.
    #[instrument(name = "LarderClient::connection", skip_all, fields(operation = Q::OPERATION, after = ?page.after))]
    pub async fn connection<Q: ConnectionQuery>(
        &self,
        tenant: &TenantContext,
        query: &Q,
        page: &PageArgs,
    ) -> Result<Connection<Q::Node>, LarderError> {
        self.inner.fetch_connection(tenant, query, page).await
    }

    /// Walk every page of `query`, front to back.
    pub fn stream<Q: ConnectionQuery>(
        &self,
        tenant: &TenantContext,
        query: Q,
    ) -> ConnectionStream<C, Q> {
        ConnectionStream::new(Arc::clone(&self.inner), tenant.clone(), query)
    }
}

/// Lazily fetches every page of a connection, yielding nodes in order.
///
/// Owns its state through an `Arc`, so it has no lifetime parameters.
pub struct ConnectionStream<C: HttpClient, Q: ConnectionQuery> {
    inner: Arc<ClientInner<C>>,
    tenant: TenantContext,
    query: Q,
    cursor: Option<String>,
    buffer: VecDeque<Q::Node>,
    done: bool,
}

impl<C: HttpClient, Q: ConnectionQuery> ConnectionStream<C, Q> {
    fn new(inner: Arc<ClientInner<C>>, tenant: TenantContext, query: Q) -> Self {
        Self {
            inner,
            tenant,
            query,
            cursor: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// The next node, fetching another page when the buffer runs dry.
    ///
    /// Returns `Ok(None)` once the connection is exhausted.
    pub async fn next(&mut self) -> Result<Option<Q::Node>, LarderError> {
        loop {
            if let Some(node) = self.buffer.pop_front() {
                return Ok(Some(node));
            }
            match self.next_page().await? {
                Some(page) => self.buffer.extend(page.into_nodes()),
                None => return Ok(None),
            }
        }
    }

    /// The next whole page, or `Ok(None)` once exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Connection<Q::Node>>, LarderError> {
        if self.done {
            return Ok(None);
        }
        let page = PageArgs::after(self.inner.config.page_size, self.cursor.as_deref());
        let conn = self
            .inner
            .fetch_connection(&self.tenant, &self.query, &page)
            .await?;

        let next_cursor = conn.end_cursor().map(ToOwned::to_owned);
        // A repeated end cursor would loop forever on a misbehaving server.
        self.done = !conn.has_next_page() || next_cursor.is_none() || next_cursor == self.cursor;
        self.cursor = next_cursor;
        Ok(Some(conn))
    }

    /// Drain the remaining nodes into a `Vec`.
    pub async fn collect(mut self) -> Result<Vec<Q::Node>, LarderError> {
        let mut all = Vec::new();
        while let Some(node) = self.next().await? {
            all.push(node);
        }
        Ok(all)
    }
}
