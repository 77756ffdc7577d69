//! Remote operations consumed by [`crate::QueryRunner`], [`crate::CatalogClient`]
//! and [`crate::QueryHistory`].
//!
//! [`crate::AthenaClient`] and [`crate::GlueClient`] implement these over HTTP;
//! tests and alternative transports can supply their own.

use async_trait::async_trait;

use crate::{NamedQuery, Page, Query, QueryExecution, ResultPage, Result, WorkGroup};

/// Query execution service.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Starts an execution and returns its id.
    async fn start_query_execution(&self, query: &Query) -> Result<String>;

    async fn get_query_execution(&self, execution_id: &str) -> Result<QueryExecution>;

    /// Fetches one page of results. `next_token` is `None` for the first page.
    async fn get_query_results(
        &self,
        execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<ResultPage>;

    async fn stop_query_execution(&self, execution_id: &str) -> Result<()>;

    async fn list_work_groups(&self, next_token: Option<&str>) -> Result<Page<WorkGroup>>;

    async fn list_named_query_ids(
        &self,
        work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>>;

    async fn batch_get_named_queries(&self, ids: &[String]) -> Result<Vec<NamedQuery>>;

    async fn list_query_execution_ids(
        &self,
        work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>>;

    async fn batch_get_query_executions(&self, ids: &[String]) -> Result<Vec<QueryExecution>>;
}

/// Metadata catalog of databases and tables.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_databases(&self, next_token: Option<&str>) -> Result<Page<String>>;

    async fn create_database(&self, name: &str) -> Result<()>;

    async fn get_tables(&self, database: &str, next_token: Option<&str>) -> Result<Page<String>>;
}

#[async_trait]
impl<S: QueryService + ?Sized> QueryService for std::sync::Arc<S> {
    async fn start_query_execution(&self, query: &Query) -> Result<String> {
        (**self).start_query_execution(query).await
    }

    async fn get_query_execution(&self, execution_id: &str) -> Result<QueryExecution> {
        (**self).get_query_execution(execution_id).await
    }

    async fn get_query_results(
        &self,
        execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<ResultPage> {
        (**self).get_query_results(execution_id, next_token).await
    }

    async fn stop_query_execution(&self, execution_id: &str) -> Result<()> {
        (**self).stop_query_execution(execution_id).await
    }

    async fn list_work_groups(&self, next_token: Option<&str>) -> Result<Page<WorkGroup>> {
        (**self).list_work_groups(next_token).await
    }

    async fn list_named_query_ids(
        &self,
        work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        (**self).list_named_query_ids(work_group, next_token).await
    }

    async fn batch_get_named_queries(&self, ids: &[String]) -> Result<Vec<NamedQuery>> {
        (**self).batch_get_named_queries(ids).await
    }

    async fn list_query_execution_ids(
        &self,
        work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        (**self).list_query_execution_ids(work_group, next_token).await
    }

    async fn batch_get_query_executions(&self, ids: &[String]) -> Result<Vec<QueryExecution>> {
        (**self).batch_get_query_executions(ids).await
    }
}

#[async_trait]
impl<C: CatalogService + ?Sized> CatalogService for std::sync::Arc<C> {
    async fn get_databases(&self, next_token: Option<&str>) -> Result<Page<String>> {
        (**self).get_databases(next_token).await
    }

    async fn create_database(&self, name: &str) -> Result<()> {
        (**self).create_database(name).await
    }

    async fn get_tables(&self, database: &str, next_token: Option<&str>) -> Result<Page<String>> {
        (**self).get_tables(database, next_token).await
    }
}
