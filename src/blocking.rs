//! Blocking counterparts of [`crate::QueryRunner`], [`crate::CatalogClient`]
//! and [`crate::QueryHistory`].
//!
//! Each facade owns a current-thread runtime and blocks the calling thread until
//! the remote calls finish. Do not use them from inside an async context; call
//! the async types directly there.

use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;

use crate::{
    service::{CatalogService, QueryService},
    AthenaError, ExecutionPerformance, NamedQuery, PollOptions, Query, QueryExecution, ResultSet,
    Result, WorkGroup,
};

fn new_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AthenaError::Runtime)
}

/// Blocking [`crate::QueryRunner`].
#[derive(Debug)]
pub struct QueryRunner<S> {
    inner: crate::QueryRunner<S>,
    runtime: Runtime,
}

impl<S: QueryService> QueryRunner<S> {
    pub fn new(service: S) -> Result<Self> {
        Ok(Self {
            inner: crate::QueryRunner::new(service),
            runtime: new_runtime()?,
        })
    }

    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.inner = self.inner.with_poll_options(poll);
        self
    }

    pub fn submit(&self, query: &Query) -> Result<String> {
        self.runtime.block_on(self.inner.submit(query))
    }

    pub fn await_completion(&self, execution_id: &str) -> Result<QueryExecution> {
        self.runtime.block_on(self.inner.await_completion(execution_id))
    }

    /// `cancel` may be fired from another thread to end the wait.
    pub fn await_completion_with(
        &self,
        execution_id: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryExecution> {
        self.runtime
            .block_on(self.inner.await_completion_with(execution_id, cancel))
    }

    pub fn fetch_results(&self, execution_id: &str) -> Result<ResultSet> {
        self.runtime.block_on(self.inner.fetch_results(execution_id))
    }

    pub fn fetch_first_page(&self, execution_id: &str) -> Result<ResultSet> {
        self.runtime.block_on(self.inner.fetch_first_page(execution_id))
    }

    pub fn run_and_wait(&self, query: &Query) -> Result<ResultSet> {
        self.runtime.block_on(self.inner.run_and_wait(query))
    }

    pub fn run_and_wait_with(&self, query: &Query, cancel: &CancellationToken) -> Result<ResultSet> {
        self.runtime
            .block_on(self.inner.run_and_wait_with(query, cancel))
    }

    pub fn describe_execution_performance(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionPerformance> {
        self.runtime
            .block_on(self.inner.describe_execution_performance(execution_id))
    }
}

/// Blocking [`crate::CatalogClient`].
#[derive(Debug)]
pub struct CatalogClient<C> {
    inner: crate::CatalogClient<C>,
    runtime: Runtime,
}

impl<C: CatalogService> CatalogClient<C> {
    pub fn new(service: C) -> Result<Self> {
        Ok(Self {
            inner: crate::CatalogClient::new(service),
            runtime: new_runtime()?,
        })
    }

    pub fn list_database_names(&self) -> Result<Vec<String>> {
        self.runtime.block_on(self.inner.list_database_names())
    }

    pub fn database_exists(&self, name: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.database_exists(name))
    }

    pub fn create_database(&self, name: &str) -> Result<()> {
        self.runtime.block_on(self.inner.create_database(name))
    }

    pub fn list_table_names(&self, database: &str) -> Result<Vec<String>> {
        self.runtime.block_on(self.inner.list_table_names(database))
    }

    pub fn table_exists(&self, database: &str, table: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.table_exists(database, table))
    }
}

/// Blocking [`crate::QueryHistory`].
#[derive(Debug)]
pub struct QueryHistory<S> {
    inner: crate::QueryHistory<S>,
    runtime: Runtime,
}

impl<S: QueryService> QueryHistory<S> {
    pub fn new(service: S) -> Result<Self> {
        Ok(Self {
            inner: crate::QueryHistory::new(service),
            runtime: new_runtime()?,
        })
    }

    pub fn list_work_groups(&self) -> Result<Vec<WorkGroup>> {
        self.runtime.block_on(self.inner.list_work_groups())
    }

    pub fn named_queries(&self, work_group: &str) -> Result<Vec<NamedQuery>> {
        self.runtime.block_on(self.inner.named_queries(work_group))
    }

    pub fn recent_executions(&self, work_group: &str) -> Result<Vec<QueryExecution>> {
        self.runtime.block_on(self.inner.recent_executions(work_group))
    }
}
