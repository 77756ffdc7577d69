use crate::{service::QueryService, NamedQuery, QueryExecution, Result, WorkGroup};

/// Batch lookups accept at most this many ids per call.
const BATCH_LIMIT: usize = 50;

/// Workgroups, saved queries and recent executions.
#[derive(Clone, Debug)]
pub struct QueryHistory<S> {
    service: S,
}

impl<S: QueryService> QueryHistory<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn list_work_groups(&self) -> Result<Vec<WorkGroup>> {
        let mut groups = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self.service.list_work_groups(next_token.as_deref()).await?;
            groups.extend(page.items);
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(groups),
            }
        }
    }

    /// Saved queries of `work_group`.
    pub async fn named_queries(&self, work_group: &str) -> Result<Vec<NamedQuery>> {
        let mut ids = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .service
                .list_named_query_ids(work_group, next_token.as_deref())
                .await?;
            ids.extend(page.items);
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        let mut queries = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BATCH_LIMIT) {
            queries.extend(self.service.batch_get_named_queries(chunk).await?);
        }
        Ok(queries)
    }

    /// Most recent executions of `work_group`, newest first as listed by the
    /// service. Only the first listing page is read.
    pub async fn recent_executions(&self, work_group: &str) -> Result<Vec<QueryExecution>> {
        let page = self
            .service
            .list_query_execution_ids(work_group, None)
            .await?;

        let mut executions = Vec::with_capacity(page.items.len());
        for chunk in page.items.chunks(BATCH_LIMIT) {
            executions.extend(self.service.batch_get_query_executions(chunk).await?);
        }
        Ok(executions)
    }
}
