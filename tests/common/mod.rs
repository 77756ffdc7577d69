#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use athena_http::{
    AthenaError, CatalogService, Column, ExecutionStatistics, NamedQuery, Page, Query,
    QueryExecution, QueryService, QueryState, ResultPage, Result, WorkGroup,
};
use serde_json::json;

pub const EXECUTION_ID: &str = "q-123";

pub fn col(name: &str, data_type: &str) -> Column {
    Column {
        name: name.to_owned(),
        data_type: data_type.to_owned(),
    }
}

pub fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|value| value.map(str::to_owned)).collect()
}

fn token_index(token: Option<&str>) -> usize {
    token
        .and_then(|token| token.strip_prefix("page-"))
        .and_then(|index| index.parse().ok())
        .unwrap_or(0)
}

fn paged<T: Clone>(items: &[T], size: usize, token: Option<&str>) -> Page<T> {
    let start = token_index(token) * size;
    let end = (start + size).min(items.len());
    let next_token = (end < items.len()).then(|| format!("page-{}", end / size));
    Page {
        items: items[start.min(end)..end].to_vec(),
        next_token,
    }
}

/// In-memory query service with scripted states and result pages.
pub struct MockQueryService {
    states: Mutex<VecDeque<QueryState>>,
    reason: Option<String>,
    statistics: ExecutionStatistics,
    status_delay: Duration,
    pages: Vec<ResultPage>,
    work_groups: Vec<WorkGroup>,
    named_query_ids: Vec<String>,
    execution_ids: Vec<String>,
    pub started: Mutex<Vec<Query>>,
    pub stopped: Mutex<Vec<String>>,
    pub status_calls: AtomicUsize,
    pub result_tokens: Mutex<Vec<Option<String>>>,
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl MockQueryService {
    /// Reports each state in turn, repeating the last one forever.
    pub fn with_states(states: &[&str]) -> Self {
        Self {
            states: Mutex::new(states.iter().map(|state| QueryState::parse(state)).collect()),
            reason: None,
            statistics: ExecutionStatistics::default(),
            status_delay: Duration::ZERO,
            pages: vec![ResultPage::default()],
            work_groups: Vec::new(),
            named_query_ids: Vec::new(),
            execution_ids: Vec::new(),
            started: Mutex::new(Vec::new()),
            stopped: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            result_tokens: Mutex::new(Vec::new()),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_owned());
        self
    }

    pub fn with_statistics(mut self, statistics: ExecutionStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Makes every status request take `delay` before answering.
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    /// Result pages chained by `page-N` tokens. Columns are reported on every
    /// page, as the service does.
    pub fn with_pages(mut self, columns: Vec<Column>, pages: Vec<Vec<Vec<Option<String>>>>) -> Self {
        let count = pages.len();
        self.pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, rows)| ResultPage {
                columns: columns.clone(),
                rows,
                next_token: (index + 1 < count).then(|| format!("page-{}", index + 1)),
            })
            .collect();
        self
    }

    pub fn with_work_groups(mut self, names: &[&str]) -> Self {
        self.work_groups = names
            .iter()
            .map(|name| WorkGroup {
                name: (*name).to_owned(),
                state: Some("ENABLED".to_owned()),
                description: None,
            })
            .collect();
        self
    }

    pub fn with_named_queries(mut self, count: usize) -> Self {
        self.named_query_ids = (0..count).map(|index| format!("nq-{index}")).collect();
        self
    }

    pub fn with_executions(mut self, count: usize) -> Self {
        self.execution_ids = (0..count).map(|index| format!("q-{index}")).collect();
        self
    }

    fn execution(&self, execution_id: &str, state: QueryState) -> QueryExecution {
        QueryExecution {
            execution_id: execution_id.to_owned(),
            state: state.clone(),
            state_change_reason: self.reason.clone(),
            query: Some("SELECT 1".to_owned()),
            database: Some("analytics".to_owned()),
            catalog: None,
            output_location: None,
            work_group: Some("primary".to_owned()),
            submitted_at: None,
            completed_at: None,
            statistics: self.statistics.clone(),
            raw: json!({
                "QueryExecutionId": execution_id,
                "Status": { "State": state.as_str(), "StateChangeReason": self.reason },
            }),
        }
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn start_query_execution(&self, query: &Query) -> Result<String> {
        self.started.lock().expect("mutex").push(query.clone());
        Ok(EXECUTION_ID.to_owned())
    }

    async fn get_query_execution(&self, execution_id: &str) -> Result<QueryExecution> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.status_delay.is_zero() {
            tokio::time::sleep(self.status_delay).await;
        }
        let state = {
            let mut states = self.states.lock().expect("mutex");
            if states.len() > 1 {
                states.pop_front()
            } else {
                states.front().cloned()
            }
        }
        .ok_or_else(|| AthenaError::Decode("no scripted state".to_owned()))?;
        Ok(self.execution(execution_id, state))
    }

    async fn get_query_results(
        &self,
        _execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<ResultPage> {
        self.result_tokens
            .lock()
            .expect("mutex")
            .push(next_token.map(str::to_owned));
        self.pages
            .get(token_index(next_token))
            .cloned()
            .ok_or_else(|| AthenaError::Decode(format!("unknown token {next_token:?}")))
    }

    async fn stop_query_execution(&self, execution_id: &str) -> Result<()> {
        self.stopped
            .lock()
            .expect("mutex")
            .push(execution_id.to_owned());
        Ok(())
    }

    async fn list_work_groups(&self, next_token: Option<&str>) -> Result<Page<WorkGroup>> {
        Ok(paged(&self.work_groups, 2, next_token))
    }

    async fn list_named_query_ids(
        &self,
        _work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        Ok(paged(&self.named_query_ids, 50, next_token))
    }

    async fn batch_get_named_queries(&self, ids: &[String]) -> Result<Vec<NamedQuery>> {
        self.batch_sizes.lock().expect("mutex").push(ids.len());
        Ok(ids
            .iter()
            .map(|id| NamedQuery {
                id: id.clone(),
                name: format!("saved {id}"),
                description: None,
                database: "analytics".to_owned(),
                query_string: "SELECT 1".to_owned(),
                work_group: Some("primary".to_owned()),
            })
            .collect())
    }

    async fn list_query_execution_ids(
        &self,
        _work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        Ok(paged(&self.execution_ids, 50, next_token))
    }

    async fn batch_get_query_executions(&self, ids: &[String]) -> Result<Vec<QueryExecution>> {
        self.batch_sizes.lock().expect("mutex").push(ids.len());
        Ok(ids
            .iter()
            .map(|id| self.execution(id, QueryState::Succeeded))
            .collect())
    }
}

/// In-memory catalog serving names two per page.
#[derive(Default)]
pub struct MockCatalog {
    pub databases: Mutex<Vec<String>>,
    pub tables: Vec<String>,
    pub calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new(databases: &[&str], tables: &[&str]) -> Self {
        Self {
            databases: Mutex::new(databases.iter().map(|db| (*db).to_owned()).collect()),
            tables: tables.iter().map(|table| (*table).to_owned()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn get_databases(&self, next_token: Option<&str>) -> Result<Page<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let databases = self.databases.lock().expect("mutex").clone();
        Ok(paged(&databases, 2, next_token))
    }

    async fn create_database(&self, name: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut databases = self.databases.lock().expect("mutex");
        if databases.iter().any(|db| db == name) {
            return Err(AthenaError::Service {
                status: 400,
                code: "AlreadyExistsException".to_owned(),
                message: "Database already exists.".to_owned(),
            });
        }
        databases.push(name.to_owned());
        Ok(())
    }

    async fn get_tables(&self, database: &str, next_token: Option<&str>) -> Result<Page<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.databases.lock().expect("mutex").iter().any(|db| db == database) {
            return Err(AthenaError::Service {
                status: 400,
                code: "EntityNotFoundException".to_owned(),
                message: format!("Database {database} not found."),
            });
        }
        Ok(paged(&self.tables, 2, next_token))
    }
}
