use std::fmt;

use crate::Value;

/// SQL text plus the context it runs in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub sql: String,
    /// Database the query runs against.
    pub database: String,
    /// Storage URI results are written to, e.g. `s3://bucket/prefix/`.
    /// Leave empty to use the workgroup's configured location.
    pub output_location: String,
    pub work_group: Option<String>,
}

impl Query {
    pub fn new(
        sql: impl Into<String>,
        database: impl Into<String>,
        output_location: impl Into<String>,
    ) -> Self {
        Self {
            sql: sql.into(),
            database: database.into(),
            output_location: output_location.into(),
            work_group: None,
        }
    }

    /// Runs the query in the given workgroup instead of the account default.
    pub fn in_work_group(mut self, work_group: impl Into<String>) -> Self {
        self.work_group = Some(work_group.into());
        self
    }
}

/// Lifecycle state of an execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// Any state this crate does not know about, kept verbatim.
    Other(String),
}

impl QueryState {
    pub fn parse(value: &str) -> Self {
        match value {
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Other(other) => other,
        }
    }

    /// `SUCCEEDED`, `FAILED` and `CANCELLED` end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionStatistics {
    pub engine_execution_time_ms: Option<u64>,
    pub data_scanned_bytes: Option<u64>,
    pub total_execution_time_ms: Option<u64>,
    pub queue_time_ms: Option<u64>,
}

/// Snapshot of one execution as last reported by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryExecution {
    pub execution_id: String,
    pub state: QueryState,
    pub state_change_reason: Option<String>,
    pub query: Option<String>,
    pub database: Option<String>,
    pub catalog: Option<String>,
    pub output_location: Option<String>,
    pub work_group: Option<String>,
    /// Seconds since the Unix epoch.
    pub submitted_at: Option<f64>,
    pub completed_at: Option<f64>,
    pub statistics: ExecutionStatistics,
    /// The execution description exactly as received.
    pub raw: serde_json::Value,
}

/// Timing and volume figures of a successful execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionPerformance {
    pub engine_execution_time_ms: u64,
    pub data_scanned_bytes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Type tag as declared by the service, e.g. `varchar` or `bigint`.
    pub data_type: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|col| col.name.clone()).collect()
    }
}

/// One undecoded page of results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub columns: Vec<Column>,
    /// Cells as text; `None` where the service sent no value.
    pub rows: Vec<Vec<Option<String>>>,
    pub next_token: Option<String>,
}

/// One page of a listing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkGroup {
    pub name: String,
    pub state: Option<String>,
    pub description: Option<String>,
}

/// A saved query stored in a workgroup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedQuery {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub database: String,
    pub query_string: String,
    pub work_group: Option<String>,
}
