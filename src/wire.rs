//! AWS JSON 1.1 request and response shapes for the Athena and Glue operations
//! this crate calls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartQueryExecutionRequest {
    pub query_string: String,
    pub query_execution_context: QueryExecutionContext,
    pub result_configuration: ResultConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_group: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueryExecutionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResultConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_configuration: Option<EncryptionConfiguration>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionConfiguration {
    pub encryption_option: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartQueryExecutionResponse {
    pub query_execution_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecutionIdRequest<'a> {
    pub query_execution_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecution {
    pub query_execution_id: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub query_execution_context: Option<QueryExecutionContext>,
    #[serde(default)]
    pub result_configuration: Option<ResultConfiguration>,
    #[serde(default)]
    pub status: Option<QueryExecutionStatus>,
    #[serde(default)]
    pub statistics: Option<QueryExecutionStatistics>,
    #[serde(default)]
    pub work_group: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueryExecutionStatus {
    pub state: Option<String>,
    pub state_change_reason: Option<String>,
    pub submission_date_time: Option<f64>,
    pub completion_date_time: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueryExecutionStatistics {
    pub engine_execution_time_in_millis: Option<u64>,
    pub data_scanned_in_bytes: Option<u64>,
    pub total_execution_time_in_millis: Option<u64>,
    pub query_queue_time_in_millis: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueryResultsRequest<'a> {
    pub query_execution_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueryResultsResponse {
    pub result_set: ResultSet,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResultSet {
    pub rows: Vec<Row>,
    pub result_set_metadata: Option<ResultSetMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Row {
    pub data: Vec<Datum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Datum {
    pub var_char_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResultSetMetadata {
    pub column_info: Vec<ColumnInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "Type")]
    pub data_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListWorkGroupsResponse {
    #[serde(default)]
    pub work_groups: Vec<WorkGroupSummary>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkGroupSummary {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListNamedQueriesResponse {
    #[serde(default)]
    pub named_query_ids: Vec<String>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetNamedQueryRequest<'a> {
    pub named_query_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetNamedQueryResponse {
    #[serde(default)]
    pub named_queries: Vec<NamedQuery>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NamedQuery {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub database: String,
    pub query_string: String,
    #[serde(default)]
    pub named_query_id: Option<String>,
    #[serde(default)]
    pub work_group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListQueryExecutionsResponse {
    #[serde(default)]
    pub query_execution_ids: Vec<String>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetQueryExecutionRequest<'a> {
    pub query_execution_ids: &'a [String],
}

/// Executions are kept as raw JSON so each one retains its full description.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetQueryExecutionResponse {
    #[serde(default)]
    pub query_executions: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDatabasesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDatabasesResponse {
    #[serde(default)]
    pub database_list: Vec<CatalogEntry>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDatabaseRequest<'a> {
    pub database_input: DatabaseInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseInput<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTablesRequest<'a> {
    pub database_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTablesResponse {
    #[serde(default)]
    pub table_list: Vec<CatalogEntry>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogEntry {
    pub name: String,
}

/// Body of responses that carry no fields, e.g. `CreateDatabase`.
#[derive(Debug, Default, Deserialize)]
pub struct Empty {}

/// Error payload of a non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "__type")]
    pub kind: Option<String>,
    #[serde(alias = "message", rename = "Message")]
    pub message: Option<String>,
}
