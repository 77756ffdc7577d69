use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    decode::{decode_execution, decode_named_query, decode_result_page, decode_work_group},
    service::QueryService,
    wire, AthenaError, ClientOptions, NamedQuery, Page, Query, QueryExecution, ResultPage, Result,
    WorkGroup,
};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const AMZ_TARGET: &str = "x-amz-target";

/// Encryption requested for every result file.
const RESULT_ENCRYPTION: &str = "SSE_S3";

/// Formats a region into the Athena service endpoint.
///
/// Example: `"eu-west-1"` → `"https://athena.eu-west-1.amazonaws.com"`
pub fn athena_endpoint(region: &str) -> String {
    format!("https://athena.{}.amazonaws.com", region.trim())
}

/// Formats a region into the Glue service endpoint.
pub fn glue_endpoint(region: &str) -> String {
    format!("https://glue.{}.amazonaws.com", region.trim())
}

/// AWS JSON 1.1 transport shared by the Athena and Glue clients.
///
/// Requests are not signed. Point the endpoint at a signing proxy or supply a
/// precomputed `Authorization` value through `with_authorization`.
#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    endpoint: String,
    target_prefix: &'static str,
    authorization: Option<String>,
    pub(crate) options: ClientOptions,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint)
            .field("target_prefix", &self.target_prefix)
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<redacted>"),
            )
            .field("options", &self.options)
            .finish()
    }
}

impl Transport {
    pub(crate) fn new(endpoint: String, target_prefix: &'static str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            target_prefix,
            authorization: None,
            options: ClientOptions::default(),
        }
    }

    pub(crate) fn set_authorization(&mut self, authorization: String) {
        self.authorization = Some(authorization);
    }

    pub(crate) async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        let value = self.call_value(operation, request).await?;
        serde_json::from_value(value).map_err(|err| {
            AthenaError::Decode(format!("invalid {operation} response: {err}"))
        })
    }

    /// Sends one operation and returns the response body as JSON.
    pub(crate) async fn call_value<Req>(
        &self,
        operation: &str,
        request: &Req,
    ) -> Result<serde_json::Value>
    where
        Req: Serialize + ?Sized + Sync,
    {
        let target = format!("{}.{operation}", self.target_prefix);

        #[cfg(feature = "tracing")]
        tracing::debug!("calling {} at {}", target, self.endpoint);

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(AMZ_TARGET, &target)
            .header(header::CONTENT_TYPE, AMZ_JSON)
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .json(request);
        if let Some(authorization) = &self.authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(AthenaError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(AthenaError::Transport)?;

        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!("{} failed with status {}", target, status);

            return Err(error_from_response(status, body));
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Object(Default::default()));
        }
        serde_json::from_str(&body).map_err(|err| {
            AthenaError::Decode(format!("invalid {operation} response JSON: {err}; body: {body}"))
        })
    }
}

fn error_from_response(status: StatusCode, body: String) -> AthenaError {
    match serde_json::from_str::<wire::ErrorBody>(&body) {
        Ok(wire::ErrorBody {
            kind: Some(kind),
            message,
        }) => AthenaError::Service {
            status: status.as_u16(),
            code: kind.rsplit('#').next().unwrap_or(&kind).to_owned(),
            message: message.unwrap_or_default(),
        },
        _ => AthenaError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

/// Reads the endpoint for a service from `endpoint_var`, falling back to the
/// regional endpoint derived from `AWS_REGION`.
pub(crate) fn endpoint_from_env(
    endpoint_var: &str,
    regional: fn(&str) -> String,
) -> std::result::Result<String, String> {
    if let Ok(endpoint) = std::env::var(endpoint_var) {
        if endpoint.trim().is_empty() {
            return Err(format!("{endpoint_var} is set but empty"));
        }
        return Ok(endpoint);
    }
    let region = std::env::var("AWS_REGION").map_err(|_| {
        format!("missing {endpoint_var} or AWS_REGION environment variable")
    })?;
    if region.trim().is_empty() {
        return Err("AWS_REGION is set but empty".to_owned());
    }
    Ok(regional(&region))
}

/// Optional `Authorization` value from `AWS_AUTHORIZATION`.
pub(crate) fn authorization_from_env() -> Option<String> {
    std::env::var("AWS_AUTHORIZATION")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[derive(Clone, Debug)]
/// HTTP client for the Athena query service.
pub struct AthenaClient {
    transport: Transport,
}

impl AthenaClient {
    /// Creates a client for an explicit endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            transport: Transport::new(endpoint.into(), "AmazonAthena"),
        }
    }

    /// Creates a client for the regional endpoint.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use athena_http::AthenaClient;
    ///
    /// let athena = AthenaClient::from_region("us-east-1");
    /// ```
    pub fn from_region(region: impl AsRef<str>) -> Self {
        Self::new(athena_endpoint(region.as_ref()))
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `ATHENA_ENDPOINT` — full endpoint URL, or
    /// - `AWS_REGION` — used to derive the regional endpoint
    /// - `AWS_AUTHORIZATION` — optional raw `Authorization` header value
    pub fn from_env() -> std::result::Result<Self, String> {
        let endpoint = endpoint_from_env("ATHENA_ENDPOINT", athena_endpoint)?;
        let client = Self::new(endpoint);
        Ok(match authorization_from_env() {
            Some(authorization) => client.with_authorization(authorization),
            None => client,
        })
    }

    /// Sends `authorization` verbatim as the `Authorization` header.
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.transport.set_authorization(authorization.into());
        self
    }

    /// Applies client options such as the request timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.transport.options = opts;
        self
    }
}

#[async_trait]
impl QueryService for AthenaClient {
    async fn start_query_execution(&self, query: &Query) -> Result<String> {
        let request = wire::StartQueryExecutionRequest {
            query_string: query.sql.clone(),
            query_execution_context: wire::QueryExecutionContext {
                database: Some(query.database.clone()),
                catalog: None,
            },
            result_configuration: wire::ResultConfiguration {
                output_location: (!query.output_location.is_empty()
                    || query.work_group.is_none())
                .then(|| query.output_location.clone()),
                encryption_configuration: Some(wire::EncryptionConfiguration {
                    encryption_option: RESULT_ENCRYPTION.to_owned(),
                }),
            },
            work_group: query.work_group.clone(),
        };
        let response: wire::StartQueryExecutionResponse = self
            .transport
            .call("StartQueryExecution", &request)
            .await?;
        Ok(response.query_execution_id)
    }

    async fn get_query_execution(&self, execution_id: &str) -> Result<QueryExecution> {
        let request = wire::QueryExecutionIdRequest {
            query_execution_id: execution_id,
        };
        let mut response = self
            .transport
            .call_value("GetQueryExecution", &request)
            .await?;
        let raw = response
            .get_mut("QueryExecution")
            .map(serde_json::Value::take)
            .ok_or_else(|| {
                AthenaError::Decode(format!(
                    "GetQueryExecution response for {execution_id} has no QueryExecution"
                ))
            })?;
        decode_execution(raw)
    }

    async fn get_query_results(
        &self,
        execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<ResultPage> {
        let request = wire::GetQueryResultsRequest {
            query_execution_id: execution_id,
            next_token,
        };
        let response: wire::GetQueryResultsResponse =
            self.transport.call("GetQueryResults", &request).await?;
        Ok(decode_result_page(response))
    }

    async fn stop_query_execution(&self, execution_id: &str) -> Result<()> {
        let request = wire::QueryExecutionIdRequest {
            query_execution_id: execution_id,
        };
        let _: wire::Empty = self
            .transport
            .call("StopQueryExecution", &request)
            .await?;
        Ok(())
    }

    async fn list_work_groups(&self, next_token: Option<&str>) -> Result<Page<WorkGroup>> {
        let request = wire::ListRequest {
            work_group: None,
            next_token,
        };
        let response: wire::ListWorkGroupsResponse =
            self.transport.call("ListWorkGroups", &request).await?;
        Ok(Page {
            items: response
                .work_groups
                .into_iter()
                .map(decode_work_group)
                .collect(),
            next_token: response.next_token,
        })
    }

    async fn list_named_query_ids(
        &self,
        work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        let request = wire::ListRequest {
            work_group: Some(work_group),
            next_token,
        };
        let response: wire::ListNamedQueriesResponse =
            self.transport.call("ListNamedQueries", &request).await?;
        Ok(Page {
            items: response.named_query_ids,
            next_token: response.next_token,
        })
    }

    async fn batch_get_named_queries(&self, ids: &[String]) -> Result<Vec<NamedQuery>> {
        let request = wire::BatchGetNamedQueryRequest {
            named_query_ids: ids,
        };
        let response: wire::BatchGetNamedQueryResponse =
            self.transport.call("BatchGetNamedQuery", &request).await?;
        response
            .named_queries
            .into_iter()
            .map(decode_named_query)
            .collect()
    }

    async fn list_query_execution_ids(
        &self,
        work_group: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        let request = wire::ListRequest {
            work_group: Some(work_group),
            next_token,
        };
        let response: wire::ListQueryExecutionsResponse =
            self.transport.call("ListQueryExecutions", &request).await?;
        Ok(Page {
            items: response.query_execution_ids,
            next_token: response.next_token,
        })
    }

    async fn batch_get_query_executions(&self, ids: &[String]) -> Result<Vec<QueryExecution>> {
        let request = wire::BatchGetQueryExecutionRequest {
            query_execution_ids: ids,
        };
        let response: wire::BatchGetQueryExecutionResponse = self
            .transport
            .call("BatchGetQueryExecution", &request)
            .await?;
        response
            .query_executions
            .into_iter()
            .map(decode_execution)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{athena_endpoint, error_from_response, glue_endpoint, AthenaClient};
    use crate::AthenaError;

    #[test]
    fn regional_endpoints() {
        assert_eq!(
            athena_endpoint(" eu-west-1 "),
            "https://athena.eu-west-1.amazonaws.com"
        );
        assert_eq!(
            glue_endpoint("us-east-2"),
            "https://glue.us-east-2.amazonaws.com"
        );
    }

    #[test]
    fn service_error_strips_namespace() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"__type":"com.amazonaws.glue#AlreadyExistsException","Message":"Database already exists."}"#
                .to_owned(),
        );
        match err {
            AthenaError::Service {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "AlreadyExistsException");
                assert_eq!(message, "Database already exists.");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_error_body_is_http_error() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>".to_owned());
        assert!(matches!(err, AthenaError::Http { status: 502, .. }));
    }

    #[test]
    fn debug_redacts_authorization_value() {
        let client = AthenaClient::new("https://athena.local").with_authorization("secret-token");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
