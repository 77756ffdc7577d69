use async_trait::async_trait;

use crate::{
    client::{authorization_from_env, endpoint_from_env, glue_endpoint, Transport},
    service::CatalogService,
    wire, ClientOptions, Page, Result,
};

#[derive(Clone, Debug)]
/// HTTP client for the Glue data catalog.
pub struct GlueClient {
    transport: Transport,
}

impl GlueClient {
    /// Creates a client for an explicit endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            transport: Transport::new(endpoint.into(), "AWSGlue"),
        }
    }

    /// Creates a client for the regional endpoint.
    pub fn from_region(region: impl AsRef<str>) -> Self {
        Self::new(glue_endpoint(region.as_ref()))
    }

    /// Creates a client from `GLUE_ENDPOINT` or `AWS_REGION`, plus the optional
    /// `AWS_AUTHORIZATION` header value.
    pub fn from_env() -> std::result::Result<Self, String> {
        let endpoint = endpoint_from_env("GLUE_ENDPOINT", glue_endpoint)?;
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
impl CatalogService for GlueClient {
    async fn get_databases(&self, next_token: Option<&str>) -> Result<Page<String>> {
        let request = wire::GetDatabasesRequest { next_token };
        let response: wire::GetDatabasesResponse =
            self.transport.call("GetDatabases", &request).await?;
        Ok(Page {
            items: response
                .database_list
                .into_iter()
                .map(|db| db.name)
                .collect(),
            next_token: response.next_token,
        })
    }

    async fn create_database(&self, name: &str) -> Result<()> {
        let request = wire::CreateDatabaseRequest {
            database_input: wire::DatabaseInput { name },
        };
        let _: wire::Empty = self.transport.call("CreateDatabase", &request).await?;
        Ok(())
    }

    async fn get_tables(&self, database: &str, next_token: Option<&str>) -> Result<Page<String>> {
        let request = wire::GetTablesRequest {
            database_name: database,
            next_token,
        };
        let response: wire::GetTablesResponse =
            self.transport.call("GetTables", &request).await?;
        Ok(Page {
            items: response
                .table_list
                .into_iter()
                .map(|table| table.name)
                .collect(),
            next_token: response.next_token,
        })
    }
}
