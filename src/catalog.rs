use crate::{service::CatalogService, Result};

/// Name lookups over the database/table catalog.
///
/// Listings follow `NextToken` until the catalog reports no further page.
#[derive(Clone, Debug)]
pub struct CatalogClient<C> {
    service: C,
}

impl<C: CatalogService> CatalogClient<C> {
    pub fn new(service: C) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    pub async fn list_database_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self.service.get_databases(next_token.as_deref()).await?;
            names.extend(page.items);
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(names),
            }
        }
    }

    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .list_database_names()
            .await?
            .iter()
            .any(|db| db == name))
    }

    /// Creates `name`. Fails with the service's `AlreadyExistsException` if the
    /// database is already there.
    pub async fn create_database(&self, name: &str) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!("creating database {}", name);

        self.service.create_database(name).await
    }

    pub async fn list_table_names(&self, database: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .service
                .get_tables(database, next_token.as_deref())
                .await?;
            names.extend(page.items);
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => return Ok(names),
            }
        }
    }

    pub async fn table_exists(&self, database: &str, table: &str) -> Result<bool> {
        Ok(self
            .list_table_names(database)
            .await?
            .iter()
            .any(|name| name == table))
    }
}
