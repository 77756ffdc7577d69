//! `athena-http` runs SQL on Amazon Athena and reads the Glue data catalog.
//!
//! The crate is built around three operations:
//! - [`QueryRunner::run_and_wait`] submits a query, polls until it finishes and
//!   decodes the result rows into [`Value`]s
//! - [`CatalogClient`] answers "does this database/table exist?"
//! - [`to_column_oriented_table`] reshapes rows into columns
//!
//! Remote calls go through the [`QueryService`] and [`CatalogService`] traits,
//! implemented over HTTP by [`AthenaClient`] and [`GlueClient`]. The [`blocking`]
//! module wraps everything for synchronous callers.

mod catalog;
mod client;
mod decode;
mod error;
mod glue;
mod history;
mod options;
mod runner;
mod service;
mod table;
mod types;
mod value;
mod wire;

pub mod blocking;
#[cfg(feature = "row-map")]
pub mod row_map;

pub use catalog::CatalogClient;
pub use client::{athena_endpoint, glue_endpoint, AthenaClient};
pub use decode::decode_cell;
pub use error::AthenaError;
pub use glue::GlueClient;
pub use history::QueryHistory;
pub use options::{ClientOptions, PollOptions};
pub use runner::QueryRunner;
pub use service::{CatalogService, QueryService};
pub use table::{to_column_oriented_table, ColumnTable};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    Column, ExecutionPerformance, ExecutionStatistics, NamedQuery, Page, Query, QueryExecution,
    QueryState, ResultPage, ResultSet, WorkGroup,
};
pub use value::Value;

pub type Result<T> = std::result::Result<T, AthenaError>;
