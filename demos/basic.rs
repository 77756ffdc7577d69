use athena_http::{
    to_column_oriented_table, AthenaClient, CatalogClient, GlueClient, Query, QueryRunner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let output_location = std::env::var("ATHENA_OUTPUT_LOCATION")?;
    let athena = AthenaClient::from_env().map_err(anyhow::Error::msg)?;
    let glue = GlueClient::from_env().map_err(anyhow::Error::msg)?;

    let catalog = CatalogClient::new(glue);
    if !catalog.database_exists("demo").await? {
        catalog.create_database("demo").await?;
    }

    let runner = QueryRunner::new(athena);
    let query = Query::new(
        "SELECT 1 AS id, 'Kit' AS name",
        "demo",
        output_location,
    );
    let execution_id = runner.submit(&query).await?;
    let execution = runner.await_completion(&execution_id).await?;
    println!("{execution_id}: {}", execution.state);

    let result = runner.fetch_results(&execution_id).await?;
    for row in &result.rows {
        println!("{row:?}");
    }

    let table = to_column_oriented_table(result.headers().as_slice(), &result.rows)?;
    for (header, values) in table.iter() {
        println!("{header}: {values:?}");
    }

    let perf = runner.describe_execution_performance(&execution_id).await?;
    println!(
        "{} seconds, {} megabytes scanned",
        perf.engine_execution_time_ms as f64 / 1000.0,
        perf.data_scanned_bytes as f64 / 1024.0 / 1024.0
    );

    Ok(())
}
