use std::future::{pending, Future};

use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    decode::decode_row, service::QueryService, AthenaError, ExecutionPerformance, PollOptions,
    Query, QueryExecution, QueryState, ResultPage, ResultSet, Result,
};

/// Submits queries, waits for them to finish and decodes their results.
#[derive(Clone, Debug)]
pub struct QueryRunner<S> {
    service: S,
    poll: PollOptions,
}

impl<S: QueryService> QueryRunner<S> {
    /// Creates a runner that polls once per second with no upper bound.
    pub fn new(service: S) -> Self {
        Self {
            service,
            poll: PollOptions::default(),
        }
    }

    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Starts `query` and returns its execution id. Results are written to the
    /// query's output location with `SSE_S3` encryption.
    pub async fn submit(&self, query: &Query) -> Result<String> {
        let execution_id = self.service.start_query_execution(query).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!("started query {} in {}", execution_id, query.database);

        Ok(execution_id)
    }

    /// Polls until the execution is `SUCCEEDED`, `FAILED` or `CANCELLED` and
    /// returns its final description. The state is not checked.
    pub async fn await_completion(&self, execution_id: &str) -> Result<QueryExecution> {
        self.await_completion_with(execution_id, &CancellationToken::new())
            .await
    }

    /// Like [`QueryRunner::await_completion`], but stops waiting once `cancel`
    /// fires. The execution is then asked to stop and
    /// [`AthenaError::Cancelled`] is returned.
    ///
    /// `max_wait` and `cancel` also bound a status request that is in flight.
    pub async fn await_completion_with(
        &self,
        execution_id: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryExecution> {
        let started = Instant::now();
        let deadline = self.poll.max_wait.map(|max_wait| started + max_wait);
        loop {
            let execution = self
                .bounded(
                    execution_id,
                    self.service.get_query_execution(execution_id),
                    started,
                    deadline,
                    cancel,
                )
                .await?;
            if execution.state.is_terminal() {
                return Ok(execution);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                "query {} is {}, polling again in {:?}",
                execution_id,
                execution.state,
                self.poll.interval
            );

            let pause = async {
                sleep(self.poll.interval).await;
                Ok(())
            };
            self.bounded(execution_id, pause, started, deadline, cancel)
                .await?;
        }
    }

    /// Drives `step` until it completes, `cancel` fires or `deadline` passes,
    /// whichever comes first. A fired token wins over everything else.
    async fn bounded<T>(
        &self,
        execution_id: &str,
        step: impl Future<Output = Result<T>>,
        started: Instant,
        deadline: Option<Instant>,
        cancel: &CancellationToken,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.stop(execution_id).await;
                Err(AthenaError::Cancelled {
                    execution_id: execution_id.to_owned(),
                })
            }
            _ = wait_until(deadline) => Err(AthenaError::Timeout {
                execution_id: execution_id.to_owned(),
                waited: started.elapsed(),
            }),
            result = step => result,
        }
    }

    async fn stop(&self, execution_id: &str) {
        if let Err(_err) = self.service.stop_query_execution(execution_id).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("failed to stop query {}: {}", execution_id, _err);
        }
    }

    /// Fetches every result page of a finished execution.
    ///
    /// Column metadata comes from the first page. The first row of the first
    /// page is the header row and is always dropped; a result that lacks it
    /// loses its first data row instead.
    pub async fn fetch_results(&self, execution_id: &str) -> Result<ResultSet> {
        let ResultPage {
            columns,
            rows,
            mut next_token,
        } = self.service.get_query_results(execution_id, None).await?;
        let mut raw_rows: Vec<_> = rows.into_iter().skip(1).collect();

        while let Some(token) = next_token {
            let page = self
                .service
                .get_query_results(execution_id, Some(&token))
                .await?;
            raw_rows.extend(page.rows);
            next_token = page.next_token;
        }

        let rows = raw_rows
            .into_iter()
            .map(|cells| decode_row(&columns, cells))
            .collect::<Result<Vec<_>>>()?;
        Ok(ResultSet { columns, rows })
    }

    /// Fetches only the first result page, dropping the header row.
    pub async fn fetch_first_page(&self, execution_id: &str) -> Result<ResultSet> {
        let page = self.service.get_query_results(execution_id, None).await?;
        let rows = page
            .rows
            .into_iter()
            .skip(1)
            .map(|cells| decode_row(&page.columns, cells))
            .collect::<Result<Vec<_>>>()?;
        Ok(ResultSet {
            columns: page.columns,
            rows,
        })
    }

    /// Submits `query`, waits for it and returns its decoded results.
    ///
    /// Fails with [`AthenaError::QueryFailed`] if the execution ends in any
    /// state other than `SUCCEEDED`.
    pub async fn run_and_wait(&self, query: &Query) -> Result<ResultSet> {
        self.run_and_wait_with(query, &CancellationToken::new())
            .await
    }

    pub async fn run_and_wait_with(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<ResultSet> {
        let execution_id = self.submit(query).await?;
        let execution = self.await_completion_with(&execution_id, cancel).await?;
        ensure_succeeded(&execution)?;
        self.fetch_results(&execution_id).await
    }

    /// Returns engine time and bytes scanned of a successful execution.
    pub async fn describe_execution_performance(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionPerformance> {
        let execution = self.service.get_query_execution(execution_id).await?;
        ensure_succeeded(&execution)?;

        let stats = &execution.statistics;
        match (stats.engine_execution_time_ms, stats.data_scanned_bytes) {
            (Some(engine_execution_time_ms), Some(data_scanned_bytes)) => {
                Ok(ExecutionPerformance {
                    engine_execution_time_ms,
                    data_scanned_bytes,
                })
            }
            _ => Err(AthenaError::Decode(format!(
                "query {execution_id} has no execution statistics"
            ))),
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

fn ensure_succeeded(execution: &QueryExecution) -> Result<()> {
    if execution.state == QueryState::Succeeded {
        return Ok(());
    }
    Err(AthenaError::QueryFailed {
        execution_id: execution.execution_id.clone(),
        state: execution.state.clone(),
        reason: execution.state_change_reason.clone(),
        description: execution.raw.to_string(),
    })
}
