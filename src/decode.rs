use crate::{
    wire, AthenaError, Column, ExecutionStatistics, NamedQuery, QueryExecution, QueryState,
    ResultPage, Value, WorkGroup,
};

/// Converts one result cell according to its declared column type.
///
/// | type | value |
/// |---|---|
/// | `varchar`, `date`, `json` | [`Value::Text`], unparsed |
/// | `integer`, `bigint` | [`Value::Integer`] |
/// | `double` | [`Value::Float`] |
///
/// A missing cell decodes to [`Value::Null`] for every supported type. Any other
/// type fails with [`AthenaError::UnsupportedType`].
pub fn decode_cell(raw: Option<&str>, data_type: &str) -> Result<Value, AthenaError> {
    match data_type {
        "varchar" | "date" | "json" => Ok(raw.map_or(Value::Null, Value::text)),
        "integer" | "bigint" => raw
            .map(|value| {
                value.parse::<i64>().map(Value::Integer).map_err(|err| {
                    AthenaError::Decode(format!("invalid {data_type} value '{value}': {err}"))
                })
            })
            .unwrap_or(Ok(Value::Null)),
        "double" => raw
            .map(|value| {
                value.parse::<f64>().map(Value::Float).map_err(|err| {
                    AthenaError::Decode(format!("invalid double value '{value}': {err}"))
                })
            })
            .unwrap_or(Ok(Value::Null)),
        other => Err(AthenaError::UnsupportedType(other.to_owned())),
    }
}

/// Decodes one row. Cells past the end of `columns` are read as `varchar`: some
/// statements (e.g. `MSCK REPAIR TABLE`) return a status line with no column
/// metadata at all.
pub(crate) fn decode_row(
    columns: &[Column],
    cells: Vec<Option<String>>,
) -> Result<Vec<Value>, AthenaError> {
    cells
        .into_iter()
        .enumerate()
        .map(|(index, cell)| {
            let data_type = columns
                .get(index)
                .map_or("varchar", |col| col.data_type.as_str());
            decode_cell(cell.as_deref(), data_type)
        })
        .collect()
}

pub(crate) fn decode_result_page(response: wire::GetQueryResultsResponse) -> ResultPage {
    let columns = response
        .result_set
        .result_set_metadata
        .map(|meta| {
            meta.column_info
                .into_iter()
                .map(|info| Column {
                    name: info.name,
                    data_type: info.data_type,
                })
                .collect()
        })
        .unwrap_or_default();

    let rows = response
        .result_set
        .rows
        .into_iter()
        .map(|row| row.data.into_iter().map(|datum| datum.var_char_value).collect())
        .collect();

    ResultPage {
        columns,
        rows,
        next_token: response.next_token,
    }
}

/// Builds a [`QueryExecution`] from the `QueryExecution` object of a response,
/// keeping the object itself as the raw description.
pub(crate) fn decode_execution(raw: serde_json::Value) -> Result<QueryExecution, AthenaError> {
    let execution: wire::QueryExecution = serde_json::from_value(raw.clone())
        .map_err(|err| AthenaError::Decode(format!("invalid query execution: {err}; body: {raw}")))?;

    let status = execution.status.unwrap_or_default();
    let state = status.state.ok_or_else(|| {
        AthenaError::Decode(format!(
            "query execution {} has no state",
            execution.query_execution_id
        ))
    })?;
    let statistics = execution
        .statistics
        .map(|stats| ExecutionStatistics {
            engine_execution_time_ms: stats.engine_execution_time_in_millis,
            data_scanned_bytes: stats.data_scanned_in_bytes,
            total_execution_time_ms: stats.total_execution_time_in_millis,
            queue_time_ms: stats.query_queue_time_in_millis,
        })
        .unwrap_or_default();
    let context = execution.query_execution_context.unwrap_or_default();

    Ok(QueryExecution {
        execution_id: execution.query_execution_id,
        state: QueryState::parse(&state),
        state_change_reason: status.state_change_reason,
        query: execution.query,
        database: context.database,
        catalog: context.catalog,
        output_location: execution
            .result_configuration
            .and_then(|config| config.output_location),
        work_group: execution.work_group,
        submitted_at: status.submission_date_time,
        completed_at: status.completion_date_time,
        statistics,
        raw,
    })
}

pub(crate) fn decode_work_group(summary: wire::WorkGroupSummary) -> WorkGroup {
    WorkGroup {
        name: summary.name,
        state: summary.state,
        description: summary.description,
    }
}

pub(crate) fn decode_named_query(query: wire::NamedQuery) -> Result<NamedQuery, AthenaError> {
    let id = query.named_query_id.ok_or_else(|| {
        AthenaError::Decode(format!("named query '{}' has no id", query.name))
    })?;
    Ok(NamedQuery {
        id,
        name: query.name,
        description: query.description,
        database: query.database,
        query_string: query.query_string,
        work_group: query.work_group,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{decode, wire, AthenaError, Column, QueryState, Value};

    fn col(name: &str, data_type: &str) -> Column {
        Column {
            name: name.to_owned(),
            data_type: data_type.to_owned(),
        }
    }

    #[test]
    fn decode_cell_conversion_table() {
        assert_eq!(
            decode::decode_cell(Some("abc"), "varchar").unwrap(),
            Value::text("abc")
        );
        assert_eq!(
            decode::decode_cell(Some("2021-03-04"), "date").unwrap(),
            Value::text("2021-03-04")
        );
        assert_eq!(
            decode::decode_cell(Some("42"), "integer").unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            decode::decode_cell(Some("9007199254740993"), "bigint").unwrap(),
            Value::Integer(9_007_199_254_740_993)
        );
        assert_eq!(
            decode::decode_cell(Some("1.5"), "double").unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            decode::decode_cell(Some(r#"{"a":1}"#), "json").unwrap(),
            Value::text(r#"{"a":1}"#)
        );
    }

    #[test]
    fn decode_cell_absent_is_null_for_every_supported_type() {
        for data_type in ["varchar", "date", "integer", "bigint", "double", "json"] {
            assert_eq!(
                decode::decode_cell(None, data_type).unwrap(),
                Value::Null,
                "type {data_type}"
            );
        }
    }

    #[test]
    fn decode_cell_unknown_type_fails() {
        let err = decode::decode_cell(Some("x"), "unknown_type").expect_err("must fail");
        match err {
            AthenaError::UnsupportedType(name) => assert_eq!(name, "unknown_type"),
            other => panic!("expected unsupported type, got {other:?}"),
        }
    }

    #[test]
    fn decode_cell_integer_parse_error() {
        let err = decode::decode_cell(Some("nope"), "integer").expect_err("must fail");
        assert!(matches!(err, AthenaError::Decode(_)));
    }

    #[test]
    fn decode_row_without_columns_reads_varchar() {
        let row = decode::decode_row(
            &[],
            vec![Some("Partitions not in metastore".to_owned()), Some("7".to_owned())],
        )
        .expect("must decode");
        assert_eq!(
            row,
            vec![Value::text("Partitions not in metastore"), Value::text("7")]
        );
    }

    #[test]
    fn decode_row_uses_declared_types() {
        let row = decode::decode_row(
            &[col("id", "integer"), col("score", "double"), col("name", "varchar")],
            vec![Some("1".to_owned()), None, Some("kit".to_owned())],
        )
        .expect("must decode");
        assert_eq!(row, vec![Value::Integer(1), Value::Null, Value::text("kit")]);
    }

    #[test]
    fn decode_result_page_keeps_missing_cells() {
        let response: wire::GetQueryResultsResponse = serde_json::from_value(json!({
            "ResultSet": {
                "Rows": [
                    { "Data": [ { "VarCharValue": "id" } ] },
                    { "Data": [ {} ] }
                ],
                "ResultSetMetadata": {
                    "ColumnInfo": [ { "Name": "id", "Type": "integer", "Nullable": "NULLABLE" } ]
                }
            },
            "NextToken": "t-2"
        }))
        .expect("must parse");

        let page = decode::decode_result_page(response);
        assert_eq!(page.columns, vec![col("id", "integer")]);
        assert_eq!(page.rows, vec![vec![Some("id".to_owned())], vec![None]]);
        assert_eq!(page.next_token.as_deref(), Some("t-2"));
    }

    #[test]
    fn decode_execution_reads_status_and_statistics() {
        let raw = json!({
            "QueryExecutionId": "q-1",
            "Query": "SELECT 1",
            "QueryExecutionContext": { "Database": "default" },
            "ResultConfiguration": { "OutputLocation": "s3://bucket/out/q-1.csv" },
            "Status": {
                "State": "SUCCEEDED",
                "SubmissionDateTime": 1_600_000_000.5,
                "CompletionDateTime": 1_600_000_002.0
            },
            "Statistics": {
                "EngineExecutionTimeInMillis": 1200,
                "DataScannedInBytes": 4096
            },
            "WorkGroup": "primary"
        });

        let execution = decode::decode_execution(raw.clone()).expect("must decode");
        assert_eq!(execution.execution_id, "q-1");
        assert_eq!(execution.state, QueryState::Succeeded);
        assert_eq!(execution.database.as_deref(), Some("default"));
        assert_eq!(
            execution.output_location.as_deref(),
            Some("s3://bucket/out/q-1.csv")
        );
        assert_eq!(execution.statistics.engine_execution_time_ms, Some(1200));
        assert_eq!(execution.statistics.data_scanned_bytes, Some(4096));
        assert_eq!(execution.submitted_at, Some(1_600_000_000.5));
        assert_eq!(execution.raw, raw);
    }

    #[test]
    fn decode_execution_without_state_fails() {
        let err = decode::decode_execution(json!({ "QueryExecutionId": "q-1" }))
            .expect_err("must fail");
        assert!(matches!(err, AthenaError::Decode(_)));
    }
}
