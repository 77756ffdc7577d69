//! Row-major to column-major reshaping of query results.

use crate::{AthenaError, ResultSet, Value};

/// Columns of a result in header order, each with its values in row order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnTable {
    columns: Vec<(String, Vec<Value>)>,
}

impl ColumnTable {
    /// Values of the first column named `header`.
    pub fn get(&self, header: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, values)| values.as_slice())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<(String, Vec<Value>)> {
        self.columns
    }
}

/// Transposes `rows` into one value list per header.
///
/// Cells beyond the last header are ignored. A row with fewer cells than
/// there are headers is rejected.
pub fn to_column_oriented_table<H>(
    headers: &[H],
    rows: &[Vec<Value>],
) -> Result<ColumnTable, AthenaError>
where
    H: AsRef<str>,
{
    let mut columns: Vec<(String, Vec<Value>)> = headers
        .iter()
        .map(|header| (header.as_ref().to_owned(), Vec::with_capacity(rows.len())))
        .collect();

    for (index, row) in rows.iter().enumerate() {
        if row.len() < columns.len() {
            return Err(AthenaError::Decode(format!(
                "row {index} has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }
        for ((_, values), value) in columns.iter_mut().zip(row) {
            values.push(value.clone());
        }
    }

    Ok(ColumnTable { columns })
}

impl TryFrom<&ResultSet> for ColumnTable {
    type Error = AthenaError;

    fn try_from(result: &ResultSet) -> Result<Self, Self::Error> {
        to_column_oriented_table(result.headers().as_slice(), &result.rows)
    }
}
