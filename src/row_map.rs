//! Row mapping helpers.
//!
//! Enabled with the `row-map` feature.

use crate::{Column, ResultSet, Value};

/// Lightweight row view for name-based access helpers.
#[derive(Debug)]
pub struct RowRef<'a> {
    /// Result columns aligned with `values`.
    pub cols: &'a [Column],
    /// Row values aligned with `cols`.
    pub values: &'a [Value],
}

impl<'a> RowRef<'a> {
    /// Returns a value by case-insensitive column name.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let idx = self
            .cols
            .iter()
            .position(|col| col.name.eq_ignore_ascii_case(name))?;
        self.values.get(idx)
    }

    /// Returns an `integer`/`bigint` value by column name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    /// Returns a `double` value by column name.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    /// Returns a text value (`varchar`, `date`, `json`) by column name.
    pub fn get_text(&self, name: &str) -> Option<&'a str> {
        self.get(name)?.as_str()
    }
}

impl ResultSet {
    /// Iterates rows as [`RowRef`] views.
    pub fn row_refs(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(|values| RowRef {
            cols: &self.columns,
            values,
        })
    }
}
