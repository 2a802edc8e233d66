//! One row of a table as an ordered column-name to value mapping.

use std::fmt::Display;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use super::codec;
use super::error::{Result, TabularError};
use super::formatters::Formatter;

/// The formatter registry a table shares with every record it hands out.
///
/// Shared so that a formatter registered after a record was materialized
/// still applies the next time that record's column is read.
pub(crate) type FormatterMap = Arc<RwLock<IndexMap<String, Formatter>>>;

/// A single row's data, keyed by column name in column order.
///
/// Records are value-like: cloning deep-copies the data mapping, and a
/// record retrieved from a [`super::Table`] can be freely mutated without
/// affecting the table's stored rows.
#[derive(Clone)]
pub struct Record {
    data: IndexMap<String, String>,
    formatters: FormatterMap,
}

impl Record {
    pub(crate) fn new(
        columns: &[String],
        values: Vec<String>,
        trim: bool,
        formatters: FormatterMap,
    ) -> Result<Record> {
        //! Build a raw record by zipping `values` against the declared
        //! columns. An empty `values` fills every column with the empty
        //! string; anything else must match the declared width exactly.

        let values = if values.is_empty() {
            vec![String::new(); columns.len()]
        } else if values.len() != columns.len() {
            return Err(TabularError::schema(format!(
                "row has {} fields, schema declares {}",
                values.len(),
                columns.len()
            )));
        } else {
            values
        };

        let data = columns
            .iter()
            .cloned()
            .zip(values.into_iter().map(|v| {
                if trim { v.trim().to_string() } else { v }
            }))
            .collect();

        Ok(Record { data, formatters })
    }

    pub fn get(&self, column: &str) -> String {
        //! Read one column's value with its formatter (if any) applied.
        //!
        //! An unset column reads as the empty string; formatting runs on
        //! every call, never cached.

        let value = self.data.get(column).cloned().unwrap_or_default();

        match self.formatters.read().unwrap().get(column) {
            Some(formatter) => formatter.format(&value),
            None => value,
        }
    }

    pub fn set(&mut self, column: &str, value: &str) {
        self.set_with(column, value, true);
    }

    pub fn set_with(&mut self, column: &str, value: &str, overwrite: bool) {
        //! Store `value` under `column`, running the column's formatter
        //! first. With `overwrite` false an existing non-empty value wins
        //! and the call is a no-op.

        if !overwrite {
            if let Some(existing) = self.data.get(column) {
                if !existing.is_empty() {
                    return;
                }
            }
        }

        let value = match self.formatters.read().unwrap().get(column) {
            Some(formatter) => formatter.format(value),
            None => value.to_string(),
        };
        self.data.insert(column.to_string(), value);
    }

    pub fn delete(&mut self, column: &str) {
        //! Remove `column` from the record. Deleting an absent column is a
        //! silent no-op. Remaining keys keep their relative order.

        self.data.shift_remove(column);
    }

    pub fn get_all(&self) -> IndexMap<String, String> {
        //! The full column to formatted-value mapping, in the record's
        //! current key order, so structural mutation is reflected.

        self.data
            .keys()
            .map(|column| (column.clone(), self.get(column)))
            .collect()
    }

    pub fn columns(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let all = self.get_all();
        let fields: Vec<&str> = all.values().map(|v| v.as_str()).collect();
        write!(f, "{}", codec::format_line(&fields))
    }
}
