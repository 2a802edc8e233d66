//! Remove a column.

use super::Mutator;
use crate::tabular::error::Result;
use crate::tabular::record::Record;

pub struct DeleteColumn {
    column: String,
}

impl DeleteColumn {
    pub(crate) fn new(column: impl Into<String>) -> DeleteColumn {
        DeleteColumn {
            column: column.into(),
        }
    }
}

impl Mutator for DeleteColumn {
    fn mutate_record(&self, mut record: Record) -> Result<Record> {
        record.delete(&self.column);
        Ok(record)
    }

    fn mutate_header(&self, mut columns: Vec<String>) -> Vec<String> {
        columns.retain(|column| *column != self.column);
        columns
    }
}
