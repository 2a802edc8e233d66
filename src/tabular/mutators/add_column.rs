//! Create and append a new column.

use super::Mutator;
use crate::tabular::error::Result;
use crate::tabular::record::Record;

pub struct AddColumn {
    column: String,
    fill: String,
}

impl AddColumn {
    pub(crate) fn new(column: impl Into<String>, fill: impl Into<String>) -> AddColumn {
        AddColumn {
            column: column.into(),
            fill: fill.into(),
        }
    }
}

impl Mutator for AddColumn {
    fn mutate_record(&self, mut record: Record) -> Result<Record> {
        // fill only when the record does not already carry a value
        record.set_with(&self.column, &self.fill, false);
        Ok(record)
    }

    fn mutate_header(&self, mut columns: Vec<String>) -> Vec<String> {
        // an already-declared name stays where it is; the record side is
        // a fill-if-unset, so the header must not grow a duplicate
        if !columns.contains(&self.column) {
            columns.push(self.column.clone());
        }
        columns
    }
}
