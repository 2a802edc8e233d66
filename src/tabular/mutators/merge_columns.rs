//! Combine two or more columns of a record into one.

use super::Mutator;
use crate::tabular::error::Result;
use crate::tabular::record::Record;

pub struct MergeColumns {
    columns: Vec<String>,
    new_column: String,
    delimiter: String,
}

impl MergeColumns {
    pub(crate) fn new(
        columns: Vec<String>,
        new_column: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> MergeColumns {
        MergeColumns {
            columns,
            new_column: new_column.into(),
            delimiter: delimiter.into(),
        }
    }
}

impl Mutator for MergeColumns {
    fn mutate_record(&self, mut record: Record) -> Result<Record> {
        // capture every value before deleting anything, so the merged
        // value does not depend on deletion order
        let values: Vec<String> = self
            .columns
            .iter()
            .map(|column| record.get(column))
            .collect();

        for column in &self.columns {
            record.delete(column);
        }
        record.set(&self.new_column, &values.join(&self.delimiter));

        Ok(record)
    }

    fn mutate_header(&self, mut columns: Vec<String>) -> Vec<String> {
        columns.retain(|column| !self.columns.contains(column));
        columns.push(self.new_column.clone());
        columns
    }
}
