//! Lazy, restartable cursors over a table's records.
//!
//! [`Records`] walks every row; [`FilteredRecords`] wraps it with an
//! inclusion (or exclusion) predicate map and skips non-matching rows
//! transparently. Both yield fully mutated, fully formatted records, and
//! both carry the shared [`RecordStream`] operations for extraction and
//! the file write path.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::codec;
use super::error::{Result, TabularError};
use super::record::Record;
use super::table::Table;

pub struct Records<'a> {
    table: &'a Table,
    position: usize,
}

impl<'a> Records<'a> {
    pub(crate) fn new(table: &'a Table) -> Records<'a> {
        Records { table, position: 0 }
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn filter(self, criteria: HashMap<String, Vec<String>>) -> FilteredRecords<'a> {
        //! Narrow the cursor to rows where every criteria column's value
        //! is one of the listed acceptable values.

        FilteredRecords {
            records: self,
            criteria,
            inverse: false,
        }
    }

    pub fn not_filter(self, criteria: HashMap<String, Vec<String>>) -> FilteredRecords<'a> {
        //! The complement of [`Records::filter`]: keep only rows the
        //! criteria would have matched away.

        FilteredRecords {
            records: self,
            criteria,
            inverse: true,
        }
    }
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.table.record_count() {
            return None;
        }
        let record = self.table.get(self.position as isize);
        self.position += 1;
        Some(record)
    }
}

pub struct FilteredRecords<'a> {
    records: Records<'a>,
    criteria: HashMap<String, Vec<String>>,
    inverse: bool,
}

impl FilteredRecords<'_> {
    pub fn rewind(&mut self) {
        self.records.rewind();
    }

    fn accepts(&self, record: &Record) -> bool {
        // evaluated against the mutated record, not raw storage
        let matched = self
            .criteria
            .iter()
            .all(|(column, allowed)| allowed.contains(&record.get(column)));
        matched != self.inverse
    }
}

impl Iterator for FilteredRecords<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.records.next() {
                None => return None,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(record)) => {
                    if self.accepts(&record) {
                        return Some(Ok(record));
                    }
                }
            }
        }
    }
}

/// Operations shared by every record cursor.
pub trait RecordStream: Iterator<Item = Result<Record>> + Sized {
    /// The mutated column list of the underlying table.
    fn header(&self) -> Vec<String>;

    fn contains(self, column: &str, value: &str) -> Result<bool> {
        //! Whether any remaining record carries `value` in `column`.

        for record in self {
            if record?.get(column) == value {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn column_values(self, column: &str) -> Result<Vec<String>> {
        //! One column's values across the remaining records.

        let mut values = Vec::new();
        for record in self {
            values.push(record?.get(column));
        }
        Ok(values)
    }

    fn write_to<W: Write>(self, writer: &mut W, include_header: bool) -> Result<()> {
        //! Encode every remaining record through the codec, optionally
        //! preceded by a header line.

        let write_failure = |e| TabularError::io("failed to write record line", e);

        if include_header {
            writer
                .write_all(codec::format_line(&self.header()).as_bytes())
                .map_err(write_failure)?;
        }
        for record in self {
            let all = record?.get_all();
            let fields: Vec<&str> = all.values().map(|v| v.as_str()).collect();
            writer
                .write_all(codec::format_line(&fields).as_bytes())
                .map_err(write_failure)?;
        }
        Ok(())
    }

    fn write_selected<W: Write>(
        self,
        writer: &mut W,
        include: &[String],
        exclude: &[String],
        include_header: bool,
    ) -> Result<()> {
        //! Like [`RecordStream::write_to`] but restricted to a column
        //! subset: an `include` list wins, otherwise everything not in
        //! `exclude`.

        let columns: Vec<String> = if !include.is_empty() {
            include.to_vec()
        } else {
            self.header()
                .into_iter()
                .filter(|column| !exclude.contains(column))
                .collect()
        };

        let write_failure = |e| TabularError::io("failed to write record line", e);

        if include_header {
            writer
                .write_all(codec::format_line(&columns).as_bytes())
                .map_err(write_failure)?;
        }
        for record in self {
            let record = record?;
            let fields: Vec<String> = columns.iter().map(|column| record.get(column)).collect();
            writer
                .write_all(codec::format_line(&fields).as_bytes())
                .map_err(write_failure)?;
        }
        Ok(())
    }

    fn write_file(self, path: impl AsRef<Path>, include_header: bool) -> Result<()> {
        //! Persist the remaining records to a new file.

        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            TabularError::io(format!("failed to open {} for writing", path.display()), e)
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, include_header)?;
        writer
            .flush()
            .map_err(|e| TabularError::io(format!("failed to flush {}", path.display()), e))
    }
}

impl RecordStream for Records<'_> {
    fn header(&self) -> Vec<String> {
        self.table.columns()
    }
}

impl RecordStream for FilteredRecords<'_> {
    fn header(&self) -> Vec<String> {
        self.records.table.columns()
    }
}
