//! The central store: declared columns, dual-mode row storage, the
//! formatter registry and the ordered mutator chain.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use log::debug;

use super::codec;
use super::error::{Result, TabularError};
use super::formatters::Formatter;
use super::mutators::{AddColumn, DeleteColumn, Join, JoinMatcher, MergeColumns, Mutator};
use super::record::{FormatterMap, Record};
use super::records::Records;

/// Construction options for a [`Table`].
#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    /// Trim whitespace from parsed field values.
    pub trim: bool,

    /// Materialize all rows in memory at construction. When false, only a
    /// byte-offset index is kept and rows are re-parsed from the backing
    /// file on demand.
    pub preload: bool,

    /// Treat the first line of the file as column names.
    pub has_header: bool,
}

impl Default for TableOptions {
    fn default() -> TableOptions {
        TableOptions {
            trim: true,
            preload: true,
            has_header: true,
        }
    }
}

/// The two storage strategies a table can live in.
///
/// The mode is picked once at construction and never changes for the
/// table's lifetime. In indexed mode the backing file stays open because
/// every fetch seeks and re-parses one line.
enum Storage {
    Materialized {
        records: Vec<Record>,
    },
    Indexed {
        offsets: Vec<u64>,
        source: RwLock<BufReader<File>>,
    },
}

/// A delimited-text table: either a file on disk or an in-memory sequence
/// of records, plus everything registered on top of it.
///
/// Fetching a record always returns a copy with the mutator chain applied;
/// the stored rows are never mutated in place, so the same table can be
/// re-read later under a different mutator configuration.
pub struct Table {
    columns: Vec<String>,
    storage: Storage,
    options: TableOptions,
    formatters: FormatterMap,
    mutators: Vec<Box<dyn Mutator>>,
}

impl Table {
    pub fn new(options: TableOptions) -> Table {
        //! An empty materialized table for programmatic population.
        //! Declare its schema with [`Table::set_columns`] before appending.

        Table {
            columns: Vec::new(),
            storage: Storage::Materialized {
                records: Vec::new(),
            },
            options,
            formatters: Arc::new(RwLock::new(IndexMap::new())),
            mutators: Vec::new(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>, options: TableOptions) -> Result<Table> {
        //! Construct a table from a delimited file.
        //!
        //! With `has_header` the first line declares the columns; without
        //! it, names are synthesized as positional numeric strings from the
        //! first data row's width. With `preload` every row is parsed into
        //! memory and the file is closed; otherwise only line offsets are
        //! recorded and the file stays open for lazy fetches.

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TabularError::io(format!("failed to open {} for reading", path.display()), e)
        })?;
        let mut reader = BufReader::new(file);
        let read_failure =
            |e| TabularError::io(format!("failed to read from {}", path.display()), e);

        let mut columns = Vec::new();
        let mut position: u64 = 0;

        if options.has_header {
            let mut line = String::new();
            let consumed = reader.read_line(&mut line).map_err(read_failure)?;
            if consumed == 0 {
                return Err(TabularError::schema(format!(
                    "{} is empty, no header line to read",
                    path.display()
                )));
            }
            columns = codec::parse_line(&line)
                .into_iter()
                .map(|name| name.trim().to_string())
                .collect();
            ensure_unique(&columns)?;
            position = consumed as u64;
        }
        let data_start = position;

        let formatters: FormatterMap = Arc::new(RwLock::new(IndexMap::new()));
        let mut line = String::new();

        if options.preload {
            let mut records = Vec::new();
            loop {
                line.clear();
                let consumed = reader.read_line(&mut line).map_err(read_failure)?;
                if consumed == 0 {
                    break;
                }
                if line.trim_end_matches(['\r', '\n']).is_empty() {
                    continue;
                }
                let fields = codec::parse_line(&line);
                if columns.is_empty() {
                    columns = positional_columns(fields.len());
                }
                records.push(Record::new(
                    &columns,
                    fields,
                    options.trim,
                    Arc::clone(&formatters),
                )?);
            }
            debug!("loaded {} records from {}", records.len(), path.display());

            // reader dropped here; materialized mode releases the file
            Ok(Table {
                columns,
                storage: Storage::Materialized { records },
                options,
                formatters,
                mutators: Vec::new(),
            })
        } else {
            let mut offsets = Vec::new();
            loop {
                line.clear();
                let consumed = reader.read_line(&mut line).map_err(read_failure)?;
                if consumed == 0 {
                    break;
                }
                if !line.trim_end_matches(['\r', '\n']).is_empty() {
                    if columns.is_empty() {
                        columns = positional_columns(codec::parse_line(&line).len());
                    }
                    offsets.push(position);
                }
                position += consumed as u64;
            }
            debug!(
                "indexed {} records in {}, data starts at byte {}",
                offsets.len(),
                path.display(),
                data_start
            );

            Ok(Table {
                columns,
                storage: Storage::Indexed {
                    offsets,
                    source: RwLock::new(reader),
                },
                options,
                formatters,
                mutators: Vec::new(),
            })
        }
    }

    pub fn set_columns(&mut self, columns: Vec<String>) -> Result<()> {
        //! Declare the raw column list. Names must be unique.

        ensure_unique(&columns)?;
        self.columns = columns;
        Ok(())
    }

    pub fn columns(&self) -> Vec<String> {
        //! The declared columns with every registered structural mutation
        //! folded in, in registration order.

        self.mutators
            .iter()
            .fold(self.columns.clone(), |columns, mutator| {
                mutator.mutate_header(columns)
            })
    }

    pub fn raw_columns(&self) -> &[String] {
        self.columns.as_slice()
    }

    pub fn column_exists(&self, column: &str) -> bool {
        self.columns().iter().any(|name| name == column)
    }

    pub fn set_formatter(&mut self, column: impl Into<String>, formatter: Formatter) {
        //! Register a formatter to run on every read and store of the
        //! column's value, including on records already handed out.

        self.formatters.write().unwrap().insert(column.into(), formatter);
    }

    pub fn record_count(&self) -> usize {
        match &self.storage {
            Storage::Materialized { records } => records.len(),
            Storage::Indexed { offsets, .. } => offsets.len(),
        }
    }

    pub fn get(&self, position: isize) -> Result<Record> {
        //! Fetch the record at `position`, with a negative position
        //! resolving to the last row. The returned record is a fresh copy
        //! with the full mutator chain applied.

        let resolved = self.resolve_position(position)?;

        let raw = match &self.storage {
            Storage::Materialized { records } => records[resolved].clone(),
            Storage::Indexed { offsets, source } => {
                let mut reader = source.write().unwrap();
                reader
                    .seek(SeekFrom::Start(offsets[resolved]))
                    .map_err(|e| TabularError::io("failed to seek in backing file", e))?;
                let mut line = String::new();
                reader
                    .read_line(&mut line)
                    .map_err(|e| TabularError::io("failed to read record from backing file", e))?;
                Record::new(
                    &self.columns,
                    codec::parse_line(&line),
                    self.options.trim,
                    Arc::clone(&self.formatters),
                )?
            }
        };

        self.mutators
            .iter()
            .try_fold(raw, |record, mutator| mutator.mutate_record(record))
    }

    pub fn append_record(&mut self, values: Vec<String>) -> Result<Record> {
        //! Create a new raw record from `values` and store it at the end.
        //! An empty `values` fills every column with the empty string.

        self.insert_record(values, -1)
    }

    pub fn insert_record(&mut self, values: Vec<String>, position: isize) -> Result<Record> {
        //! Create a new raw record and splice it in at `position`; a
        //! negative or past-the-end position appends.
        //!
        //! Only a materialized table can take new records. An indexed
        //! table rejects the call so its storage mode stays what it was
        //! constructed with.

        let record = Record::new(
            &self.columns,
            values,
            self.options.trim,
            Arc::clone(&self.formatters),
        )?;

        match &mut self.storage {
            Storage::Materialized { records } => {
                if position < 0 {
                    records.push(record.clone());
                } else {
                    let at = (position as usize).min(records.len());
                    records.insert(at, record.clone());
                }
                Ok(record)
            }
            Storage::Indexed { .. } => Err(TabularError::argument(
                "an indexed table cannot take new records; construct with preload instead",
            )),
        }
    }

    pub fn delete_record(&mut self, position: isize) -> Result<()> {
        //! Remove the row at `position` (negative resolves to the last
        //! row). In indexed mode only the offset entry is dropped; the
        //! backing file is left untouched.

        let resolved = self.resolve_position(position)?;
        match &mut self.storage {
            Storage::Materialized { records } => {
                records.remove(resolved);
            }
            Storage::Indexed { offsets, .. } => {
                offsets.remove(resolved);
            }
        }
        Ok(())
    }

    pub fn add_column(&mut self, column: impl Into<String>, fill: impl Into<String>) {
        //! Append a new column, filled with `fill` on every record that
        //! does not already carry a value. O(1) to register; the cost is
        //! paid per fetch, not per edit.

        self.mutators.push(Box::new(AddColumn::new(column, fill)));
    }

    pub fn delete_column(&mut self, column: impl Into<String>) {
        self.mutators.push(Box::new(DeleteColumn::new(column)));
    }

    pub fn combine_columns(
        &mut self,
        columns: Vec<String>,
        new_column: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> Result<()> {
        //! Merge `columns`, in the given order, into `new_column` joined
        //! with `delimiter`. The merged columns disappear from the visible
        //! schema and the new one is appended.

        let visible = self.columns();
        if let Some(missing) = columns.iter().find(|column| !visible.contains(column)) {
            return Err(TabularError::argument(format!(
                "cannot merge undeclared column '{}'",
                missing
            )));
        }

        self.mutators
            .push(Box::new(MergeColumns::new(columns, new_column, delimiter)));
        Ok(())
    }

    pub fn join(
        &mut self,
        that: Arc<Table>,
        matcher: JoinMatcher,
        these_columns: Vec<String>,
        those_columns: Vec<String>,
    ) -> Result<()> {
        //! Fill `these_columns` of this table's records from
        //! `those_columns` of the matching records of `that`. With an
        //! empty `these_columns` the source names are appended as new
        //! columns instead. When several records of `that` match, the
        //! last one wins.

        if !these_columns.is_empty() && these_columns.len() != those_columns.len() {
            return Err(TabularError::argument(
                "these_columns must be the same length as those_columns",
            ));
        }

        let visible = self.columns();
        if let Some(missing) = these_columns.iter().find(|column| !visible.contains(column)) {
            return Err(TabularError::argument(format!(
                "join target column '{}' is not declared on this table",
                missing
            )));
        }

        let that_visible = that.columns();
        if let Some(missing) = those_columns
            .iter()
            .find(|column| !that_visible.contains(column))
        {
            return Err(TabularError::argument(format!(
                "join source column '{}' is not declared on the joined table",
                missing
            )));
        }

        self.mutators
            .push(Box::new(Join::new(that, matcher, these_columns, those_columns)));
        Ok(())
    }

    pub fn join_on(
        &mut self,
        that: Arc<Table>,
        this_key: &str,
        that_key: &str,
        these_columns: Vec<String>,
        those_columns: Vec<String>,
    ) -> Result<()> {
        //! [`Table::join`] specialized to equality of two key columns.

        if !self.column_exists(this_key) {
            return Err(TabularError::argument(format!(
                "join key column '{}' is not declared on this table",
                this_key
            )));
        }
        if !that.column_exists(that_key) {
            return Err(TabularError::argument(format!(
                "join key column '{}' is not declared on the joined table",
                that_key
            )));
        }

        self.join(
            that,
            JoinMatcher::key(this_key, that_key),
            these_columns,
            those_columns,
        )
    }

    pub fn add_mutator(&mut self, mutator: Box<dyn Mutator>) {
        //! Register a caller-supplied mutator at the end of the chain.

        self.mutators.push(mutator);
    }

    pub fn records(&self) -> Records<'_> {
        Records::new(self)
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    fn resolve_position(&self, position: isize) -> Result<usize> {
        let count = self.record_count();
        let resolved = if position < 0 {
            if count == 0 {
                return Err(TabularError::Bounds(position));
            }
            count - 1
        } else {
            position as usize
        };

        if resolved >= count {
            return Err(TabularError::Bounds(position));
        }
        Ok(resolved)
    }
}

fn positional_columns(width: usize) -> Vec<String> {
    //! Synthesized column names for a headerless file.

    (0..width).map(|index| index.to_string()).collect()
}

fn ensure_unique(columns: &[String]) -> Result<()> {
    for (index, name) in columns.iter().enumerate() {
        if columns[..index].contains(name) {
            return Err(TabularError::schema(format!(
                "duplicate column name '{}'",
                name
            )));
        }
    }
    Ok(())
}
