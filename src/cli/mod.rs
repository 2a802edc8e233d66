//! The thin command-line wrapper around the table engine.
//!
//! Everything here is plumbing: parse flags, build one or two
//! [`Table`]s, hand the cursor to stdout. The engine itself lives in
//! [`crate::tabular`] and knows nothing about any of this.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::tabular::{
    RecordStream, Result, Table, TableOptions, TabularError,
};

mod colors;
mod messages;
mod parsers;

pub use messages::{highlight_argument, system_message};
pub use parsers::{CliCommand, CliParser};

pub fn run(cli: CliParser) -> Result<()> {
    let options = TableOptions {
        trim: true,
        preload: !cli.no_preload,
        has_header: !cli.no_header,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        CliCommand::Columns { file, json } => {
            let table = Table::from_path(&file, options)?;
            let columns = table.columns();
            if json {
                write_json(&mut out, &columns)?;
            } else {
                for column in columns {
                    writeln!(out, "{}", column).map_err(stdout_failure)?;
                }
            }
        }

        CliCommand::Dump {
            file,
            filters,
            invert,
            columns,
            json,
            skip_header,
        } => {
            let table = Table::from_path(&file, options)?;
            let criteria = parse_criteria(&filters)?;
            debug!(
                "dumping {} with {} filter criteria",
                file.display(),
                criteria.len()
            );

            let records = table.records();
            if criteria.is_empty() {
                dump(records, &mut out, &columns, json, !skip_header)?;
            } else if invert {
                dump(records.not_filter(criteria), &mut out, &columns, json, !skip_header)?;
            } else {
                dump(records.filter(criteria), &mut out, &columns, json, !skip_header)?;
            }
        }

        CliCommand::Merge {
            file,
            columns,
            into,
            delimiter,
        } => {
            let mut table = Table::from_path(&file, options)?;
            table.combine_columns(columns, into, delimiter)?;
            table.records().write_to(&mut out, true)?;
        }

        CliCommand::Join {
            file,
            other,
            on,
            take,
            into,
        } => {
            let mut table = Table::from_path(&file, options)?;
            let that = Arc::new(Table::from_path(&other, options)?);

            let (this_key, that_key) = match on.split_once('=') {
                Some((a, b)) => (a, b),
                None => (on.as_str(), on.as_str()),
            };
            table.join_on(that, this_key, that_key, into, take)?;
            table.records().write_to(&mut out, true)?;
        }
    }

    Ok(())
}

fn dump<S: RecordStream>(
    stream: S,
    out: &mut impl Write,
    columns: &[String],
    json: bool,
    include_header: bool,
) -> Result<()> {
    //! Send a cursor's records to `out` in the requested shape.

    if json {
        for record in stream {
            let record = record?;
            let all: IndexMap<String, String> = if columns.is_empty() {
                record.get_all()
            } else {
                columns
                    .iter()
                    .map(|column| (column.clone(), record.get(column)))
                    .collect()
            };
            write_json(out, &all)?;
        }
        Ok(())
    } else if columns.is_empty() {
        stream.write_to(out, include_header)
    } else {
        stream.write_selected(out, columns, &[], include_header)
    }
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)
        .map_err(|e| TabularError::io("failed to encode json output", io::Error::other(e)))?;
    writeln!(out).map_err(stdout_failure)
}

fn parse_criteria(filters: &[String]) -> Result<HashMap<String, Vec<String>>> {
    //! Turn repeated `column=value|value` flags into a criteria map.

    let mut criteria = HashMap::new();
    for filter in filters {
        let Some((column, values)) = filter.split_once('=') else {
            return Err(TabularError::argument(format!(
                "filter '{}' is not of the form column=value",
                filter
            )));
        };
        criteria.insert(
            column.to_string(),
            values.split('|').map(|v| v.to_string()).collect(),
        );
    }
    Ok(criteria)
}

fn stdout_failure(e: io::Error) -> TabularError {
    TabularError::io("failed to write to stdout", e)
}
