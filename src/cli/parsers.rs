//! The place where the CLI arguments are defined.
//!
//! The binary is a thin wrapper over the library: every subcommand maps
//! onto one or two calls into [`crate::tabular`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Inspect and reshape delimited text tables", long_about = None)]
pub struct CliParser {
    #[command(subcommand)]
    pub command: CliCommand,

    // Treat input files as headerless; columns are numbered positionally.
    #[arg(long, global = true)]
    pub no_header: bool,

    // Keep only a byte-offset index in memory instead of loading all rows.
    #[arg(long, global = true)]
    pub no_preload: bool,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Print the table's visible columns, one per line.
    Columns {
        file: PathBuf,

        /// Print as a JSON array instead.
        #[arg(long)]
        json: bool,
    },

    /// Print records, optionally filtered or narrowed to some columns.
    Dump {
        file: PathBuf,

        /// Keep rows matching `column=value|value` (repeatable).
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Invert the filter: keep only the rows it would drop.
        #[arg(long)]
        invert: bool,

        /// Restrict output to these columns.
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Emit one JSON object per record instead of delimited lines.
        #[arg(long)]
        json: bool,

        /// Leave out the header line.
        #[arg(long)]
        skip_header: bool,
    },

    /// Merge columns into one and print the reshaped table.
    Merge {
        file: PathBuf,

        /// Columns to merge, in order.
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Name of the resulting column.
        #[arg(long)]
        into: String,

        /// Delimiter placed between merged values.
        #[arg(long, default_value = " ")]
        delimiter: String,
    },

    /// Join a second file's columns onto the first and print the result.
    Join {
        file: PathBuf,
        other: PathBuf,

        /// Key columns as `this_key=that_key`, or one name for both.
        #[arg(long)]
        on: String,

        /// Columns to take from the other file.
        #[arg(long, value_delimiter = ',', required = true)]
        take: Vec<String>,

        /// Columns of this file to fill; omitted, the taken columns are
        /// appended as new ones.
        #[arg(long, value_delimiter = ',')]
        into: Vec<String>,
    },
}
