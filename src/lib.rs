//! A tiny little delimited-table engine.
//!
//! A [`tabular::Table`] treats a delimited text file (or an in-memory row
//! set) as a sequence of named-column records. Column edits, merges, joins
//! and formatters are registered up front and applied lazily, per record,
//! at read time; with preloading turned off the file is never held in
//! memory at all, only a byte-offset index.

pub mod cli;
pub mod tabular;
