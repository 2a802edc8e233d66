//! The tabular engine needs to have the following components
//! - Codec (one delimited line to fields and back, pure)
//! - Record (one row's ordered column to value mapping)
//! - Table (materialized rows or a byte-offset index over a file)
//! - Mutators (lazy column-structure and value transforms, applied per fetch)
//! - Records (lazy cursors, optionally filtered)
//!

//  All modules of this lib
pub mod codec;
mod error;
mod formatters;
pub mod mutators;
mod record;
mod records;
mod table;

//  External API
pub use error::{Result, TabularError};
pub use formatters::Formatter;
pub use mutators::{JoinMatcher, Mutator};
pub use record::Record;
pub use records::{FilteredRecords, RecordStream, Records};
pub use table::{Table, TableOptions};
