//! Lazy structural transforms over records and the header.
//!
//! A mutator is registered once on a table and applied every time a record
//! is fetched, in registration order. Each mutator transforms two things
//! that must stay consistent with each other:
//!
//! - the record's data mapping, through [`Mutator::mutate_record`]
//! - the declared column list, through [`Mutator::mutate_header`]
//!
//! If a mutator adds or removes a column name in one, it must do the same
//! in the other.

use super::error::Result;
use super::record::Record;

mod add_column;
mod delete_column;
mod join;
mod merge_columns;

pub use add_column::AddColumn;
pub use delete_column::DeleteColumn;
pub use join::{Join, JoinMatcher};
pub use merge_columns::MergeColumns;

/// A trait that must be implemented by a struct to be registered and run
/// as part of a table's mutation pipeline.
pub trait Mutator {
    /// Apply the mutation to `record` and return it. Each mutator in a
    /// pipeline receives the previous mutator's output.
    fn mutate_record(&self, record: Record) -> Result<Record>;

    /// If this mutator modifies column structure, return the re-worked
    /// header to reflect the same structure as `mutate_record` performs.
    /// Otherwise there is no need to override this method.
    fn mutate_header(&self, columns: Vec<String>) -> Vec<String> {
        columns
    }
}
