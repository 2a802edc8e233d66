//! Fill columns of one table's records from the matching records of
//! another table.
//!
//! Matching is a full lazy scan of the other table per incoming record,
//! so a join costs O(rows of `that`) per record read. There is no index
//! or hash optimization here on purpose.

use std::sync::Arc;

use super::Mutator;
use crate::tabular::error::Result;
use crate::tabular::record::Record;
use crate::tabular::table::Table;

/// How a record of `this` table is matched against a record of `that`.
#[derive(Clone)]
pub enum JoinMatcher {
    /// Equality of two key columns, one per side.
    Key {
        this_column: String,
        that_column: String,
    },

    /// An arbitrary two-record predicate, for anything key equality
    /// cannot express.
    Comparator(Arc<dyn Fn(&Record, &Record) -> bool>),
}

impl JoinMatcher {
    pub fn key(this_column: impl Into<String>, that_column: impl Into<String>) -> JoinMatcher {
        JoinMatcher::Key {
            this_column: this_column.into(),
            that_column: that_column.into(),
        }
    }

    pub fn comparator(f: impl Fn(&Record, &Record) -> bool + 'static) -> JoinMatcher {
        JoinMatcher::Comparator(Arc::new(f))
    }

    fn matches(&self, this: &Record, that: &Record) -> bool {
        match self {
            JoinMatcher::Key {
                this_column,
                that_column,
            } => this.get(this_column) == that.get(that_column),
            JoinMatcher::Comparator(f) => f(this, that),
        }
    }
}

pub struct Join {
    that: Arc<Table>,
    matcher: JoinMatcher,
    these_columns: Vec<String>,
    those_columns: Vec<String>,
}

impl Join {
    pub(crate) fn new(
        that: Arc<Table>,
        matcher: JoinMatcher,
        these_columns: Vec<String>,
        those_columns: Vec<String>,
    ) -> Join {
        Join {
            that,
            matcher,
            these_columns,
            those_columns,
        }
    }
}

impl Mutator for Join {
    fn mutate_record(&self, mut record: Record) -> Result<Record> {
        // when no target columns were named, the source names are appended
        // as new columns instead
        let targets = if self.these_columns.is_empty() {
            // the header gains these names even when nothing matches, so
            // the record's keys must gain them too
            for column in &self.those_columns {
                record.set_with(column, "", false);
            }
            &self.those_columns
        } else {
            &self.these_columns
        };

        for that_record in self.that.records() {
            let that_record = that_record?;
            if self.matcher.matches(&record, &that_record) {
                for (target, source) in targets.iter().zip(self.those_columns.iter()) {
                    record.set(target, &that_record.get(source));
                }
            }
        }

        Ok(record)
    }

    fn mutate_header(&self, mut columns: Vec<String>) -> Vec<String> {
        if self.these_columns.is_empty() {
            columns.extend(self.those_columns.iter().cloned());
        }
        columns
    }
}
