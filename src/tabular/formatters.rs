//! Per-column value post-processors.
//!
//! A [`Formatter`] is registered on the table against a column name and runs
//! every time that column's value is read or stored. Formatters are a closed
//! set of variants dispatched through [`Formatter::format`], with a catch-all
//! [`Formatter::Custom`] closure for anything else a caller needs.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Clone)]
pub enum Formatter {
    /// Keep only letters, digits and underscore.
    Alphanumeric,

    /// Keep only digits and the decimal point.
    Numeric,

    /// Re-render a date/datetime value with a chrono format string.
    ///
    /// Input that cannot be parsed as a date is returned unchanged rather
    /// than failing the read. Timezone specifiers in the output format are
    /// not supported for naive inputs.
    Date { format: String },

    /// Caller-supplied closure.
    Custom(Arc<dyn Fn(&str) -> String>),
}

impl Formatter {
    pub fn date(format: impl Into<String>) -> Formatter {
        Formatter::Date {
            format: format.into(),
        }
    }

    pub fn custom(f: impl Fn(&str) -> String + 'static) -> Formatter {
        Formatter::Custom(Arc::new(f))
    }

    pub fn format(&self, value: &str) -> String {
        //! Apply this formatter to a single value.

        match self {
            Formatter::Alphanumeric => value
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect(),
            Formatter::Numeric => value
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect(),
            Formatter::Date { format } => reformat_date(value, format),
            Formatter::Custom(f) => f(value),
        }
    }
}

/// Datetime shapes tried in order before giving up on a value.
const DATETIME_SHAPES: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only shapes, promoted to midnight before re-rendering.
const DATE_SHAPES: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y"];

fn reformat_date(value: &str, format: &str) -> String {
    //! Parse `value` against the known shapes and re-render it with
    //! `format`. Unparseable input falls back to the original value.

    let trimmed = value.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return datetime.naive_local().format(format).to_string();
    }

    for shape in DATETIME_SHAPES {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, shape) {
            return datetime.format(format).to_string();
        }
    }

    for shape in DATE_SHAPES {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, shape) {
            return date.and_time(NaiveTime::MIN).format(format).to_string();
        }
    }

    value.to_string()
}
