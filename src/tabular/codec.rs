//! Encoding and decoding of one delimited line.
//!
//! This is the leaf of the whole engine: two pure functions and no state.
//! Fields are separated by a comma, optionally wrapped in double quotes,
//! and an embedded quote is escaped by doubling it (`""`).

pub(crate) const DELIMITER: char = ',';
pub(crate) const QUOTE: char = '"';

pub fn parse_line(line: &str) -> Vec<String> {
    //! Decode one line into its fields.
    //!
    //! A trailing line break is ignored. Quoting is optional per field;
    //! inside a quoted field a doubled quote decodes to a literal quote
    //! and the delimiter loses its meaning.

    let line = line.trim_end_matches(['\r', '\n']);

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == QUOTE {
            in_quotes = true;
        } else if c == DELIMITER {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);

    fields
}

pub fn format_line<S: AsRef<str>>(fields: &[S]) -> String {
    //! Encode fields as one line, the exact inverse of [`parse_line`] for
    //! values without embedded line breaks.
    //!
    //! Every field is quoted, embedded quotes are doubled, and the line
    //! ends with a newline.

    let mut line = String::new();

    for (position, field) in fields.iter().enumerate() {
        if position > 0 {
            line.push(DELIMITER);
        }
        line.push(QUOTE);
        for c in field.as_ref().chars() {
            if c == QUOTE {
                line.push(QUOTE);
            }
            line.push(c);
        }
        line.push(QUOTE);
    }
    line.push('\n');

    line
}
