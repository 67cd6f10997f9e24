//! Splitting of `VALUES (...)` literal lists.
//!
//! This is not a SQL tokenizer. Fields are separated by commas; a field that
//! starts with a single quote runs until the next quote that is not directly
//! preceded by a backslash. Quotes around string fields are dropped, escape
//! sequences are kept as-is, and unquoted fields (numbers, `NULL`, `0x..`)
//! are returned verbatim. The separator search for an unquoted field starts
//! one byte past its first character, so a field never ends where it starts:
//! `1,,2` splits into `1` and `,2`.

use crate::error::ValueListError;

const QUOTE: u8 = b'\'';
const BACKSLASH: u8 = b'\\';
const SEPARATOR: u8 = b',';

/// Split the interior of a single-row `VALUES (...)` list into raw literals.
///
/// Only a single character of look-back decides whether a quote is escaped,
/// so a string literal ending in a backslash (`'C:\\'`) is not terminated
/// where MySQL would terminate it.
///
/// # Example
///
/// ```rust
/// use mysqldump_source::parse_values;
///
/// let values = parse_values(r"'a,b',123,'c\'d','e'").unwrap();
/// assert_eq!(values, vec!["a,b", "123", r"c\'d", "e"]);
/// ```
pub fn parse_values(input: &str) -> Result<Vec<String>, ValueListError> {
    let bytes = input.as_bytes();
    let mut values = Vec::with_capacity(8);

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != QUOTE {
            let end = bytes[i + 1..]
                .iter()
                .position(|&b| b == SEPARATOR)
                .map_or(bytes.len(), |offset| i + 1 + offset);
            values.push(input[i..end].to_string());
            // skip ,
            i = end + 1;
        } else {
            let end = closing_quote(bytes, i)?;
            values.push(input[i + 1..end].to_string());
            // skip ' and ,
            i = end + 2;
            if i < bytes.len() && !input.is_char_boundary(i) {
                return Err(ValueListError::InvalidSeparator { position: end + 1 });
            }
        }
    }

    Ok(values)
}

/// Index of the quote closing the field opened at `open`.
fn closing_quote(bytes: &[u8], open: usize) -> Result<usize, ValueListError> {
    let mut last = bytes[open];
    for (j, &b) in bytes.iter().enumerate().skip(open + 1) {
        if b == QUOTE && last != BACKSLASH {
            return Ok(j);
        }
        last = b;
    }
    Err(ValueListError::UnterminatedQuote { position: open })
}
