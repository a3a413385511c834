//! Streaming CSV record reader
//!
//! Handles quoted fields containing the delimiter, doubled-quote escapes,
//! and LF or CRLF record terminators. A terminator inside quotes is kept
//! verbatim as part of the field. Blank lines are skipped. An unterminated
//! quote at end of input closes the record rather than failing it.

use std::io::{self, BufRead};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// One parsed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// 1-based line on which the record starts
    pub line: usize,
    pub fields: Vec<String>,
}

/// Reads CSV records from a buffered source
pub struct CsvReader<R> {
    inner: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> CsvReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Reads the next non-blank record, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates read failures, including `InvalidData` for non-UTF-8 input.
    pub fn next_record(&mut self) -> io::Result<Option<CsvRecord>> {
        loop {
            match self.read_record()? {
                None => return Ok(None),
                Some((record, saw_quote)) => {
                    let blank = !saw_quote
                        && record.fields.len() == 1
                        && record.fields[0].trim().is_empty();
                    if !blank {
                        return Ok(Some(record));
                    }
                }
            }
        }
    }

    fn read_record(&mut self) -> io::Result<Option<(CsvRecord, bool)>> {
        let start_line = self.line + 1;
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut saw_quote = false;
        let mut started = false;

        loop {
            self.buf.clear();
            if self.inner.read_line(&mut self.buf)? == 0 {
                if !started {
                    return Ok(None);
                }
                break;
            }
            started = true;
            self.line += 1;

            let mut terminated = false;
            let mut chars = self.buf.chars().peekable();
            while let Some(c) = chars.next() {
                match c {
                    QUOTE if in_quotes => {
                        if chars.peek() == Some(&QUOTE) {
                            current.push(QUOTE);
                            chars.next();
                        } else {
                            in_quotes = false;
                        }
                    }
                    QUOTE => {
                        in_quotes = true;
                        saw_quote = true;
                    }
                    DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
                    '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
                    '\n' if !in_quotes => terminated = true,
                    c => current.push(c),
                }
            }

            if terminated || !in_quotes {
                break;
            }
        }

        fields.push(current);
        Ok(Some((
            CsvRecord {
                line: start_line,
                fields,
            },
            saw_quote,
        )))
    }
}

impl<R: BufRead> Iterator for CsvReader<R> {
    type Item = io::Result<CsvRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Quotes a field, doubling embedded quotes
pub fn quote_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    out
}
