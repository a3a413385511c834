//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin (create, update)
//! - Output: one JSON object per invocation on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON request body from stdin
pub fn read_request<T: DeserializeOwned>() -> CliResult<T> {
    read_request_from(io::stdin().lock())
}

/// Read a JSON request body from any reader
pub fn read_request_from<T: DeserializeOwned, R: Read>(mut reader: R) -> CliResult<T> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_to(&mut io::stdout(), &success_body(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_to(&mut io::stdout(), &error_body(code, message))
}

fn success_body(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

fn error_body(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_to<W: Write>(out: &mut W, body: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, body)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookPatch;

    #[test]
    fn test_read_request_multiline() {
        let input = "{\n  \"title\": \"New\"\n}\n";
        let patch: BookPatch = read_request_from(input.as_bytes()).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
    }

    #[test]
    fn test_read_request_empty() {
        let result: CliResult<Value> = read_request_from("  \n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_read_request_rejects_unknown_patch_field() {
        let result: CliResult<BookPatch> = read_request_from(r#"{"isbn": "x"}"#.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_response_shapes() {
        let mut out = Vec::new();
        write_to(&mut out, &success_body(serde_json::json!({"total": 0}))).unwrap();
        write_to(&mut out, &error_body("BOOK_NOT_FOUND", "missing")).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["data"]["total"], 0);
        assert_eq!(lines[1]["status"], "error");
        assert_eq!(lines[1]["code"], "BOOK_NOT_FOUND");
    }
}
