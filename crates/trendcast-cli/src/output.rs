//! Rendering of command results to stdout.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    data: &'a Value,
    warnings: &'a [String],
}

/// Write `result` to `out`. Table warnings go to stderr so stdout keeps
/// only the report.
pub fn render(
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", result.text)?;
            for warning in &result.warnings {
                eprintln!("warning: {warning}");
            }
        }
        OutputFormat::Json => {
            let payload = JsonOutput {
                data: &result.data,
                warnings: &result.warnings,
            };
            if pretty {
                serde_json::to_writer_pretty(&mut *out, &payload)?;
            } else {
                serde_json::to_writer(&mut *out, &payload)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result() -> CommandResult {
        CommandResult::ok(json!({"ticker": "AAPL"}), "AAPL report".to_string())
            .with_warning("summary unavailable")
    }

    #[test]
    fn json_output_wraps_data_and_warnings() {
        let mut buffer = Vec::new();
        render(&result(), OutputFormat::Json, false, &mut buffer).expect("render");

        let parsed: Value = serde_json::from_slice(&buffer).expect("json");
        assert_eq!(parsed["data"]["ticker"], "AAPL");
        assert_eq!(parsed["warnings"][0], "summary unavailable");
    }

    #[test]
    fn table_output_prints_text_only() {
        let mut buffer = Vec::new();
        render(&result(), OutputFormat::Table, false, &mut buffer).expect("render");
        assert_eq!(String::from_utf8(buffer).expect("utf-8"), "AAPL report\n");
    }
}
