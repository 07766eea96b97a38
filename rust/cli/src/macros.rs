//! Macros for common CLI error handling patterns.

/// Write a line and return the error exit code if writing fails.
///
/// ```ignore
/// write_or_exit!(err, "Error: {}", message);
/// ```
#[macro_export]
macro_rules! write_or_exit {
    ($dest:expr, $($arg:tt)*) => {
        if writeln!($dest, $($arg)*).is_err() {
            return $crate::exit_code::ERROR;
        }
    };
}

/// Parse a JSON line or record a skipped line and continue.
///
/// ```ignore
/// let record: RoundRecord = parse_json_or_continue!(line, skipped, line_no);
/// ```
#[macro_export]
macro_rules! parse_json_or_continue {
    ($line:expr, $skipped:expr, $context:expr) => {
        match serde_json::from_str($line) {
            Ok(r) => r,
            Err(e) => {
                $skipped.push($crate::BatchValidationError {
                    item_context: $context,
                    message: e.to_string(),
                });
                continue;
            }
        }
    };
}
