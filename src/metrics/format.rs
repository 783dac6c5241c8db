//! Cell formatting
//!
//! Converts raw API values into the strings shown in table cells, and
//! table cells back into chart numbers.

use serde_json::Value;
use std::num::ParseFloatError;

use super::catalog::{STICKINESS_KEY, TIME_TO_VALUE_KEY};

/// Cell shown for a missing value
pub const MISSING_CELL: &str = "-";

/// Format one week's value of a metric for the table
///
/// - missing or null: `""` for time to value, `"-"` otherwise
/// - numeric (booleans count as 1 and 0): two decimals, `%` appended for stickiness
/// - anything else: its string form
pub fn format_cell(key: &str, value: Option<&Value>) -> String {
    let number = match value {
        None | Some(Value::Null) => {
            return if key == TIME_TO_VALUE_KEY {
                String::new()
            } else {
                MISSING_CELL.to_string()
            };
        }
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => v,
            None => return n.to_string(),
        },
        Some(Value::String(s)) => return s.clone(),
        Some(other) => return other.to_string(),
    };

    if key == STICKINESS_KEY {
        format!("{:.2}%", number)
    } else {
        format!("{:.2}", number)
    }
}

/// Parse a table cell as a chart value, ignoring a trailing `%`
pub fn parse_cell(cell: &str) -> Result<f64, ParseFloatError> {
    let cell = cell.trim();
    cell.strip_suffix('%').unwrap_or(cell).trim().parse::<f64>()
}
