//! Lenient parsing of the "select first N rows" input.
//!
//! Invalid input never errors: anything that is not a non-negative integer is
//! treated as zero, which clears the bulk intent.

use serde_json::Value;

/// Parse typed text into a bulk count.
pub fn parse_bulk_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return count;
    }
    // Numeric inputs may submit "12.0"; keep the integer part of whole values.
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => value as u64,
        _ => 0,
    }
}

/// Parse a JSON-submitted bulk count (number, numeric string, or anything else).
pub fn bulk_count_from_json(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().map(|float| parse_bulk_count(&float.to_string())))
            .unwrap_or(0),
        Value::String(text) => parse_bulk_count(text),
        _ => 0,
    }
}
