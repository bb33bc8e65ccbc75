//! Extracted values — stage 2 output, stage 3 input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Reserved key the orchestrator writes the evaluator's rationale under.
pub const RECOMMENDATION_KEY: &str = "ai_recommendation";
/// Message carried by the extraction-failed sentinel.
pub const EXTRACTION_FAILED: &str = "Failed to extract data";

const CURRENCY_MARKS: &[char] = &['$', '€', '£', '¥', '₹'];
const CURRENCY_CODES: &[&str] = &["USD", "EUR", "GBP", "INR", "JPY", "CAD", "AUD"];

/// A single extracted value. `Null` means the field was not found in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Number(Number),
    Text(String),
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items),
            Value::Object(map) => Self::Object(map),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(b),
            FieldValue::Number(n) => Value::Number(n),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::List(items) => Value::Array(items),
            FieldValue::Object(map) => Value::Object(map),
        }
    }
}

/// Result of guided extraction.
///
/// `Failed` is a real state, not an absence of data: it serializes as
/// `{"error": "Failed to extract data"}` and is handed to the evaluator as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValues {
    Values(BTreeMap<String, FieldValue>),
    Failed,
}

impl ExtractedValues {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        match self {
            Self::Values(values) => values
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                .collect(),
            Self::Failed => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(EXTRACTION_FAILED.into()));
                map
            }
        }
    }
}

impl Serialize for ExtractedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map().serialize(serializer)
    }
}

/// Turns a currency- or unit-decorated number into a bare JSON number.
///
/// `"$10,000"` → `10000`, `"16GB"` → `16`, `"USD 1,299.50"` → `1299.5`.
/// The number must lead the string once currency marks are removed; trailing
/// units are ignored.
pub fn normalize_number(raw: &str) -> Option<Number> {
    let mut rest = raw.trim();
    for code in CURRENCY_CODES {
        if let Some(stripped) = rest.strip_prefix(code) {
            rest = stripped;
            break;
        }
    }
    rest = rest.trim_start_matches(|c: char| CURRENCY_MARKS.contains(&c) || c.is_whitespace());

    let (negative, rest) = match rest.strip_prefix('-') {
        Some(r) => (true, r.trim_start_matches(|c: char| CURRENCY_MARKS.contains(&c))),
        None => (false, rest),
    };

    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());
    let run = rest[..end].trim_end_matches(['.', ',']);
    if !run.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let digits: String = run.chars().filter(|c| *c != ',').collect();
    if digits.matches('.').count() > 1 {
        return None;
    }

    let sign = if negative { -1.0 } else { 1.0 };
    if !digits.contains('.') {
        if let Ok(i) = digits.parse::<i64>() {
            return Some(Number::from(if negative { -i } else { i }));
        }
    }
    let f = digits.parse::<f64>().ok()? * sign;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}
