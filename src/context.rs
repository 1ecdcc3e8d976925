use itertools::Itertools;
use serde_json::Value;
use tracing::warn;

/// Key looked up on every record.
pub const CONTEXT_KEY: &str = "context";

/// Loose truthiness: null, false, zero, and empty strings/arrays/objects are falsy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// The record's `context` member, if the record is an object and the member is truthy.
pub fn context_of(record: &Value) -> Option<&Value> {
    match record {
        Value::Object(map) => map.get(CONTEXT_KEY).filter(|v| is_truthy(v)),
        _ => None,
    }
}

// `Value` has no `Hash`; its compact rendering works as a key once numbers
// are normalised (object keys are already kept sorted).
fn dedup_key(v: &Value) -> String {
    canonical(v).to_string()
}

// Whole floats inside the i64 range collapse to integers so `1.0` equals `1`.
fn canonical(v: &Value) -> Value {
    match v {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Value::from(f as i64)
            }
            _ => v.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, item)| (k.clone(), canonical(item)))
                .collect(),
        ),
        _ => v.clone(),
    }
}

/// Deduplicate values, keeping first-seen order.
pub fn unique_contexts<I>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().unique_by(dedup_key).collect()
}

/// A line that failed to parse as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based.
    pub line: usize,
    pub error: String,
}

/// Result of scanning one file's lines.
#[derive(Debug, Default)]
pub struct Scan {
    /// Unique truthy contexts in first-seen order.
    pub contexts: Vec<Value>,
    pub malformed: Vec<MalformedLine>,
}

// One line's context, if any. Parse failures are logged and recorded.
fn line_context(
    file_name: &str,
    line_number: usize,
    line: &str,
    malformed: &mut Vec<MalformedLine>,
) -> Option<Value> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(record) => context_of(&record).cloned(),
        Err(e) => {
            warn!("JSON decoding error in file {file_name} at line {line_number}: {e}");
            malformed.push(MalformedLine {
                line: line_number,
                error: e.to_string(),
            });
            None
        }
    }
}

/// Scan JSON lines, collecting unique truthy contexts.
///
/// Blank lines are skipped. Lines that fail to parse are logged against
/// `file_name` and recorded in [`Scan::malformed`]; scanning carries on.
/// The first `Err` from `lines` aborts the scan and is returned as is.
pub fn scan_lines<I, E>(file_name: &str, lines: I) -> Result<Scan, E>
where
    I: IntoIterator<Item = Result<String, E>>,
{
    let mut malformed = Vec::new();
    let contexts = itertools::process_results(lines, |lines| {
        let found = lines
            .enumerate()
            .filter_map(|(idx, line)| line_context(file_name, idx + 1, &line, &mut malformed));
        unique_contexts(found)
    })?;
    Ok(Scan { contexts, malformed })
}
