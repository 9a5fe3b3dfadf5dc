//! Interpretation of one model response for one retrieved chunk.
//!
//! A response either yields a candidate scheme or a [`SkipReason`]; nothing
//! here returns an error, so one malformed response never aborts a batch.

use serde::Serialize;
use serde_json::{Map, Value};

/// Fields read from a model response, before ids and sources are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedScheme {
    pub title: String,
    pub category: String,
    pub description: String,
    pub eligibility: String,
    pub documents: Vec<String>,
    pub apply_link: String,
    pub why_recommended: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    InvalidJson(String),
    NotAnObject,
    SchemaMismatch(String),
    Irrelevant,
    EmptyTitle,
    DuplicateTitle(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InvalidJson(e) => write!(f, "response is not valid JSON: {e}"),
            SkipReason::NotAnObject => write!(f, "response is not a JSON object"),
            SkipReason::SchemaMismatch(field) => write!(f, "field `{field}` has the wrong type"),
            SkipReason::Irrelevant => write!(f, "model marked the chunk irrelevant"),
            SkipReason::EmptyTitle => write!(f, "scheme title is empty"),
            SkipReason::DuplicateTitle(title) => write!(f, "duplicate title `{title}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    Accepted(ExtractedScheme),
    Skipped(SkipReason),
}

pub fn interpret(response: &str) -> ChunkOutcome {
    match parse_scheme(response) {
        Ok(scheme) => ChunkOutcome::Accepted(scheme),
        Err(reason) => ChunkOutcome::Skipped(reason),
    }
}

fn parse_scheme(response: &str) -> Result<ExtractedScheme, SkipReason> {
    let value: Value = serde_json::from_str(response)
        .map_err(|e| SkipReason::InvalidJson(e.to_string()))?;
    let obj = value.as_object().ok_or(SkipReason::NotAnObject)?;

    if obj.get("irrelevant").is_some_and(is_truthy) {
        return Err(SkipReason::Irrelevant);
    }

    let title = string_field(obj, "title")?.trim().to_string();
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }

    let why_recommended = match obj.get("whyRecommended") {
        None | Some(Value::Null) => None,
        Some(_) => Some(string_field(obj, "whyRecommended")?),
    };

    Ok(ExtractedScheme {
        title,
        category: string_field(obj, "category")?,
        description: string_field(obj, "description")?,
        eligibility: string_field(obj, "eligibility")?,
        documents: documents_field(obj)?,
        apply_link: string_field(obj, "applyLink")?,
        why_recommended,
    })
}

/// Missing or null strings read as empty; any other non-string is a mismatch.
fn string_field(obj: &Map<String, Value>, key: &str) -> Result<String, SkipReason> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SkipReason::SchemaMismatch(key.to_string())),
    }
}

fn documents_field(obj: &Map<String, Value>) -> Result<Vec<String>, SkipReason> {
    match obj.get("documents") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(SkipReason::SchemaMismatch("documents".to_string())),
            })
            .collect(),
        Some(_) => Err(SkipReason::SchemaMismatch("documents".to_string())),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Display score derived from retrieval distance: `round(1 - distance, 2)`.
pub fn confidence(distance: f64) -> f64 {
    let raw = 1.0 - distance;
    (raw * 100.0).round() / 100.0
}
