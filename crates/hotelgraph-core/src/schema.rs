//! Structured response schemas - prompt formatting and strict parsing.
//!
//! Each LLM-backed node declares a [`ResponseSchema`]: an ordered list of
//! named, typed, described fields. The same declaration is consumed twice:
//!
//! 1. [`ResponseSchema::format_instructions`] renders the "respond with a
//!    JSON object ..." block appended to the node's user prompt;
//! 2. [`ResponseSchema::parse`] validates the raw model text against the
//!    declared shape before deserializing it into the node's output type.
//!
//! Parsing never panics and never aborts a run. A failure is an ordinary
//! [`ParseError`] value, which the owning node maps to its own fallback
//! policy (substitute defaults, or pass state through unchanged).

use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SCHEMA DECLARATION
// ============================================================================

/// The JSON shape expected for one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON array of strings.
    StringList,
    /// JSON array of `{headline, body}` objects with non-empty text.
    AdCopyList,
    /// JSON number.
    Number,
    /// JSON string.
    Text,
}

impl FieldKind {
    /// Human-readable shape name used in instructions and errors.
    #[must_use]
    pub fn expected(self) -> &'static str {
        match self {
            FieldKind::StringList => "array of strings",
            FieldKind::AdCopyList => "array of {headline, body} objects",
            FieldKind::Number => "number",
            FieldKind::Text => "string",
        }
    }

    fn render(self) -> &'static str {
        match self {
            FieldKind::StringList => "[string, ...]",
            FieldKind::AdCopyList => r#"[{"headline": string, "body": string}, ...]"#,
            FieldKind::Number => "number",
            FieldKind::Text => "string",
        }
    }
}

/// One declared field: name, expected shape, and prompt description.
#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

impl SchemaField {
    #[must_use]
    pub fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
        }
    }
}

/// A named, declarative response schema for one node.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    name: &'static str,
    fields: Vec<SchemaField>,
}

impl ResponseSchema {
    #[must_use]
    pub fn new(name: &'static str, fields: Vec<SchemaField>) -> Self {
        Self { name, fields }
    }

    /// Schema name, used in log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Render the format block appended to the node's user prompt.
    #[must_use]
    pub fn format_instructions(&self) -> String {
        let mut out = String::from(
            "Respond with a single JSON object and no other prose. \
             The object must have exactly these fields:\n{\n",
        );
        for (i, field) in self.fields.iter().enumerate() {
            let comma = if i + 1 < self.fields.len() { "," } else { "" };
            out.push_str(&format!(
                "  \"{}\": {}{}  // {}\n",
                field.name,
                field.kind.render(),
                comma,
                field.description
            ));
        }
        out.push_str("}\nA ```json code fence around the object is acceptable.");
        out
    }

    /// Strictly parse raw model text into the node's typed output.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no JSON object is present, the object
    /// is malformed, or a declared field is missing or has the wrong shape.
    pub fn parse<T: DeserializeOwned>(&self, raw: &str) -> Result<T, ParseError> {
        let json = extract_json(raw).ok_or(ParseError::NoJson)?;
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ParseError::Malformed(e.to_string()))?;

        self.validate(&value)?;

        serde_json::from_value(value).map_err(|e| ParseError::Decode(e.to_string()))
    }

    /// Check every declared field for presence and shape.
    fn validate(&self, value: &serde_json::Value) -> Result<(), ParseError> {
        for field in &self.fields {
            let Some(found) = value.get(field.name) else {
                return Err(ParseError::ShapeMismatch {
                    field: field.name.to_string(),
                    expected: field.kind.expected(),
                });
            };

            let ok = match field.kind {
                FieldKind::StringList => found
                    .as_array()
                    .is_some_and(|items| items.iter().all(serde_json::Value::is_string)),
                FieldKind::AdCopyList => found.as_array().is_some_and(|items| {
                    items.iter().all(|item| {
                        let headline = item.get("headline").and_then(|v| v.as_str());
                        let body = item.get("body").and_then(|v| v.as_str());
                        matches!((headline, body), (Some(h), Some(b)) if !h.is_empty() && !b.is_empty())
                    })
                }),
                FieldKind::Number => found.is_number(),
                FieldKind::Text => found.is_string(),
            };

            if !ok {
                return Err(ParseError::ShapeMismatch {
                    field: field.name.to_string(),
                    expected: field.kind.expected(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Why a model response failed schema validation.
///
/// This is the recoverable error class: nodes log it and apply their
/// fallback policy; it never reaches the workflow caller.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No JSON object anywhere in the response text.
    #[error("no JSON object found in response")]
    NoJson,

    /// A JSON object was found but would not parse.
    #[error("malformed JSON: {0}")]
    Malformed(String),

    /// The object parsed but a declared field is missing or mis-shaped.
    #[error("field '{field}' missing or not a {expected}")]
    ShapeMismatch {
        field: String,
        expected: &'static str,
    },

    /// The validated object failed typed deserialization.
    #[error("could not decode validated object: {0}")]
    Decode(String),
}

/// Locate the JSON object inside raw model text, tolerating code fences
/// and surrounding prose: the slice from the first `{` to the last `}`.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ResearchShape {
        keywords: Vec<String>,
        #[serde(rename = "audienceLocations")]
        audiences: Vec<String>,
    }

    fn research_schema() -> ResponseSchema {
        ResponseSchema::new(
            "research",
            vec![
                SchemaField::new("keywords", FieldKind::StringList, "targeted keywords"),
                SchemaField::new("audienceLocations", FieldKind::StringList, "locations"),
            ],
        )
    }

    #[test]
    fn parses_plain_json() {
        let raw = r#"{"keywords": ["a", "b"], "audienceLocations": ["Boston"]}"#;
        let parsed: ResearchShape = research_schema().parse(raw).unwrap();
        assert_eq!(parsed.keywords, vec!["a", "b"]);
        assert_eq!(parsed.audiences, vec!["Boston"]);
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let raw = "Sure! Here you go:\n```json\n{\"keywords\": [\"a\"], \"audienceLocations\": []}\n```\nHope that helps.";
        let parsed: ResearchShape = research_schema().parse(raw).unwrap();
        assert_eq!(parsed.keywords, vec!["a"]);
        assert!(parsed.audiences.is_empty());
    }

    #[test]
    fn missing_field_is_shape_mismatch() {
        let raw = r#"{"keywords": ["a"]}"#;
        let err = research_schema().parse::<ResearchShape>(raw).unwrap_err();
        assert!(matches!(err, ParseError::ShapeMismatch { ref field, .. } if field == "audienceLocations"));
    }

    #[test]
    fn wrong_element_type_is_shape_mismatch() {
        let raw = r#"{"keywords": [1, 2], "audienceLocations": []}"#;
        let err = research_schema().parse::<ResearchShape>(raw).unwrap_err();
        assert!(matches!(err, ParseError::ShapeMismatch { ref field, .. } if field == "keywords"));
    }

    #[test]
    fn prose_without_json_is_no_json() {
        let err = research_schema()
            .parse::<ResearchShape>("I recommend focusing on luxury travelers.")
            .unwrap_err();
        assert!(matches!(err, ParseError::NoJson));
    }

    #[test]
    fn truncated_json_is_malformed() {
        let raw = r#"{"keywords": ["a"], "audienceLocations": ["Bos}"#;
        let err = research_schema().parse::<ResearchShape>(raw).unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn ad_copy_list_rejects_empty_text() {
        #[derive(Debug, Deserialize)]
        struct CopyShape {
            #[serde(rename = "adCopies")]
            #[allow(dead_code)]
            ad_copies: Vec<serde_json::Value>,
        }

        let schema = ResponseSchema::new(
            "copywriter",
            vec![SchemaField::new(
                "adCopies",
                FieldKind::AdCopyList,
                "ad variations",
            )],
        );

        let good = r#"{"adCopies": [{"headline": "Stay in Style", "body": "Book now."}]}"#;
        assert!(schema.parse::<CopyShape>(good).is_ok());

        let empty_body = r#"{"adCopies": [{"headline": "Stay in Style", "body": ""}]}"#;
        let err = schema.parse::<CopyShape>(empty_body).unwrap_err();
        assert!(matches!(err, ParseError::ShapeMismatch { ref field, .. } if field == "adCopies"));
    }

    #[test]
    fn format_instructions_name_every_field() {
        let text = research_schema().format_instructions();
        assert!(text.contains("\"keywords\""));
        assert!(text.contains("\"audienceLocations\""));
        assert!(text.contains("targeted keywords"));
        assert!(text.contains("single JSON object"));
    }
}
