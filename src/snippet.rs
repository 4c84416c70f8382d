// Ingestion types
//
// Raw snippet payloads arrive in several shapes (start vs start_time,
// duration vs dur, numbers encoded as strings). Everything is normalized
// into `Snippet` at the boundary; downstream components only ever see the
// normalized type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One timed unit of transcript text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    #[serde(alias = "start_time", skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(alias = "dur", skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Any snippet fields not otherwise modeled.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snippet {
    pub fn new(text: impl Into<String>, start: f64) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            duration: None,
            end: None,
            extra: Map::new(),
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Lenient construction from an arbitrary JSON object. Missing or
    /// malformed fields become `None`; non-objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let start = coerce_f64(obj.get("start")).or_else(|| coerce_f64(obj.get("start_time")));
        let duration = coerce_f64(obj.get("duration")).or_else(|| coerce_f64(obj.get("dur")));
        let end = coerce_f64(obj.get("end"));

        let extra: Map<String, Value> = obj
            .iter()
            .filter(|(key, _)| {
                !matches!(key.as_str(), "text" | "start" | "start_time" | "duration" | "dur" | "end")
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            text,
            start,
            duration,
            end,
            extra,
        })
    }
}

/// Normalize a raw snippet list, dropping entries that are not objects.
pub fn parse_snippets(values: &[Value]) -> Vec<Snippet> {
    values.iter().filter_map(Snippet::from_value).collect()
}

/// Accepts JSON numbers and numeric strings.
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Upload dates arrive as YYYYMMDD strings, ISO dates, or epoch numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadDate {
    Epoch(f64),
    Text(String),
}

impl UploadDate {
    /// Raw form for display contexts that do not need a parsed date.
    pub fn as_display_string(&self) -> String {
        match self {
            UploadDate::Epoch(n) => format!("{}", n),
            UploadDate::Text(s) => s.clone(),
        }
    }
}

/// Video metadata from the downloader collaborator. Every field may be
/// absent; the core degrades to defaults rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "duration_s")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub upload_date: Option<UploadDate>,
    #[serde(default, alias = "channel")]
    pub uploader: Option<String>,
    #[serde(default, alias = "language_code")]
    pub language: Option<String>,
    #[serde(default)]
    pub is_generated: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_canonical_shape() {
        let value = json!({"text": "hello", "start": 1.5, "duration": 2.0});
        let snippet = Snippet::from_value(&value).unwrap();
        assert_eq!(snippet.text, "hello");
        assert_eq!(snippet.start, Some(1.5));
        assert_eq!(snippet.duration, Some(2.0));
        assert!(snippet.extra.is_empty());
    }

    #[test]
    fn test_from_value_alternate_keys_and_strings() {
        let value = json!({"text": "hi", "start_time": "3.25", "dur": "1", "speaker": "A"});
        let snippet = Snippet::from_value(&value).unwrap();
        assert_eq!(snippet.start, Some(3.25));
        assert_eq!(snippet.duration, Some(1.0));
        assert_eq!(snippet.extra.get("speaker"), Some(&json!("A")));
    }

    #[test]
    fn test_from_value_missing_fields() {
        let value = json!({"start": "not a number"});
        let snippet = Snippet::from_value(&value).unwrap();
        assert!(snippet.text.is_empty());
        assert_eq!(snippet.start, None);
    }

    #[test]
    fn test_parse_snippets_skips_non_objects() {
        let values = vec![json!({"text": "a", "start": 0.0}), json!("just a string"), json!(42)];
        let snippets = parse_snippets(&values);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "a");
    }

    #[test]
    fn test_video_info_degrades_gracefully() {
        let info: VideoInfo = serde_json::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(info.title.as_deref(), Some("T"));
        assert!(info.id.is_none());
        assert!(info.upload_date.is_none());
    }

    #[test]
    fn test_upload_date_variants() {
        let epoch: UploadDate = serde_json::from_value(json!(1706572800)).unwrap();
        assert_eq!(epoch, UploadDate::Epoch(1706572800.0));
        let text: UploadDate = serde_json::from_value(json!("20250130")).unwrap();
        assert_eq!(text, UploadDate::Text("20250130".into()));
    }
}
