use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::cursor::CurrentDate;

/// One submission as reported by the review API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HomeworkRecord {
    /// Submission name (`homework_name`)
    #[serde(rename = "homework_name", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Raw review status key
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

impl HomeworkRecord {
    /// Create a record with both fields present.
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self { name: Some(name.into()), status: Some(status.into()) }
    }
}

/// Body of a review API poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusesResponse {
    /// Submissions changed since the cursor, most recent first
    #[serde(default, deserialize_with = "lenient_homeworks")]
    pub homeworks: Vec<HomeworkRecord>,
    /// Server time to use as the next cursor
    #[serde(default)]
    pub current_date: CurrentDate,
}

impl StatusesResponse {
    /// The most recent submission, if any.
    pub fn latest(&self) -> Option<&HomeworkRecord> {
        self.homeworks.first()
    }
}

/// `null` maps to `None`; other non-string scalars keep their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_homeworks<'de, D>(deserializer: D) -> Result<Vec<HomeworkRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => HomeworkRecord::default(),
        })
        .collect())
}
