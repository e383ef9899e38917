use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A server-owned named grouping of documents.
///
/// Field names match the JSON returned by the `/collections/` API. The
/// timestamps are kept as the server sent them; use [`Collection::created`]
/// and [`Collection::updated`] to parse them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub description: String,
    /// CSS color value used for the card swatch.
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
    pub document_count: u64,
    /// Absent for collections that never had a chat session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_session_count: Option<u64>,
}

impl Collection {
    pub fn created(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.updated_at)
    }
}

/// Partial collection fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CollectionDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.color.is_none()
    }
}

/// Parse an ISO-8601 timestamp into local wall-clock time.
///
/// Offset-carrying values are converted to the local zone. Values without
/// an offset (the API's usual `2025-10-28T10:29:28.038862`) are already
/// local and are returned as-is.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_deserialize_without_chat_sessions() {
        let json = r##"{
            "id": "c1",
            "name": "Research",
            "description": "Papers",
            "color": "#3b82f6",
            "created_at": "2025-10-28T10:29:28.038862",
            "updated_at": "2025-10-29T08:00:00",
            "document_count": 4
        }"##;
        let c: Collection = serde_json::from_str(json).unwrap();
        assert_eq!(c.document_count, 4);
        assert_eq!(c.chat_session_count, None);

        let back = serde_json::to_value(&c).unwrap();
        assert!(back.get("chat_session_count").is_none());
    }

    #[test]
    fn test_zero_chat_sessions_is_kept() {
        let json = r##"{
            "id": "c1", "name": "n", "description": "d", "color": "red",
            "created_at": "2025-01-01T00:00:00", "updated_at": "2025-01-01T00:00:00",
            "document_count": 0, "chat_session_count": 0
        }"##;
        let c: Collection = serde_json::from_str(json).unwrap();
        assert_eq!(c.chat_session_count, Some(0));
    }

    #[test]
    fn test_negative_document_count_rejected() {
        let json = r##"{
            "id": "c1", "name": "n", "description": "d", "color": "red",
            "created_at": "x", "updated_at": "x", "document_count": -1
        }"##;
        assert!(serde_json::from_str::<Collection>(json).is_err());
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let dt = parse_timestamp("2025-10-28T10:29:28.038862").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 10, 28));
        assert_eq!((dt.hour(), dt.minute()), (10, 29));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_draft_skips_missing_fields() {
        let draft = CollectionDraft::new("Notes").color("#fff");
        let v = serde_json::to_value(&draft).unwrap();
        assert_eq!(v, serde_json::json!({ "name": "Notes", "color": "#fff" }));
        assert!(CollectionDraft::default().is_empty());
    }
}
