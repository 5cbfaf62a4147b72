use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File entry from a storage directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(rename = "_id")]
    pub id: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pick the file with the latest `updated_at`.
///
/// Ties go to the entry listed first. Returns `None` for an empty listing.
pub fn most_recent(files: &[StoredFile]) -> Option<&StoredFile> {
    files.iter().reduce(|latest, file| {
        if file.updated_at > latest.updated_at {
            file
        } else {
            latest
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file(id: &str, updated_at: &str) -> StoredFile {
        serde_json::from_value(json!({
            "_id": id,
            "updated_at": updated_at,
            "name": format!("{}.json", id),
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_listing() {
        assert!(most_recent(&[]).is_none());
    }

    #[test]
    fn test_picks_latest() {
        let files = vec![
            file("a", "2024-06-01T10:00:00Z"),
            file("b", "2024-06-03T08:30:00.000Z"),
            file("c", "2024-06-02T23:59:59Z"),
        ];
        assert_eq!(most_recent(&files).unwrap().id, "b");
    }

    #[test]
    fn test_tie_keeps_first() {
        let files = vec![
            file("a", "2024-06-01T10:00:00Z"),
            file("b", "2024-06-01T10:00:00Z"),
        ];
        assert_eq!(most_recent(&files).unwrap().id, "a");
    }

    #[test]
    fn test_offsets_compare_chronologically() {
        // 12:00+02:00 is 10:00Z, earlier than 11:00Z
        let files = vec![
            file("offset", "2024-06-01T12:00:00+02:00"),
            file("utc", "2024-06-01T11:00:00Z"),
        ];
        assert_eq!(most_recent(&files).unwrap().id, "utc");
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let stored: StoredFile = serde_json::from_value(json!({
            "_id": "x",
            "updated_at": "2024-06-01T10:00:00Z",
            "file_size_byte_native": 42,
        }))
        .unwrap();
        assert_eq!(stored.name, None);
        assert_eq!(stored.extra.get("file_size_byte_native"), Some(&json!(42)));
    }
}
