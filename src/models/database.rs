//! Database file model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A `.db` file discovered in the databases folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseFile {
    /// File name, also the identifier used when selecting the database.
    pub name: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl DatabaseFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: 0,
            modified: None,
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn with_modified(mut self, modified: Option<DateTime<Utc>>) -> Self {
        self.modified = modified;
        self
    }

    /// Human readable file size, e.g. "12.29 kB".
    pub fn display_size(&self) -> String {
        humansize::format_size(self.size_bytes, humansize::DECIMAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let now = Utc::now();
        let file = DatabaseFile::new("shop.db")
            .with_size(4096)
            .with_modified(Some(now));
        assert_eq!(file.name, "shop.db");
        assert_eq!(file.size_bytes, 4096);
        assert_eq!(file.modified, Some(now));
    }

    #[test]
    fn test_display_size() {
        assert_eq!(DatabaseFile::new("a.db").display_size(), "0 B");
        assert_eq!(DatabaseFile::new("a.db").with_size(2000).display_size(), "2 kB");
    }

    #[test]
    fn test_serialize_skips_missing_modified() {
        let json = serde_json::to_string(&DatabaseFile::new("a.db").with_size(1)).unwrap();
        assert_eq!(json, r#"{"name":"a.db","size_bytes":1}"#);
    }
}
