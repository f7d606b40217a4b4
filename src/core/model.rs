//! Unified Result Model
//!
//! Every command maps its output to this model before rendering.

use serde::{Deserialize, Serialize};

use crate::tally::rank::WordCount;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    File,
    Match,
    Word,
    Summary,
    Error,
}

/// Which command produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Scan,
    Search,
    Tally,
}

/// Line-based range (1-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    /// Create a new line range
    pub fn lines(start: u32, end: u32) -> Self {
        Range { start, end }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,

    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// XXH3 content hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whitespace-separated word count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<usize>,

    /// Character count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chars: Option<usize>,

    /// Whether the content was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Line range within the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,

    /// Excerpt of the content (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (ranked word, run summary)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// How this result was obtained
    pub source_mode: SourceMode,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn blank(kind: Kind, source_mode: SourceMode) -> Self {
        Self {
            kind,
            path: None,
            range: None,
            excerpt: None,
            data: None,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new file result
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::blank(Kind::File, SourceMode::Scan)
        }
    }

    /// Create a new keyword match result
    pub fn match_result(path: impl Into<String>, range: Range, excerpt: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            range: Some(range),
            excerpt: Some(excerpt.into()),
            ..Self::blank(Kind::Match, SourceMode::Search)
        }
    }

    /// Create a ranked word result (`rank` is 1-based)
    pub fn word(path: impl Into<String>, rank: usize, entry: &WordCount) -> Self {
        Self {
            path: Some(path.into()),
            excerpt: Some(format!("{}: {}", entry.word, entry.count)),
            data: Some(serde_json::json!({
                "rank": rank,
                "word": entry.word,
                "count": entry.count,
            })),
            ..Self::blank(Kind::Word, SourceMode::Tally)
        }
    }

    /// Create a summary result carrying a human-readable excerpt
    pub fn summary(path: impl Into<String>, excerpt: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            excerpt: Some(excerpt.into()),
            ..Self::blank(Kind::Summary, SourceMode::Tally)
        }
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        Self {
            errors: vec![error],
            ..Self::blank(Kind::Error, SourceMode::Tally)
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path and range start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| {
                let sa = a.range.map(|r| r.start);
                let sb = b.range.map(|r| r.start);
                match (sa, sb) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_item_serializes_kind_and_path() {
        let item = ResultItem::file("notes/a.txt");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "file");
        assert_eq!(json["path"], "notes/a.txt");
        assert_eq!(json["source_mode"], "scan");
        assert!(json.get("range").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_word_item_payload() {
        let item = ResultItem::word("story.txt", 1, &WordCount::new("cat", 2));
        assert_eq!(item.kind, Kind::Word);
        assert_eq!(item.excerpt.as_deref(), Some("cat: 2"));

        let data = item.data.unwrap();
        assert_eq!(data["rank"], 1);
        assert_eq!(data["word"], "cat");
        assert_eq!(data["count"], 2);
    }

    #[test]
    fn test_error_item() {
        let item = ResultItem::error(ItemError::new("PARTIAL_COMPLETION", "timed out"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "PARTIAL_COMPLETION");
    }

    #[test]
    fn test_meta_skips_empty_fields() {
        let meta = Meta {
            size: Some(10),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["size"], 10);
        assert!(json.get("hash").is_none());
        assert_eq!(json["truncated"], false);
    }

    #[test]
    fn test_sort_by_path_then_line() {
        let mut set: ResultSet = vec![
            ResultItem::match_result("b.txt", Range::lines(1, 1), "x"),
            ResultItem::match_result("a.txt", Range::lines(9, 9), "y"),
            ResultItem::match_result("a.txt", Range::lines(2, 2), "z"),
            ResultItem::error(ItemError::new("E", "no path")),
        ]
        .into_iter()
        .collect();
        set.sort();

        let keys: Vec<_> = set
            .items
            .iter()
            .map(|i| (i.path.clone(), i.range.map(|r| r.start)))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Some("a.txt".to_string()), Some(2)),
                (Some("a.txt".to_string()), Some(9)),
                (Some("b.txt".to_string()), Some(1)),
                (None, None),
            ]
        );
        assert_eq!(set.len(), 4);
        assert!(!set.is_empty());
    }
}
