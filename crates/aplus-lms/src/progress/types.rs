//! Data structures for course progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Completion record
// ---------------------------------------------------------------------------

/// Persisted fact that a learner finished a lesson or a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Seconds spent on the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
    /// Quiz score as a percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl CompletionRecord {
    /// A completed record stamped with `completed_at`.
    pub fn completed(completed_at: impl Into<String>) -> Self {
        Self {
            completed: true,
            completed_at: Some(completed_at.into()),
            time_spent: None,
            score: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Progress data
// ---------------------------------------------------------------------------

/// One learner's completion records for one course, keyed by item key
/// (`{moduleId}_{lessonId}` or `quiz_{quizId}`).
///
/// Deserialization is lenient per entry: a value that is not a completion
/// record (a legacy `overallProgress` number, say) is set aside with a
/// warning instead of failing the whole map, and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressData {
    records: BTreeMap<String, CompletionRecord>,
    other: BTreeMap<String, Value>,
}

impl ProgressData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CompletionRecord> {
        self.records.get(key)
    }

    /// Whether the item under `key` is marked completed.
    pub fn is_completed(&self, key: &str) -> bool {
        self.records.get(key).is_some_and(|r| r.completed)
    }

    /// Insert or replace the record under `key`.
    pub fn insert(&mut self, key: impl Into<String>, record: CompletionRecord) {
        let key = key.into();
        self.other.remove(&key);
        self.records.insert(key, record);
    }

    /// Stored value under `key` that is not a completion record.
    pub fn other(&self, key: &str) -> Option<&Value> {
        self.other.get(key)
    }

    /// Number of completion records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompletionRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, CompletionRecord)> for ProgressData {
    fn from_iter<I: IntoIterator<Item = (String, CompletionRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
            other: BTreeMap::new(),
        }
    }
}

impl Serialize for ProgressData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.records.len() + self.other.len()))?;
        for (key, value) in &self.other {
            map.serialize_entry(key, value)?;
        }
        for (key, record) in &self.records {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProgressData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mut data = Self::default();
        for (key, value) in raw {
            match CompletionRecord::deserialize(&value) {
                Ok(record) => {
                    data.records.insert(key, record);
                }
                Err(e) => {
                    log::warn!("keeping non-record progress entry '{key}' as raw JSON: {e}");
                    data.other.insert(key, value);
                }
            }
        }
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// Course progress (aggregate)
// ---------------------------------------------------------------------------

/// Aggregated completion statistics for one learner on one course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub total_lessons: usize,
    pub total_quizzes: usize,
    pub lessons_completed: usize,
    pub quizzes_completed: usize,
    pub total_items: usize,
    pub completed_items: usize,
    /// Integer percentage in `[0, 100]`.
    pub completion_percentage: u8,
    /// Latest `completedAt` among completed items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
}

impl CourseProgress {
    pub fn is_complete(&self) -> bool {
        self.completion_percentage == 100
    }
}
