//! Stored JSON arrays decoded entry by entry.
//!
//! An entry that does not decode is kept as raw JSON and written back
//! unchanged, so a single bad element never erases its neighbours.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Entry<T> {
    Decoded(T),
    Raw(Value),
}

/// A stored list whose undecodable entries are carried through writes.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for StoredList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> StoredList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, undecodable ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries kept only as raw JSON.
    pub fn undecoded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Raw(_)))
            .count()
    }

    /// Decoded entries, in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Decoded(value) => Some(value),
            Entry::Raw(_) => None,
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().filter_map(|e| match e {
            Entry::Decoded(value) => Some(value),
            Entry::Raw(_) => None,
        })
    }

    /// First decoded entry matching `predicate`.
    pub fn find_mut(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Decoded(value) if predicate(value) => Some(value),
            _ => None,
        })
    }

    pub fn push(&mut self, value: T) {
        self.entries.push(Entry::Decoded(value));
    }

    /// Decoded entries, dropping the raw ones.
    pub fn into_decoded(self) -> Vec<T> {
        self.entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::Decoded(value) => Some(value),
                Entry::Raw(_) => None,
            })
            .collect()
    }
}

impl<T> FromIterator<T> for StoredList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Entry::Decoded).collect(),
        }
    }
}

impl<T: Serialize> Serialize for StoredList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            match entry {
                Entry::Decoded(value) => seq.serialize_element(value)?,
                Entry::Raw(value) => seq.serialize_element(value)?,
            }
        }
        seq.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for StoredList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| match T::deserialize(&value) {
                Ok(decoded) => Entry::Decoded(decoded),
                Err(e) => {
                    log::warn!("keeping undecodable list entry {index} as raw JSON: {e}");
                    Entry::Raw(value)
                }
            })
            .collect();
        Ok(Self { entries })
    }
}
