//! Storage layer: the injected key-value store and its typed boundary.
//!
//! The core never touches a concrete backend. Every engine takes a
//! [`CompletionStore`] (string keys, JSON values) and goes through
//! [`load_or_default`] / [`save`], which is where the shape of stored data
//! is validated.
//!
//! # Key layout
//!
//! ```text
//! users                               [User]
//! courses                             [Course]      (global catalog list)
//! courses_{educatorEmail}             [Course]
//! enrollments_{userEmail}             [courseId]
//! progress_{userEmail}_{courseId}     { itemKey: CompletionRecord }
//! quiz_attempts_{userEmail}_{quizId}  [QuizAttempt]
//! certificates_{userEmail}            [Certificate]
//! ```
//!
//! # Modules
//!
//! - [`keys`]: builders for the keys above.
//! - [`list`]: arrays decoded entry by entry.
//! - [`memory`]: in-memory store.
//! - [`file`]: one JSON file per key under a directory.

pub mod file;
pub mod keys;
pub mod list;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{LmsError, Result};

pub use file::FileStore;
pub use list::StoredList;
pub use memory::MemoryStore;

/// Key-value persistence with JSON values.
///
/// Mirrors browser local storage: `get` returns `None` for a missing key,
/// `set` replaces whatever was stored.
pub trait CompletionStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

impl<S: CompletionStore + ?Sized> CompletionStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<S: CompletionStore + ?Sized> CompletionStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Decode the value under `key`, reporting malformed data as an error.
///
/// A missing key or a stored `null` decodes to `Ok(None)`.
pub fn decode<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: CompletionStore + ?Sized,
{
    let value = store
        .get(key)
        .map_err(|e| LmsError::MalformedStoredData {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| LmsError::MalformedStoredData {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Decode the value under `key`, substituting `T::default()` when it is
/// missing or malformed.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: CompletionStore + ?Sized,
{
    match decode(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("{e}; using empty default");
            T::default()
        }
    }
}

/// Decode the value under `key` ahead of a read-modify-write.
///
/// A missing key yields `T::default()`. Malformed data is an error, so the
/// caller never overwrites a value it could not read.
pub fn load_for_update<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: CompletionStore + ?Sized,
{
    Ok(decode(store, key)?.unwrap_or_default())
}

/// Serialize `value` and write it under `key`.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: CompletionStore + ?Sized,
{
    let json =
        serde_json::to_value(value).map_err(|e| LmsError::SerializationError(e.to_string()))?;
    log::debug!("store write: {key}");
    store.set(key, json)
}
