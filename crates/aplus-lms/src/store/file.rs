//! File-backed store: one JSON file per key.
//!
//! Each key is written to `{base_dir}/{encoded_key}.json`. Characters
//! outside `[A-Za-z0-9@._+-]` are percent-encoded so that any key maps to
//! a single file name and back.
//!
//! File format:
//! ```json
//! {
//!     "version": 1,
//!     "value": ...
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LmsError, Result};

use super::CompletionStore;

// ── File format constants ─────────────────────────────────────────────────────

const STORE_FILE_VERSION: u32 = 1;

// ── On-disk structure ─────────────────────────────────────────────────────────

/// Wrapper written to disk for each key.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Format version number.
    version: u32,
    /// The stored value.
    value: Value,
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// Filesystem-backed [`CompletionStore`].
///
/// The store is safe for single-process use; concurrent writes from
/// multiple processes are not coordinated.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new `FileStore` rooted at `base_dir`.
    ///
    /// The directory and any missing parents are created if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `LmsError::Io` if the directory cannot be created.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Root directory of this store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// List all stored keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns `LmsError::Io` if the directory cannot be read.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(stem) = name_str.strip_suffix(".json") {
                if let Some(key) = decode_key(stem) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", encode_key(key)))
    }
}

impl CompletionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path)?;
        let file: StoreFile =
            serde_json::from_slice(&bytes).map_err(|e| LmsError::MalformedStoredData {
                key: key.to_string(),
                reason: format!("failed to parse {}: {e}", path.display()),
            })?;

        if file.version != STORE_FILE_VERSION {
            return Err(LmsError::MalformedStoredData {
                key: key.to_string(),
                reason: format!("unsupported store file version {}", file.version),
            });
        }

        Ok(Some(file.value))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let file = StoreFile {
            version: STORE_FILE_VERSION,
            value,
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| LmsError::SerializationError(e.to_string()))?;

        std::fs::write(self.key_path(key), json.as_bytes())?;
        Ok(())
    }
}

// ── Key encoding ──────────────────────────────────────────────────────────────

fn is_plain(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'@' | b'.' | b'_' | b'+' | b'-')
}

fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for &b in key.as_bytes() {
        if is_plain(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
