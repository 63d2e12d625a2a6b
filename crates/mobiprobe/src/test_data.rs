//! JSON-backed test data and capability files.
//!
//! The test data document is keyed by test-case id:
//!
//! ```json
//! {
//!   "test_sanity_102": {
//!     "run_mode": "Y",
//!     "test_data": { "phone_number": "9876543210" }
//!   }
//! }
//! ```
//!
//! Load failures and missing keys are logged and reported as `None`; the
//! reader never returns an error to its caller. Writes through
//! [`DataReader::set_value`] stay in memory and are never saved to disk.

use crate::config::ProjectLayout;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key that addresses a case's run mode rather than its test data
pub const RUN_MODE_KEY: &str = "run_mode";

/// Capability set sent verbatim on session creation
pub type CapabilityMap = Map<String, Value>;

/// One test case's entry in the data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    /// Run mode flag, conventionally "Y" or "N"
    #[serde(default)]
    pub run_mode: Option<Value>,
    /// Free-form test inputs
    #[serde(default)]
    pub test_data: Map<String, Value>,
}

/// Read a JSON file, logging and swallowing any failure.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read json file");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to parse json file");
            None
        }
    }
}

/// Loads and serves test data and capability sets.
///
/// The document is kept as raw JSON. A malformed entry only fails the
/// lookups that touch it.
#[derive(Debug, Clone)]
pub struct DataReader {
    test_data_path: PathBuf,
    caps_dir: PathBuf,
    records: Option<Map<String, Value>>,
}

impl DataReader {
    /// Load the test data file of a project layout.
    #[must_use]
    pub fn new(layout: &ProjectLayout) -> Self {
        Self::from_paths(&layout.test_data, &layout.caps_dir)
    }

    /// Load from explicit paths.
    #[must_use]
    pub fn from_paths(test_data: &Path, caps_dir: &Path) -> Self {
        Self {
            test_data_path: test_data.to_path_buf(),
            caps_dir: caps_dir.to_path_buf(),
            records: load_json(test_data),
        }
    }

    /// Whether the test data file loaded
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.records.is_some()
    }

    /// Path the test data was read from
    #[must_use]
    pub fn test_data_path(&self) -> &Path {
        &self.test_data_path
    }

    /// Ids of every case in the data file.
    ///
    /// Top-level entries that are not objects are not cases.
    #[must_use]
    pub fn case_ids(&self) -> Vec<&str> {
        self.records
            .iter()
            .flat_map(|r| r.iter())
            .filter(|(_, entry)| entry.is_object())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Whether the data file has an entry for `case_id`
    #[must_use]
    pub fn has_case(&self, case_id: &str) -> bool {
        self.case_entry(case_id).is_some()
    }

    /// Full entry of a test case, or `None` when it is missing or malformed
    #[must_use]
    pub fn record(&self, case_id: &str) -> Option<TestCaseRecord> {
        let entry = self.case_entry(case_id)?;
        match TestCaseRecord::deserialize(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(case_id, error = %e, "malformed test case entry");
                None
            }
        }
    }

    fn case_entry(&self, case_id: &str) -> Option<&Value> {
        self.records
            .as_ref()
            .and_then(|r| r.get(case_id))
            .filter(|entry| entry.is_object())
    }

    /// Value of `key` for a test case.
    ///
    /// `run_mode` reads the case's run mode; any other key reads its
    /// `test_data` mapping.
    #[must_use]
    pub fn get_value(&self, case_id: &str, key: &str) -> Option<Value> {
        let Some(entry) = self.case_entry(case_id) else {
            tracing::error!(case_id, key, "no test data for case");
            return None;
        };
        let value = if key == RUN_MODE_KEY {
            entry.get(RUN_MODE_KEY).cloned()
        } else {
            entry
                .get("test_data")
                .and_then(Value::as_object)
                .and_then(|data| data.get(key))
                .cloned()
        };
        if value.is_none() {
            tracing::error!(case_id, key, "test data key not found");
        }
        value
    }

    /// Like [`get_value`](Self::get_value), rendered as a string.
    ///
    /// Numbers and booleans are stringified; `null`, arrays and objects
    /// yield `None`.
    #[must_use]
    pub fn get_string(&self, case_id: &str, key: &str) -> Option<String> {
        match self.get_value(case_id, key)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Run mode of a case
    #[must_use]
    pub fn run_mode(&self, case_id: &str) -> Option<String> {
        self.get_string(case_id, RUN_MODE_KEY)
    }

    /// Set `key` in a case's test data, in memory only.
    ///
    /// A case without a `test_data` object gets a fresh one. Unknown cases
    /// are logged and ignored.
    pub fn set_value(&mut self, case_id: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .records
            .as_mut()
            .and_then(|r| r.get_mut(case_id))
            .and_then(Value::as_object_mut);
        let Some(entry) = entry else {
            tracing::error!(case_id, key, "cannot set data for unknown case");
            return;
        };
        let data = entry
            .entry("test_data")
            .or_insert_with(|| Value::Object(Map::new()));
        if !data.is_object() {
            *data = Value::Object(Map::new());
        }
        if let Some(data) = data.as_object_mut() {
            let _ = data.insert(key.to_string(), value.into());
        }
    }

    /// Capability set for a platform, read fresh from disk.
    #[must_use]
    pub fn get_capabilities(&self, platform: Platform) -> Option<CapabilityMap> {
        load_json(&self.caps_dir.join(platform.capability_file()))
    }
}
