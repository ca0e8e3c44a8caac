//! Response-document assembly.
//!
//! The response mirrors the request's shape but carries only identifiers and
//! output fields. A document is owned by the `process` call that produced
//! it; every run starts from an empty one, so no state leaks across runs.

use serde::Serialize;
use serde_json::{Map, Value};

/// Per-case response fragment: the case id plus whatever output fields the
/// family's lifecycle emitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResponse {
    pub tc_id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CaseResponse {
    pub fn new(tc_id: u64) -> Self {
        Self {
            tc_id,
            fields: Map::new(),
        }
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_owned(), Value::String(value.into()));
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.fields.insert(name.to_owned(), Value::Bool(value));
    }
}

/// Group mirror: the group id and the fragments of its completed cases.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub tg_id: u64,
    pub tests: Vec<CaseResponse>,
}

impl GroupResponse {
    pub fn new(tg_id: u64) -> Self {
        Self {
            tg_id,
            tests: Vec::new(),
        }
    }
}

/// The mirrored output document for one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDocument {
    pub vs_id: u64,
    pub algorithm: String,
    pub test_results: Vec<GroupResponse>,
}

impl ResponseDocument {
    pub fn new(vs_id: u64, algorithm: &str) -> Self {
        Self {
            vs_id,
            algorithm: algorithm.to_owned(),
            test_results: Vec::new(),
        }
    }

    /// Append a completed group mirror, preserving document order.
    pub fn push_group(&mut self, group: GroupResponse) {
        self.test_results.push(group);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
