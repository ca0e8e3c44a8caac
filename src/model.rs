//! Request-document data model.
//!
//! The wire shape is hierarchical: a vector set owns test groups, a group
//! owns test cases. Family-specific fields stay in an open map until the
//! responsible lifecycle validates them; the model itself only pins down the
//! identifiers and the top-level envelope. Read-only after parse.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Top-level request: one document of test groups for a single algorithm.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSet {
    #[serde(default)]
    pub vs_id: u64,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    test_groups: Option<Vec<RawGroup>>,
}

impl VectorSet {
    /// Parse a request document and check the top-level required fields.
    pub fn parse(document: &str) -> Result<Self> {
        let set: VectorSet = serde_json::from_str(document).map_err(|e| {
            tracing::error!("unable to parse request document: {}", e);
            EngineError::MalformedDocument("request")
        })?;
        if set.algorithm.is_empty() {
            return Err(EngineError::MalformedDocument("algorithm"));
        }
        if set.test_groups.is_none() {
            return Err(EngineError::MalformedDocument("testGroups"));
        }
        Ok(set)
    }

    /// Groups in document order. Order is significant and preserved in the
    /// response.
    pub fn groups(&self) -> &[RawGroup] {
        self.test_groups.as_deref().unwrap_or(&[])
    }

    /// Capability lookup name: `"<algorithm>/<mode>"` when the document
    /// carries a mode, the bare algorithm name otherwise.
    pub fn lookup_name(&self) -> String {
        match self.mode.as_deref() {
            Some(mode) if !mode.is_empty() => format!("{}/{}", self.algorithm, mode),
            _ => self.algorithm.clone(),
        }
    }
}

/// One test group as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    #[serde(default)]
    pub tg_id: u64,
    #[serde(default)]
    pub tests: Vec<RawCase>,
    /// Family-specific group metadata (testType, safePrimeGroup, ...).
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl RawGroup {
    /// Group-level string field, required.
    pub fn str_field(&self, name: &'static str) -> Result<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .ok_or(EngineError::MissingArgument(name))
    }

    pub fn opt_str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One test case as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCase {
    #[serde(default)]
    pub tc_id: u64,
    /// Family-specific hex/int input fields.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl RawCase {
    /// Case-level string field, required.
    pub fn str_field(&self, name: &'static str) -> Result<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .ok_or(EngineError::MissingArgument(name))
    }

    pub fn opt_str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn opt_u64_field(&self, name: &str) -> Option<u64> {
        self.fields.get(name).and_then(Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_envelope_and_open_fields() {
        let set = VectorSet::parse(
            r#"{
                "vsId": 9,
                "algorithm": "HMAC-SHA2-256",
                "testGroups": [
                    { "tgId": 1, "testType": "AFT",
                      "tests": [{ "tcId": 1, "len": 16, "msg": "abcd" }] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(set.vs_id, 9);
        assert_eq!(set.lookup_name(), "HMAC-SHA2-256");
        let group = &set.groups()[0];
        assert_eq!(group.tg_id, 1);
        assert_eq!(group.opt_str_field("testType"), Some("AFT"));
        let case = &group.tests[0];
        assert_eq!(case.tc_id, 1);
        assert_eq!(case.opt_u64_field("len"), Some(16));
        assert_eq!(case.str_field("msg").unwrap(), "abcd");
    }

    #[test]
    fn missing_algorithm_is_malformed() {
        let err = VectorSet::parse(r#"{ "testGroups": [] }"#).unwrap_err();
        assert!(matches!(err, EngineError::MalformedDocument("algorithm")));
    }

    #[test]
    fn missing_test_groups_is_malformed() {
        let err = VectorSet::parse(r#"{ "algorithm": "HMAC-SHA2-256" }"#).unwrap_err();
        assert!(matches!(err, EngineError::MalformedDocument("testGroups")));
    }

    #[test]
    fn unparsable_json_is_malformed() {
        let err = VectorSet::parse("not json").unwrap_err();
        assert!(matches!(err, EngineError::MalformedDocument("request")));
    }

    #[test]
    fn mode_joins_the_lookup_name() {
        let set = VectorSet::parse(
            r#"{ "algorithm": "safePrimes", "mode": "keyGen", "testGroups": [] }"#,
        )
        .unwrap();
        assert_eq!(set.lookup_name(), "safePrimes/keyGen");
    }

    #[test]
    fn missing_case_field_is_missing_argument() {
        let set = VectorSet::parse(
            r#"{ "algorithm": "x", "testGroups": [{ "tgId": 1, "tests": [{ "tcId": 2 }] }] }"#,
        )
        .unwrap();
        let err = set.groups()[0].tests[0].str_field("msg").unwrap_err();
        assert!(matches!(err, EngineError::MissingArgument("msg")));
    }
}
