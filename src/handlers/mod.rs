//! Per-family test-case lifecycles.
//!
//! Each algorithm family implements the same contract the orchestrator
//! drives: validate group metadata once, initialize a record per case,
//! encode the record's outputs after the crypto callback ran. Dispatch and
//! release are generic and live with the orchestrator and the record.

pub mod hmac;
pub mod safe_prime;

use crate::error::Result;
use crate::model::{RawCase, RawGroup};
use crate::response::CaseResponse;
use crate::testcase::{CaseRecord, SafePrimeGroup, TestType};

/// Validated group-level metadata, produced exactly once per group before
/// any of its cases run.
#[derive(Debug, Clone)]
pub enum GroupParams {
    /// Hash/MAC groups carry at most an opaque test-type tag.
    Hmac { test_type: Option<String> },
    SafePrime {
        group: SafePrimeGroup,
        test_type: TestType,
    },
}

pub trait CaseLifecycle {
    /// Parse and check all group-level metadata. An unrecognized enumerated
    /// value invalidates the whole group; no case in it reaches the crypto
    /// callback.
    fn validate_group(&self, group: &RawGroup) -> Result<GroupParams>;

    /// Allocate every buffer at its protocol capacity and decode the case's
    /// hex inputs. Never invokes the crypto callback; failures propagate
    /// immediately.
    fn init(&self, params: &GroupParams, case: &RawCase) -> Result<CaseRecord>;

    /// Encode the record's outputs into a per-case response fragment.
    fn output(&self, record: &CaseRecord) -> Result<CaseResponse>;
}
