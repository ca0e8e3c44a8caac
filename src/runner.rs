//! Document orchestration.
//!
//! Walks a request document's groups and cases in order, drives each case
//! through init → dispatch → output → release, and assembles the mirrored
//! response. Processing is strictly sequential; the first unrecoverable
//! error aborts the remaining document, and the record in flight is released
//! on every exit path.

use std::collections::HashSet;

use tracing::{debug, error};

use crate::error::{EngineError, Result};
use crate::handlers::GroupParams;
use crate::model::{RawCase, RawGroup, VectorSet};
use crate::registry::{Capability, CapabilityRegistry, CryptoCallback};
use crate::response::{CaseResponse, GroupResponse, ResponseDocument};

/// One processing context: a set of registered capabilities and the entry
/// point that runs request documents against them.
#[derive(Default)]
pub struct Session {
    registry: CapabilityRegistry,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the crypto callback for a cipher name.
    pub fn register(&mut self, name: &str, callback: CryptoCallback) -> Result<()> {
        self.registry.register(name, callback)
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Process one request document and return the freshly built response.
    ///
    /// The response is owned by the caller; nothing survives in the session
    /// between runs. Any validation, decode, or callback failure aborts the
    /// remaining document and no partial response is returned.
    pub fn process(&self, document: &str) -> Result<ResponseDocument> {
        if self.registry.is_empty() {
            error!("process called without any registered capability");
            return Err(EngineError::NoContext);
        }

        let set = VectorSet::parse(document)?;
        let name = set.lookup_name();
        let cap = self.registry.lookup(&name).ok_or_else(|| {
            error!(capability = %name, "server requested an unsupported capability");
            EngineError::UnsupportedOperation(name.clone())
        })?;

        let mut response = ResponseDocument::new(set.vs_id, &set.algorithm);
        let mut seen_groups = HashSet::new();

        for group in set.groups() {
            let fragment = self.process_group(cap, group, &mut seen_groups)?;
            response.push_group(fragment);
        }

        if let Ok(pretty) = response.to_json_pretty() {
            debug!("response document:\n{}", pretty);
        }
        Ok(response)
    }

    fn process_group(
        &self,
        cap: &Capability,
        group: &RawGroup,
        seen: &mut HashSet<u64>,
    ) -> Result<GroupResponse> {
        if group.tg_id == 0 {
            error!("missing tgId in group object");
            return Err(EngineError::MalformedDocument("tgId"));
        }
        if !seen.insert(group.tg_id) {
            error!(tg_id = group.tg_id, "duplicate tgId in vector set");
            return Err(EngineError::InvalidArgument {
                field: "tgId",
                value: group.tg_id.to_string(),
            });
        }

        // Group metadata is validated exactly once, before any case runs.
        let params = cap.lifecycle.validate_group(group)?;
        debug!(tg_id = group.tg_id, "test group");

        let mut fragment = GroupResponse::new(group.tg_id);
        let mut seen_cases = HashSet::new();

        for case in &group.tests {
            if case.tc_id == 0 {
                error!("missing tcId in test object");
                return Err(EngineError::MalformedDocument("tcId"));
            }
            if !seen_cases.insert(case.tc_id) {
                error!(tc_id = case.tc_id, "duplicate tcId in test group");
                return Err(EngineError::InvalidArgument {
                    field: "tcId",
                    value: case.tc_id.to_string(),
                });
            }
            debug!(tc_id = case.tc_id, "test case");

            let rsp = self.process_case(cap, &params, case)?;
            fragment.tests.push(rsp);
        }
        Ok(fragment)
    }

    /// init → dispatch → output for one case. The record is released on
    /// every exit path: explicitly below, with `Drop` backstopping the init
    /// failure leg where the record never leaves the lifecycle.
    fn process_case(
        &self,
        cap: &Capability,
        params: &GroupParams,
        case: &RawCase,
    ) -> Result<CaseResponse> {
        let mut record = cap.lifecycle.init(params, case)?;

        record.mark_dispatched();
        if let Err(reason) = (cap.callback)(&mut record) {
            error!(tc_id = case.tc_id, "crypto module failed the operation");
            record.release();
            return Err(EngineError::CryptoModuleFailure(reason));
        }

        let rsp = match cap.lifecycle.output(&record) {
            Ok(rsp) => rsp,
            Err(e) => {
                record.release();
                return Err(e);
            }
        };
        record.mark_emitted();
        record.release();
        Ok(rsp)
    }
}
