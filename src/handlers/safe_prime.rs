//! Safe-prime-group family lifecycle (keyGen / keyVer).
//!
//! Group metadata names one of the closed MODP/FFDHE groups and a test type.
//! Key generation produces `x`/`y`; key verification consumes them and emits
//! a bare pass/fail verdict.

use tracing::debug;

use super::{CaseLifecycle, GroupParams};
use crate::error::{EngineError, Result};
use crate::model::{RawCase, RawGroup};
use crate::params::SAFE_PRIME_BYTE_MAX;
use crate::response::CaseResponse;
use crate::testcase::{
    CaseBuffer, CaseData, CaseRecord, SafePrimeCase, SafePrimeGroup, SafePrimeMode, TestType,
};

pub struct SafePrimeLifecycle {
    mode: SafePrimeMode,
}

impl SafePrimeLifecycle {
    pub fn new(mode: SafePrimeMode) -> Self {
        Self { mode }
    }
}

impl CaseLifecycle for SafePrimeLifecycle {
    fn validate_group(&self, group: &RawGroup) -> Result<GroupParams> {
        let group_str = group.str_field("safePrimeGroup")?;
        let prime_group =
            SafePrimeGroup::from_name(group_str).ok_or_else(|| EngineError::InvalidArgument {
                field: "safePrimeGroup",
                value: group_str.to_owned(),
            })?;

        let type_str = group.str_field("testType")?;
        let test_type =
            TestType::from_name(type_str).ok_or_else(|| EngineError::InvalidArgument {
                field: "testType",
                value: type_str.to_owned(),
            })?;

        // Validation-only cases exist for key verification; a key-generation
        // group must be AFT.
        if self.mode == SafePrimeMode::KeyGen && test_type != TestType::Aft {
            return Err(EngineError::InvalidArgument {
                field: "testType",
                value: type_str.to_owned(),
            });
        }

        debug!(safe_prime_group = %group_str, test_type = %type_str, "safe-prime group");
        Ok(GroupParams::SafePrime {
            group: prime_group,
            test_type,
        })
    }

    fn init(&self, params: &GroupParams, case: &RawCase) -> Result<CaseRecord> {
        let (group, test_type) = match params {
            GroupParams::SafePrime { group, test_type } => (*group, *test_type),
            _ => {
                return Err(EngineError::InvalidArgument {
                    field: "testGroup",
                    value: "not a safe-prime group".to_owned(),
                })
            }
        };

        let mut x = CaseBuffer::alloc(SAFE_PRIME_BYTE_MAX, "safe-prime x")?;
        let mut y = CaseBuffer::alloc(SAFE_PRIME_BYTE_MAX, "safe-prime y")?;

        match self.mode {
            SafePrimeMode::KeyGen => {
                // Fresh generation: the callback produces x and y, but a
                // server may still seed either value.
                if let Some(hex) = case.opt_str_field("x") {
                    x.load_hex(hex, "x")?;
                }
                if let Some(hex) = case.opt_str_field("y") {
                    y.load_hex(hex, "y")?;
                }
            }
            SafePrimeMode::KeyVer => {
                x.load_hex(case.str_field("x")?, "x")?;
                y.load_hex(case.str_field("y")?, "y")?;
            }
        }

        let mut record = CaseRecord::create(CaseData::SafePrime(SafePrimeCase {
            tc_id: case.tc_id,
            mode: self.mode,
            test_type,
            group,
            x,
            y,
            passed: false,
        }));
        record.mark_initialized();
        Ok(record)
    }

    fn output(&self, record: &CaseRecord) -> Result<CaseResponse> {
        let case = match record.data() {
            CaseData::SafePrime(case) => case,
            _ => {
                return Err(EngineError::InvalidArgument {
                    field: "testCase",
                    value: "not a safe-prime record".to_owned(),
                })
            }
        };

        let mut rsp = CaseResponse::new(case.tc_id);
        match case.mode {
            // Verification emits only the verdict; x/y stay out entirely.
            SafePrimeMode::KeyVer => rsp.set_bool("testPassed", case.passed),
            SafePrimeMode::KeyGen => {
                rsp.set_str("x", case.x.to_hex());
                rsp.set_str("y", case.y.to_hex());
            }
        }
        Ok(rsp)
    }
}
