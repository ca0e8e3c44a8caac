//! Hash/MAC family lifecycle.
//!
//! Single mode: the case carries a message and its declared bit length, the
//! callback fills the digest, and the response fragment carries it as `md`.

use tracing::debug;

use super::{CaseLifecycle, GroupParams};
use crate::error::{EngineError, Result};
use crate::model::{RawCase, RawGroup};
use crate::params::{HMAC_MAC_BYTE_MAX, HMAC_MSG_BYTE_MAX};
use crate::registry::CipherId;
use crate::response::CaseResponse;
use crate::testcase::{CaseBuffer, CaseData, CaseRecord, HmacCase};

pub struct HmacLifecycle {
    cipher: CipherId,
}

impl HmacLifecycle {
    pub fn new(cipher: CipherId) -> Self {
        Self { cipher }
    }
}

impl CaseLifecycle for HmacLifecycle {
    fn validate_group(&self, group: &RawGroup) -> Result<GroupParams> {
        // No enumerated metadata for this family; testType is an opaque tag
        // when present.
        let test_type = group.opt_str_field("testType").map(str::to_owned);
        if let Some(tag) = &test_type {
            debug!(test_type = %tag, "hash/mac group");
        }
        Ok(GroupParams::Hmac { test_type })
    }

    fn init(&self, _params: &GroupParams, case: &RawCase) -> Result<CaseRecord> {
        let msg_bits = case.opt_u64_field("len").unwrap_or(0);
        let msg_hex = case.str_field("msg")?;

        let mut msg = CaseBuffer::alloc(HMAC_MSG_BYTE_MAX, "hmac msg")?;
        let mac = CaseBuffer::alloc(HMAC_MAC_BYTE_MAX, "hmac mac")?;
        msg.load_hex(msg_hex, "msg")?;

        let mut record = CaseRecord::create(CaseData::Hmac(HmacCase {
            tc_id: case.tc_id,
            cipher: self.cipher,
            msg_bits,
            msg,
            mac,
        }));
        record.mark_initialized();
        Ok(record)
    }

    fn output(&self, record: &CaseRecord) -> Result<CaseResponse> {
        let case = match record.data() {
            CaseData::Hmac(case) => case,
            _ => {
                return Err(EngineError::InvalidArgument {
                    field: "testCase",
                    value: "not a hash/mac record".to_owned(),
                })
            }
        };

        let mut rsp = CaseResponse::new(case.tc_id);
        rsp.set_str("md", case.mac.to_hex());
        Ok(rsp)
    }
}
