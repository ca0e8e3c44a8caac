//! # acvp-core
//!
//! Test-vector processing core for an ACVP-style cryptographic validation
//! client. A request document of test groups and cases is walked in order;
//! each case becomes an in-memory record that an externally registered
//! crypto callback fills, and the outputs are mirrored back into a response
//! document with the same hierarchical shape.
//!
//! The crate implements the traversal, the per-case lifecycle
//! (init → dispatch → output → release), the bounded hex codec, and the
//! response assembly. The cryptography itself, transport, and capability
//! negotiation are the caller's collaborators.
//!
//! ```
//! use acvp_core::{CaseRecord, Session};
//!
//! let mut session = Session::new();
//! session.register(
//!     "HMAC-SHA2-256",
//!     Box::new(|record: &mut CaseRecord| {
//!         let case = record.hmac_mut().ok_or_else(|| "not a mac record".to_string())?;
//!         case.mac.fill(&[0xde, 0xad, 0xbe, 0xef]).map_err(|e| e.to_string())
//!     }),
//! )?;
//!
//! let request = r#"{
//!     "vsId": 1, "algorithm": "HMAC-SHA2-256",
//!     "testGroups": [{ "tgId": 1, "testType": "AFT",
//!                      "tests": [{ "tcId": 1, "len": 16, "msg": "abcd" }] }]
//! }"#;
//! let response = session.process(request)?;
//! assert_eq!(response.test_results[0].tests[0].tc_id, 1);
//! # Ok::<(), acvp_core::EngineError>(())
//! ```

pub mod error;
pub mod handlers;
pub mod hexstr;
pub mod model;
pub mod params;
pub mod registry;
pub mod response;
pub mod runner;
pub mod testcase;

pub use error::{EngineError, Result};
pub use hexstr::HexError;
pub use model::{RawCase, RawGroup, VectorSet};
pub use registry::{Capability, CapabilityRegistry, CipherId, CryptoCallback};
pub use response::{CaseResponse, GroupResponse, ResponseDocument};
pub use runner::Session;
pub use testcase::{
    CaseBuffer, CaseData, CaseRecord, CaseState, HmacCase, SafePrimeCase, SafePrimeGroup,
    SafePrimeMode, TestType,
};
