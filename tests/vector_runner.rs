//! End-to-end runs through the document orchestrator: registration, group
//! walking, case lifecycle, and response mirroring.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use acvp_core::{CaseRecord, EngineError, Session};
use serde_json::{json, Value};

fn response_value(session: &Session, request: &Value) -> Value {
    let response = session.process(&request.to_string()).unwrap();
    serde_json::from_str(&response.to_json().unwrap()).unwrap()
}

fn hmac_session(digest: &'static [u8]) -> Session {
    let mut session = Session::new();
    session
        .register(
            "HMAC-SHA2-256",
            Box::new(move |record: &mut CaseRecord| {
                let case = record
                    .hmac_mut()
                    .ok_or_else(|| "not a mac record".to_string())?;
                case.mac.fill(digest).map_err(|e| e.to_string())
            }),
        )
        .unwrap();
    session
}

#[test]
fn hmac_run_mirrors_ids_and_emits_digest() {
    let session = hmac_session(&[0xde, 0xad, 0xbe, 0xef]);
    let request = json!({
        "vsId": 42,
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 1, "testType": "AFT",
              "tests": [{ "tcId": 1, "len": 16, "msg": "ab" }] }
        ]
    });

    let doc = response_value(&session, &request);
    assert_eq!(doc["vsId"], 42);
    assert_eq!(doc["algorithm"], "HMAC-SHA2-256");
    assert_eq!(doc["testResults"][0]["tgId"], 1);
    assert_eq!(doc["testResults"][0]["tests"][0]["tcId"], 1);
    assert_eq!(doc["testResults"][0]["tests"][0]["md"], "deadbeef");
}

#[test]
fn safe_prime_keygen_emits_generated_values() {
    let mut session = Session::new();
    session
        .register(
            "safePrimes/keyGen",
            Box::new(|record: &mut CaseRecord| {
                let case = record
                    .safe_prime_mut()
                    .ok_or_else(|| "not a safe-prime record".to_string())?;
                case.x.fill(&[0x01, 0x02, 0x03, 0x04]).map_err(|e| e.to_string())?;
                case.y.fill(&[0x05, 0x06]).map_err(|e| e.to_string())
            }),
        )
        .unwrap();

    let request = json!({
        "vsId": 8,
        "algorithm": "safePrimes",
        "mode": "keyGen",
        "testGroups": [
            { "tgId": 1, "safePrimeGroup": "ffdhe2048", "testType": "AFT",
              "tests": [{ "tcId": 5 }] }
        ]
    });

    let doc = response_value(&session, &request);
    let case = &doc["testResults"][0]["tests"][0];
    assert_eq!(case["tcId"], 5);
    assert_eq!(case["x"], "01020304");
    assert_eq!(case["y"], "0506");
}

#[test]
fn safe_prime_keyver_emits_only_the_verdict() {
    let mut session = Session::new();
    session
        .register(
            "safePrimes/keyVer",
            Box::new(|record: &mut CaseRecord| {
                let case = record
                    .safe_prime_mut()
                    .ok_or_else(|| "not a safe-prime record".to_string())?;
                assert_eq!(case.x.as_bytes(), &[0x0a, 0x0b]);
                assert_eq!(case.y.as_bytes(), &[0x0c, 0x0d]);
                case.passed = true;
                Ok(())
            }),
        )
        .unwrap();

    let request = json!({
        "algorithm": "safePrimes",
        "mode": "keyVer",
        "testGroups": [
            { "tgId": 1, "safePrimeGroup": "ffdhe2048", "testType": "VAL",
              "tests": [{ "tcId": 7, "x": "0a0b", "y": "0c0d" }] }
        ]
    });

    let doc = response_value(&session, &request);
    let case = &doc["testResults"][0]["tests"][0];
    assert_eq!(case["tcId"], 7);
    assert_eq!(case["testPassed"], true);
    assert!(case.get("x").is_none());
    assert!(case.get("y").is_none());
}

#[test]
fn callback_failure_aborts_the_remaining_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut session = Session::new();
    session
        .register(
            "HMAC-SHA2-256",
            Box::new(move |record: &mut CaseRecord| {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 2 {
                    return Err("forced failure".to_string());
                }
                let case = record
                    .hmac_mut()
                    .ok_or_else(|| "not a mac record".to_string())?;
                case.mac.fill(&[0x00]).map_err(|e| e.to_string())
            }),
        )
        .unwrap();

    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 1, "testType": "AFT",
              "tests": [
                  { "tcId": 1, "msg": "aa" },
                  { "tcId": 2, "msg": "bb" },
                  { "tcId": 3, "msg": "cc" }
              ] }
        ]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::CryptoModuleFailure(_)));
    // Case 3 was never dispatched.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn unknown_algorithm_fails_before_any_group() {
    let session = hmac_session(&[0x00]);
    let request = json!({
        "algorithm": "AES-GCM",
        "testGroups": [{ "tgId": 1, "tests": [{ "tcId": 1 }] }]
    });
    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedOperation(_)));
}

#[test]
fn empty_session_has_no_context() {
    let session = Session::new();
    let err = session.process("{}").unwrap_err();
    assert!(matches!(err, EngineError::NoContext));
}

#[test]
fn bad_group_metadata_keeps_cases_away_from_the_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut session = Session::new();
    session
        .register(
            "safePrimes/keyGen",
            Box::new(move |_record: &mut CaseRecord| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .unwrap();

    let request = json!({
        "algorithm": "safePrimes",
        "mode": "keyGen",
        "testGroups": [
            { "tgId": 1, "safePrimeGroup": "ffdhe1024", "testType": "AFT",
              "tests": [{ "tcId": 1 }] }
        ]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidArgument {
            field: "safePrimeGroup",
            ..
        }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn malformed_hex_input_aborts_before_dispatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut session = Session::new();
    session
        .register(
            "HMAC-SHA2-256",
            Box::new(move |_record: &mut CaseRecord| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .unwrap();

    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 1, "tests": [{ "tcId": 1, "msg": "0g" }] }
        ]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::Hex { field: "msg", .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn oversized_message_is_rejected_by_the_capacity_guard() {
    let session = hmac_session(&[0x00]);
    // 1025 bytes of message against a 1024-byte capacity.
    let oversized = "ab".repeat(1025);
    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 1, "tests": [{ "tcId": 1, "msg": oversized }] }
        ]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::Hex { field: "msg", .. }));
}

#[test]
fn duplicate_group_ids_abort_the_run() {
    let session = hmac_session(&[0x00]);
    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 1, "tests": [{ "tcId": 1, "msg": "aa" }] },
            { "tgId": 1, "tests": [{ "tcId": 2, "msg": "bb" }] }
        ]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument { field: "tgId", .. }));
}

#[test]
fn duplicate_case_ids_abort_the_run() {
    let session = hmac_session(&[0x00]);
    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 1, "tests": [
                { "tcId": 1, "msg": "aa" },
                { "tcId": 1, "msg": "bb" }
            ] }
        ]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument { field: "tcId", .. }));
}

#[test]
fn missing_group_id_is_malformed() {
    let session = hmac_session(&[0x00]);
    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [{ "tests": [{ "tcId": 1, "msg": "aa" }] }]
    });

    let err = session.process(&request.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::MalformedDocument("tgId")));
}

#[test]
fn group_order_is_preserved_in_the_response() {
    let session = hmac_session(&[0x01]);
    let request = json!({
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [
            { "tgId": 9, "tests": [{ "tcId": 3, "msg": "aa" }] },
            { "tgId": 2, "tests": [{ "tcId": 8, "msg": "bb" }, { "tcId": 4, "msg": "cc" }] }
        ]
    });

    let doc = response_value(&session, &request);
    let results = doc["testResults"].as_array().unwrap();
    assert_eq!(results[0]["tgId"], 9);
    assert_eq!(results[1]["tgId"], 2);
    let tests = results[1]["tests"].as_array().unwrap();
    assert_eq!(tests[0]["tcId"], 8);
    assert_eq!(tests[1]["tcId"], 4);
}

#[test]
fn each_run_builds_a_fresh_response() {
    let session = hmac_session(&[0x0f]);
    let request = json!({
        "vsId": 1,
        "algorithm": "HMAC-SHA2-256",
        "testGroups": [{ "tgId": 1, "tests": [{ "tcId": 1, "msg": "aa" }] }]
    });

    let first = session.process(&request.to_string()).unwrap();
    let second = session.process(&request.to_string()).unwrap();
    assert_eq!(first.test_results.len(), 1);
    assert_eq!(second.test_results.len(), 1);
    assert_eq!(second.test_results[0].tests.len(), 1);
}
