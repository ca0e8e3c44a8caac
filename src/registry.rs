//! Cipher identifiers and the capability registry.
//!
//! The registry is owned by the session that built it: capabilities are
//! registered up front, looked up by the wire name a vector set carries, and
//! pair the algorithm's lifecycle with the externally supplied crypto
//! callback.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{EngineError, Result};
use crate::handlers::hmac::HmacLifecycle;
use crate::handlers::safe_prime::SafePrimeLifecycle;
use crate::handlers::CaseLifecycle;
use crate::testcase::{CaseRecord, SafePrimeMode};

/// Identifier for every cipher/mode this core can traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherId {
    HmacSha1,
    HmacSha2_224,
    HmacSha2_256,
    HmacSha2_384,
    HmacSha2_512,
    SafePrimeKeyGen,
    SafePrimeKeyVer,
}

/// Wire-name table, using the spellings the validation server sends.
static CIPHER_NAMES: Lazy<HashMap<&'static str, CipherId>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("HMAC-SHA-1", CipherId::HmacSha1);
    m.insert("HMAC-SHA2-224", CipherId::HmacSha2_224);
    m.insert("HMAC-SHA2-256", CipherId::HmacSha2_256);
    m.insert("HMAC-SHA2-384", CipherId::HmacSha2_384);
    m.insert("HMAC-SHA2-512", CipherId::HmacSha2_512);
    m.insert("safePrimes/keyGen", CipherId::SafePrimeKeyGen);
    m.insert("safePrimes/keyVer", CipherId::SafePrimeKeyVer);
    m
});

impl CipherId {
    /// Resolve a wire name (`"<algorithm>"` or `"<algorithm>/<mode>"`).
    pub fn from_name(name: &str) -> Option<Self> {
        CIPHER_NAMES.get(name).copied()
    }
}

/// Externally supplied crypto routine: fills the record's output fields and
/// returns success, or signals failure. Synchronous and opaque to this core.
pub type CryptoCallback =
    Box<dyn Fn(&mut CaseRecord) -> std::result::Result<(), String> + Send + Sync>;

/// One registered capability: the cipher it serves, the lifecycle that
/// builds and encodes its records, and the crypto callback that fills them.
pub struct Capability {
    pub cipher: CipherId,
    pub(crate) lifecycle: Box<dyn CaseLifecycle + Send + Sync>,
    pub(crate) callback: CryptoCallback,
}

/// Registered capabilities, keyed by wire name.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: HashMap<String, Capability>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the crypto callback for a cipher name. Unknown names are
    /// rejected so a typo cannot register an unreachable handler.
    pub fn register(&mut self, name: &str, callback: CryptoCallback) -> Result<()> {
        let cipher = CipherId::from_name(name)
            .ok_or_else(|| EngineError::UnsupportedOperation(name.to_owned()))?;
        self.entries.insert(
            name.to_owned(),
            Capability {
                cipher,
                lifecycle: lifecycle_for(cipher),
                callback,
            },
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }
}

fn lifecycle_for(cipher: CipherId) -> Box<dyn CaseLifecycle + Send + Sync> {
    match cipher {
        CipherId::HmacSha1
        | CipherId::HmacSha2_224
        | CipherId::HmacSha2_256
        | CipherId::HmacSha2_384
        | CipherId::HmacSha2_512 => Box::new(HmacLifecycle::new(cipher)),
        CipherId::SafePrimeKeyGen => Box::new(SafePrimeLifecycle::new(SafePrimeMode::KeyGen)),
        CipherId::SafePrimeKeyVer => Box::new(SafePrimeLifecycle::new(SafePrimeMode::KeyVer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_cipher_names() {
        assert_eq!(
            CipherId::from_name("HMAC-SHA2-256"),
            Some(CipherId::HmacSha2_256)
        );
        assert_eq!(
            CipherId::from_name("safePrimes/keyVer"),
            Some(CipherId::SafePrimeKeyVer)
        );
        assert_eq!(CipherId::from_name("AES-GCM"), None);
    }

    #[test]
    fn rejects_registration_of_unknown_names() {
        let mut registry = CapabilityRegistry::new();
        let err = registry
            .register("HMAC-MD5", Box::new(|_: &mut CaseRecord| Ok(())))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedOperation(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_finds_what_was_registered() {
        let mut registry = CapabilityRegistry::new();
        registry
            .register("safePrimes/keyGen", Box::new(|_: &mut CaseRecord| Ok(())))
            .unwrap();
        let cap = registry.lookup("safePrimes/keyGen").unwrap();
        assert_eq!(cap.cipher, CipherId::SafePrimeKeyGen);
        assert!(registry.lookup("safePrimes/keyVer").is_none());
    }
}
