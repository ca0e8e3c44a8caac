//! In-memory test-case records and their lifecycle state.
//!
//! A record is allocated immediately before its case is handed to the crypto
//! callback, mutated by input decoding and by the callback, read by the
//! output encoder, then released. Release is terminal and runs exactly once
//! on every exit path; `Drop` backstops the paths an early return takes.

use zeroize::Zeroize;

use crate::error::{EngineError, Result};
use crate::hexstr::{self, HexError};
use crate::registry::CipherId;

/// Heap-backed buffer whose capacity is fixed at allocation time.
///
/// The backing storage is zero-filled on allocation and zeroized on release
/// and on drop, so a released record never exposes prior contents. The
/// logical length never exceeds the capacity; every write checks first.
#[derive(Debug)]
pub struct CaseBuffer {
    data: Vec<u8>,
    len: usize,
}

impl CaseBuffer {
    /// Allocate a zero-filled buffer of exactly `capacity` bytes.
    pub fn alloc(capacity: usize, context: &'static str) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| EngineError::AllocationFailure(context))?;
        data.resize(capacity, 0);
        Ok(Self { data, len: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode a hex input field into the buffer, bounded by its capacity.
    pub fn load_hex(&mut self, src: &str, field: &'static str) -> Result<()> {
        self.len = hexstr::decode_into(src, &mut self.data)
            .map_err(|source| EngineError::Hex { field, source })?;
        Ok(())
    }

    /// Copy raw output bytes in, guarded by the same capacity rule as the
    /// codec: the check precedes the write. Crypto callbacks fill output
    /// buffers through this.
    pub fn fill(&mut self, bytes: &[u8]) -> std::result::Result<(), HexError> {
        if bytes.len() > self.data.len() {
            return Err(HexError::CapacityExceeded {
                needed: bytes.len(),
                max: self.data.len(),
            });
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        Ok(())
    }

    /// The valid contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Encode the valid contents as hex.
    pub fn to_hex(&self) -> String {
        hexstr::encode(self.as_bytes())
    }

    /// Zeroize and free the backing storage.
    fn release(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
        self.len = 0;
    }
}

impl Drop for CaseBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

/// Lifecycle state of one case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    /// Buffers allocated, inputs not yet decoded.
    Created,
    /// Inputs decoded, ready for the crypto callback.
    Initialized,
    /// Handed to the crypto callback.
    Dispatched,
    /// Response fragment produced.
    Emitted,
    /// Terminal: buffers zeroized and freed.
    Released,
}

/// Safe-prime operating mode, fixed by the registered capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafePrimeMode {
    KeyGen,
    KeyVer,
}

/// Group-level test-type tag for the safe-prime family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    Aft,
    Val,
}

impl TestType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AFT" => Some(TestType::Aft),
            "VAL" => Some(TestType::Val),
            _ => None,
        }
    }
}

/// Named safe-prime groups: the closed MODP/FFDHE set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafePrimeGroup {
    Modp2048,
    Modp3072,
    Modp4096,
    Modp6144,
    Modp8192,
    Ffdhe2048,
    Ffdhe3072,
    Ffdhe4096,
    Ffdhe6144,
    Ffdhe8192,
}

impl SafePrimeGroup {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "MODP-2048" => Some(SafePrimeGroup::Modp2048),
            "MODP-3072" => Some(SafePrimeGroup::Modp3072),
            "MODP-4096" => Some(SafePrimeGroup::Modp4096),
            "MODP-6144" => Some(SafePrimeGroup::Modp6144),
            "MODP-8192" => Some(SafePrimeGroup::Modp8192),
            "ffdhe2048" => Some(SafePrimeGroup::Ffdhe2048),
            "ffdhe3072" => Some(SafePrimeGroup::Ffdhe3072),
            "ffdhe4096" => Some(SafePrimeGroup::Ffdhe4096),
            "ffdhe6144" => Some(SafePrimeGroup::Ffdhe6144),
            "ffdhe8192" => Some(SafePrimeGroup::Ffdhe8192),
            _ => None,
        }
    }
}

/// Hash/MAC family record.
#[derive(Debug)]
pub struct HmacCase {
    pub tc_id: u64,
    pub cipher: CipherId,
    /// Declared message length in bits, as carried by the document.
    pub msg_bits: u64,
    pub msg: CaseBuffer,
    pub mac: CaseBuffer,
}

/// Safe-prime family record. `x`/`y` are inputs under key-verification and
/// outputs under key-generation; `passed` is the key-verification verdict.
#[derive(Debug)]
pub struct SafePrimeCase {
    pub tc_id: u64,
    pub mode: SafePrimeMode,
    pub test_type: TestType,
    pub group: SafePrimeGroup,
    pub x: CaseBuffer,
    pub y: CaseBuffer,
    pub passed: bool,
}

/// Tagged-variant case data; the discriminant is the algorithm family.
#[derive(Debug)]
pub enum CaseData {
    Hmac(HmacCase),
    SafePrime(SafePrimeCase),
}

/// One test-case record with its lifecycle state.
#[derive(Debug)]
pub struct CaseRecord {
    state: CaseState,
    data: CaseData,
}

impl CaseRecord {
    /// A freshly allocated record; inputs not yet decoded.
    pub(crate) fn create(data: CaseData) -> Self {
        Self {
            state: CaseState::Created,
            data,
        }
    }

    pub fn state(&self) -> CaseState {
        self.state
    }

    pub fn data(&self) -> &CaseData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut CaseData {
        &mut self.data
    }

    pub fn hmac(&self) -> Option<&HmacCase> {
        match &self.data {
            CaseData::Hmac(case) => Some(case),
            _ => None,
        }
    }

    pub fn hmac_mut(&mut self) -> Option<&mut HmacCase> {
        match &mut self.data {
            CaseData::Hmac(case) => Some(case),
            _ => None,
        }
    }

    pub fn safe_prime(&self) -> Option<&SafePrimeCase> {
        match &self.data {
            CaseData::SafePrime(case) => Some(case),
            _ => None,
        }
    }

    pub fn safe_prime_mut(&mut self) -> Option<&mut SafePrimeCase> {
        match &mut self.data {
            CaseData::SafePrime(case) => Some(case),
            _ => None,
        }
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.advance(CaseState::Created, CaseState::Initialized);
    }

    pub(crate) fn mark_dispatched(&mut self) {
        self.advance(CaseState::Initialized, CaseState::Dispatched);
    }

    pub(crate) fn mark_emitted(&mut self) {
        self.advance(CaseState::Dispatched, CaseState::Emitted);
    }

    fn advance(&mut self, from: CaseState, to: CaseState) {
        debug_assert_eq!(
            self.state, from,
            "illegal case transition to {:?} from {:?}",
            to, self.state
        );
        self.state = to;
    }

    /// Zeroize and free every buffer the record owns and clear scalar
    /// outputs. Terminal; the state guard makes the effectful release happen
    /// exactly once however many paths route through here.
    pub fn release(&mut self) {
        if self.state == CaseState::Released {
            return;
        }
        match &mut self.data {
            CaseData::Hmac(case) => {
                case.msg.release();
                case.mac.release();
                case.msg_bits = 0;
            }
            CaseData::SafePrime(case) => {
                case.x.release();
                case.y.release();
                case.passed = false;
            }
        }
        self.state = CaseState::Released;
    }
}

impl Drop for CaseRecord {
    fn drop(&mut self) {
        self.release();
    }
}
