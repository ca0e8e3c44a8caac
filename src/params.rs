//! Buffer capacities dictated by each algorithm family's protocol.

/// Largest message a Hash/MAC test case may carry, in bytes.
pub const HMAC_MSG_BYTE_MAX: usize = 1024;

/// Largest digest any registered MAC variant produces (SHA-512 output).
pub const HMAC_MAC_BYTE_MAX: usize = 64;

/// Largest safe-prime exponent/value the 8192-bit groups need, in bytes.
pub const SAFE_PRIME_BYTE_MAX: usize = 1024;
