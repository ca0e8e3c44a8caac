//! Bounded hex-string ⇄ byte-buffer conversion.
//!
//! Every input field in a vector set arrives hex encoded, and every decode
//! targets a buffer whose capacity the algorithm's protocol dictates. The
//! capacity check always precedes the write: a rejected string leaves the
//! buffer untouched past the bound.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum HexError {
    /// Hex strings encode whole bytes; an odd character count cannot.
    #[error("odd-length hex string ({0} chars)")]
    OddLength(usize),

    #[error("{0}")]
    Invalid(#[from] hex::FromHexError),

    /// The decoded (or written) length would overrun the target buffer.
    #[error("decoded length {needed} exceeds capacity {max}")]
    CapacityExceeded { needed: usize, max: usize },
}

/// Decode `src` into the front of `out`, returning the decoded length.
///
/// Fails on odd length, non-hex characters, or a decoded length larger than
/// `out.len()`. Nothing is ever written beyond the decoded bound.
pub fn decode_into(src: &str, out: &mut [u8]) -> Result<usize, HexError> {
    if src.len() % 2 != 0 {
        return Err(HexError::OddLength(src.len()));
    }
    let needed = src.len() / 2;
    if needed > out.len() {
        return Err(HexError::CapacityExceeded {
            needed,
            max: out.len(),
        });
    }
    hex::decode_to_slice(src, &mut out[..needed])?;
    Ok(needed)
}

/// Encode `bytes` as lowercase hex. The output is always `2 * bytes.len()`
/// characters and cannot fail for in-capacity input.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
