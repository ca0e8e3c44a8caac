//! Structured error types for the vector-processing engine.
//!
//! Every error here is terminal to the run that raised it: validation and
//! decode failures abort before the crypto callback runs, and a callback
//! failure aborts the remaining document. None are recoverable in place.

use thiserror::Error;

use crate::hexstr::HexError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required field is absent from the request document itself.
    #[error("malformed document: missing '{0}'")]
    MalformedDocument(&'static str),

    /// The document names an algorithm no capability is registered for.
    #[error("unsupported capability: {0}")]
    UnsupportedOperation(String),

    /// An enumerated field carries a value outside its closed set.
    #[error("invalid value for '{field}': {value}")]
    InvalidArgument { field: &'static str, value: String },

    /// A required group or case field is absent.
    #[error("missing required field: {0}")]
    MissingArgument(&'static str),

    /// Hex decoding of an input field failed or overran its buffer.
    #[error("hex conversion failure ({field}): {source}")]
    Hex {
        field: &'static str,
        source: HexError,
    },

    /// The allocator refused a case buffer.
    #[error("allocation failure ({0})")]
    AllocationFailure(&'static str),

    /// The crypto module rejected the operation. Never retried.
    #[error("crypto module failed the operation: {0}")]
    CryptoModuleFailure(String),

    /// A run was started on a session with nothing registered.
    #[error("no processing context")]
    NoContext,
}

pub type Result<T> = std::result::Result<T, EngineError>;
