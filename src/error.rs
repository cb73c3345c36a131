use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced while loading artifacts or generating a proof.
///
/// The verifier never returns an error: malformed or out-of-range inputs make
/// it answer `false`.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed artifact content: bad numeric literal, wrong array length,
    /// or a structurally invalid key section.
    #[error("parse error: {0}")]
    Parse(String),

    /// A group element decoded from external data is not on the curve or not
    /// in the prime-order subgroup.
    #[error("point is not on the curve or not in the subgroup")]
    InvalidPoint,

    /// A section of a binary proving key did not start at the offset recorded
    /// in the header table.
    #[error("unexpected section offset: expected {expected}, actual {actual}")]
    UnexpectedOffset {
        /// Offset recorded in the header table.
        expected: usize,
        /// Offset reached by the reader.
        actual: usize,
    },

    /// An input has a different length than the key it is used with.
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch {
        /// Length required by the key.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// System randomness failed while sampling the blinding scalars.
    #[error("rng error: {0}")]
    Rng(#[from] rand::Error),

    /// Malformed JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// File open/read/write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
