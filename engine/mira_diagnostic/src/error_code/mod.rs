//! Error codes for all engine diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E6001`) with the first
//! digit indicating the engine phase. Used for `--explain` lookups and
//! documentation.

use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where the first digit indicates phase:
/// - E6xxx: Runtime / eval errors
/// - E9xxx: Internal engine errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Runtime / Eval Errors (E6xxx)
    /// Unsupported type specification in `NumericArray`
    E6001,
    /// Data not coercible to a numeric array
    E6002,
    /// Buffer element category has no promotion rule
    E6003,

    // Internal Engine Errors (E9xxx)
    /// Invariant violation (head reassignment, re-entrant
    /// materialization, literal-cache contract breach)
    E9001,
}

impl ErrorCode {
    /// Short machine-readable tag for the code, used in message templates.
    ///
    /// These follow the classic message-tag names (`type`, `data`) that
    /// users match on when quieting messages.
    pub fn tag(self) -> &'static str {
        match self {
            ErrorCode::E6001 => "type",
            ErrorCode::E6002 => "data",
            ErrorCode::E6003 => "elemtype",
            ErrorCode::E9001 => "inv",
        }
    }

    /// One-line description for `--explain` output.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E6001 => "unsupported type specification",
            ErrorCode::E6002 => "data not coercible to a numeric array",
            ErrorCode::E6003 => "buffer element category has no promotion rule",
            ErrorCode::E9001 => "internal invariant violation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
