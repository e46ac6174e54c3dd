//! Errors raised when a caller misuses the IR API.

use crate::loc::Loc;

/// The result type for fallible queries whose failure is a programming error.
///
/// `Err` means a caller broke an invariant that verification should have
/// caught first (for example asking a node without a terminator for its
/// output op). Structural defects in a user graph are reported as
/// verification errors instead.
pub type SluiceResult<T> = Result<T, InternalError>;

/// An internal error indicating misuse of the IR API, not a malformed graph.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
    /// The operation the failing call was about, or [`Loc::UNKNOWN`].
    pub loc: Loc,
}

impl InternalError {
    /// Creates an internal error that concerns no particular operation.
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Loc::UNKNOWN, message)
    }

    /// Creates an internal error pointing at the operation at `loc`.
    pub fn at(loc: Loc, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            loc,
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("node has no terminator");
        assert_eq!(format!("{err}"), "internal error: node has no terminator");
        assert!(err.loc.is_unknown());
    }

    #[test]
    fn located_error_keeps_op() {
        let r: SluiceResult<u32> = Err(InternalError::at(Loc::op(7), "op #7 is already erased"));
        let err = r.unwrap_err();
        assert_eq!(err.loc.op_index(), Some(7));
        assert_eq!(err.message, "op #7 is already erased");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "op #3 was erased".to_string().into();
        assert_eq!(err.message, "op #3 was erased");
        assert_eq!(err.loc, Loc::UNKNOWN);
    }
}
