//! Domain error types.
//!
//! These errors represent invalid queries caught before any request is
//! made. They are distinct from API/IO errors.

/// Errors from building a [`SearchQuery`](super::SearchQuery).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was never set
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The provider needs at least one route
    #[error("routes count must be at least 1, got {0}")]
    InvalidRoutesCount(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::MissingField("start");
        assert_eq!(err.to_string(), "missing required field: start");

        let err = ValidationError::InvalidRoutesCount(0);
        assert_eq!(err.to_string(), "routes count must be at least 1, got 0");
    }
}
