use std::fmt;

/// Failure taxonomy for the recommendation pipeline. Expected domain
/// conditions are carried as values; only `Internal` wraps a genuinely
/// unexpected error whose detail must stay out of client responses.
#[derive(Debug)]
pub enum RecommendError {
    DataUnavailable,
    FilterExhausted(String),
    InsufficientHistory(String),
    OptimizationFailure(String),
    Internal(anyhow::Error),
}

impl RecommendError {
    /// True when the condition should map to a client error (HTTP 400)
    /// with the message shown verbatim.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::FilterExhausted(_) | Self::InsufficientHistory(_) | Self::OptimizationFailure(_)
        )
    }
}

impl fmt::Display for RecommendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable => write!(f, "market data unavailable"),
            Self::FilterExhausted(msg)
            | Self::InsufficientHistory(msg)
            | Self::OptimizationFailure(msg) => write!(f, "{msg}"),
            Self::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl std::error::Error for RecommendError {}

impl From<anyhow::Error> for RecommendError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_classification() {
        assert!(RecommendError::FilterExhausted("x".into()).is_rejection());
        assert!(RecommendError::InsufficientHistory("x".into()).is_rejection());
        assert!(RecommendError::OptimizationFailure("x".into()).is_rejection());
        assert!(!RecommendError::DataUnavailable.is_rejection());
        assert!(!RecommendError::Internal(anyhow::anyhow!("boom")).is_rejection());
    }

    #[test]
    fn domain_failures_display_their_message_verbatim() {
        let err = RecommendError::FilterExhausted("no stocks passed fundamental filter".into());
        assert_eq!(err.to_string(), "no stocks passed fundamental filter");
    }
}
