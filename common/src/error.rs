//! Error taxonomy for a decision cycle

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlphaError {
    /// Input that cannot be defaulted or excluded (e.g. a market without an id)
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Not enough usable trader data to analyze
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A single analyzer failed; recorded by the voting engine, never fatal
    #[error("Analyzer '{analyzer}' failed: {reason}")]
    AnalyzerFailure { analyzer: String, reason: String },

    /// The decision cycle exceeded its deadline
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid thresholds or weights, raised at construction time only
    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type AlphaResult<T> = Result<T, AlphaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AlphaError::AnalyzerFailure {
            analyzer: "Portfolio Analyzer".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Analyzer 'Portfolio Analyzer' failed: boom");

        let err = AlphaError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Analysis timed out after 250ms");
    }
}
