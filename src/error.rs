/*
 * File: /src/error.rs
 * Created Date: Monday, March 2nd 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 2nd March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-02		Zihan	Error type shared by all search algorithms
 */

/// Errors produced by the biclustering engine.
///
/// There is no fatal path inside the search itself: failures are either a
/// parameter rejected at construction or a rating source that cannot answer.
#[derive(Debug, thiserror::Error)]
pub enum BiclusterError {
    /// Invalid algorithm parameter, detected when the algorithm is built
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The rating matrix could not answer a read (e.g. unknown user id)
    #[error("data access error: {0}")]
    DataAccess(String),

    /// Malformed configuration document
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BiclusterError>;

/// Fail with [`BiclusterError::Configuration`] unless `condition` holds.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(BiclusterError::Configuration(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let error = BiclusterError::Configuration("consistency must be in (0, 1]: 1.5".to_string());
        let error_str = format!("{}", error);
        assert!(error_str.contains("invalid configuration"));
        assert!(error_str.contains("1.5"));
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, || "unused".to_string()).is_ok());
        match ensure(false, || "min_rows must be > 0".to_string()) {
            Err(BiclusterError::Configuration(msg)) => assert_eq!(msg, "min_rows must be > 0"),
            _ => panic!("Expected Configuration error"),
        }
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let error: BiclusterError = err.into();
        assert!(matches!(error, BiclusterError::Parse(_)));
    }
}
