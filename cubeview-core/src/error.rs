use thiserror::Error;

/// Convenience alias for fallible cube operations.
pub type CubeResult<T> = Result<T, CubeError>;

/// Errors raised by the cube engine. A failed call leaves the cube unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CubeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("degenerate projection: eye distance {eye_distance} must exceed cube radius {radius}")]
    DegenerateProjection { eye_distance: f64, radius: f64 },
    #[error("subdivision must be at least 1")]
    InvalidSubdivision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CubeError::InvalidArgument("expected a pair".to_string());
        assert_eq!(err.to_string(), "invalid argument: expected a pair");

        let err = CubeError::DegenerateProjection {
            eye_distance: 1.0,
            radius: 2.0,
        };
        assert!(err.to_string().contains("must exceed cube radius 2"));
    }
}
