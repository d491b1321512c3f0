//! Error types for timing validation.

use thiserror::Error;

/// A field-level validation failure.
///
/// Setters report failure through their `bool` return and wipe the
/// affected derived fields; `DetailedTiming::validate()` produces one of
/// these when a caller needs to know which field is the problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    /// The field has never been set or was wiped by a failed derivation.
    #[error("{field} has no value")]
    Unset { field: &'static str },

    /// The field holds a value outside its current legal range.
    ///
    /// The range may depend on sibling fields, so the same value can be
    /// legal in one state and illegal in another.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl TimingError {
    /// Create an unset-field error.
    pub fn unset(field: &'static str) -> Self {
        Self::Unset { field }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}

/// Result type for timing validation.
pub type TimingResult<T> = Result<T, TimingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_displays_bounds() {
        let err = TimingError::out_of_range("v_front", 64, 1, 63);
        let msg = err.to_string();
        assert!(msg.contains("v_front"));
        assert!(msg.contains("[1, 63]"));
    }

    #[test]
    fn unset_names_the_field() {
        assert_eq!(
            TimingError::unset("p_clock").to_string(),
            "p_clock has no value"
        );
    }
}
