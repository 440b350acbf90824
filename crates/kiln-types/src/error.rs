//! Unified error interface for kiln.
//!
//! Every kiln error type implements [`ErrorCode`] so that the application
//! layer and the CLI can log and classify failures uniformly.
//!
//! # Design
//!
//! - **Machine-readable codes**: stable UPPER_SNAKE_CASE strings for
//!   programmatic handling and log filtering
//! - **Recoverability info**: whether a retry or a user action can help
//!
//! # Example
//!
//! ```
//! use kiln_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     NotFound(String),
//!     Timeout,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "MY_NOT_FOUND",
//!             Self::Timeout => "MY_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(MyError::Timeout.code(), "MY_TIMEOUT");
//! ```

/// Unified error code interface for kiln errors.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"CONFIG_PARSE"`, `"PLUGIN_SPAWN_FAILED"`
/// - **Prefixed by concern**: `CONFIG_`, `REGISTRY_`, `PLUGIN_`, `ENV_`, `APP_`
/// - **Stable**: codes do not change once defined
///
/// # Recoverability
///
/// An error is recoverable when retrying or a user-side fix may succeed
/// (transient spawn failure, missing file the user can create). It is not
/// recoverable when a retry cannot help (malformed config, unknown name).
pub trait ErrorCode {
    /// Returns the machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows kiln conventions.
///
/// Checks that the code is non-empty, carries the expected prefix, and is
/// UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for use
/// in tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Validates every variant of an error enum at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn error_code_trait() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn assert_error_codes_all_variants() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&TestError::Transient, "WRONG_");
    }

    #[test]
    fn upper_snake_case_rules() {
        assert!(is_upper_snake_case("PLUGIN_SPAWN_FAILED"));
        assert!(is_upper_snake_case("ERROR_2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("lower_case"));
        assert!(!is_upper_snake_case("_LEADING"));
        assert!(!is_upper_snake_case("TRAILING_"));
        assert!(!is_upper_snake_case("DOUBLE__SCORE"));
    }
}
