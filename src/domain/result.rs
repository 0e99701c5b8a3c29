//! Result type alias for the migrator

use super::errors::MigratorError;

/// Result type alias for migrator operations
///
/// # Examples
///
/// ```
/// use nfce_migrator::domain::result::Result;
/// use nfce_migrator::domain::errors::MigratorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MigratorError::Connection("refused".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MigratorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::MigratorError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(MigratorError::Source("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
