//! Typed path parameter helpers.

use std::str::FromStr;

use docvault_core::error::AppError;

/// Parses an identifier from a path segment.
pub fn parse_id<T: FromStr>(s: &str, what: &str) -> Result<T, AppError> {
    s.parse::<T>()
        .map_err(|_| AppError::validation(format!("Invalid {what}: {s}")))
}

/// Parses a version number from a path segment; must be positive.
pub fn parse_version_number(s: &str) -> Result<i32, AppError> {
    match s.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::validation(format!("Invalid version number: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::types::DocumentId;

    #[test]
    fn test_parse_id() {
        let id: DocumentId = parse_id("12", "document id").unwrap();
        assert_eq!(id.get(), 12);
        assert!(parse_id::<DocumentId>("abc", "document id").is_err());
    }

    #[test]
    fn test_parse_version_number_rejects_zero() {
        assert_eq!(parse_version_number("3").unwrap(), 3);
        assert!(parse_version_number("0").is_err());
        assert!(parse_version_number("-1").is_err());
    }
}
