use crate::error::AppError;

/// Returns the trimmed display name.
pub fn validate_register_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if name.chars().count() > 100 {
        return Err(AppError::validation(
            "Name must be between 1 and 100 characters",
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_name_validation() {
        assert_eq!(validate_register_name("  Ada Lovelace ").unwrap(), "Ada Lovelace");
        assert!(validate_register_name("   ").is_err());
        assert!(validate_register_name(&"a".repeat(101)).is_err());
    }
}
