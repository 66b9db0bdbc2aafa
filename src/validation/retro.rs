use crate::db::models::retro::DateRange;
use crate::error::AppError;

pub fn validate_retro_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Retro name is required"));
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation(
            "Retro name is too long (max 255 characters)",
        ));
    }
    Ok(name.to_string())
}

pub fn validate_date_range(range: &DateRange) -> Result<(), AppError> {
    if !range.is_ordered() {
        return Err(AppError::validation("Start date must be before end date"));
    }
    Ok(())
}
