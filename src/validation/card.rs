use crate::db::enums::CardColumn;
use crate::error::AppError;

pub const MAX_CARD_CONTENT: usize = 10000;

/// Returns the trimmed card content.
pub fn validate_card_content(content: &str) -> Result<String, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::validation("Card content is required"));
    }

    if content.chars().count() > MAX_CARD_CONTENT {
        return Err(AppError::validation(
            "Card content is too long (max 10000 characters)",
        ));
    }

    Ok(content.to_string())
}

pub fn parse_card_column(column: &str) -> Result<CardColumn, AppError> {
    column.parse().map_err(AppError::validation)
}
