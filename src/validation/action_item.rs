use crate::db::enums::ActionItemStatus;
use crate::error::AppError;

pub fn validate_action_item_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Action item title is required"));
    }
    if title.chars().count() > 255 {
        return Err(AppError::validation(
            "Title is too long (max 255 characters)",
        ));
    }
    Ok(title.to_string())
}

pub fn parse_action_item_status(status: &str) -> Result<ActionItemStatus, AppError> {
    status.trim().parse().map_err(AppError::validation)
}
