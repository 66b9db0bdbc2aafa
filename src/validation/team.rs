use crate::db::enums::MemberRole;
use crate::db::models::auth::normalize_email;
use crate::error::AppError;

pub fn validate_team_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Team name is required"));
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation(
            "Team name is too long (max 255 characters)",
        ));
    }
    Ok(name.to_string())
}

/// Returns the normalized invite email.
pub fn validate_invite_email(email: &str) -> Result<String, AppError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if !email.contains('@') {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(email)
}

/// Missing role defaults to Member.
pub fn parse_member_role(role: Option<&str>) -> Result<MemberRole, AppError> {
    match role.map(str::trim) {
        None | Some("") => Ok(MemberRole::Member),
        Some(role) => role.parse().map_err(AppError::validation),
    }
}
