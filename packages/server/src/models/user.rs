use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_required_text;
use crate::entity::role;
use crate::error::AppError;

/// Request body for creating a judge or admin account.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Ms. Rivera")]
    pub name: String,
    #[schema(example = "judge.one@school.test")]
    pub email: String,
    /// Password (8-128 bytes).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// `admin` or `judge`. Cannot be changed later.
    #[schema(example = "judge")]
    pub role: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Only return users with this role.
    pub role: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// Emails are compared case-insensitively by storing them lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(name: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(name, field, 100)
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let invalid = || AppError::Validation("Email address is malformed".into());

    if email.len() < 3 || email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_role(role_name: &str) -> Result<(), AppError> {
    if !role::ALL_ROLES.contains(&role_name) {
        return Err(AppError::Validation(format!(
            "Role must be one of: {}",
            role::ALL_ROLES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_create_user(req: &CreateUserRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_role(&req.role)
}
