use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Account email; matched case-insensitively.
    #[schema(example = "judge.one@school.test")]
    pub email: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = "Ms. Rivera")]
    pub name: String,
    #[schema(example = "judge")]
    pub role: String,
    #[schema(example = json!(["vote:cast"]))]
    pub permissions: Vec<String>,
}

/// Current authenticated user's identity, as carried by the token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "judge.one@school.test")]
    pub email: String,
    #[schema(example = "judge")]
    pub role: String,
    #[schema(example = json!(["vote:cast"]))]
    pub permissions: Vec<String>,
}
