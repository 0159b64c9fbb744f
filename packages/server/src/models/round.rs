use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_text, validate_required_text};
use crate::error::AppError;

const NAME_MAX: usize = 256;
const DESCRIPTION_MAX: usize = 10_000;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRoundRequest {
    #[schema(example = "Semi-finals")]
    pub name: String,
    pub description: Option<String>,
    /// Positive display number. Duplicates are accepted.
    #[schema(example = 2)]
    pub round_number: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateRoundRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub round_number: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoundResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub round_number: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::round::Model> for RoundResponse {
    fn from(m: crate::entity::round::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            round_number: m.round_number,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

fn validate_round_number(round_number: i32) -> Result<(), AppError> {
    if round_number < 1 {
        return Err(AppError::Validation("round_number must be >= 1".into()));
    }
    Ok(())
}

pub fn validate_create_round(req: &CreateRoundRequest) -> Result<(), AppError> {
    validate_required_text(&req.name, "Name", NAME_MAX)?;
    validate_optional_text(req.description.as_deref(), "Description", DESCRIPTION_MAX)?;
    validate_round_number(req.round_number)
}

pub fn validate_update_round(req: &UpdateRoundRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_text(name, "Name", NAME_MAX)?;
    }
    if let Some(Some(ref description)) = req.description {
        validate_optional_text(Some(description), "Description", DESCRIPTION_MAX)?;
    }
    if let Some(round_number) = req.round_number {
        validate_round_number(round_number)?;
    }
    Ok(())
}
