use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    double_option, validate_optional_text, validate_reorder_ids, validate_required_text,
};
use crate::error::AppError;

pub const MIN_AGE: i32 = 6;
pub const MAX_AGE: i32 = 18;
const TEXT_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 2_000;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContestantRequest {
    #[schema(example = "Maya Chen")]
    pub name: String,
    #[schema(example = "7B")]
    pub class_name: String,
    #[schema(example = 12)]
    pub age: i32,
    #[schema(example = "Singing")]
    pub category: String,
    pub description: Option<String>,
    /// Position within the round. Appended after the last contestant if omitted.
    pub order: Option<i32>,
    /// Defaults to hidden.
    pub is_visible_to_judges: Option<bool>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateContestantRequest {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub age: Option<i32>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Move the contestant to another round.
    pub round_id: Option<i32>,
    pub order: Option<i32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetVisibilityRequest {
    pub is_visible_to_judges: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReorderContestantsRequest {
    /// Ordered list of contestant ids. Positions are assigned 1, 2, 3... by
    /// array index. Must contain exactly the round's contestants.
    pub contestant_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestantResponse {
    pub id: i32,
    pub name: String,
    pub class_name: String,
    pub age: i32,
    pub category: String,
    pub description: Option<String>,
    pub round_id: i32,
    pub order: i32,
    pub is_visible_to_judges: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::contestant::Model> for ContestantResponse {
    fn from(m: crate::entity::contestant::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            class_name: m.class_name,
            age: m.age,
            category: m.category,
            description: m.description,
            round_id: m.round_id,
            order: m.position,
            is_visible_to_judges: m.is_visible_to_judges,
            created_at: m.created_at,
        }
    }
}

pub fn validate_age(age: i32) -> Result<(), AppError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(AppError::Validation(format!(
            "Age must be between {MIN_AGE} and {MAX_AGE}"
        )));
    }
    Ok(())
}

fn validate_order(order: Option<i32>) -> Result<(), AppError> {
    if let Some(order) = order
        && order < 1
    {
        return Err(AppError::Validation("Order must be >= 1".into()));
    }
    Ok(())
}

pub fn validate_create_contestant(req: &CreateContestantRequest) -> Result<(), AppError> {
    validate_required_text(&req.name, "Name", TEXT_MAX)?;
    validate_required_text(&req.class_name, "Class name", TEXT_MAX)?;
    validate_required_text(&req.category, "Category", TEXT_MAX)?;
    validate_age(req.age)?;
    validate_optional_text(req.description.as_deref(), "Description", DESCRIPTION_MAX)?;
    validate_order(req.order)
}

pub fn validate_update_contestant(req: &UpdateContestantRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required_text(name, "Name", TEXT_MAX)?;
    }
    if let Some(ref class_name) = req.class_name {
        validate_required_text(class_name, "Class name", TEXT_MAX)?;
    }
    if let Some(ref category) = req.category {
        validate_required_text(category, "Category", TEXT_MAX)?;
    }
    if let Some(age) = req.age {
        validate_age(age)?;
    }
    if let Some(Some(ref description)) = req.description {
        validate_optional_text(Some(description), "Description", DESCRIPTION_MAX)?;
    }
    validate_order(req.order)
}

pub fn validate_reorder_contestants(req: &ReorderContestantsRequest) -> Result<(), AppError> {
    validate_reorder_ids(&req.contestant_ids, "contestant_id")
}
