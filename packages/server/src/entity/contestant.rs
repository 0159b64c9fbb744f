use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contestant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub class_name: String,
    pub age: i32,
    pub category: String,
    pub description: Option<String>,

    pub round_id: i32,
    #[sea_orm(belongs_to, from = "round_id", to = "id")]
    pub round: HasOne<super::round::Entity>,

    /// Display position within the round, starting at 1. Not unique.
    pub position: i32,
    pub is_visible_to_judges: bool,

    #[sea_orm(has_many)]
    pub votes: HasMany<super::vote::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
