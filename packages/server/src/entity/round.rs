use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "round")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub description: Option<String>,
    /// Display ordering and tiebreak. Not unique.
    pub round_number: i32,
    /// At most one row has this set; see `services::round`.
    pub is_active: bool,

    #[sea_orm(has_many)]
    pub contestants: HasMany<super::contestant::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
