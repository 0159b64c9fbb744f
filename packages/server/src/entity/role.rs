use sea_orm::entity::prelude::*;

pub const ADMIN: &str = "admin";
pub const JUDGE: &str = "judge";

/// Every role a user may be created with.
pub const ALL_ROLES: &[&str] = &[ADMIN, JUDGE];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    #[sea_orm(has_many)]
    pub users: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub permissions: HasMany<super::role_permission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
