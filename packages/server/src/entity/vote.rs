use sea_orm::entity::prelude::*;

/// One judge's decision on one contestant.
///
/// `(user_id, contestant_id)` is covered by the unique index
/// `uq_vote_user_contestant` created in `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub contestant_id: i32,
    #[sea_orm(belongs_to, from = "contestant_id", to = "id")]
    pub contestant: HasOne<super::contestant::Entity>,

    /// `true` approves (advances), `false` rejects.
    pub vote: bool,

    /// Written on first insert only; revotes leave it untouched.
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
