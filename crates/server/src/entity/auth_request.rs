//! AuthRequest entity - transient per-owner OAuth handshake state.
//!
//! Created (or overwritten) when a handshake starts and read back when the
//! provider redirects with a verifier. Rows are upserted by owner so at most
//! one is live per user; they are intentionally not deleted after a
//! successful handshake, which allows re-verification.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "auth_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub owner: String,
    /// Request-token secret returned by the provider's first leg.
    pub request_secret: String,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn find_by_owner(
        db: &DatabaseConnection,
        owner: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Owner.eq(owner))
            .one(db)
            .await
    }
}
