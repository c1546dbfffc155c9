//! Profile entity - a completed OAuth link for an admin user.
//!
//! A row exists only after the three-legged handshake finished with a
//! successful access-token exchange; at most one per owner.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// External user identity the credential belongs to.
    #[sea_orm(unique)]
    pub owner: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub created_at: OffsetDateTime,
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
