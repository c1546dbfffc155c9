//! Service entity - a monitored service shown on the status page.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// URL-safe unique identifier, e.g. `api` or `web-frontend`.
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Manual ordering hint for admin tooling; public listings sort by name.
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Look up a service by its URL slug.
    pub async fn find_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Slug.eq(slug))
            .one(db)
            .await
    }
}
