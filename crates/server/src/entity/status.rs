//! Status entity - static reference data describing event severities.
//!
//! Severity values form a total order; lower values are more urgent. Two
//! sentinel rows are distinguished: the minimum-severity row (the default
//! status shown for a healthy service) and the `is_info` row used for
//! informational notices.

use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    /// Ordinal rank, unique across rows.
    #[sea_orm(unique)]
    pub severity: i32,
    /// Icon name rendered by clients, e.g. `traffic-cone` or `wrench`.
    pub image: String,
    pub is_info: bool,
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
    /// The row with the minimum severity value.
    pub async fn lowest_severity(db: &DatabaseConnection) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .order_by_asc(Column::Severity)
            .one(db)
            .await
    }

    /// The informational sentinel row, if one is configured.
    pub async fn info(db: &DatabaseConnection) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::IsInfo.eq(true))
            .one(db)
            .await
    }
}
