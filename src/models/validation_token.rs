use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Opaque, time-limited credential proving the listing owner controls the
/// email address used at creation. `consumed` only ever transitions
/// false -> true.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "validation_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub listing_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(64))")]
    pub token: String,
    pub expires_at: DateTime,
    pub consumed: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id"
    )]
    Listing,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
