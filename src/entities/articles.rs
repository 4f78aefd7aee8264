use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub household_id: i64,

    pub storage_location_id: i64,

    /// GTIN/EAN barcode of the product, when known. Links the article to a
    /// metadata record with the same number.
    pub global_trade_item_number: Option<String>,

    pub name: String,

    /// RFC 3339 timestamp.
    pub best_before_date: String,

    pub quantity: i32,

    pub content: Option<String>,

    pub content_type: ContentType,

    pub image_url: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    #[sea_orm(string_value = "UNKNOWN")]
    Unknown,
    #[sea_orm(string_value = "FOOD")]
    Food,
    #[sea_orm(string_value = "NON_FOOD")]
    NonFood,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::households::Entity",
        from = "Column::HouseholdId",
        to = "super::households::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Household,
    #[sea_orm(
        belongs_to = "super::storage_locations::Entity",
        from = "Column::StorageLocationId",
        to = "super::storage_locations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    StorageLocation,
}

impl Related<super::households::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Household.def()
    }
}

impl Related<super::storage_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
