use sea_orm::entity::prelude::*;

/// Externally sourced product facts, keyed by GTIN. Rows are written by the
/// enrichment client, never by user commands.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "metadata")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub global_trade_item_number: String,

    /// Raw Open Food Facts product JSON.
    pub food_facts: Option<String>,

    /// Raw non-food product JSON.
    pub product_facts: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
