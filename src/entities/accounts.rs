use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// External-auth subject, e.g. `auth0|1234567890`.
    #[sea_orm(unique)]
    pub oauth_id: String,

    pub first_name: String,

    pub last_name: String,

    /// Per-account invite token (UUID), targeted by invitations.
    #[sea_orm(unique)]
    pub friends_code: String,

    pub household_id: Option<i64>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::households::Entity",
        from = "Column::HouseholdId",
        to = "super::households::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Household,
    #[sea_orm(has_many = "super::devices::Entity")]
    Devices,
}

impl Related<super::households::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Household.def()
    }
}

impl Related<super::devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
