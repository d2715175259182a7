//! `SeaORM` Entity for the `customer` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "CustomerID")]
    pub id: String,
    #[sea_orm(column_name = "CustomerFirstName")]
    pub first_name: String,
    #[sea_orm(column_name = "CustomerLastName")]
    pub last_name: String,
    #[sea_orm(column_name = "CustomerEmail", unique)]
    pub email: String,
    #[sea_orm(column_name = "CustomerPhoneNumber")]
    pub phone_number: String,
    #[sea_orm(column_name = "CustomerAddress")]
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
