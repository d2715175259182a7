//! `SeaORM` Entity for the `invoice` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "InvoiceID")]
    pub id: String,
    #[sea_orm(column_name = "AccountID")]
    pub account_id: String,
    #[sea_orm(column_name = "InvoiceDate")]
    pub invoice_date: Date,
    #[sea_orm(column_name = "InvoiceDueDate")]
    pub due_date: Date,
    #[sea_orm(column_name = "InvoiceAmount")]
    pub amount: f64,
    #[sea_orm(column_name = "InvoiceStatus")]
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
