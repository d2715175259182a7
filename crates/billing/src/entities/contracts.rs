//! `SeaORM` Entity for the `contract` table.
//!
//! Contract start/end dates are proper `Date` columns; the statuses are
//! free text with the values `active`, `expired`, and `canceled`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contract")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "ContractID")]
    pub id: String,
    #[sea_orm(column_name = "ContractStartDate")]
    pub start_date: Date,
    #[sea_orm(column_name = "ContractEndDate")]
    pub end_date: Date,
    #[sea_orm(column_name = "ContractStatus")]
    pub status: String,
    #[sea_orm(column_name = "AccountID")]
    pub account_id: String,
    #[sea_orm(column_name = "PlanID")]
    pub plan_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::plans::Entity",
        from = "Column::PlanId",
        to = "super::plans::Column::Id"
    )]
    Plans,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
