//! `SeaORM` Entity for the `plan` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "PlanID")]
    pub id: String,
    #[sea_orm(column_name = "PlanName")]
    pub name: String,
    #[sea_orm(column_name = "PlanMonthlyFee")]
    pub monthly_fee: f64,
    #[sea_orm(column_name = "PlanDataLimitGB", nullable)]
    pub data_limit_gb: Option<i32>,
    #[sea_orm(column_name = "PlanShareable")]
    pub shareable: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contracts::Entity")]
    Contracts,
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
