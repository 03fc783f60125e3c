//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tickers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub symbol: String, // always uppercase
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::aggregate_candles::Entity")]
    AggregateCandles,
}

impl Related<super::aggregate_candles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AggregateCandles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
