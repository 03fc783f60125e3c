//! `SeaORM` Entity, @generated manually

use chrono::{DateTime, SecondsFormat};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "aggregate_candles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ticker_id: String,
    #[sea_orm(column_type = "Double")]
    pub open_price: f64,
    #[sea_orm(column_type = "Double")]
    pub close_price: f64,
    #[sea_orm(column_type = "Double")]
    pub high_price: f64,
    #[sea_orm(column_type = "Double")]
    pub low_price: f64,
    pub volume: i64,
    #[sea_orm(column_type = "Double", nullable)]
    pub vwap: Option<f64>,
    pub time: i64, // milliseconds since epoch
    #[sea_orm(nullable)]
    pub time_iso: Option<String>,
    pub timespan: String,
    #[sea_orm(column_type = "String(StringLen::N(510))", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tickers::Entity",
        from = "Column::TickerId",
        to = "super::tickers::Column::Symbol",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Tickers,
}

impl Related<super::tickers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// UTC RFC 3339 rendering of a millisecond epoch timestamp, e.g. `2021-01-04T05:00:00.000Z`.
///
/// Returns `None` when the timestamp is outside chrono's representable range.
pub fn time_iso(time_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(time_ms).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Fields of a candle that is about to be inserted. `time_iso` is derived, never supplied.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCandle {
    pub ticker_id: String,
    pub open_price: f64,
    pub close_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub volume: i64,
    pub vwap: Option<f64>,
    pub time: i64,
    pub timespan: String,
}

impl NewCandle {
    pub fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            time_iso: ActiveValue::Set(time_iso(self.time)),
            ticker_id: ActiveValue::Set(self.ticker_id),
            open_price: ActiveValue::Set(self.open_price),
            close_price: ActiveValue::Set(self.close_price),
            high_price: ActiveValue::Set(self.high_price),
            low_price: ActiveValue::Set(self.low_price),
            volume: ActiveValue::Set(self.volume),
            vwap: ActiveValue::Set(self.vwap),
            time: ActiveValue::Set(self.time),
            timespan: ActiveValue::Set(self.timespan),
            notes: ActiveValue::NotSet,
        }
    }
}
