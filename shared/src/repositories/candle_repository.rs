use std::collections::HashSet;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Insert, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entity::aggregate_candles::{self, NewCandle};

/// Rows per INSERT statement, keeps bind parameters well under SQLite's limit.
const INSERT_BATCH: usize = 100;
const LOOKUP_BATCH: usize = 500;

/// Timestamps out of `times` that already have a candle for this ticker and timespan.
pub async fn existing_times<C: ConnectionTrait>(
    conn: &C,
    ticker_id: &str,
    timespan: &str,
    times: &[i64],
) -> Result<HashSet<i64>, DbErr> {
    let mut existing = HashSet::new();
    for chunk in times.chunks(LOOKUP_BATCH) {
        let found: Vec<i64> = aggregate_candles::Entity::find()
            .select_only()
            .column(aggregate_candles::Column::Time)
            .filter(aggregate_candles::Column::TickerId.eq(ticker_id))
            .filter(aggregate_candles::Column::Timespan.eq(timespan))
            .filter(aggregate_candles::Column::Time.is_in(chunk.iter().copied()))
            .into_tuple()
            .all(conn)
            .await?;
        existing.extend(found);
    }
    Ok(existing)
}

/// Multi-row INSERT that skips rows colliding on (ticker_id, time, timespan).
/// `candles` must not be empty.
pub fn insert_candles_statement(candles: &[NewCandle]) -> Insert<aggregate_candles::ActiveModel> {
    let models = candles.iter().cloned().map(NewCandle::into_active_model);
    aggregate_candles::Entity::insert_many(models).on_conflict(
        // MySQL has no DO NOTHING; this renders as a self-assignment there
        OnConflict::columns([
            aggregate_candles::Column::TickerId,
            aggregate_candles::Column::Time,
            aggregate_candles::Column::Timespan,
        ])
        .do_nothing_on([aggregate_candles::Column::Time])
        .to_owned(),
    )
}

/// Inserts candles, silently dropping any that collide on (ticker_id, time, timespan).
/// Returns the number of rows actually written.
pub async fn insert_candles<C: ConnectionTrait>(
    conn: &C,
    candles: &[NewCandle],
) -> Result<u64, DbErr> {
    let mut inserted = 0;
    for chunk in candles.chunks(INSERT_BATCH) {
        inserted += insert_candles_statement(chunk)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(inserted)
}

/// All candles stored for a ticker, oldest first.
pub async fn candles_for_ticker<C: ConnectionTrait>(
    conn: &C,
    symbol: &str,
) -> Result<Vec<aggregate_candles::Model>, DbErr> {
    aggregate_candles::Entity::find()
        .filter(aggregate_candles::Column::TickerId.eq(symbol.to_uppercase()))
        .order_by_asc(aggregate_candles::Column::Time)
        .all(conn)
        .await
}

pub async fn count_candles<C: ConnectionTrait>(conn: &C, symbol: &str) -> Result<u64, DbErr> {
    aggregate_candles::Entity::find()
        .filter(aggregate_candles::Column::TickerId.eq(symbol.to_uppercase()))
        .count(conn)
        .await
}
