use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait, Insert};
use tracing::info;

use crate::entity::tickers;

pub async fn find_ticker<C: ConnectionTrait>(
    conn: &C,
    symbol: &str,
) -> Result<Option<tickers::Model>, DbErr> {
    tickers::Entity::find_by_id(symbol.to_uppercase())
        .one(conn)
        .await
}

/// INSERT for a ticker that leaves an existing row with the same symbol untouched.
pub fn insert_ticker_statement(symbol: &str) -> Insert<tickers::ActiveModel> {
    tickers::Entity::insert(tickers::ActiveModel {
        symbol: ActiveValue::Set(symbol.to_string()),
    })
    .on_conflict(
        // MySQL has no DO NOTHING; this renders as a self-assignment there
        OnConflict::column(tickers::Column::Symbol)
            .do_nothing_on([tickers::Column::Symbol])
            .to_owned(),
    )
}

/// Returns the ticker row for `symbol`, creating it first if it is not stored yet.
/// The symbol is uppercased before lookup and insert.
pub async fn find_or_create_ticker<C: ConnectionTrait>(
    conn: &C,
    symbol: &str,
) -> Result<tickers::Model, DbErr> {
    let symbol = symbol.to_uppercase();
    if let Some(ticker) = tickers::Entity::find_by_id(symbol.clone()).one(conn).await? {
        return Ok(ticker);
    }

    // a concurrent ingest may have inserted the same symbol since the lookup
    let inserted = insert_ticker_statement(&symbol)
        .exec_without_returning(conn)
        .await?;
    if inserted > 0 {
        info!("Created ticker {}", symbol);
    }

    Ok(tickers::Model { symbol })
}
