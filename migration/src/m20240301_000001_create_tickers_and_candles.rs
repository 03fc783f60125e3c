use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickers::Symbol).string_len(32).not_null().primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AggregateCandles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AggregateCandles::Id).integer().auto_increment().primary_key())
                    .col(ColumnDef::new(AggregateCandles::TickerId).string_len(32).not_null())
                    .col(ColumnDef::new(AggregateCandles::OpenPrice).double().not_null())
                    .col(ColumnDef::new(AggregateCandles::ClosePrice).double().not_null())
                    .col(ColumnDef::new(AggregateCandles::HighPrice).double().not_null())
                    .col(ColumnDef::new(AggregateCandles::LowPrice).double().not_null())
                    .col(ColumnDef::new(AggregateCandles::Volume).big_integer().not_null())
                    .col(ColumnDef::new(AggregateCandles::Vwap).double().null())
                    .col(ColumnDef::new(AggregateCandles::Time).big_integer().not_null()) // epoch millis
                    .col(ColumnDef::new(AggregateCandles::TimeIso).string_len(32).null())
                    .col(ColumnDef::new(AggregateCandles::Timespan).string_len(16).not_null().default("day"))
                    .col(ColumnDef::new(AggregateCandles::Notes).string_len(510).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_aggregate_candles_ticker")
                            .from(AggregateCandles::Table, AggregateCandles::TickerId)
                            .to(Tickers::Table, Tickers::Symbol)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_aggregate_candles_time")
                    .table(AggregateCandles::Table)
                    .col(AggregateCandles::Time)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // one candle per ticker, timestamp and timespan; inserts rely on it for ON CONFLICT
        manager
            .create_index(
                Index::create()
                    .name("idx_aggregate_candles_ticker_time_timespan")
                    .table(AggregateCandles::Table)
                    .col(AggregateCandles::TickerId)
                    .col(AggregateCandles::Time)
                    .col(AggregateCandles::Timespan)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table(AggregateCandles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tickers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tickers {
    Table,
    Symbol,
}

#[derive(DeriveIden)]
enum AggregateCandles {
    Table,
    Id,
    TickerId,
    OpenPrice,
    ClosePrice,
    HighPrice,
    LowPrice,
    Volume,
    Vwap,
    Time,
    TimeIso,
    Timespan,
    Notes,
}
