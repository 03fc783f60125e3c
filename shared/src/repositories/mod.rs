pub mod candle_repository;
pub mod ticker_repository;
