// Hourly bucketing of social posts onto market candles
pub mod hourly_join;

pub use hourly_join::join_hourly;
