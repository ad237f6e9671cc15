// Hourly join of candles and social activity
pub mod aggregation;

// Correlations and chart series
pub mod analytics;

// Pipeline stages
pub mod collection;
pub mod loader;
pub mod processing;

// Feature building, training and prediction
pub mod ml;
