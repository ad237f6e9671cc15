pub mod features;
pub mod model;
pub mod predictor;
pub mod trainer;

pub use features::build_features;
pub use model::PriceModel;
pub use predictor::{LinearPricePredictor, PricePredictor};
pub use trainer::{TrainingOutcome, format_currency, train};
