pub mod components;
pub mod dashboard;
pub mod design_system;

pub use dashboard::PredictorApp;
