pub mod audit;
pub mod classifier;
pub mod performance;
