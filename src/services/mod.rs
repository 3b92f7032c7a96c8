pub mod aggregator;
pub mod localization;
pub mod menu;
pub mod providers;
pub mod random;
pub mod recommendations;
pub mod similarity;

pub use aggregator::{AggregatorParts, MediaAggregator};
