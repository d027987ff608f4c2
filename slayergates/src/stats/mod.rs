//! Statistics module: growth curves, grouped counts and the leaderboard.

pub mod aggregator;
pub mod models;

pub use aggregator::StatsAggregator;
pub use models::{GrowthPoint, LabelCount, POINTS_PER_WIN, Standing, cumulative_by_date};
