pub mod calendar;
pub mod data;
pub mod scoring;
pub mod season_stats;
pub mod smart_picks;
