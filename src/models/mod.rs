//! Diesel row models and their conversions into domain types.

pub mod config;
pub mod listing;
pub mod location;
pub mod matches;
pub mod swipe;
pub mod tag;
