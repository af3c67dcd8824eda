//! Persistence-independent domain entities and value objects.

pub mod geo;
pub mod listing;
pub mod location;
pub mod matches;
pub mod swipe;
pub mod types;
pub mod user;
