//! External JSON views of domain entities.

pub mod listings;
pub mod matches;
pub mod swipes;
