//! Incoming request bodies and query strings, validated and converted into
//! typed payloads.

pub mod listings;
pub mod locations;
pub mod swipes;
