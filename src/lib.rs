//! Listing recommendations and swipe matching for the Wayfare travel and
//! hosting matchmaking application.
//!
//! The `data` feature builds the domain, persistence and service layers; the
//! `server` feature adds the Actix-web JSON API on top.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;

#[cfg(feature = "server")]
pub mod routes;
