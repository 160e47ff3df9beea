//! View-state engine of the event-booking CRM board.
//!
//! The `data` feature builds the domain, the pure filter and sort engines,
//! the board store and the optimistic mutator. The default `client` feature
//! adds the HTTP API client, the SQLite preference store and the
//! command-line front end.

pub mod api;
pub mod domain;
pub mod error_conversions;
pub mod preferences;
pub mod services;

#[cfg(feature = "client")]
pub mod cli;
#[cfg(feature = "client")]
pub mod db;
#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod schema;
