//! Database and configuration models of the board client.

pub mod config;
pub mod preference;
