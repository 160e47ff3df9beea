//! Domain types of the event pipeline exposed by the view-state layer.

pub mod board;
pub mod event;
pub mod filter;
pub mod notification;
pub mod preferences;
pub mod sort;
pub mod stage;
pub mod types;
