pub mod errors;
pub mod export;
pub mod filter;
pub mod mutator;
pub mod notifications;
pub mod session;
pub mod sort;
pub mod store;
pub mod views;

pub use errors::{ServiceError, ServiceResult};
