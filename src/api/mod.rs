//! Contract of the remote CRM API consumed by the view-state layer.

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiResult;
use crate::domain::board::BoardSnapshot;
use crate::domain::event::{EventSummary, EventUpdate};
use crate::domain::notification::NotificationSummary;
use crate::domain::types::{EventId, UserId};

pub mod errors;
#[cfg(feature = "client")]
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod wire;

/// Authenticated user returned by a successful login.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: String,
}

pub trait BoardReader {
    /// Fetches every stage with its events and the server totals.
    fn fetch_board(&self) -> ApiResult<BoardSnapshot>;
}

pub trait EventWriter {
    fn update_event(&self, id: EventId, update: &EventUpdate) -> ApiResult<EventSummary>;
}

pub trait NotificationReader {
    fn fetch_notifications(&self) -> ApiResult<NotificationSummary>;
}

pub trait AuthApi {
    /// Exchanges credentials for a session. A rejected login is reported as
    /// a validation failure, never as [`errors::ApiError::Unauthorized`].
    fn login(&self, email: &str, password: &str) -> ApiResult<SessionUser>;
    fn logout(&self) -> ApiResult<()>;
    fn is_authenticated(&self) -> bool;
    /// Bearer token of the current session, if any.
    fn token(&self) -> Option<String>;
    /// Restores a token saved by a previous session, or clears it.
    fn set_token(&self, token: Option<String>);
}
