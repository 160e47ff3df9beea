//! Blocking HTTP implementation of the CRM API traits.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::wire::{BoardResponse, ErrorBody, LoginResponse, UpdateEventResponse};
use crate::api::{AuthApi, BoardReader, EventWriter, NotificationReader, SessionUser};
use crate::domain::board::BoardSnapshot;
use crate::domain::event::{EventSummary, EventUpdate};
use crate::domain::notification::NotificationSummary;
use crate::domain::types::EventId;

/// CRM API client holding the bearer token of the current session.
pub struct HttpCrmApi {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpCrmApi {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and maps non-success statuses onto [`ApiError`].
    fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, is_login: bool) -> ApiResult<T> {
        let response = builder.send()?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().map_err(ApiError::from);
        }

        let body = response.text().unwrap_or_default();
        Err(self.reject(status, &body, is_login))
    }

    /// Maps a failed response and drops the cached token when the server
    /// rejected the session.
    fn reject(&self, status: StatusCode, body: &str, is_login: bool) -> ApiError {
        let err = status_error(status, body, is_login);
        if err == ApiError::Unauthorized {
            log::warn!("Session rejected by the server, clearing credentials");
            self.set_token(None);
        }
        err
    }
}

/// Error for a non-success `status`.
///
/// A 401 means an expired session unless the request was the login attempt
/// itself, where it means the credentials were wrong.
fn status_error(status: StatusCode, body: &str, is_login: bool) -> ApiError {
    if status == StatusCode::UNAUTHORIZED && !is_login {
        return ApiError::Unauthorized;
    }

    let message = ErrorBody::message_from(body);
    if status.is_client_error() {
        ApiError::Validation {
            status: status.as_u16(),
            message,
        }
    } else {
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

impl BoardReader for HttpCrmApi {
    fn fetch_board(&self) -> ApiResult<BoardSnapshot> {
        let request = self.authorized(self.client.get(self.url("/eventos")));
        let response: BoardResponse = self.send(request, false)?;
        Ok(response.into())
    }
}

impl EventWriter for HttpCrmApi {
    fn update_event(&self, id: EventId, update: &EventUpdate) -> ApiResult<EventSummary> {
        let request = self
            .authorized(self.client.put(self.url(&format!("/eventos/{id}"))))
            .json(update);
        let response: UpdateEventResponse = self.send(request, false)?;
        Ok(response.evento)
    }
}

impl NotificationReader for HttpCrmApi {
    fn fetch_notifications(&self) -> ApiResult<NotificationSummary> {
        let request = self.authorized(self.client.get(self.url("/sla/notificaciones")));
        self.send(request, false)
    }
}

impl AuthApi for HttpCrmApi {
    fn login(&self, email: &str, password: &str) -> ApiResult<SessionUser> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        let response: LoginResponse = self.send(request, true)?;
        self.set_token(Some(response.token));
        log::info!("Logged in as {}", response.usuario.email);
        Ok(response.usuario)
    }

    fn logout(&self) -> ApiResult<()> {
        let request = self.authorized(self.client.post(self.url("/auth/logout")));
        let result = self.send::<serde_json::Value>(request, false).map(|_| ());
        self.set_token(None);
        result
    }

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(err) => log::error!("Token lock poisoned: {err}"),
        }
    }
}
