//! Authenticated session tying the API client to the board and notification
//! state.
//!
//! A request rejected with 401 drops the cached token, logs in again with the
//! configured credentials and is retried once.

use crate::api::{AuthApi, BoardReader, EventWriter, NotificationReader, SessionUser};
use crate::domain::event::EventSummary;
use crate::domain::stage::PipelineStage;
use crate::domain::types::EventId;
use crate::preferences::{PreferencePersistence, PreferenceStore, SESSION_TOKEN_KEY};
use crate::services::errors::ServiceResult;
use crate::services::mutator::{self, MoveRequest};
use crate::services::notifications::NotificationCenter;
use crate::services::store::ViewStateStore;

#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

pub struct Session<A, S: PreferenceStore> {
    api: A,
    credentials: Credentials,
    persistence: PreferencePersistence<S>,
    store: ViewStateStore<S>,
    notifications: NotificationCenter<S>,
    user: Option<SessionUser>,
}

impl<A, S> Session<A, S>
where
    A: AuthApi + BoardReader + EventWriter + NotificationReader,
    S: PreferenceStore,
{
    /// Builds the session, reusing a token cached by an earlier run.
    pub fn new(
        api: A,
        credentials: Credentials,
        persistence: PreferencePersistence<S>,
        store: ViewStateStore<S>,
        notifications: NotificationCenter<S>,
    ) -> Self {
        let cached: Option<String> = persistence.load(SESSION_TOKEN_KEY, None);
        if cached.is_some() {
            log::info!("Reusing cached session token");
            api.set_token(cached);
        }

        Self {
            api,
            credentials,
            persistence,
            store,
            notifications,
            user: None,
        }
    }

    pub fn login(&mut self) -> ServiceResult<()> {
        let user = self
            .api
            .login(&self.credentials.email, &self.credentials.password)
            .map_err(|err| {
                log::error!("Login as {} failed: {err}", self.credentials.email);
                err
            })?;
        self.persistence.save(SESSION_TOKEN_KEY, &self.api.token());
        self.user = Some(user);
        Ok(())
    }

    pub fn logout(&mut self) -> ServiceResult<()> {
        let result = self.api.logout();
        self.persistence.forget(SESSION_TOKEN_KEY);
        self.user = None;
        self.store.dispose();
        result.map_err(Into::into)
    }

    fn ensure_authenticated(&mut self) -> ServiceResult<()> {
        if self.api.is_authenticated() {
            Ok(())
        } else {
            self.login()
        }
    }

    /// Runs `op`, logging in again and retrying once if the server rejected
    /// the session.
    fn authorized<T, F>(&mut self, mut op: F) -> ServiceResult<T>
    where
        F: FnMut(&mut Self) -> ServiceResult<T>,
    {
        self.ensure_authenticated()?;

        match op(self) {
            Err(err) if err.is_unauthorized() => {
                log::warn!("Session expired, logging in again");
                self.persistence.forget(SESSION_TOKEN_KEY);
                self.login()?;
                if self.store.has_speculative_state() {
                    self.store.reconcile(&self.api)?;
                }
                op(self)
            }
            other => other,
        }
    }

    pub fn load_board(&mut self) -> ServiceResult<()> {
        self.authorized(|session| session.store.load(&session.api))
    }

    /// Moves an event to `to` optimistically. Returns the server copy, or
    /// `None` when the event already sits in `to`.
    pub fn move_event(
        &mut self,
        event_id: EventId,
        to: PipelineStage,
    ) -> ServiceResult<Option<EventSummary>> {
        self.authorized(|session| {
            let request = MoveRequest::to_stage(&session.store, event_id, to)?;
            mutator::move_event(&mut session.store, &session.api, request)
        })
    }

    pub fn refresh_notifications(&mut self) -> ServiceResult<()> {
        self.authorized(|session| session.notifications.refresh(&session.api))
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn store(&self) -> &ViewStateStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ViewStateStore<S> {
        &mut self.store
    }

    pub fn notifications(&self) -> &NotificationCenter<S> {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter<S> {
        &mut self.notifications
    }
}
