#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use eventos_board::api::errors::{ApiError, ApiResult};
use eventos_board::api::{AuthApi, BoardReader, EventWriter, NotificationReader, SessionUser};
use eventos_board::db::{DbPool, establish_connection_pool, run_migrations};
use eventos_board::domain::board::BoardSnapshot;
use eventos_board::domain::event::{EventSummary, EventUpdate};
use eventos_board::domain::notification::NotificationSummary;
use eventos_board::domain::types::{EventId, UserId};
use tempfile::TempDir;

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().unwrap()).unwrap();
        run_migrations(&pool).unwrap();
        TestDb { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

/// In-process stand-in for the CRM server. Board fetches return the
/// current server board; updates pop scripted outcomes and, when they
/// succeed, apply the stage change to the server board.
#[derive(Default)]
pub struct FakeCrm {
    pub board: RefCell<BoardSnapshot>,
    pub update_outcomes: RefCell<VecDeque<ApiResult<()>>>,
    pub board_failures: RefCell<VecDeque<ApiError>>,
    pub notifications: RefCell<NotificationSummary>,
    pub updates: RefCell<Vec<(EventId, EventUpdate)>>,
    pub token: RefCell<Option<String>>,
    pub board_fetches: RefCell<usize>,
}

impl FakeCrm {
    pub fn with_board(board: BoardSnapshot) -> Self {
        FakeCrm {
            board: RefCell::new(board),
            token: RefCell::new(Some("token".to_string())),
            ..FakeCrm::default()
        }
    }

    pub fn fail_next_update(&self, err: ApiError) {
        self.update_outcomes.borrow_mut().push_back(Err(err));
    }

    pub fn fail_next_fetch(&self, err: ApiError) {
        self.board_failures.borrow_mut().push_back(err);
    }
}

impl BoardReader for FakeCrm {
    fn fetch_board(&self) -> ApiResult<BoardSnapshot> {
        *self.board_fetches.borrow_mut() += 1;
        if let Some(err) = self.board_failures.borrow_mut().pop_front() {
            return Err(err);
        }
        Ok(self.board.borrow().clone())
    }
}

impl EventWriter for FakeCrm {
    fn update_event(&self, id: EventId, update: &EventUpdate) -> ApiResult<EventSummary> {
        self.updates.borrow_mut().push((id, update.clone()));
        if let Some(Err(err)) = self.update_outcomes.borrow_mut().pop_front() {
            return Err(err);
        }

        let mut board = self.board.borrow_mut();
        let position = board.locate(id).ok_or(ApiError::Validation {
            status: 404,
            message: "Evento no encontrado".to_string(),
        })?;
        let mut event = board
            .take(position.stage, id)
            .ok_or_else(|| ApiError::Decode("missing event".to_string()))?;
        if let Some(stage) = update.stage {
            event.stage = stage;
        }
        board.push(event.stage, event.clone());
        Ok(event)
    }
}

impl NotificationReader for FakeCrm {
    fn fetch_notifications(&self) -> ApiResult<NotificationSummary> {
        Ok(self.notifications.borrow().clone())
    }
}

impl AuthApi for FakeCrm {
    fn login(&self, email: &str, _password: &str) -> ApiResult<SessionUser> {
        *self.token.borrow_mut() = Some("token".to_string());
        Ok(SessionUser {
            id: UserId::new(1).unwrap(),
            name: "Admin".to_string(),
            email: email.to_string(),
            role: "admin".to_string(),
        })
    }

    fn logout(&self) -> ApiResult<()> {
        *self.token.borrow_mut() = None;
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }
}
