//! Mock API implementations for isolating the store and services in tests.

use mockall::mock;

use crate::api::errors::ApiResult;
use crate::api::{AuthApi, BoardReader, EventWriter, NotificationReader, SessionUser};
use crate::domain::board::BoardSnapshot;
use crate::domain::event::{EventSummary, EventUpdate};
use crate::domain::notification::NotificationSummary;
use crate::domain::types::EventId;

mock! {
    pub CrmApi {}

    impl BoardReader for CrmApi {
        fn fetch_board(&self) -> ApiResult<BoardSnapshot>;
    }

    impl EventWriter for CrmApi {
        fn update_event(&self, id: EventId, update: &EventUpdate) -> ApiResult<EventSummary>;
    }

    impl NotificationReader for CrmApi {
        fn fetch_notifications(&self) -> ApiResult<NotificationSummary>;
    }

    impl AuthApi for CrmApi {
        fn login(&self, email: &str, password: &str) -> ApiResult<SessionUser>;
        fn logout(&self) -> ApiResult<()>;
        fn is_authenticated(&self) -> bool;
        fn token(&self) -> Option<String>;
        fn set_token(&self, token: Option<String>);
    }
}
