//! Optimistic stage changes.
//!
//! A move is applied to the store first and confirmed by the server
//! afterwards. The split into [`begin_move`] and [`complete_move`] lets a
//! caller render the speculative board while the update request is in
//! flight; [`move_event`] runs the whole round trip.
//!
//! Two moves of the same event may overlap. Whichever response is applied
//! last wins, and a failed one reloads the board.

use crate::api::errors::ApiResult;
use crate::api::{BoardReader, EventWriter};
use crate::domain::board::BoardPosition;
use crate::domain::event::{EventSummary, EventUpdate};
use crate::domain::stage::PipelineStage;
use crate::domain::types::EventId;
use crate::preferences::PreferenceStore;
use crate::services::errors::{ServiceError, ServiceResult};
use crate::services::store::ViewStateStore;

/// Drag-and-drop gesture as reported by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub event_id: EventId,
    pub source: BoardPosition,
    /// `None` when the card was dropped outside any column.
    pub destination: Option<BoardPosition>,
}

impl MoveRequest {
    pub fn new(event_id: EventId, source: BoardPosition, destination: Option<BoardPosition>) -> Self {
        Self {
            event_id,
            source,
            destination,
        }
    }

    /// Builds a request that appends the event to `to`, starting from where
    /// the event currently sits on the board.
    pub fn to_stage<S: PreferenceStore>(
        store: &ViewStateStore<S>,
        event_id: EventId,
        to: PipelineStage,
    ) -> ServiceResult<Self> {
        let source = store
            .board()
            .locate(event_id)
            .ok_or(ServiceError::EventNotFound(event_id))?;
        let index = store.board().events(to).len();
        Ok(Self::new(event_id, source, Some(BoardPosition::new(to, index))))
    }

    /// Dropping outside the board or inside the same column changes nothing.
    /// Column order comes from the sort engine, so a reorder within a column
    /// is not persisted.
    pub fn is_noop(&self) -> bool {
        self.destination
            .is_none_or(|destination| destination.stage == self.source.stage)
    }
}

/// A move applied locally and awaiting the server's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMove {
    pub event_id: EventId,
    pub from: PipelineStage,
    pub to: PipelineStage,
}

impl PendingMove {
    pub fn update(&self) -> EventUpdate {
        EventUpdate::stage(self.to)
    }
}

/// Applies the move to the store. Returns `None` for no-op gestures.
pub fn begin_move<S: PreferenceStore>(
    store: &mut ViewStateStore<S>,
    request: MoveRequest,
) -> ServiceResult<Option<PendingMove>> {
    if request.is_noop() {
        return Ok(None);
    }
    let Some(destination) = request.destination else {
        return Ok(None);
    };

    let pending = PendingMove {
        event_id: request.event_id,
        from: request.source.stage,
        to: destination.stage,
    };
    store.apply_move(pending.event_id, pending.from, pending.to)?;
    log::info!(
        "Moved event {} from {} to {} pending confirmation",
        pending.event_id,
        pending.from,
        pending.to
    );
    Ok(Some(pending))
}

/// Settles a pending move with the server's answer.
///
/// On failure the board is reloaded and the original error is returned as
/// [`ServiceError::MoveFailed`]. A failing reload is logged; the store then
/// reports the failed load through its load state.
pub fn complete_move<S, R>(
    store: &mut ViewStateStore<S>,
    api: &R,
    pending: PendingMove,
    outcome: ApiResult<EventSummary>,
) -> ServiceResult<EventSummary>
where
    S: PreferenceStore,
    R: BoardReader + ?Sized,
{
    match outcome {
        Ok(event) => {
            if event.stage != pending.to {
                log::warn!(
                    "Server placed event {} in {} instead of {}",
                    pending.event_id,
                    event.stage,
                    pending.to
                );
            }
            store.confirm(event.clone());
            Ok(event)
        }
        Err(err) => {
            log::error!("Failed to move event {}: {err}", pending.event_id);
            if let Err(reload) = store.reconcile(api) {
                log::error!("Failed to reconcile board after rejected move: {reload}");
            }
            Err(ServiceError::MoveFailed {
                event_id: pending.event_id,
                source: err,
            })
        }
    }
}

/// Full optimistic round trip for one gesture.
pub fn move_event<S, R>(
    store: &mut ViewStateStore<S>,
    api: &R,
    request: MoveRequest,
) -> ServiceResult<Option<EventSummary>>
where
    S: PreferenceStore,
    R: BoardReader + EventWriter + ?Sized,
{
    let Some(pending) = begin_move(store, request)? else {
        return Ok(None);
    };
    let outcome = api.update_event(pending.event_id, &pending.update());
    complete_move(store, api, pending, outcome).map(Some)
}
