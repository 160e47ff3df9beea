//! In-memory board state and user view preferences.
//!
//! The store is the single owner of the board snapshot. It is created with
//! [`ViewStateStore::init`], filled by [`ViewStateStore::load`] and emptied by
//! [`ViewStateStore::dispose`]; callers pass it to whatever needs it instead
//! of reaching for a global.

use std::collections::BTreeSet;

use crate::api::BoardReader;
use crate::domain::board::{BoardSnapshot, StageTotals};
use crate::domain::event::EventSummary;
use crate::domain::filter::FilterSet;
use crate::domain::preferences::{ViewMode, ViewPreferences};
use crate::domain::sort::{SortField, SortSpec};
use crate::domain::stage::PipelineStage;
use crate::domain::types::EventId;
use crate::preferences::{
    FILTER_PANEL_KEY, FILTERS_KEY, LIST_SORT_KEY, PreferencePersistence, PreferenceStore,
    STAGE_SORTS_KEY, VIEW_MODE_KEY,
};
use crate::services::errors::{ServiceError, ServiceResult};
use crate::services::views::{self, ForecastView, RenderedView, StageColumn};

/// Progress of the most recent board load.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last load failed; previously loaded data is still shown.
    Failed(String),
}

pub struct ViewStateStore<S: PreferenceStore> {
    board: BoardSnapshot,
    preferences: ViewPreferences,
    search: String,
    persistence: PreferencePersistence<S>,
    load_state: LoadState,
    speculative: BTreeSet<EventId>,
    generation: u64,
}

impl<S: PreferenceStore> ViewStateStore<S> {
    /// Creates an empty store and rehydrates the saved preferences.
    pub fn init(persistence: PreferencePersistence<S>) -> Self {
        let preferences = persistence.load_preferences();
        Self {
            board: BoardSnapshot::default(),
            preferences,
            search: String::new(),
            persistence,
            load_state: LoadState::Idle,
            speculative: BTreeSet::new(),
            generation: 0,
        }
    }

    /// Replaces the board with a fresh server snapshot.
    ///
    /// On failure the previous board stays in place and the error is
    /// returned so the caller can offer a retry.
    pub fn load<R>(&mut self, api: &R) -> ServiceResult<()>
    where
        R: BoardReader + ?Sized,
    {
        self.begin_load();

        match api.fetch_board() {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to load board: {err}");
                self.fail_load(err.user_message());
                Err(ServiceError::from(err))
            }
        }
    }

    /// Marks a fetch as in flight for callers that issue the request
    /// themselves and finish with [`apply_snapshot`](Self::apply_snapshot)
    /// or [`fail_load`](Self::fail_load). The current board stays readable
    /// while [`is_loading`](Self::is_loading) is `true`.
    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Ends an in-flight fetch with an error, keeping the previous board.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.load_state = LoadState::Failed(message.into());
    }

    /// Installs a snapshot fetched by the caller. Any optimistic assumption
    /// is dropped because the snapshot is the server's truth.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        log::info!("Board loaded with {} events", snapshot.len());
        self.board = snapshot;
        self.speculative.clear();
        self.load_state = LoadState::Ready;
        self.generation += 1;
    }

    /// Discards speculative state by reloading from the server.
    pub fn reconcile<R>(&mut self, api: &R) -> ServiceResult<()>
    where
        R: BoardReader + ?Sized,
    {
        log::info!(
            "Reconciling board, discarding {} speculative moves",
            self.speculative.len()
        );
        self.load(api)
    }

    /// Moves an event between columns locally, without waiting for the
    /// server. The event is appended to the end of `to`.
    pub fn apply_move(
        &mut self,
        event_id: EventId,
        from: PipelineStage,
        to: PipelineStage,
    ) -> ServiceResult<()> {
        let Some(mut event) = self.board.take(from, event_id) else {
            return Err(match self.board.locate(event_id) {
                Some(_) => ServiceError::StageMismatch {
                    event_id,
                    stage: from,
                },
                None => ServiceError::EventNotFound(event_id),
            });
        };

        event.stage = to;
        self.board.push(to, event);
        self.speculative.insert(event_id);
        self.generation += 1;
        Ok(())
    }

    /// Records the server copy of an event after a confirmed update. The
    /// server may settle the event in a different stage than requested.
    pub fn confirm(&mut self, event: EventSummary) {
        let event_id = event.id;
        self.speculative.remove(&event_id);

        match self.board.locate(event_id) {
            Some(position) if position.stage != event.stage => {
                self.board.take(position.stage, event_id);
                self.board.push(event.stage, event);
            }
            Some(_) => {
                self.board.replace(event);
            }
            None => {
                log::warn!("Confirmed event {event_id} is no longer on the board");
                return;
            }
        }
        self.generation += 1;
    }

    /// Drops board data and pending assumptions. Preferences stay persisted.
    pub fn dispose(&mut self) {
        self.board = BoardSnapshot::default();
        self.speculative.clear();
        self.load_state = LoadState::Idle;
        self.search.clear();
        self.generation += 1;
    }

    pub fn board(&self) -> &BoardSnapshot {
        &self.board
    }

    pub fn event(&self, event_id: EventId) -> Option<&EventSummary> {
        self.board.get(event_id)
    }

    /// Server totals for one column.
    pub fn totals(&self, stage: PipelineStage) -> StageTotals {
        self.board.stage_totals(stage)
    }

    pub fn grand_totals(&self) -> StageTotals {
        self.board.grand_totals()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Whether an optimistic move of the event is awaiting confirmation.
    pub fn is_speculative(&self, event_id: EventId) -> bool {
        self.speculative.contains(&event_id)
    }

    pub fn has_speculative_state(&self) -> bool {
        !self.speculative.is_empty()
    }

    /// Bumped on every change of board data so renderers can skip redraws.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn preferences(&self) -> &ViewPreferences {
        &self.preferences
    }

    pub fn persistence(&self) -> &PreferencePersistence<S> {
        &self.persistence
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.preferences.view_mode = mode;
        self.persistence.save(VIEW_MODE_KEY, &mode);
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.preferences.filters = filters;
        self.persistence.save(FILTERS_KEY, &self.preferences.filters);
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(FilterSet::default());
        self.search.clear();
    }

    /// Free-text search is session state and is not persisted.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn set_list_sort(&mut self, spec: SortSpec) {
        self.preferences.list_sort = spec;
        self.persistence.save(LIST_SORT_KEY, &spec);
    }

    /// Column-header click in the list view.
    pub fn toggle_list_sort(&mut self, field: SortField) {
        let spec = self.preferences.list_sort.toggled(field);
        self.set_list_sort(spec);
    }

    /// Flips the direction of one column's order.
    pub fn toggle_stage_sort(&mut self, stage: PipelineStage) {
        let spec = self.preferences.stage_sort(stage).reversed();
        self.set_stage_sort(stage, spec);
    }

    pub fn set_stage_sort(&mut self, stage: PipelineStage, spec: SortSpec) {
        if spec == SortSpec::default() {
            self.preferences.stage_sorts.remove(&stage);
        } else {
            self.preferences.stage_sorts.insert(stage, spec);
        }
        self.persistence
            .save(STAGE_SORTS_KEY, &self.preferences.stage_sorts);
    }

    pub fn set_filter_panel_visible(&mut self, visible: bool) {
        self.preferences.filter_panel_visible = visible;
        self.persistence.save(FILTER_PANEL_KEY, &visible);
    }

    pub fn toggle_filter_panel(&mut self) {
        let visible = !self.preferences.filter_panel_visible;
        self.set_filter_panel_visible(visible);
    }

    pub fn stage_events(&self, stage: PipelineStage) -> Vec<&EventSummary> {
        views::stage_events(&self.board, &self.preferences, &self.search, stage)
    }

    pub fn board_view(&self) -> Vec<StageColumn<'_>> {
        views::board_view(&self.board, &self.preferences, &self.search)
    }

    pub fn list_events(&self) -> Vec<&EventSummary> {
        views::list_view(&self.board, &self.preferences, &self.search)
    }

    pub fn forecast(&self) -> ForecastView {
        views::forecast_view(&self.board, &self.preferences, &self.search)
    }

    /// The rendering selected by the active view mode.
    pub fn current_view(&self) -> RenderedView<'_> {
        views::render(&self.board, &self.preferences, &self.search)
    }
}
