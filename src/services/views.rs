//! The three renderings of the pipeline. Each one runs the same filter and
//! sort engines over the board snapshot.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::board::{BoardSnapshot, StageTotals};
use crate::domain::event::EventSummary;
use crate::domain::preferences::{ViewMode, ViewPreferences};
use crate::domain::stage::PipelineStage;
use crate::services::filter::filter_refs;
use crate::services::sort::sort_refs;

/// Share of the open pipeline amount expected to convert.
pub const FORECAST_WEIGHT: f64 = 0.6;

/// One kanban column. `totals` are the server figures for the whole column,
/// not a count of the filtered cards.
#[derive(Debug, PartialEq)]
pub struct StageColumn<'a> {
    pub stage: PipelineStage,
    pub totals: StageTotals,
    pub events: Vec<&'a EventSummary>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonthForecast {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForecastView {
    pub total_count: usize,
    pub total_amount: f64,
    pub weighted_amount: f64,
    /// Filtered events grouped by the month they take place in.
    pub months: Vec<MonthForecast>,
    /// Filtered events without a date.
    pub undated: MonthForecast,
}

#[derive(Debug, PartialEq)]
pub enum RenderedView<'a> {
    Board(Vec<StageColumn<'a>>),
    List(Vec<&'a EventSummary>),
    Forecast(ForecastView),
}

impl RenderedView<'_> {
    pub fn mode(&self) -> ViewMode {
        match self {
            RenderedView::Board(_) => ViewMode::Board,
            RenderedView::List(_) => ViewMode::List,
            RenderedView::Forecast(_) => ViewMode::Forecast,
        }
    }
}

/// Filtered events of one column in the column's sort order.
pub fn stage_events<'a>(
    board: &'a BoardSnapshot,
    preferences: &ViewPreferences,
    query: &str,
    stage: PipelineStage,
) -> Vec<&'a EventSummary> {
    let mut events = filter_refs(board.events(stage), &preferences.filters, query);
    sort_refs(&mut events, preferences.stage_sort(stage));
    events
}

pub fn board_view<'a>(
    board: &'a BoardSnapshot,
    preferences: &ViewPreferences,
    query: &str,
) -> Vec<StageColumn<'a>> {
    PipelineStage::ALL
        .into_iter()
        .map(|stage| StageColumn {
            stage,
            totals: board.stage_totals(stage),
            events: stage_events(board, preferences, query, stage),
        })
        .collect()
}

/// Every filtered event on the board as one flat list.
pub fn list_view<'a>(
    board: &'a BoardSnapshot,
    preferences: &ViewPreferences,
    query: &str,
) -> Vec<&'a EventSummary> {
    let mut events = filter_refs(board.iter(), &preferences.filters, query);
    sort_refs(&mut events, preferences.list_sort);
    events
}

pub fn forecast_view(
    board: &BoardSnapshot,
    preferences: &ViewPreferences,
    query: &str,
) -> ForecastView {
    let grand = board.grand_totals();
    let mut months: BTreeMap<(i32, u32), MonthForecast> = BTreeMap::new();
    let mut undated = MonthForecast::default();

    for event in filter_refs(board.iter(), &preferences.filters, query) {
        let bucket = match event.event_date {
            Some(date) => months
                .entry((date.year(), date.month()))
                .or_insert_with(|| MonthForecast {
                    year: date.year(),
                    month: date.month(),
                    ..MonthForecast::default()
                }),
            None => &mut undated,
        };
        bucket.count += 1;
        bucket.amount += event.budget_or_zero();
    }

    ForecastView {
        total_count: grand.count,
        total_amount: grand.amount,
        weighted_amount: (grand.amount * FORECAST_WEIGHT).round(),
        months: months.into_values().collect(),
        undated,
    }
}

/// Dispatches on the active view mode.
pub fn render<'a>(
    board: &'a BoardSnapshot,
    preferences: &ViewPreferences,
    query: &str,
) -> RenderedView<'a> {
    match preferences.view_mode {
        ViewMode::Board => RenderedView::Board(board_view(board, preferences, query)),
        ViewMode::List => RenderedView::List(list_view(board, preferences, query)),
        ViewMode::Forecast => RenderedView::Forecast(forecast_view(board, preferences, query)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::FilterSet;
    use crate::domain::sort::{SortField, SortSpec};
    use crate::domain::types::EventId;
    use chrono::NaiveDate;

    fn event(id: i32, stage: PipelineStage, budget: f64, date: Option<(i32, u32, u32)>) -> EventSummary {
        let mut event = EventSummary::new(EventId::new(id).unwrap(), stage);
        event.budget = Some(budget);
        event.event_date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        event
    }

    fn board() -> BoardSnapshot {
        let mut board = BoardSnapshot::default();
        board.push(
            PipelineStage::Quoted,
            event(1, PipelineStage::Quoted, 1000.0, Some((2026, 11, 3))),
        );
        board.push(
            PipelineStage::Quoted,
            event(2, PipelineStage::Quoted, 500.0, Some((2026, 11, 20))),
        );
        board.push(
            PipelineStage::Assigned,
            event(3, PipelineStage::Assigned, 250.0, None),
        );
        board.totals.insert(
            PipelineStage::Quoted,
            StageTotals {
                count: 2,
                amount: 1500.0,
            },
        );
        board.totals.insert(
            PipelineStage::Assigned,
            StageTotals {
                count: 1,
                amount: 250.0,
            },
        );
        board
    }

    #[test]
    fn board_view_keeps_server_totals_when_filtered() {
        let board = board();
        let prefs = ViewPreferences {
            filters: FilterSet::new().budget(Some(600.0), None),
            ..ViewPreferences::default()
        };
        let columns = board_view(&board, &prefs, "");
        assert_eq!(columns.len(), PipelineStage::ALL.len());

        let quoted = columns
            .iter()
            .find(|c| c.stage == PipelineStage::Quoted)
            .unwrap();
        assert_eq!(quoted.events.len(), 1);
        assert_eq!(quoted.totals.count, 2);
        assert_eq!(quoted.totals.amount, 1500.0);
    }

    #[test]
    fn list_view_flattens_and_sorts() {
        let board = board();
        let prefs = ViewPreferences {
            list_sort: SortSpec::desc(SortField::Budget),
            ..ViewPreferences::default()
        };
        let ids: Vec<i32> = list_view(&board, &prefs, "")
            .iter()
            .map(|e| e.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn forecast_groups_by_month_and_weights_totals() {
        let board = board();
        let forecast = forecast_view(&board, &ViewPreferences::default(), "");
        assert_eq!(forecast.total_count, 3);
        assert_eq!(forecast.total_amount, 1750.0);
        assert_eq!(forecast.weighted_amount, 1050.0);
        assert_eq!(forecast.months.len(), 1);
        assert_eq!(forecast.months[0].count, 2);
        assert_eq!(forecast.months[0].amount, 1500.0);
        assert_eq!(forecast.undated.count, 1);
    }

    #[test]
    fn render_dispatches_on_view_mode() {
        let board = board();
        for mode in [ViewMode::Board, ViewMode::List, ViewMode::Forecast] {
            let prefs = ViewPreferences {
                view_mode: mode,
                ..ViewPreferences::default()
            };
            assert_eq!(render(&board, &prefs, "").mode(), mode);
        }
    }
}
