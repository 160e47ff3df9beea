use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::event::EventSummary;
use crate::domain::stage::PipelineStage;
use crate::domain::types::EventId;

/// Aggregate reported by the server for one column.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StageTotals {
    pub count: usize,
    pub amount: f64,
}

/// Where a card sits on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPosition {
    pub stage: PipelineStage,
    pub index: usize,
}

impl BoardPosition {
    pub fn new(stage: PipelineStage, index: usize) -> Self {
        Self { stage, index }
    }
}

/// Events grouped by stage together with the server-side totals.
///
/// Stages missing from the payload are treated as empty columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardSnapshot {
    pub stages: BTreeMap<PipelineStage, Vec<EventSummary>>,
    pub totals: BTreeMap<PipelineStage, StageTotals>,
}

impl BoardSnapshot {
    pub fn events(&self, stage: PipelineStage) -> &[EventSummary] {
        self.stages.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stage_totals(&self, stage: PipelineStage) -> StageTotals {
        self.totals.get(&stage).copied().unwrap_or_default()
    }

    /// All events in board order: stage by stage, then position.
    pub fn iter(&self) -> impl Iterator<Item = &EventSummary> {
        self.stages.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the current position of an event.
    pub fn locate(&self, event_id: EventId) -> Option<BoardPosition> {
        self.stages.iter().find_map(|(stage, events)| {
            events
                .iter()
                .position(|event| event.id == event_id)
                .map(|index| BoardPosition::new(*stage, index))
        })
    }

    pub fn get(&self, event_id: EventId) -> Option<&EventSummary> {
        self.iter().find(|event| event.id == event_id)
    }

    /// Removes the event from the given stage, returning it when present.
    pub fn take(&mut self, stage: PipelineStage, event_id: EventId) -> Option<EventSummary> {
        let events = self.stages.get_mut(&stage)?;
        let index = events.iter().position(|event| event.id == event_id)?;
        Some(events.remove(index))
    }

    /// Appends the event to the end of the given stage.
    pub fn push(&mut self, stage: PipelineStage, event: EventSummary) {
        self.stages.entry(stage).or_default().push(event);
    }

    /// Replaces the stored copy of an event in place.
    pub fn replace(&mut self, event: EventSummary) -> bool {
        for events in self.stages.values_mut() {
            if let Some(slot) = events.iter_mut().find(|e| e.id == event.id) {
                *slot = event;
                return true;
            }
        }
        false
    }

    /// Sum of the server totals over every stage.
    pub fn grand_totals(&self) -> StageTotals {
        self.totals
            .values()
            .fold(StageTotals::default(), |acc, totals| StageTotals {
                count: acc.count + totals.count,
                amount: acc.amount + totals.amount,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i32, stage: PipelineStage) -> EventSummary {
        EventSummary::new(EventId::new(id).unwrap(), stage)
    }

    #[test]
    fn locate_take_and_push() {
        let mut board = BoardSnapshot::default();
        board.push(PipelineStage::Assigned, event(1, PipelineStage::Assigned));
        board.push(PipelineStage::Assigned, event(2, PipelineStage::Assigned));

        let id = EventId::new(2).unwrap();
        assert_eq!(
            board.locate(id),
            Some(BoardPosition::new(PipelineStage::Assigned, 1))
        );

        let taken = board.take(PipelineStage::Assigned, id).unwrap();
        board.push(PipelineStage::Quoted, taken);
        assert_eq!(
            board.locate(id),
            Some(BoardPosition::new(PipelineStage::Quoted, 0))
        );
        assert_eq!(board.len(), 2);
        assert!(board.take(PipelineStage::Assigned, id).is_none());
    }

    #[test]
    fn grand_totals_sum_server_figures() {
        let mut board = BoardSnapshot::default();
        board.totals.insert(
            PipelineStage::Quoted,
            StageTotals {
                count: 2,
                amount: 1500.0,
            },
        );
        board.totals.insert(
            PipelineStage::Approved,
            StageTotals {
                count: 1,
                amount: 500.0,
            },
        );
        assert_eq!(
            board.grand_totals(),
            StageTotals {
                count: 3,
                amount: 2000.0
            }
        );
        assert_eq!(board.stage_totals(PipelineStage::Rejected), StageTotals::default());
    }
}
