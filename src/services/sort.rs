//! Pure ordering of event lists.

use std::cmp::Ordering;

use crate::domain::event::EventSummary;
use crate::domain::sort::{SortDirection, SortField, SortSpec};

/// Returns a new sequence ordered by `spec`. The sort is stable, so events
/// with equal keys keep their input order in both directions.
pub fn sort(events: &[EventSummary], spec: SortSpec) -> Vec<EventSummary> {
    let mut sorted = events.to_vec();
    sort_in_place(&mut sorted, spec);
    sorted
}

/// Borrowing variant of [`sort`] used by the views.
pub fn sort_refs(events: &mut [&EventSummary], spec: SortSpec) {
    events.sort_by(|a, b| directed(compare(a, b, spec.field), spec.direction));
}

pub fn sort_in_place(events: &mut [EventSummary], spec: SortSpec) {
    events.sort_by(|a, b| directed(compare(a, b, spec.field), spec.direction));
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Ascending comparison of two events on one field.
pub fn compare(a: &EventSummary, b: &EventSummary, field: SortField) -> Ordering {
    match field {
        SortField::ClientName => compare_text(a.client_name(), b.client_name()),
        SortField::Location => compare_text(a.location_name(), b.location_name()),
        SortField::Assignee => compare_text(a.salesperson_name(), b.salesperson_name()),
        SortField::EventDate => a.event_date.cmp(&b.event_date),
        SortField::Stage => a.stage.cmp(&b.stage),
        SortField::Budget => a.budget_or_zero().total_cmp(&b.budget_or_zero()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::ClientRef;
    use crate::domain::stage::PipelineStage;
    use crate::domain::types::{ClientId, EventId};
    use chrono::{NaiveDate, NaiveDateTime};

    fn created(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2026, 10, day).and_then(|d| d.and_hms_opt(9, 0, 0))
    }

    fn event(id: i32, budget: Option<f64>, day: u32) -> EventSummary {
        let mut event = EventSummary::new(EventId::new(id).unwrap(), PipelineStage::Quoted);
        event.budget = budget;
        event.created_at = created(day);
        event
    }

    fn named(id: i32, name: Option<&str>) -> EventSummary {
        let mut event = event(id, None, 1);
        event.client = name.map(|name| ClientRef {
            id: ClientId::new(id).unwrap(),
            name: name.to_string(),
            phone: None,
            email: None,
        });
        event
    }

    fn ids(events: &[EventSummary]) -> Vec<i32> {
        events.iter().map(|e| e.id.get()).collect()
    }

    #[test]
    fn creation_order_follows_direction() {
        // A created before B.
        let events = vec![event(2, Some(500.0), 3), event(1, Some(1000.0), 1)];
        let asc = sort(&events, SortSpec::asc(SortField::CreatedAt));
        assert_eq!(ids(&asc), vec![1, 2]);
        let desc = sort(&events, SortSpec::desc(SortField::CreatedAt));
        assert_eq!(ids(&desc), vec![2, 1]);
    }

    #[test]
    fn default_spec_is_creation_ascending() {
        let events = vec![event(1, None, 5), event(2, None, 2)];
        assert_eq!(ids(&sort(&events, SortSpec::default())), vec![2, 1]);
    }

    #[test]
    fn names_compare_case_insensitively_with_missing_first() {
        let events = vec![
            named(1, Some("bruno")),
            named(2, Some("Ana")),
            named(3, None),
            named(4, Some("carla")),
        ];
        assert_eq!(
            ids(&sort(&events, SortSpec::asc(SortField::ClientName))),
            vec![3, 2, 1, 4]
        );
    }

    #[test]
    fn missing_budget_sorts_as_zero() {
        let events = vec![
            event(1, Some(300.0), 1),
            event(2, None, 2),
            event(3, Some(-10.0), 3),
        ];
        assert_eq!(
            ids(&sort(&events, SortSpec::asc(SortField::Budget))),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let events = vec![
            event(1, Some(100.0), 1),
            event(2, Some(100.0), 2),
            event(3, Some(50.0), 3),
            event(4, Some(100.0), 4),
        ];
        let asc = sort(&events, SortSpec::asc(SortField::Budget));
        assert_eq!(ids(&asc), vec![3, 1, 2, 4]);
        let desc = sort(&events, SortSpec::desc(SortField::Budget));
        assert_eq!(ids(&desc), vec![1, 2, 4, 3]);
    }

    #[test]
    fn sorting_is_idempotent_and_keeps_every_element() {
        let events = vec![
            event(1, Some(100.0), 9),
            event(2, None, 2),
            event(3, Some(50.0), 3),
        ];
        for field in [
            SortField::ClientName,
            SortField::Location,
            SortField::EventDate,
            SortField::Stage,
            SortField::Budget,
            SortField::Assignee,
            SortField::CreatedAt,
        ] {
            let spec = SortSpec::desc(field);
            let once = sort(&events, spec);
            assert_eq!(sort(&once, spec), once);
            let mut got = ids(&once);
            got.sort();
            assert_eq!(got, vec![1, 2, 3]);
        }
    }

    #[test]
    fn stage_sorts_by_pipeline_order() {
        let mut a = event(1, None, 1);
        a.stage = PipelineStage::Approved;
        let mut b = event(2, None, 1);
        b.stage = PipelineStage::IncomingInquiry;
        assert_eq!(
            ids(&sort(&[a, b], SortSpec::asc(SortField::Stage))),
            vec![2, 1]
        );
    }
}
