//! Pure filtering of event lists.

use crate::domain::event::EventSummary;
use crate::domain::filter::FilterSet;

/// Keeps the events satisfying every present constraint of `filters` and the
/// free-text `query`. Relative order is preserved.
pub fn filter(events: &[EventSummary], filters: &FilterSet, query: &str) -> Vec<EventSummary> {
    let query = normalize_query(query);
    events
        .iter()
        .filter(|event| passes(event, filters, query.as_deref()))
        .cloned()
        .collect()
}

/// Borrowing variant of [`filter`] used by the views.
pub fn filter_refs<'a, I>(events: I, filters: &FilterSet, query: &str) -> Vec<&'a EventSummary>
where
    I: IntoIterator<Item = &'a EventSummary>,
{
    let query = normalize_query(query);
    events
        .into_iter()
        .filter(|event| passes(event, filters, query.as_deref()))
        .collect()
}

/// Whether a single event passes the filters and the free-text query.
pub fn matches(event: &EventSummary, filters: &FilterSet, query: &str) -> bool {
    passes(event, filters, normalize_query(query).as_deref())
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn passes(event: &EventSummary, filters: &FilterSet, query: Option<&str>) -> bool {
    matches_filters(event, filters) && query.is_none_or(|q| matches_text(event, q))
}

/// Events without a date fail any date bound. Missing budget and headcount
/// read as zero.
fn matches_filters(event: &EventSummary, filters: &FilterSet) -> bool {
    if let Some(from) = filters.date_from
        && event.event_date.is_none_or(|date| date < from)
    {
        return false;
    }
    if let Some(to) = filters.date_to
        && event.event_date.is_none_or(|date| date > to)
    {
        return false;
    }
    if let Some(location_id) = filters.location_id
        && event.location.as_ref().map(|l| l.id) != Some(location_id)
    {
        return false;
    }
    if let Some(wanted) = filters
        .event_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        && !event
            .event_type
            .as_deref()
            .is_some_and(|t| t.trim().to_lowercase() == wanted)
    {
        return false;
    }
    if let Some(min) = filters.budget_min
        && event.budget_or_zero() < min
    {
        return false;
    }
    if let Some(max) = filters.budget_max
        && event.budget_or_zero() > max
    {
        return false;
    }
    if let Some(min) = filters.headcount_min
        && event.headcount_or_zero() < min
    {
        return false;
    }
    if let Some(max) = filters.headcount_max
        && event.headcount_or_zero() > max
    {
        return false;
    }
    if let Some(assignee_id) = filters.assignee_id
        && event.salesperson.as_ref().map(|s| s.id) != Some(assignee_id)
    {
        return false;
    }
    true
}

/// `query` is already lower-cased.
fn matches_text(event: &EventSummary, query: &str) -> bool {
    let date = event
        .event_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let title = event.display_title();

    [
        event.client_name(),
        event.client_phone(),
        event.client_email(),
        event.location_name(),
        date.as_str(),
        title.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{ClientRef, LocationRef, SalespersonRef};
    use crate::domain::stage::PipelineStage;
    use crate::domain::types::{ClientId, EventId, LocationId, UserId};
    use chrono::NaiveDate;

    fn event(id: i32, budget: Option<f64>) -> EventSummary {
        let mut event = EventSummary::new(EventId::new(id).unwrap(), PipelineStage::Quoted);
        event.budget = budget;
        event
    }

    fn sample() -> Vec<EventSummary> {
        let mut a = event(1, Some(1000.0));
        a.location = Some(LocationRef {
            id: LocationId::new(7).unwrap(),
            name: "Costa7070".to_string(),
            color: None,
        });
        a.client = Some(ClientRef {
            id: ClientId::new(1).unwrap(),
            name: "Lucía Gómez".to_string(),
            phone: Some("+54 11 5555 0001".to_string()),
            email: Some("lucia@example.com".to_string()),
        });
        a.event_date = NaiveDate::from_ymd_opt(2026, 12, 5);
        a.event_type = Some("Social".to_string());
        a.headcount = Some(80);
        a.salesperson = Some(SalespersonRef {
            id: UserId::new(3).unwrap(),
            name: "Marcos".to_string(),
            email: None,
        });

        let mut b = event(2, Some(500.0));
        b.event_date = NaiveDate::from_ymd_opt(2026, 11, 1);
        b.event_type = Some("corporativo".to_string());
        b.headcount = Some(20);

        let c = event(3, None);
        vec![a, b, c]
    }

    fn ids(events: &[EventSummary]) -> Vec<i32> {
        events.iter().map(|e| e.id.get()).collect()
    }

    #[test]
    fn empty_filters_are_identity() {
        let events = sample();
        assert_eq!(filter(&events, &FilterSet::default(), ""), events);
        assert_eq!(filter(&events, &FilterSet::default(), "   "), events);
    }

    #[test]
    fn budget_minimum_excludes_cheaper_and_missing_budgets() {
        let events = sample();
        let filters = FilterSet::new().budget(Some(600.0), None);
        assert_eq!(ids(&filter(&events, &filters, "")), vec![1]);
    }

    #[test]
    fn budget_maximum_keeps_missing_budget_as_zero() {
        let events = sample();
        let filters = FilterSet::new().budget(None, Some(600.0));
        assert_eq!(ids(&filter(&events, &filters, "")), vec![2, 3]);
    }

    #[test]
    fn free_text_matches_location_case_insensitively() {
        let events = sample();
        assert_eq!(ids(&filter(&events, &FilterSet::default(), "costa")), vec![1]);
        assert_eq!(ids(&filter(&events, &FilterSet::default(), "COSTA")), vec![1]);
    }

    #[test]
    fn free_text_searches_phone_email_and_date() {
        let events = sample();
        let none = FilterSet::default();
        assert_eq!(ids(&filter(&events, &none, "5555 0001")), vec![1]);
        assert_eq!(ids(&filter(&events, &none, "LUCIA@")), vec![1]);
        assert_eq!(ids(&filter(&events, &none, "2026-11")), vec![2]);
    }

    #[test]
    fn free_text_is_anded_with_filters() {
        let events = sample();
        let filters = FilterSet::new().budget(None, Some(600.0));
        assert!(filter(&events, &filters, "costa").is_empty());
    }

    #[test]
    fn date_range_is_inclusive_and_drops_undated_events() {
        let events = sample();
        let filters = FilterSet::new().date_range(
            NaiveDate::from_ymd_opt(2026, 11, 1),
            NaiveDate::from_ymd_opt(2026, 12, 5),
        );
        assert_eq!(ids(&filter(&events, &filters, "")), vec![1, 2]);

        let filters = FilterSet::new().date_range(NaiveDate::from_ymd_opt(2026, 11, 2), None);
        assert_eq!(ids(&filter(&events, &filters, "")), vec![1]);
    }

    #[test]
    fn location_type_headcount_and_assignee_constraints() {
        let events = sample();
        let by_location = FilterSet::new().location(LocationId::new(7).unwrap());
        assert_eq!(ids(&filter(&events, &by_location, "")), vec![1]);

        let by_type = FilterSet::new().event_type("CORPORATIVO");
        assert_eq!(ids(&filter(&events, &by_type, "")), vec![2]);

        let by_headcount = FilterSet::new().headcount(Some(10), Some(50));
        assert_eq!(ids(&filter(&events, &by_headcount, "")), vec![2]);

        let by_assignee = FilterSet::new().assignee(UserId::new(3).unwrap());
        assert_eq!(ids(&filter(&events, &by_assignee, "")), vec![1]);
    }

    #[test]
    fn type_constraint_folds_case_beyond_ascii() {
        let mut events = sample();
        events[2].event_type = Some("Cumpleaños".to_string());

        for wanted in ["CUMPLEAÑOS", "cumpleaños", " Cumpleaños "] {
            let by_type = FilterSet::new().event_type(wanted);
            assert_eq!(ids(&filter(&events, &by_type, "")), vec![3]);
        }

        let other_type = FilterSet::new().event_type("CUMPLEANOS");
        assert!(filter(&events, &other_type, "").is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let events = sample();
        let filters = FilterSet::new().budget(None, Some(2000.0));
        let once = filter(&events, &filters, "");
        let twice = filter(&once, &filters, "");
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![1, 2, 3]);
    }
}
