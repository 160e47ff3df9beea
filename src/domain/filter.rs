use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{LocationId, UserId};

/// Independently optional constraints applied to the board and list views.
///
/// An absent field imposes no constraint; present fields are combined with
/// logical AND.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterSet {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub location_id: Option<LocationId>,
    pub event_type: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub headcount_min: Option<i32>,
    pub headcount_max: Option<i32>,
    pub assignee_id: Option<UserId>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn location(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn budget(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.budget_min = min;
        self.budget_max = max;
        self
    }

    pub fn headcount(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.headcount_min = min;
        self.headcount_max = max;
        self
    }

    pub fn assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Returns `true` when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of constraints currently set, shown as a badge on the filter
    /// button.
    pub fn active_count(&self) -> usize {
        [
            self.date_from.is_some(),
            self.date_to.is_some(),
            self.location_id.is_some(),
            self.event_type.as_deref().is_some_and(|t| !t.trim().is_empty()),
            self.budget_min.is_some(),
            self.budget_max.is_some(),
            self.headcount_min.is_some(),
            self.headcount_max.is_some(),
            self.assignee_id.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}
