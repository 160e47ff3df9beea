//! SLA notification polling and the unseen badge.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::api::NotificationReader;
use crate::domain::event::SlaStatus;
use crate::domain::notification::{NotificationItem, NotificationSummary};
use crate::domain::types::EventId;
use crate::preferences::{PreferencePersistence, PreferenceStore, SEEN_NOTIFICATIONS_KEY};
use crate::services::errors::ServiceResult;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

const BADGE_CAP: usize = 99;

pub struct NotificationCenter<S: PreferenceStore> {
    summary: NotificationSummary,
    seen: BTreeSet<EventId>,
    persistence: PreferencePersistence<S>,
}

impl<S: PreferenceStore> NotificationCenter<S> {
    /// Restores the ids already acknowledged in a previous session.
    pub fn new(persistence: PreferencePersistence<S>) -> Self {
        let seen = persistence.load(SEEN_NOTIFICATIONS_KEY, BTreeSet::new());
        Self {
            summary: NotificationSummary::default(),
            seen,
            persistence,
        }
    }

    /// Polls the server. A failed poll keeps the previous summary.
    pub fn refresh<R>(&mut self, api: &R) -> ServiceResult<()>
    where
        R: NotificationReader + ?Sized,
    {
        let summary = api.fetch_notifications().map_err(|err| {
            log::warn!("Failed to fetch SLA notifications: {err}");
            err
        })?;
        log::debug!(
            "SLA notifications: {} critical, {} alert",
            summary.critical_count,
            summary.alert_count
        );
        self.summary = summary;
        Ok(())
    }

    pub fn summary(&self) -> &NotificationSummary {
        &self.summary
    }

    pub fn items(&self) -> &[NotificationItem] {
        &self.summary.items
    }

    pub fn critical(&self) -> impl Iterator<Item = &NotificationItem> {
        self.summary
            .items
            .iter()
            .filter(|item| item.sla_status == SlaStatus::Critical)
    }

    pub fn is_seen(&self, event_id: EventId) -> bool {
        self.seen.contains(&event_id)
    }

    pub fn unseen_count(&self) -> usize {
        self.summary
            .items
            .iter()
            .filter(|item| !self.seen.contains(&item.id))
            .count()
    }

    /// Acknowledges every current item. Earlier acknowledgements are kept.
    pub fn mark_all_seen(&mut self) {
        if self.summary.items.is_empty() {
            return;
        }
        self.seen.extend(self.summary.items.iter().map(|item| item.id));
        self.persistence.save(SEEN_NOTIFICATIONS_KEY, &self.seen);
    }

    /// Text of the bell badge, or `None` when there is nothing unseen.
    pub fn badge_label(&self) -> Option<String> {
        match self.unseen_count() {
            0 => None,
            count if count > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
            count => Some(count.to_string()),
        }
    }
}

/// Fixed-interval timer for the notification poll.
#[derive(Clone, Copy, Debug)]
pub struct PollSchedule {
    interval: Duration,
    last: Option<Instant>,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The first poll is due immediately.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Time left until the next poll.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

/// Elapsed time in a stage: `"2d 3h"` from one day on, `"5h"` below.
pub fn format_elapsed(secs: u64) -> String {
    let hours = secs / 3600;
    let days = hours / 24;
    if days >= 1 {
        format!("{days}d {}h", hours % 24)
    } else {
        format!("{hours}h")
    }
}
