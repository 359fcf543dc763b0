//! Per-process statement counters.
//!
//! The dispatcher reports through [`ProfileEventSink`], injected via the
//! [`Context`](crate::Context). [`ProfileCounters`] keeps local totals and
//! mirrors every increment to the `metrics` recorder installed by the host.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use metrics::counter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileEvent {
    /// Every statement handed to the dispatcher.
    Query,
    /// `SELECT ... [UNION ALL ...]` statements.
    SelectQuery,
    /// `INSERT` statements.
    InsertQuery,
}

impl ProfileEvent {
    pub const ALL: [ProfileEvent; 3] = [
        ProfileEvent::Query,
        ProfileEvent::SelectQuery,
        ProfileEvent::InsertQuery,
    ];

    pub fn metric_name(&self) -> &'static str {
        match self {
            ProfileEvent::Query => "statements_total",
            ProfileEvent::SelectQuery => "statements_select",
            ProfileEvent::InsertQuery => "statements_insert",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ProfileEventSink: Send + Sync {
    fn increment(&self, event: ProfileEvent);
}

#[derive(Debug, Default)]
pub struct ProfileCounters {
    query: AtomicU64,
    select_query: AtomicU64,
    insert_query: AtomicU64,
}

impl ProfileCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, event: ProfileEvent) -> &AtomicU64 {
        match event {
            ProfileEvent::Query => &self.query,
            ProfileEvent::SelectQuery => &self.select_query,
            ProfileEvent::InsertQuery => &self.insert_query,
        }
    }

    pub fn get(&self, event: ProfileEvent) -> u64 {
        self.slot(event).load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> IndexMap<&'static str, u64> {
        ProfileEvent::ALL
            .iter()
            .map(|event| (event.metric_name(), self.get(*event)))
            .collect()
    }
}

impl ProfileEventSink for ProfileCounters {
    fn increment(&self, event: ProfileEvent) {
        self.slot(event).fetch_add(1, Ordering::Relaxed);
        counter!(event.metric_name()).increment(1);
    }
}
