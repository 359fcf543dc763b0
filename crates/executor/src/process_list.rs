//! Statements currently executing, for SHOW PROCESSLIST and KILL QUERY.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use indexmap::IndexMap;
use sqlgate_parser::ast::KillFilterColumn;

#[derive(Debug, Clone)]
struct ProcessEntry {
    user: String,
    query: String,
    started: Instant,
    cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub query_id: String,
    pub user: String,
    pub query: String,
    pub elapsed_ms: u64,
    pub is_cancelled: bool,
}

#[derive(Debug, Default)]
pub struct ProcessList {
    entries: Mutex<IndexMap<String, ProcessEntry>>,
    next_id: AtomicU64,
}

impl ProcessList {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, ProcessEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a running statement; it stays listed until the guard drops.
    pub fn register(&self, user: &str, query: &str) -> ProcessGuard<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let query_id = format!("q{}", id);
        self.lock().insert(
            query_id.clone(),
            ProcessEntry {
                user: user.to_string(),
                query: query.to_string(),
                started: Instant::now(),
                cancelled: false,
            },
        );
        ProcessGuard {
            list: self,
            query_id,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<ProcessInfo> {
        self.lock()
            .iter()
            .map(|(query_id, entry)| Self::info(query_id, entry))
            .collect()
    }

    pub fn is_cancelled(&self, query_id: &str) -> bool {
        self.lock().get(query_id).is_some_and(|e| e.cancelled)
    }

    /// Entries whose `column` equals `value`. Unless `dry_run`, they are
    /// marked cancelled; the returned infos reflect the state before marking.
    pub fn cancel_where(
        &self,
        column: KillFilterColumn,
        value: &str,
        dry_run: bool,
    ) -> Vec<ProcessInfo> {
        let mut entries = self.lock();
        let mut matched = Vec::new();
        for (query_id, entry) in entries.iter_mut() {
            let field = match column {
                KillFilterColumn::QueryId => query_id.as_str(),
                KillFilterColumn::User => entry.user.as_str(),
            };
            if field != value {
                continue;
            }
            matched.push(Self::info(query_id, entry));
            if !dry_run {
                entry.cancelled = true;
            }
        }
        matched
    }

    fn info(query_id: &str, entry: &ProcessEntry) -> ProcessInfo {
        ProcessInfo {
            query_id: query_id.to_string(),
            user: entry.user.clone(),
            query: entry.query.clone(),
            elapsed_ms: u64::try_from(entry.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            is_cancelled: entry.cancelled,
        }
    }
}

#[must_use]
pub struct ProcessGuard<'a> {
    list: &'a ProcessList,
    query_id: String,
}

impl ProcessGuard<'_> {
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.list.is_cancelled(&self.query_id)
    }
}

impl Drop for ProcessGuard<'_> {
    fn drop(&mut self) {
        self.list.lock().shift_remove(&self.query_id);
    }
}
