use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use backoffice_domain::{ErrorReport, ErrorSummary};
use tracing::debug;

/// Number of reports retained before the oldest are evicted.
pub const ERROR_BUFFER_CAPACITY: usize = 50;

/// Number of reports returned in a summary's `recent` list.
pub const RECENT_REPORT_COUNT: usize = 5;

/// Bounded in-process sink for failure reports.
///
/// Constructed once at startup and shared behind an `Arc`. Capturing never
/// fails and never panics on a poisoned lock.
#[derive(Debug)]
pub struct ErrorAggregator {
    reports: Mutex<VecDeque<ErrorReport>>,
    capacity: usize,
}

impl Default for ErrorAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorAggregator {
    /// Creates an empty aggregator holding up to [`ERROR_BUFFER_CAPACITY`] reports.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(ERROR_BUFFER_CAPACITY)
    }

    /// Creates an empty aggregator with a custom capacity of at least one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            reports: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends a report, evicting the oldest entries beyond capacity.
    pub fn capture(&self, report: ErrorReport) {
        debug!(
            kind = report.kind.as_str(),
            hint = ?report.hint(),
            source_url = %report.source_url,
            "captured error report"
        );

        let mut reports = self.lock();
        reports.push_back(report);
        while reports.len() > self.capacity {
            reports.pop_front();
        }
    }

    /// Returns totals per kind and the most recent reports in arrival order.
    #[must_use]
    pub fn summary(&self) -> ErrorSummary {
        let reports = self.lock();

        let mut by_type = BTreeMap::new();
        for report in reports.iter() {
            *by_type.entry(report.kind).or_insert(0) += 1;
        }

        let recent_start = reports.len().saturating_sub(RECENT_REPORT_COUNT);
        ErrorSummary {
            total: reports.len(),
            by_type,
            recent: reports.iter().skip(recent_start).cloned().collect(),
        }
    }

    /// Returns every retained report in arrival order.
    #[must_use]
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.lock().iter().cloned().collect()
    }

    /// Drops every retained report and returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut reports = self.lock();
        let dropped = reports.len();
        reports.clear();
        dropped
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ErrorReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
