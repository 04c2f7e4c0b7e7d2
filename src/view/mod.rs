pub mod export;
pub mod filter;
pub mod html;
pub mod notify;
pub mod render;
pub mod table;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, RwLock};

use crate::models::Partido;
use filter::FilterSnapshot;
use notify::NotificationCenter;
use render::{render_rows, FixtureRow, FIXTURE_HEADERS};
use table::{SortDirection, Table, TableError};

pub type SharedView = Arc<RwLock<FixtureView>>;

/// Counters describing how the table got to its current state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStatus {
    pub last_applied_seq: u64,
    pub accepted: u64,
    pub discarded_stale: u64,
    pub failed: u64,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// The fixture page: table body, the filter inputs that shape it, and alerts.
pub struct FixtureView {
    table: Table<FixtureRow>,
    filter: Option<FilterSnapshot>,
    search: Option<String>,
    notifications: NotificationCenter,
    status: SyncStatus,
    active: bool,
    applied_tx: watch::Sender<u64>,
}

impl Default for FixtureView {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureView {
    pub fn new() -> Self {
        let (applied_tx, _) = watch::channel(0);
        Self {
            table: Table::new(FIXTURE_HEADERS).with_unsortable(render::columns::ACCIONES),
            filter: None,
            search: None,
            notifications: NotificationCenter::default(),
            status: SyncStatus::default(),
            active: true,
            applied_tx,
        }
    }

    pub fn shared(self) -> SharedView {
        Arc::new(RwLock::new(self))
    }

    /// Receives the sequence number of every accepted rebuild.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.applied_tx.subscribe()
    }

    /// Rebuild the body from a fetch result tagged with `seq`.
    ///
    /// Results older than the last applied one are dropped, so a slow
    /// response can never overwrite newer data. Returns whether it was applied.
    pub fn accept(&mut self, seq: u64, partidos: &[Partido]) -> bool {
        if !self.active {
            tracing::debug!(seq, "Fixture view torn down, dropping response");
            return false;
        }
        if seq <= self.status.last_applied_seq {
            tracing::debug!(
                seq,
                latest = self.status.last_applied_seq,
                "Discarding stale fixture response"
            );
            self.status.discarded_stale += 1;
            return false;
        }

        self.table.replace_rows(render_rows(partidos));
        self.reapply_visibility();

        self.status.last_applied_seq = seq;
        self.status.accepted += 1;
        self.status.last_synced_at = Some(Utc::now());
        self.applied_tx.send_replace(seq);

        tracing::info!(seq, rows = partidos.len(), "Fixture table rebuilt");
        true
    }

    pub fn record_failure(&mut self) {
        self.status.failed += 1;
    }

    /// Store the filter controls and apply them; they persist across rebuilds.
    pub fn set_filter(&mut self, snapshot: FilterSnapshot) {
        self.filter = Some(snapshot);
        self.reapply_visibility();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_lowercase())
        };
        self.reapply_visibility();
    }

    pub fn filter(&self) -> Option<&FilterSnapshot> {
        self.filter.as_ref()
    }

    pub fn sort_by(&mut self, column: usize) -> Result<SortDirection, TableError> {
        self.table.sort_by(column)
    }

    /// Search decides visibility first; the filter then hides what it rejects.
    fn reapply_visibility(&mut self) {
        self.table.search(self.search.as_deref().unwrap_or(""));
        if let Some(filter) = &self.filter {
            for row in self.table.rows_mut() {
                if !filter.matches(&row.attrs) {
                    row.visible = false;
                }
            }
        }
    }

    /// Leave the fixture view: later responses are ignored and filter state is dropped.
    pub fn teardown(&mut self) {
        self.active = false;
        self.filter = None;
        self.search = None;
        self.notifications.clear();
        tracing::info!("Fixture view torn down");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn table(&self) -> &Table<FixtureRow> {
        &self.table
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn find_row(&self, partido_id: &str) -> Option<&FixtureRow> {
        self.table
            .rows()
            .iter()
            .find(|r| r.detail.partido_id == partido_id)
    }
}
