//! # Recording List State
//!
//! The paged crop list on the recording screen: recently used crops first,
//! filtered by the search box, extended page by page.
//!
//! ## Refresh vs Load More
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  refresh("zin")                                                         │
//! │    begin() → ticket #4        loading = true, has_more = true           │
//! │    query offset 0 ─────────────────────────────► apply if #4 current   │
//! │                                                                         │
//! │  load_more()                                                            │
//! │    current() → ticket #4      loading_more = true                       │
//! │    query offset crops.len() ───────────────────► append if #4 current  │
//! │                                                                         │
//! │  refresh("zinn") while either is in flight                              │
//! │    begin() → ticket #5        older results are dropped on arrival      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Degradation
//! A failed refresh leaves an empty list with `loading = false`; a failed
//! page load stops paging (`has_more = false`). Both are logged with `warn!`
//! and never surface as errors.
//!
//! ## Thread Safety
//! The view sits behind a `Mutex` that is only held for short, synchronous
//! updates, never across a query.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, warn};

use flowerfarm_core::{Crop, Page, RequestSequence, RequestTicket};
use flowerfarm_db::{Database, DbResult};

/// What the recording screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingView {
    pub crops: Vec<Crop>,
    pub search: Option<String>,
    pub loading: bool,
    pub loading_more: bool,
    pub has_more: bool,
}

impl Default for RecordingView {
    fn default() -> Self {
        RecordingView {
            crops: Vec::new(),
            search: None,
            loading: true,
            loading_more: false,
            has_more: true,
        }
    }
}

/// Recording list with stale-result suppression.
#[derive(Debug, Clone)]
pub struct RecordingList {
    page_size: u32,
    sequence: Arc<RequestSequence>,
    view: Arc<Mutex<RecordingView>>,
}

impl RecordingList {
    /// Creates an empty list that loads `page_size` crops at a time.
    pub fn new(page_size: u32) -> Self {
        RecordingList {
            page_size,
            sequence: Arc::new(RequestSequence::new()),
            view: Arc::new(Mutex::new(RecordingView::default())),
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// A copy of the current view.
    pub fn snapshot(&self) -> RecordingView {
        self.with_view(|view| view.clone())
    }

    /// Reloads the first page for `search`, superseding any query in flight.
    pub async fn refresh(&self, db: &Database, search: Option<&str>) -> RecordingView {
        let ticket = self.begin_refresh(search);
        let result = db.recent().list_for_recording(search, self.page_size, 0).await;
        self.apply_refresh(ticket, result);
        self.snapshot()
    }

    /// Appends the next page.
    ///
    /// Does nothing while a page is already loading or when the last page
    /// has been reached.
    pub async fn load_more(&self, db: &Database) -> RecordingView {
        let Some((ticket, search, offset)) = self.begin_load_more() else {
            return self.snapshot();
        };
        let result = db
            .recent()
            .list_for_recording(search.as_deref(), self.page_size, offset)
            .await;
        self.apply_load_more(ticket, result);
        self.snapshot()
    }

    // =========================================================================
    // Request Lifecycle
    // =========================================================================

    /// Starts a refresh and returns its ticket.
    pub fn begin_refresh(&self, search: Option<&str>) -> RequestTicket {
        let ticket = self.sequence.begin();
        self.with_view_mut(|view| {
            view.search = search.map(str::to_string);
            view.loading = true;
            view.loading_more = false;
            view.has_more = true;
        });
        debug!(ticket = ticket.value(), ?search, "Recording refresh started");
        ticket
    }

    /// Applies a refresh result if its ticket is still current.
    ///
    /// Returns false when the result was stale and dropped.
    pub fn apply_refresh(&self, ticket: RequestTicket, result: DbResult<Page<Crop>>) -> bool {
        if !self.sequence.is_current(ticket) {
            debug!(ticket = ticket.value(), "Dropping stale recording refresh");
            return false;
        }

        self.with_view_mut(|view| {
            match result {
                Ok(page) => {
                    view.crops = page.page;
                    view.has_more = page.has_more;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load recording list");
                    view.crops.clear();
                }
            }
            view.loading = false;
        });
        true
    }

    /// Claims the next page: its ticket, search and offset.
    fn begin_load_more(&self) -> Option<(RequestTicket, Option<String>, u32)> {
        self.with_view_mut(|view| {
            if view.loading || view.loading_more || !view.has_more {
                return None;
            }
            view.loading_more = true;
            let offset = u32::try_from(view.crops.len()).unwrap_or(u32::MAX);
            Some((self.sequence.current(), view.search.clone(), offset))
        })
    }

    /// Appends a page if no refresh started since it was requested.
    fn apply_load_more(&self, ticket: RequestTicket, result: DbResult<Page<Crop>>) -> bool {
        if !self.sequence.is_current(ticket) {
            debug!(ticket = ticket.value(), "Dropping stale recording page");
            return false;
        }

        self.with_view_mut(|view| {
            match result {
                Ok(page) => {
                    view.crops.extend(page.page);
                    view.has_more = page.has_more;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load next recording page");
                    view.has_more = false;
                }
            }
            view.loading_more = false;
        });
        true
    }

    fn with_view<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RecordingView) -> R,
    {
        let view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&view)
    }

    fn with_view_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut RecordingView) -> R,
    {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut view)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
