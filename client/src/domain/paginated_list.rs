//! Paginated list state machine.
//!
//! [`PaginatedList`] owns the accumulated items and decides when a page
//! request may be issued. It performs no I/O: transitions return a
//! [`PageLoad`] describing the request to make, and the owner reports the
//! outcome through [`PaginatedList::complete`].
//!
//! ```text
//!             activate                 ok, full page
//!   Idle ──────────────▶ LoadingFirstPage ──────────▶ Idle (populated)
//!                          │   ▲ retry                │ near_end
//!                     fail ▼   │                      ▼
//!                         Errored ◀──── fail ──── LoadingNextPage
//!                                                     │ ok, short page
//!                                                     ▼
//!                                                 Exhausted
//! ```
//!
//! At most one load is in flight. Every load carries the list's epoch;
//! [`PaginatedList::refresh`] bumps the epoch so completions of loads issued
//! before the refresh are discarded instead of being appended to the reset
//! list.

use pagination::{PageLimit, PageRequest, infer_has_more};
use tracing::{debug, warn};

use super::{OperationError, ServiceResult};

/// Default size of the first page.
pub const DEFAULT_FIRST_PAGE_LIMIT: u32 = 20;
/// Default size of every following page.
pub const DEFAULT_NEXT_PAGE_LIMIT: u32 = 12;

/// Page sizes used by a [`PaginatedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    first: PageLimit,
    next: PageLimit,
}

impl PageSizes {
    /// Sizes for the first and following pages.
    pub const fn new(first: PageLimit, next: PageLimit) -> Self {
        Self { first, next }
    }

    /// First page size.
    pub const fn first(&self) -> PageLimit {
        self.first
    }

    /// Follow-up page size.
    pub const fn next(&self) -> PageLimit {
        self.next
    }
}

const DEFAULT_PAGE_SIZES: PageSizes = match (
    PageLimit::new(DEFAULT_FIRST_PAGE_LIMIT),
    PageLimit::new(DEFAULT_NEXT_PAGE_LIMIT),
) {
    (Ok(first), Ok(next)) => PageSizes::new(first, next),
    _ => panic!("default page sizes must be valid page limits"),
};

impl Default for PageSizes {
    fn default() -> Self {
        DEFAULT_PAGE_SIZES
    }
}

/// Lifecycle phase of a [`PaginatedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListPhase {
    /// Nothing in flight; populated once the first page has loaded.
    Idle,
    /// The first page is in flight.
    LoadingFirstPage,
    /// A follow-up page is in flight.
    LoadingNextPage,
    /// Populated and the last page came back short.
    Exhausted,
    /// The last load failed; items loaded before it are kept.
    Errored,
}

/// Which page a load fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// Offset zero; replaces the items.
    First,
    /// Continues after the loaded items; appends.
    Next,
}

/// A page request issued by the list, tagged with the epoch it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageLoad {
    epoch: u64,
    kind: LoadKind,
    request: PageRequest,
}

impl PageLoad {
    /// Epoch the load was issued in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Page kind.
    pub fn kind(&self) -> LoadKind {
        self.kind
    }

    /// Offset and limit to fetch.
    pub fn request(&self) -> PageRequest {
        self.request
    }
}

/// What [`PaginatedList::complete`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The page was merged.
    Loaded {
        /// Items in the page.
        received: usize,
    },
    /// The load failed; the list is now [`ListPhase::Errored`].
    Failed(OperationError),
    /// The outcome belonged to a superseded load and was dropped.
    Stale,
}

/// Read-only view of the list's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStatus {
    /// Current phase.
    pub phase: ListPhase,
    /// Number of accumulated items.
    pub len: usize,
    /// Whether a load is in flight.
    pub is_loading: bool,
    /// Whether more pages are expected.
    pub has_more: bool,
    /// Current epoch.
    pub epoch: u64,
}

/// Accumulating, page-at-a-time list.
///
/// ## Invariants
/// - `is_loading()` holds exactly while one load is outstanding.
/// - Items only grow between refreshes; failures never drop items.
#[derive(Debug, Clone)]
pub struct PaginatedList<T> {
    sizes: PageSizes,
    items: Vec<T>,
    phase: ListPhase,
    has_more: bool,
    populated: bool,
    epoch: u64,
    in_flight: Option<PageLoad>,
    failed: Option<PageLoad>,
    last_error: Option<OperationError>,
}

impl<T> PaginatedList<T> {
    /// Empty, idle list.
    pub fn new(sizes: PageSizes) -> Self {
        Self {
            sizes,
            items: Vec::new(),
            phase: ListPhase::Idle,
            has_more: true,
            populated: false,
            epoch: 0,
            in_flight: None,
            failed: None,
            last_error: None,
        }
    }

    /// Accumulated items in load order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current phase.
    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    /// Whether a load is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether another page is expected.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether the first page has loaded since the last refresh.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Error that moved the list to [`ListPhase::Errored`], if still current.
    pub fn last_error(&self) -> Option<&OperationError> {
        self.last_error.as_ref()
    }

    /// Bookkeeping snapshot.
    pub fn status(&self) -> ListStatus {
        ListStatus {
            phase: self.phase,
            len: self.items.len(),
            is_loading: self.is_loading(),
            has_more: self.has_more,
            epoch: self.epoch,
        }
    }

    /// Start the first load of a fresh list.
    ///
    /// Does nothing once the list has been activated; use [`Self::retry`] or
    /// [`Self::refresh`] afterwards.
    pub fn activate(&mut self) -> Option<PageLoad> {
        if self.phase != ListPhase::Idle || self.populated || self.is_loading() {
            return None;
        }
        Some(self.issue(LoadKind::First, PageRequest::first(self.sizes.first)))
    }

    /// React to the presentation's "near the end" signal.
    ///
    /// Issues the next page only when idle, populated and expecting more.
    /// After a failed follow-up page the signal retries it.
    pub fn near_end(&mut self, near: bool) -> Option<PageLoad> {
        if !near || self.is_loading() {
            return None;
        }
        match self.phase {
            ListPhase::Idle if self.populated && self.has_more => {
                let request = PageRequest::after(self.items.len(), self.sizes.next);
                Some(self.issue(LoadKind::Next, request))
            }
            ListPhase::Errored if self.failed.is_some_and(|load| load.kind == LoadKind::Next) => {
                self.retry()
            }
            _ => None,
        }
    }

    /// Re-issue the request that failed.
    pub fn retry(&mut self) -> Option<PageLoad> {
        if self.phase != ListPhase::Errored || self.is_loading() {
            return None;
        }
        let failed = self.failed.take()?;
        Some(self.issue(failed.kind, failed.request))
    }

    /// Drop everything and reload from offset zero.
    ///
    /// Any load still outstanding becomes stale.
    pub fn refresh(&mut self) -> PageLoad {
        self.epoch = self.epoch.wrapping_add(1);
        self.items.clear();
        self.has_more = true;
        self.populated = false;
        self.failed = None;
        self.last_error = None;
        if let Some(stale) = self.in_flight.take() {
            debug!(epoch = stale.epoch, kind = ?stale.kind, "refresh supersedes in-flight load");
        }
        self.issue(LoadKind::First, PageRequest::first(self.sizes.first))
    }

    /// Apply the outcome of `load`.
    pub fn complete(&mut self, load: PageLoad, result: ServiceResult<Vec<T>>) -> Completion {
        if self.in_flight != Some(load) {
            warn!(
                load_epoch = load.epoch,
                current_epoch = self.epoch,
                kind = ?load.kind,
                "discarding stale page completion"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let received = page.len();
                self.has_more = infer_has_more(received, load.request.limit());
                match load.kind {
                    LoadKind::First => self.items = page,
                    LoadKind::Next => self.items.extend(page),
                }
                self.populated = true;
                self.last_error = None;
                self.phase = if self.has_more {
                    ListPhase::Idle
                } else {
                    ListPhase::Exhausted
                };
                debug!(received, total = self.items.len(), has_more = self.has_more, "page merged");
                Completion::Loaded { received }
            }
            Err(err) => {
                debug!(kind = ?load.kind, message = err.message(), "page load failed");
                self.failed = Some(load);
                self.last_error = Some(err.clone());
                self.phase = ListPhase::Errored;
                Completion::Failed(err)
            }
        }
    }

    fn issue(&mut self, kind: LoadKind, request: PageRequest) -> PageLoad {
        let load = PageLoad {
            epoch: self.epoch,
            kind,
            request,
        };
        self.in_flight = Some(load);
        self.phase = match kind {
            LoadKind::First => ListPhase::LoadingFirstPage,
            LoadKind::Next => ListPhase::LoadingNextPage,
        };
        debug!(epoch = self.epoch, %request, "page load issued");
        load
    }
}

#[cfg(test)]
#[path = "paginated_list_tests.rs"]
mod tests;
