// ── Product store engine ──
//
// The command protocol shared by the catalog and admin stores: every
// command bumps the pending counter and clears error/toast on entry,
// then settles into exactly one of a refreshed view + toast or a
// translated error, leaving prior data untouched on failure.
//
// Overlapping commands are neither serialized nor cancelled. Each one
// settles independently on its own response; under rapid interaction the
// last response to arrive wins, even if it was issued first.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use shopsync_api::{Error, Page, Product, ProductsClient};

use super::cell::StoreCell;
use crate::friendly::friendly_error;

// ── State ────────────────────────────────────────────────────────────

/// Snapshot of a product store.
///
/// `view.page` / `view.limit` reflect the last successfully completed
/// request -- failed commands never touch them.
#[derive(Debug, Clone)]
pub struct ProductsState {
    /// Free-text query; trimmed at request time, stored as typed.
    pub query: String,
    /// The fetched page, in server order.
    pub view: Page<Product>,
    /// Failure message from the last settled command, cleared when the
    /// next request-cycle command starts.
    pub error: Option<String>,
    /// Transient success notice from the last mutating command.
    pub toast: Option<String>,
    pending: u32,
}

impl ProductsState {
    fn new(limit: u32) -> Self {
        Self {
            query: String::new(),
            view: Page::empty(limit),
            error: None,
            toast: None,
            pending: 0,
        }
    }

    /// `true` while at least one command is outstanding.
    pub fn loading(&self) -> bool {
        self.pending > 0
    }
}

// ── Engine ───────────────────────────────────────────────────────────

/// Shared implementation behind [`CatalogStore`](super::CatalogStore)
/// and [`AdminStore`](super::AdminStore). The two public stores differ
/// only in default page size and which commands they expose.
pub(crate) struct ProductStore {
    api: ProductsClient,
    cell: StoreCell<ProductsState>,
}

impl ProductStore {
    pub(crate) fn new(api: ProductsClient, default_limit: u32) -> Self {
        Self {
            api,
            cell: StoreCell::new(ProductsState::new(default_limit)),
        }
    }

    pub(crate) fn api(&self) -> &ProductsClient {
        &self.api
    }

    // ── Views ────────────────────────────────────────────────────────

    pub(crate) fn state(&self) -> ProductsState {
        self.cell.snapshot()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<ProductsState> {
        self.cell.subscribe()
    }

    pub(crate) fn stream(&self) -> WatchStream<ProductsState> {
        self.cell.stream()
    }

    pub(crate) fn current_page(&self) -> u32 {
        self.cell.snapshot().view.page
    }

    pub(crate) fn current_limit(&self) -> u32 {
        self.cell.snapshot().view.limit
    }

    // ── Command protocol ─────────────────────────────────────────────

    /// Start a request-cycle command: mark it pending and drop whatever
    /// the previous command left behind, before the outcome is known.
    pub(crate) fn begin(&self) {
        self.cell.update(|s| {
            s.pending += 1;
            s.error = None;
            s.toast = None;
        });
    }

    /// Settle a failed command. Data, page, and limit stay untouched.
    pub(crate) fn fail(&self, err: &Error) {
        let message = friendly_error(err);
        debug!("command failed: {message}");
        self.cell.update(|s| {
            s.pending = s.pending.saturating_sub(1);
            s.error = Some(message);
        });
    }

    /// Settle a successful command by replacing the whole view.
    fn succeed_view(&self, view: Page<Product>, toast: Option<&str>) {
        self.cell.update(|s| {
            s.pending = s.pending.saturating_sub(1);
            s.view = view;
            s.toast = toast.map(str::to_owned);
        });
    }

    /// Settle a successful mutation by replacing the matching item
    /// in place. Page identity and ordering are unaffected by a field
    /// edit, so no reload happens here.
    pub(crate) fn succeed_item(&self, updated: Product, toast: &str) {
        self.cell.update(|s| {
            s.pending = s.pending.saturating_sub(1);
            for item in &mut s.view.items {
                if item.id == updated.id {
                    *item = updated;
                    break;
                }
            }
            s.toast = Some(toast.to_owned());
        });
    }

    // ── Shared commands ──────────────────────────────────────────────

    /// Update the query text. Pure state change: no request is issued,
    /// and the caller decides when to reload.
    pub(crate) fn set_query(&self, q: &str) {
        self.cell.update(|s| s.query = q.to_owned());
    }

    /// Fetch a page: search when the trimmed query is non-empty,
    /// otherwise plain list.
    async fn fetch(&self, page: u32, limit: u32) -> Result<Page<Product>, Error> {
        let query = self.cell.snapshot().query;
        let term = query.trim();
        if term.is_empty() {
            self.api.list(page, limit).await
        } else {
            self.api.search(term, page, limit).await
        }
    }

    /// Load a page of the collection.
    ///
    /// On success the stored page/limit come from the server's echoed
    /// values, not the requested ones -- the server may clamp an
    /// out-of-range page and the view follows it.
    pub(crate) async fn load(&self, page: u32, limit: u32) {
        self.begin();
        match self.fetch(page, limit).await {
            Ok(view) => self.succeed_view(view, None),
            Err(err) => self.fail(&err),
        }
    }

    /// Finish a mutating command with an internal refetch: the view is
    /// reconciled against the server and the toast survives, because the
    /// refetch belongs to the same command, not a new one.
    pub(crate) async fn settle_with_refetch(&self, page: u32, limit: u32, toast: &str) {
        match self.fetch(page, limit).await {
            Ok(view) => self.succeed_view(view, Some(toast)),
            Err(err) => self.fail(&err),
        }
    }
}
