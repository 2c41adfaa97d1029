// ── Catalog store ──
//
// Browsing and purchasing: the customer-facing slice of the product
// collection. Default page size 12 (card grid).

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use shopsync_api::ProductsClient;

use super::products::{ProductStore, ProductsState};

const DEFAULT_LIMIT: u32 = 12;

/// Reactive store for the public catalog: paginated browsing, free-text
/// search, and purchase.
///
/// Purchase requires an authenticated session; this store does not check
/// that itself -- the admission layer is expected to have consulted the
/// session store's predicates before letting the command through.
pub struct CatalogStore {
    inner: ProductStore,
}

impl CatalogStore {
    pub fn new(api: ProductsClient) -> Self {
        Self {
            inner: ProductStore::new(api, DEFAULT_LIMIT),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ProductsState {
        self.inner.state()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<ProductsState> {
        self.inner.watch()
    }

    /// Subscribe as a `Stream` of snapshots.
    pub fn stream(&self) -> WatchStream<ProductsState> {
        self.inner.stream()
    }

    /// Update the search query without reloading.
    pub fn set_query(&self, q: &str) {
        self.inner.set_query(q);
    }

    /// Load a page (search when the query is non-empty).
    pub async fn load(&self, page: u32, limit: u32) {
        self.inner.load(page, limit).await;
    }

    /// Reload the current page at the current limit.
    pub async fn reload(&self) {
        let (page, limit) = (self.inner.current_page(), self.inner.current_limit());
        self.inner.load(page, limit).await;
    }

    /// Purchase `qty` units of a product. On success the updated entity
    /// replaces its card in the current view in place.
    pub async fn purchase(&self, id: &str, qty: u32) {
        self.inner.begin();
        match self.inner.api().purchase(id, qty).await {
            Ok(updated) => self
                .inner
                .succeed_item(updated, "Purchase completed, stock updated."),
            Err(err) => self.inner.fail(&err),
        }
    }
}
