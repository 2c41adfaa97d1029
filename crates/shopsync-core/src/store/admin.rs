// ── Admin store ──
//
// Catalog management: create, edit, delete, and stock adjustment.
// Default page size 20 (table view). Permission enforcement is
// server-side; a 403 surfaces as an error like any other failure.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use shopsync_api::{NewProduct, ProductPatch, ProductsClient, StockChange};

use super::products::{ProductStore, ProductsState};

const DEFAULT_LIMIT: u32 = 20;

/// Reactive store for the admin product list.
pub struct AdminStore {
    inner: ProductStore,
}

impl AdminStore {
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

    /// Create a product, then refetch page 1 at the current limit.
    ///
    /// The created item is not spliced in locally: its position depends
    /// on server-side ordering the client cannot replicate, and the
    /// refetch also reconciles `total`/`pages`.
    pub async fn create(&self, payload: &NewProduct) {
        self.inner.begin();
        match self.inner.api().create(payload).await {
            Ok(_) => {
                let limit = self.inner.current_limit();
                self.inner
                    .settle_with_refetch(1, limit, "Product created.")
                    .await;
            }
            Err(err) => self.inner.fail(&err),
        }
    }

    /// Patch a product's fields. On success the item is replaced in
    /// place -- a field edit does not move it within the page, so no
    /// reload is needed.
    pub async fn update(&self, id: &str, payload: &ProductPatch) {
        self.inner.begin();
        match self.inner.api().update(id, payload).await {
            Ok(updated) => self.inner.succeed_item(updated, "Product updated."),
            Err(err) => self.inner.fail(&err),
        }
    }

    /// Delete a product, then refetch the current page.
    ///
    /// Deletion can shift page counts; the refetch keeps the view off a
    /// now-empty page (the server clamps and the view follows its echo).
    pub async fn remove(&self, id: &str) {
        self.inner.begin();
        match self.inner.api().delete(id).await {
            Ok(()) => {
                let (page, limit) = (self.inner.current_page(), self.inner.current_limit());
                self.inner
                    .settle_with_refetch(page, limit, "Product deleted.")
                    .await;
            }
            Err(err) => self.inner.fail(&err),
        }
    }

    /// Apply a server-authoritative stock change. On success the updated
    /// entity replaces its row in place; on failure (e.g. a conflict on
    /// insufficient stock) the cached view is left exactly as it was.
    pub async fn adjust_stock(&self, id: &str, change: StockChange) {
        self.inner.begin();
        match self.inner.api().adjust_stock(id, change).await {
            Ok(updated) => self.inner.succeed_item(updated, "Stock adjusted."),
            Err(err) => self.inner.fail(&err),
        }
    }
}
