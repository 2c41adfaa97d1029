// Products resource client
//
// Typed request functions for the product collection, plus the
// normalization boundary: server payloads tolerate two identifier field
// names and may omit description and pagination metadata, so every
// response is rebuilt into the canonical model before the store layer
// sees it.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::model::{NewProduct, Page, Product, ProductPatch, StockChange, page_count};
use crate::transport::ApiTransport;

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire {
    #[serde(default)]
    id: Option<String>,
    // Mongo-era payloads carry the identifier as `_id`.
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    sku: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: f64,
    stock: u32,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ProductWire {
    fn normalize(self) -> Result<Product, Error> {
        let id = self
            .id
            .or(self.legacy_id)
            .ok_or_else(|| Error::Deserialization {
                message: "product payload has neither `id` nor `_id`".into(),
                body: String::new(),
            })?;

        Ok(Product {
            id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Deserialize)]
struct PageWire {
    #[serde(default)]
    items: Vec<ProductWire>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    pages: Option<u32>,
}

impl PageWire {
    /// Rebuild into a canonical page. Absent metadata falls back to the
    /// values the client asked for; an absent `pages` is recomputed, but
    /// a server-supplied value always wins.
    fn normalize(self, req_page: u32, req_limit: u32) -> Result<Page<Product>, Error> {
        let items = self
            .items
            .into_iter()
            .map(ProductWire::normalize)
            .collect::<Result<Vec<_>, _>>()?;

        let total = self.total.unwrap_or(0);
        let page = self.page.unwrap_or(req_page);
        let limit = self.limit.unwrap_or(req_limit);
        let pages = self.pages.unwrap_or_else(|| page_count(total, limit));

        Ok(Page {
            items,
            total,
            page,
            limit,
            pages,
        })
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Typed client for the product endpoints.
///
/// The same contract backs both the catalog-facing and admin-facing
/// stores; permission differences are enforced server-side through the
/// bearer token on the shared transport.
#[derive(Clone)]
pub struct ProductsClient {
    transport: Arc<ApiTransport>,
}

impl ProductsClient {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch one page of the collection in server order.
    pub async fn list(&self, page: u32, limit: u32) -> Result<Page<Product>, Error> {
        let wire: PageWire = self
            .transport
            .get_with_params(
                "products",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        wire.normalize(page, limit)
    }

    /// Fetch one page of search results for `q`.
    pub async fn search(&self, q: &str, page: u32, limit: u32) -> Result<Page<Product>, Error> {
        let wire: PageWire = self
            .transport
            .get_with_params(
                "products/search",
                &[
                    ("q", q.to_owned()),
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        wire.normalize(page, limit)
    }

    /// Fetch a single product by id.
    pub async fn get(&self, id: &str) -> Result<Product, Error> {
        let wire: ProductWire = self.transport.get(&format!("products/{id}")).await?;
        wire.normalize()
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn create(&self, payload: &NewProduct) -> Result<Product, Error> {
        debug!("creating product sku={}", payload.sku);
        let wire: ProductWire = self.transport.post("products", payload).await?;
        wire.normalize()
    }

    pub async fn update(&self, id: &str, payload: &ProductPatch) -> Result<Product, Error> {
        let wire: ProductWire = self
            .transport
            .patch(&format!("products/{id}"), payload)
            .await?;
        wire.normalize()
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.transport.delete(&format!("products/{id}")).await
    }

    /// Server-authoritative stock mutation; returns the updated entity.
    pub async fn adjust_stock(&self, id: &str, change: StockChange) -> Result<Product, Error> {
        let wire: ProductWire = self
            .transport
            .post(&format!("products/{id}/adjust-stock"), &change)
            .await?;
        wire.normalize()
    }

    /// Purchase `qty` units. The canonical stock-decrement action.
    ///
    /// Requires an authenticated session; the server rejects anonymous
    /// calls, and callers are expected to have checked the session store
    /// predicates first.
    pub async fn purchase(&self, id: &str, qty: u32) -> Result<Product, Error> {
        let wire: ProductWire = self
            .transport
            .post(&format!("products/{id}/purchase"), &json!({ "qty": qty }))
            .await?;
        wire.normalize()
    }
}
