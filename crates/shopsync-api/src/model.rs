// ── Canonical domain types ──
//
// The normalized shapes the store layer works with. Resource clients
// translate loosely-typed server payloads into these; nothing downstream
// ever sees a raw body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Product ─────────────────────────────────────────────────────────

/// A single catalog entity.
///
/// `id` is opaque and immutable after creation. Timestamps are
/// server-assigned and read-only to the client. Price and stock are
/// non-negative in any valid entity; the server is the source of truth
/// after every round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ── Page ────────────────────────────────────────────────────────────

/// One page of entities plus pagination metadata, in server order.
///
/// `page` and `limit` reflect the last successfully completed request --
/// the server's echoed values, never an in-flight optimistic one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    /// An empty first page at the given limit, for store initial state.
    pub fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit,
            pages: 1,
        }
    }
}

/// Page count for a total at a given limit: `max(1, ceil(total / limit))`.
///
/// Used as the fallback when the server omits `pages`.
pub fn page_count(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// ── Actor / session ─────────────────────────────────────────────────

/// Role of the authenticated actor, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
}

/// The identity behind a confirmed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub email: String,
    pub role: Role,
}

// ── Request payloads ────────────────────────────────────────────────

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
}

/// Partial update for a product. Absent fields are left untouched
/// server-side; stock changes go through [`StockChange`] instead.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// A stock mutation: relative delta or absolute value.
///
/// Serializes to `{"delta": n}` or `{"stock": n}` -- the adjust-stock
/// endpoint accepts either key.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum StockChange {
    Delta { delta: i64 },
    Set { stock: u32 },
}

impl StockChange {
    pub fn delta(delta: i64) -> Self {
        Self::Delta { delta }
    }

    pub fn set(stock: u32) -> Self {
        Self::Set { stock }
    }
}
