//! Async client for the shopsync product catalog and auth API.
//!
//! One [`ApiTransport`] (base URL, timeout, bearer-token slot) is shared
//! by two thin typed clients:
//!
//! - **[`AuthClient`]** — token exchange (`POST /auth/login`) and identity
//!   confirmation (`GET /auth/me`).
//! - **[`ProductsClient`]** — paginated list/search, single get, create,
//!   patch, delete, and the stock actions (`adjust-stock`, `purchase`).
//!
//! Every response passes through a normalization boundary into the
//! canonical [`model`] types; loosely-typed server payloads (alternate id
//! field names, absent pagination metadata) never escape this crate.
//! Errors are never swallowed here — they propagate as [`Error`] carrying
//! the HTTP status and any structured server message, for `shopsync-core`
//! to translate into user-facing text.

pub mod auth;
pub mod error;
pub mod model;
pub mod products;
pub mod transport;

pub use auth::AuthClient;
pub use error::{Error, ServerMessage};
pub use model::{Actor, NewProduct, Page, Product, ProductPatch, Role, StockChange, page_count};
pub use products::ProductsClient;
pub use transport::ApiTransport;
