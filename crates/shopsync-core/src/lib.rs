//! Reactive client-side synchronization layer for the shopsync catalog.
//!
//! Sits between `shopsync-api` and UI consumers. Each bounded concern
//! gets one store wrapping one resource client:
//!
//! - **[`SessionStore`]** — credential lifecycle. [`SessionStore::bootstrap`]
//!   rehydrates a persisted token and confirms it against `/auth/me`;
//!   `login` treats an unconfirmable token as no session at all.
//! - **[`CatalogStore`]** — customer-facing browsing, search, purchase.
//! - **[`AdminStore`]** — catalog management: create, patch, delete,
//!   stock adjustment, with server-reconciling refetches where ordering
//!   or page counts may have shifted.
//!
//! Stores follow one command protocol: a command marks itself pending
//! and clears the previous error/toast on entry, then settles into
//! either a refreshed view plus success toast or a translated error
//! ([`friendly_error`]), never both, never by panicking or returning
//! `Err` past the command boundary. State is observable via snapshot
//! reads, `watch` receivers, or `Stream` adapters -- no rendering
//! framework is assumed.
//!
//! Durable token persistence is injected through [`TokenStore`];
//! `shopsync-config` supplies the keyring-backed implementation and
//! [`MemoryTokenStore`] covers tests and embedded use.

pub mod access;
pub mod friendly;
pub mod store;
pub mod token;

pub use access::{Admission, admit_admin, admit_authenticated};
pub use friendly::friendly_error;
pub use store::{AdminStore, CatalogStore, ProductsState, SessionState, SessionStore};
pub use token::{MemoryTokenStore, TokenStore};

// Re-export the api layer's canonical types for consumers that only
// depend on this crate.
pub use shopsync_api::{
    Actor, ApiTransport, AuthClient, Error, NewProduct, Page, Product, ProductPatch,
    ProductsClient, Role, ServerMessage, StockChange,
};
