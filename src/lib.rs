//! Storefront client
//!
//! The data-synchronization layer of a single-page storefront: a typed REST
//! client plus the stores that mediate between a UI and the remote API:
//! catalog (filter/search/pagination and CRUD reconciliation), session,
//! wishlist and cart. Rendering and the server itself live elsewhere.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod store;

pub use client::{ApiClient, ListingQuery, StorefrontApi};
pub use config::Config;
pub use errors::ApiError;
pub use store::{
    CartStore, CatalogStore, ListingCall, ListingIntent, SessionState, SessionStore,
    WishlistStore,
};
