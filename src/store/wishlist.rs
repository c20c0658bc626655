//! Wishlist store: the user's saved-product set, synchronized with the
//! server and independent of catalog filtering.
//!
//! Mutations are optimistic-after-confirmation: the set changes only once
//! the server confirms, so a failure leaves it untouched.

use crate::client::StorefrontApi;
use crate::errors::ApiError;
use crate::models::Product;

#[derive(Debug, Default)]
pub struct WishlistStore {
    /// Unique by id; order is the server's return order with confirmed local
    /// appends at the back.
    items: Vec<Product>,
    loading: bool,
    error: Option<String>,
}

impl WishlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the set wholesale with the server's.
    pub async fn fetch<C: StorefrontApi>(&mut self, api: &C) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        match api.wishlist().await {
            Ok(items) => {
                self.loading = false;
                self.items = items;
                Ok(())
            }
            Err(err) => {
                self.loading = false;
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// Save a product; appended locally once the server confirms, skipped if
    /// already present.
    pub async fn add<C: StorefrontApi>(
        &mut self,
        api: &C,
        product: Product,
    ) -> Result<(), ApiError> {
        match api.add_to_wishlist(&product.id).await {
            Ok(()) => {
                if !self.contains(&product.id) {
                    self.items.push(product);
                }
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// Remove a saved product once the server confirms.
    pub async fn remove<C: StorefrontApi>(
        &mut self,
        api: &C,
        product_id: &str,
    ) -> Result<(), ApiError> {
        match api.remove_from_wishlist(product_id).await {
            Ok(()) => {
                self.items.retain(|p| p.id != product_id);
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }
}
