//! Catalog store: the product list, its pagination metadata, the loaded
//! category/subcategory lists, and the active listing intent.
//!
//! Listing responses carry a sequence number: each issued call takes the
//! next number and a response is applied only if it is the latest issued.
//! Under interleaving this means "last request issued wins", not "last
//! response to arrive wins".

use std::collections::BTreeMap;

use crate::client::StorefrontApi;
use crate::errors::ApiError;
use crate::models::{Category, Pagination, Product, ProductForm, ProductPage, SubCategory};

use super::{resolve_listing, ListingCall, ListingIntent};

/// A server-confirmed change to apply to a cached product list.
#[derive(Debug, Clone)]
pub enum ListMutation {
    Create(Product),
    Update(Product),
    Delete(String),
}

/// Apply one confirmed mutation to a list. Used identically for the
/// unfiltered cache and the displayed list.
pub fn apply_mutation(list: &mut Vec<Product>, op: &ListMutation) {
    match op {
        ListMutation::Create(product) => list.insert(0, product.clone()),
        ListMutation::Update(product) => {
            if let Some(slot) = list.iter_mut().find(|p| p.id == product.id) {
                *slot = product.clone();
            }
        }
        ListMutation::Delete(id) => {
            if let Some(pos) = list.iter().position(|p| &p.id == id) {
                list.remove(pos);
            }
        }
    }
}

/// Client-side catalog state synchronized against the remote API.
pub struct CatalogStore {
    /// Unfiltered product cache, refreshed by global listings.
    products: Vec<Product>,
    /// Currently displayed (scope-filtered) list.
    filtered: Vec<Product>,
    categories: Vec<Category>,
    subcategories: Vec<SubCategory>,
    intent: ListingIntent,
    pagination: Pagination,
    /// Currently selected detail record.
    detail: Option<Product>,
    loading: bool,
    /// Sequence number of the most recently issued listing call.
    listing_seq: u64,
}

impl CatalogStore {
    pub fn new(per_page: u32) -> Self {
        Self {
            products: Vec::new(),
            filtered: Vec::new(),
            categories: Vec::new(),
            subcategories: Vec::new(),
            intent: ListingIntent::new(per_page),
            pagination: Pagination::empty(per_page),
            detail: None,
            loading: false,
            listing_seq: 0,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The list the UI renders.
    pub fn displayed(&self) -> &[Product] {
        &self.filtered
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn subcategories(&self) -> &[SubCategory] {
        &self.subcategories
    }

    pub fn intent(&self) -> &ListingIntent {
        &self.intent
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn detail(&self) -> Option<&Product> {
        self.detail.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Derived index: category name -> subcategory names, computed on read
    /// from the flat lists so it can never drift from them. A subcategory
    /// whose parent reference cannot be resolved is silently dropped.
    pub fn subcategories_by_category(&self) -> BTreeMap<String, Vec<String>> {
        let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for sub in &self.subcategories {
            if let Some(parent) = sub.parent_name(&self.categories) {
                index
                    .entry(parent.to_string())
                    .or_default()
                    .push(sub.name.clone());
            }
        }
        index
    }

    /// Load categories, subcategories and the first product page.
    pub async fn bootstrap<C: StorefrontApi>(&mut self, api: &C) -> Result<(), ApiError> {
        self.load_categories(api).await?;
        self.load_subcategories(api).await?;
        self.refresh(api).await
    }

    /// Replace the category list wholesale.
    pub async fn load_categories<C: StorefrontApi>(&mut self, api: &C) -> Result<(), ApiError> {
        self.categories = api.categories().await?;
        Ok(())
    }

    /// Replace the subcategory list wholesale. The derived index picks the
    /// new list up on its next read.
    pub async fn load_subcategories<C: StorefrontApi>(&mut self, api: &C) -> Result<(), ApiError> {
        self.subcategories = api.subcategories().await?;
        Ok(())
    }

    /// Create a category and append it to the loaded list on confirmation.
    pub async fn create_category<C: StorefrontApi>(
        &mut self,
        api: &C,
        name: &str,
    ) -> Result<Category, ApiError> {
        let category = api.create_category(name).await?;
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Create a subcategory and append it to the flat list on confirmation;
    /// the derived index includes it with no separate write.
    pub async fn create_subcategory<C: StorefrontApi>(
        &mut self,
        api: &C,
        name: &str,
        category_id: &str,
    ) -> Result<SubCategory, ApiError> {
        let subcategory = api.create_subcategory(name, category_id).await?;
        self.subcategories.push(subcategory.clone());
        Ok(subcategory)
    }

    // ==================== INTENT MUTATORS ====================
    //
    // Each mutator adjusts the intent and re-issues the listing fetch.

    pub async fn select_category<C: StorefrontApi>(
        &mut self,
        api: &C,
        category: Option<String>,
    ) -> Result<(), ApiError> {
        self.intent.select_category(category);
        self.refresh(api).await
    }

    pub async fn select_subcategory<C: StorefrontApi>(
        &mut self,
        api: &C,
        subcategory: Option<String>,
    ) -> Result<(), ApiError> {
        self.intent.select_subcategory(subcategory);
        self.refresh(api).await
    }

    pub async fn set_search<C: StorefrontApi>(
        &mut self,
        api: &C,
        search: &str,
    ) -> Result<(), ApiError> {
        self.intent.set_search(search);
        self.refresh(api).await
    }

    /// Clearing search re-issues the currently scoped listing with no search
    /// term and page 1, never the global listing.
    pub async fn clear_search<C: StorefrontApi>(&mut self, api: &C) -> Result<(), ApiError> {
        self.intent.clear_search();
        self.refresh(api).await
    }

    pub async fn set_page<C: StorefrontApi>(&mut self, api: &C, page: u32) -> Result<(), ApiError> {
        self.intent.set_page(page);
        self.refresh(api).await
    }

    pub async fn set_per_page<C: StorefrontApi>(
        &mut self,
        api: &C,
        per_page: u32,
    ) -> Result<(), ApiError> {
        self.intent.set_per_page(per_page);
        self.refresh(api).await
    }

    // ==================== LISTING RESOLUTION ====================

    /// Resolve the current intent into exactly one listing call and apply
    /// the result. A stale selection is a logged no-op. Network and
    /// not-found failures resolve to an empty page; genuine errors surface.
    pub async fn refresh<C: StorefrontApi>(&mut self, api: &C) -> Result<(), ApiError> {
        let call = match resolve_listing(&self.intent, &self.categories, &self.subcategories) {
            Ok(call) => call,
            Err(stale) => {
                tracing::warn!("Skipping listing fetch: {}", stale);
                return Ok(());
            }
        };

        let seq = self.begin_listing();
        let limit = self.intent.per_page;
        let global = matches!(call, ListingCall::All(_));

        let result = match &call {
            ListingCall::All(query) => api.products(query).await,
            ListingCall::ByCategory { id, query } => api.products_by_category(id, query).await,
            ListingCall::BySubcategory { id, query } => {
                api.products_by_subcategory(id, query).await
            }
        };

        match result {
            Ok(page) => {
                self.apply_listing(seq, page, global);
                Ok(())
            }
            Err(err) if err.is_empty_page_fallback() => {
                tracing::warn!("Listing call failed ({}), rendering empty page", err);
                self.apply_listing(seq, ProductPage::empty(limit), global);
                Ok(())
            }
            Err(err) => {
                self.settle_listing(seq);
                Err(err)
            }
        }
    }

    /// Issue a new listing sequence number and mark the store loading.
    fn begin_listing(&mut self) -> u64 {
        self.listing_seq += 1;
        self.loading = true;
        self.listing_seq
    }

    /// Apply a listing response. Returns false (and changes nothing) when a
    /// newer call has been issued since `seq`. A global listing refreshes
    /// both lists; a scoped listing replaces only the displayed list. Pages
    /// replace wholesale, never merge.
    pub(crate) fn apply_listing(&mut self, seq: u64, page: ProductPage, global: bool) -> bool {
        if seq != self.listing_seq {
            tracing::debug!(
                seq,
                latest = self.listing_seq,
                "Discarding stale listing response"
            );
            return false;
        }
        self.loading = false;
        if global {
            self.products = page.products.clone();
        }
        self.filtered = page.products;
        self.pagination = page.pagination;
        true
    }

    /// Clear the loading flag for a failed call that is still the latest.
    fn settle_listing(&mut self, seq: u64) {
        if seq == self.listing_seq {
            self.loading = false;
        }
    }

    // ==================== MUTATION RECONCILIATION ====================
    //
    // Optimistic-after-confirmation: fire the request, wait for the server,
    // then mutate. Nothing is applied speculatively, so nothing rolls back.

    /// Load a single product into the detail slot.
    pub async fn load_product<C: StorefrontApi>(
        &mut self,
        api: &C,
        product_id: &str,
    ) -> Result<(), ApiError> {
        self.detail = Some(api.product(product_id).await?);
        Ok(())
    }

    /// Create a product. On confirmation the server's document is prepended
    /// to both lists — even when it does not match the active filter; the
    /// next fetch restores filter purity.
    pub async fn create_product<C: StorefrontApi>(
        &mut self,
        api: &C,
        form: &ProductForm,
    ) -> Result<Product, ApiError> {
        let product = api.create_product(form).await?;
        let op = ListMutation::Create(product.clone());
        apply_mutation(&mut self.products, &op);
        apply_mutation(&mut self.filtered, &op);
        Ok(product)
    }

    /// Update a product, replacing the matching entry in-place in both
    /// lists. No insertion happens when the product was filtered out of the
    /// displayed list.
    pub async fn update_product<C: StorefrontApi>(
        &mut self,
        api: &C,
        product_id: &str,
        form: &ProductForm,
    ) -> Result<Product, ApiError> {
        let product = api.update_product(product_id, form).await?;
        let op = ListMutation::Update(product.clone());
        apply_mutation(&mut self.products, &op);
        apply_mutation(&mut self.filtered, &op);
        if self.detail.as_ref().is_some_and(|d| d.id == product.id) {
            self.detail = Some(product.clone());
        }
        Ok(product)
    }

    /// Delete a product, removing exactly one matching entry by id from each
    /// list. Pagination counters stay stale until the next fetch.
    pub async fn delete_product<C: StorefrontApi>(
        &mut self,
        api: &C,
        product_id: &str,
    ) -> Result<(), ApiError> {
        api.delete_product(product_id).await?;
        let op = ListMutation::Delete(product_id.to_string());
        apply_mutation(&mut self.products, &op);
        apply_mutation(&mut self.filtered, &op);
        if self.detail.as_ref().is_some_and(|d| d.id == product_id) {
            self.detail = None;
        }
        Ok(())
    }
}
