//! Scriptable in-memory implementation of [`StorefrontApi`] for store tests.

use std::collections::VecDeque;

use parking_lot::{Mutex, RwLock};

use crate::client::{ListingQuery, StorefrontApi};
use crate::errors::ApiError;
use crate::models::{
    AuthPayload, Category, LoginRequest, Product, ProductForm, ProductPage, SignupRequest,
    SubCategory, SubCategoryRef, User,
};

/// Test double: records every call, replays scripted listing pages, and can
/// be told to fail the next call.
#[derive(Default)]
pub struct StubApi {
    pub token: RwLock<Option<String>>,
    /// Scripted responses for listing calls, consumed in order. When empty,
    /// listings succeed with an empty page.
    pub pages: Mutex<VecDeque<Result<ProductPage, ApiError>>>,
    /// Human-readable record of every remote call issued.
    pub calls: Mutex<Vec<String>>,
    /// Failure injected into the next non-listing call.
    pub next_failure: Mutex<Option<ApiError>>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<SubCategory>,
    pub wishlist_items: Mutex<Vec<Product>>,
    /// Identity accepted by login/signup/current_user.
    pub user: Option<User>,
}

impl StubApi {
    pub fn push_page(&self, page: ProductPage) {
        self.pages.lock().push_back(Ok(page));
    }

    pub fn push_listing_error(&self, err: ApiError) {
        self.pages.lock().push_back(Err(err));
    }

    pub fn fail_next(&self, err: ApiError) {
        *self.next_failure.lock() = Some(err);
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<String> {
        self.calls.lock().last().cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn take_failure(&self) -> Option<ApiError> {
        self.next_failure.lock().take()
    }

    fn next_page(&self, limit: u32) -> Result<ProductPage, ApiError> {
        self.pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ProductPage::empty(limit)))
    }
}

fn describe(query: &ListingQuery) -> String {
    let mut desc = format!("page={} limit={}", query.page, query.limit);
    if let Some(search) = &query.search {
        desc.push_str(&format!(" search={}", search));
    }
    desc
}

fn product_from_form(id: &str, form: &ProductForm) -> Product {
    Product {
        id: id.to_string(),
        title: form.title.clone(),
        description: form.description.clone(),
        price: None,
        images: form.existing_images.clone(),
        variants: form.variants.clone(),
        subcategory: Some(SubCategoryRef::Id(form.subcategory_id.clone())),
    }
}

impl StorefrontApi for StubApi {
    fn remember_token(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    fn forget_token(&self) {
        *self.token.write() = None;
    }

    fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    async fn signup(&self, req: &SignupRequest) -> Result<AuthPayload, ApiError> {
        self.record(format!("signup {}", req.email));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        match &self.user {
            Some(user) => Ok(AuthPayload {
                user: user.clone(),
                token: Some("stub-token".to_string()),
            }),
            None => Err(ApiError::Validation("Signup rejected".to_string())),
        }
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.record(format!("login {}", req.email));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        match &self.user {
            Some(user) => Ok(AuthPayload {
                user: user.clone(),
                token: Some("stub-token".to_string()),
            }),
            None => Err(ApiError::Validation("Invalid credentials".to_string())),
        }
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.record("current_user".to_string());
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        match (&self.user, self.has_token()) {
            (Some(user), true) => Ok(user.clone()),
            _ => Err(ApiError::Unauthorized("Invalid token".to_string())),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout".to_string());
        match self.take_failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("categories".to_string());
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.categories.clone())
    }

    async fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        self.record(format!("create_category {}", name));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(Category {
            id: format!("cat-{}", name.to_lowercase()),
            name: name.to_string(),
        })
    }

    async fn subcategories(&self) -> Result<Vec<SubCategory>, ApiError> {
        self.record("subcategories".to_string());
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.subcategories.clone())
    }

    async fn create_subcategory(
        &self,
        name: &str,
        category_id: &str,
    ) -> Result<SubCategory, ApiError> {
        self.record(format!("create_subcategory {} {}", name, category_id));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(SubCategory {
            id: format!("sub-{}", name.to_lowercase()),
            name: name.to_string(),
            category: crate::models::CategoryRef::Id(category_id.to_string()),
        })
    }

    async fn products(&self, query: &ListingQuery) -> Result<ProductPage, ApiError> {
        self.record(format!("products {}", describe(query)));
        self.next_page(query.limit)
    }

    async fn products_by_category(
        &self,
        category_id: &str,
        query: &ListingQuery,
    ) -> Result<ProductPage, ApiError> {
        self.record(format!(
            "products_by_category {} {}",
            category_id,
            describe(query)
        ));
        self.next_page(query.limit)
    }

    async fn products_by_subcategory(
        &self,
        subcategory_id: &str,
        query: &ListingQuery,
    ) -> Result<ProductPage, ApiError> {
        self.record(format!(
            "products_by_subcategory {} {}",
            subcategory_id,
            describe(query)
        ));
        self.next_page(query.limit)
    }

    async fn product(&self, product_id: &str) -> Result<Product, ApiError> {
        self.record(format!("product {}", product_id));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Err(ApiError::NotFound(format!(
            "Product {} not found",
            product_id
        )))
    }

    async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        self.record(format!("create_product {}", form.title));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(product_from_form("created-1", form))
    }

    async fn update_product(
        &self,
        product_id: &str,
        form: &ProductForm,
    ) -> Result<Product, ApiError> {
        self.record(format!("update_product {}", product_id));
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(product_from_form(product_id, form))
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_product {}", product_id));
        match self.take_failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn wishlist(&self) -> Result<Vec<Product>, ApiError> {
        self.record("wishlist".to_string());
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.wishlist_items.lock().clone())
    }

    async fn add_to_wishlist(&self, product_id: &str) -> Result<(), ApiError> {
        self.record(format!("add_to_wishlist {}", product_id));
        match self.take_failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn remove_from_wishlist(&self, product_id: &str) -> Result<(), ApiError> {
        self.record(format!("remove_from_wishlist {}", product_id));
        match self.take_failure() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
