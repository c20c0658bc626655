//! Remote request client.
//!
//! `StorefrontApi` is the seam between the stores and the network: every
//! remote operation the stores need, as a trait, so tests can drive the
//! stores against a stub. `ApiClient` is the reqwest implementation, holding
//! the bearer credential and mirroring it to a JSON cache file so a restart
//! can resume the session.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{
    AuthPayload, Category, LoginRequest, NewCategory, NewSubCategory, Pagination, Product,
    ProductForm, ProductPage, SignupRequest, SubCategory, User,
};

/// Query parameters accepted by every listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListingQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    /// Attach a search term; empty or whitespace-only text is omitted from
    /// the query string entirely.
    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_order) = &self.sort_order {
            pairs.push(("sortOrder", sort_order.clone()));
        }
        pairs
    }
}

/// Remote operations the stores depend on.
#[allow(async_fn_in_trait)]
pub trait StorefrontApi {
    // Credential custody
    fn remember_token(&self, token: &str);
    fn forget_token(&self);
    fn has_token(&self) -> bool;

    // Auth
    async fn signup(&self, req: &SignupRequest) -> Result<AuthPayload, ApiError>;
    async fn login(&self, req: &LoginRequest) -> Result<AuthPayload, ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;

    // Categories
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn create_category(&self, name: &str) -> Result<Category, ApiError>;
    async fn subcategories(&self) -> Result<Vec<SubCategory>, ApiError>;
    async fn create_subcategory(
        &self,
        name: &str,
        category_id: &str,
    ) -> Result<SubCategory, ApiError>;

    // Products
    async fn products(&self, query: &ListingQuery) -> Result<ProductPage, ApiError>;
    async fn products_by_category(
        &self,
        category_id: &str,
        query: &ListingQuery,
    ) -> Result<ProductPage, ApiError>;
    async fn products_by_subcategory(
        &self,
        subcategory_id: &str,
        query: &ListingQuery,
    ) -> Result<ProductPage, ApiError>;
    async fn product(&self, product_id: &str) -> Result<Product, ApiError>;
    async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError>;
    async fn update_product(
        &self,
        product_id: &str,
        form: &ProductForm,
    ) -> Result<Product, ApiError>;
    async fn delete_product(&self, product_id: &str) -> Result<(), ApiError>;

    // Wishlist
    async fn wishlist(&self) -> Result<Vec<Product>, ApiError>;
    async fn add_to_wishlist(&self, product_id: &str) -> Result<(), ApiError>;
    async fn remove_from_wishlist(&self, product_id: &str) -> Result<(), ApiError>;
}

/// Response envelope used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CategoriesData {
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryData {
    category: Category,
}

#[derive(Debug, Deserialize)]
struct SubCategoriesData {
    #[serde(rename = "subCategories")]
    sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Deserialize)]
struct SubCategoryData {
    #[serde(rename = "subCategory")]
    sub_category: SubCategory,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct ProductData {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct WishlistData {
    wishlist: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    user: User,
}

/// Persisted credential record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedCredential {
    token: String,
    saved_at: DateTime<Utc>,
}

/// reqwest-backed implementation of [`StorefrontApi`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    token_path: Option<PathBuf>,
}

impl ApiClient {
    /// Create a client with no credential cache (tests, throwaway sessions).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            token: RwLock::new(None),
            token_path: None,
        }
    }

    /// Create a client that mirrors its credential to `token_path`, loading
    /// any token cached by a previous run.
    pub fn with_token_cache(base_url: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        let token_path = token_path.into();
        let token = load_cached_token(&token_path);
        if token.is_some() {
            tracing::debug!("Loaded cached credential from {:?}", token_path);
        }
        Self {
            http: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            token: RwLock::new(token),
            token_path: Some(token_path),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_token_cache(config.api_url.clone(), config.token_path.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer credential when one is held.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn persist_token(&self, token: Option<&str>) {
        let Some(path) = &self.token_path else {
            return;
        };
        match token {
            Some(token) => {
                let record = CachedCredential {
                    token: token.to_string(),
                    saved_at: Utc::now(),
                };
                let body = match serde_json::to_string(&record) {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!("Failed to encode credential cache: {}", e);
                        return;
                    }
                };
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).ok();
                }
                if let Err(e) = std::fs::write(path, body) {
                    tracing::warn!("Failed to write credential cache {:?}: {}", path, e);
                }
            }
            None => {
                if path.exists() {
                    if let Err(e) = std::fs::remove_file(path) {
                        tracing::warn!("Failed to remove credential cache {:?}: {}", path, e);
                    }
                }
            }
        }
    }

    /// Map a non-success status to the error taxonomy. A 401 also discards
    /// the held credential: the server has declared it dead. A 403 denies
    /// the action, not the credential, so the session survives it.
    fn classify_status(&self, status: StatusCode, message: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::info!("Credential rejected by server, discarding");
                self.forget_token();
                ApiError::Unauthorized(message)
            }
            StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            s if s.is_server_error() => ApiError::Server(message),
            _ => ApiError::Validation(message),
        }
    }

    /// Unwrap the response envelope, mapping failures to [`ApiError`].
    async fn handle<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            return Err(self.classify_status(status, message));
        }

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.success {
            let message = envelope
                .errors
                .filter(|errs| !errs.is_empty())
                .map(|errs| errs.join("; "))
                .or(envelope.message)
                .unwrap_or_else(|| "Something went wrong".to_string());
            return Err(ApiError::Validation(message));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("Response envelope missing data".to_string()))
    }

    /// Like [`handle`](Self::handle) but for endpoints whose payload the
    /// caller does not need.
    async fn handle_ok(&self, response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            return Err(self.classify_status(status, message));
        }
        Ok(())
    }

    /// Build the multipart body for product create/update.
    fn product_multipart(&self, form: &ProductForm, update: bool) -> Result<Form, ApiError> {
        if form.variants.is_empty() {
            return Err(ApiError::Validation(
                "At least one variant is required".to_string(),
            ));
        }

        let mut multipart = Form::new()
            .text("title", form.title.clone())
            .text("description", form.description.clone())
            .text("subCategory", form.subcategory_id.clone())
            .text("variants", serde_json::to_string(&form.variants)?);

        if update {
            multipart = multipart
                .text("existingImages", serde_json::to_string(&form.existing_images)?)
                .text(
                    "replaceImages",
                    if form.replace_images { "true" } else { "false" },
                );
        }

        for image in &form.images {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .map_err(|e| ApiError::Validation(format!("Invalid image content type: {}", e)))?;
            multipart = multipart.part("images", part);
        }

        Ok(multipart)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

fn load_cached_token(path: &Path) -> Option<String> {
    let body = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<CachedCredential>(&body) {
        Ok(record) => Some(record.token),
        Err(e) => {
            tracing::warn!("Ignoring malformed credential cache {:?}: {}", path, e);
            None
        }
    }
}

fn page_from(data: ProductsData, limit: u32) -> ProductPage {
    ProductPage {
        products: data.products,
        pagination: data.pagination.unwrap_or_else(|| Pagination::empty(limit)),
    }
}

impl StorefrontApi for ApiClient {
    fn remember_token(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
        self.persist_token(Some(token));
    }

    fn forget_token(&self) {
        *self.token.write() = None;
        self.persist_token(None);
    }

    fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    async fn signup(&self, req: &SignupRequest) -> Result<AuthPayload, ApiError> {
        let response = self.http.post(self.url("/auth/signup")).json(req).send().await?;
        self.handle(response).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthPayload, ApiError> {
        let response = self.http.post(self.url("/auth/login")).json(req).send().await?;
        self.handle(response).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let response = self.authed(self.http.get(self.url("/auth/me"))).send().await?;
        let data: UserData = self.handle(response).await?;
        Ok(data.user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.authed(self.http.post(self.url("/auth/logout"))).send().await?;
        self.handle_ok(response).await
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self.authed(self.http.get(self.url("/categories"))).send().await?;
        let data: CategoriesData = self.handle(response).await?;
        Ok(data.categories)
    }

    async fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        let body = NewCategory {
            name: name.to_string(),
        };
        let response = self
            .authed(self.http.post(self.url("/categories")))
            .json(&body)
            .send()
            .await?;
        let data: CategoryData = self.handle(response).await?;
        Ok(data.category)
    }

    async fn subcategories(&self) -> Result<Vec<SubCategory>, ApiError> {
        let response = self.authed(self.http.get(self.url("/subcategories"))).send().await?;
        let data: SubCategoriesData = self.handle(response).await?;
        Ok(data.sub_categories)
    }

    async fn create_subcategory(
        &self,
        name: &str,
        category_id: &str,
    ) -> Result<SubCategory, ApiError> {
        let body = NewSubCategory {
            name: name.to_string(),
            category: category_id.to_string(),
        };
        let response = self
            .authed(self.http.post(self.url("/subcategories")))
            .json(&body)
            .send()
            .await?;
        let data: SubCategoryData = self.handle(response).await?;
        Ok(data.sub_category)
    }

    async fn products(&self, query: &ListingQuery) -> Result<ProductPage, ApiError> {
        let response = self
            .authed(self.http.get(self.url("/products")))
            .query(&query.to_pairs())
            .send()
            .await?;
        let data: ProductsData = self.handle(response).await?;
        Ok(page_from(data, query.limit))
    }

    async fn products_by_category(
        &self,
        category_id: &str,
        query: &ListingQuery,
    ) -> Result<ProductPage, ApiError> {
        let path = format!("/categories/{}/products", category_id);
        let response = self
            .authed(self.http.get(self.url(&path)))
            .query(&query.to_pairs())
            .send()
            .await?;
        let data: ProductsData = self.handle(response).await?;
        Ok(page_from(data, query.limit))
    }

    async fn products_by_subcategory(
        &self,
        subcategory_id: &str,
        query: &ListingQuery,
    ) -> Result<ProductPage, ApiError> {
        let path = format!("/subcategories/{}/products", subcategory_id);
        let response = self
            .authed(self.http.get(self.url(&path)))
            .query(&query.to_pairs())
            .send()
            .await?;
        let data: ProductsData = self.handle(response).await?;
        Ok(page_from(data, query.limit))
    }

    async fn product(&self, product_id: &str) -> Result<Product, ApiError> {
        let path = format!("/products/{}", product_id);
        let response = self.authed(self.http.get(self.url(&path))).send().await?;
        let data: ProductData = self.handle(response).await?;
        Ok(data.product)
    }

    async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        let multipart = self.product_multipart(form, false)?;
        let response = self
            .authed(self.http.post(self.url("/products")))
            .multipart(multipart)
            .send()
            .await?;
        let data: ProductData = self.handle(response).await?;
        Ok(data.product)
    }

    async fn update_product(
        &self,
        product_id: &str,
        form: &ProductForm,
    ) -> Result<Product, ApiError> {
        let multipart = self.product_multipart(form, true)?;
        let path = format!("/products/{}", product_id);
        let response = self
            .authed(self.http.put(self.url(&path)))
            .multipart(multipart)
            .send()
            .await?;
        let data: ProductData = self.handle(response).await?;
        Ok(data.product)
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), ApiError> {
        let path = format!("/products/{}", product_id);
        let response = self.authed(self.http.delete(self.url(&path))).send().await?;
        self.handle_ok(response).await
    }

    async fn wishlist(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.authed(self.http.get(self.url("/wishlist"))).send().await?;
        let data: WishlistData = self.handle(response).await?;
        Ok(data.wishlist)
    }

    async fn add_to_wishlist(&self, product_id: &str) -> Result<(), ApiError> {
        let path = format!("/wishlist/{}", product_id);
        let response = self.authed(self.http.post(self.url(&path))).send().await?;
        self.handle_ok(response).await
    }

    async fn remove_from_wishlist(&self, product_id: &str) -> Result<(), ApiError> {
        let path = format!("/wishlist/{}", product_id);
        let response = self.authed(self.http.delete(self.url(&path))).send().await?;
        self.handle_ok(response).await
    }
}
