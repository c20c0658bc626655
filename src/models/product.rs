//! Product models and listing result shapes.

use serde::{Deserialize, Serialize};

use super::SubCategory;

/// A stored product image (Cloudinary-style shape).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    #[serde(alias = "publicId")]
    pub public_id: String,
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub ram: String,
    pub price: f64,
    pub quantity: u32,
}

/// Subcategory reference on a product: bare id or populated document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubCategoryRef {
    Embedded(SubCategory),
    Id(String),
}

impl SubCategoryRef {
    pub fn id(&self) -> &str {
        match self {
            SubCategoryRef::Embedded(s) => &s.id,
            SubCategoryRef::Id(id) => id,
        }
    }
}

/// A product as returned by the listing and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Flat price; most documents carry only variant prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default, alias = "subCategory", skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<SubCategoryRef>,
}

impl Product {
    /// Displayed price: the flat price when present, else the minimum
    /// variant price.
    pub fn display_price(&self) -> Option<f64> {
        if let Some(price) = self.price {
            return Some(price);
        }
        self.variants
            .iter()
            .map(|v| v.price)
            .fold(None, |min, p| match min {
                Some(m) if m <= p => Some(m),
                _ => Some(p),
            })
    }
}

/// Pagination metadata attached to every listing result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_products: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u32,
}

impl Pagination {
    /// The zeroed-with-requested-limit shape used as the listing fallback.
    pub fn empty(limit: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_products: 0,
            has_next_page: false,
            has_prev_page: false,
            limit,
        }
    }
}

/// One page of products plus its pagination metadata. Replaced wholesale on
/// every successful fetch; never merged or appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

impl ProductPage {
    pub fn empty(limit: u32) -> Self {
        Self {
            products: Vec::new(),
            pagination: Pagination::empty(limit),
        }
    }
}

/// An image file queued for upload with a product form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload for product create/update: text fields, a JSON-encoded
/// variant array, image files, and (update only) the retained existing
/// images plus the replace-vs-append flag.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub subcategory_id: String,
    pub variants: Vec<Variant>,
    pub images: Vec<ImageUpload>,
    pub existing_images: Vec<ProductImage>,
    pub replace_images: bool,
}
