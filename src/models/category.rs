//! Category and subcategory models.

use serde::{Deserialize, Serialize};

/// A top-level product category. Immutable once created in this client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// Parent-category reference as the server returns it: either a bare id or
/// an embedded category document, depending on whether the route populates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CategoryRef {
    Embedded(Category),
    Id(String),
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Embedded(c) => &c.id,
            CategoryRef::Id(id) => id,
        }
    }

    /// Embedded name, if the reference was populated.
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            CategoryRef::Embedded(c) => Some(&c.name),
            CategoryRef::Id(_) => None,
        }
    }
}

/// A subcategory, many-to-one with its parent category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubCategory {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub category: CategoryRef,
}

impl SubCategory {
    /// Parent category name, resolved against `categories` when the
    /// reference is a bare id. `None` when the reference is unresolvable.
    pub fn parent_name<'a>(&'a self, categories: &'a [Category]) -> Option<&'a str> {
        match &self.category {
            CategoryRef::Embedded(c) => Some(c.name.as_str()),
            CategoryRef::Id(id) => categories
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.as_str()),
        }
    }
}

/// Request body for creating a category.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
}

/// Request body for creating a subcategory. The wire field `category`
/// carries the parent category id.
#[derive(Debug, Clone, Serialize)]
pub struct NewSubCategory {
    pub name: String,
    pub category: String,
}
