//! Filter/search/pagination intent and its resolution into a listing call.
//!
//! `resolve_listing` is a pure function: the category and subcategory lists
//! are passed in explicitly, never read out of a sibling store.

use crate::client::ListingQuery;
use crate::models::{Category, SubCategory};

/// The current combination of category/subcategory selection, search text
/// and pagination requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingIntent {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub search: String,
    pub page: u32,
    pub per_page: u32,
}

impl ListingIntent {
    pub fn new(per_page: u32) -> Self {
        Self {
            category: None,
            subcategory: None,
            search: String::new(),
            page: 1,
            per_page,
        }
    }

    /// Selecting a category clears the subcategory and resets the page.
    pub fn select_category(&mut self, category: Option<String>) {
        self.category = category;
        self.subcategory = None;
        self.page = 1;
    }

    /// Selecting a subcategory keeps the category and resets the page.
    pub fn select_subcategory(&mut self, subcategory: Option<String>) {
        self.subcategory = subcategory;
        self.page = 1;
    }

    /// Setting search text resets the page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Clearing search resets the page and keeps the active scope.
    pub fn clear_search(&mut self) {
        self.search.clear();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Changing the page size resets the page.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    fn query(&self) -> ListingQuery {
        ListingQuery::new(self.page, self.per_page).with_search(&self.search)
    }
}

/// Exactly one remote listing call resolved from an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingCall {
    All(ListingQuery),
    ByCategory { id: String, query: ListingQuery },
    BySubcategory { id: String, query: ListingQuery },
}

/// A selection naming a category or subcategory that no longer exists in the
/// loaded lists. The caller treats this as a no-op, not a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleSelection {
    Category(String),
    Subcategory(String),
}

impl std::fmt::Display for StaleSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleSelection::Category(name) => write!(f, "unknown category {:?}", name),
            StaleSelection::Subcategory(name) => write!(f, "unknown subcategory {:?}", name),
        }
    }
}

/// Resolve the intent into exactly one listing call. Subcategory selection
/// takes precedence over category; search text layers onto whichever scope
/// is chosen. Name lookups take the first match (names are the filter UI's
/// key, so a duplicate name resolves to the first occurrence).
pub fn resolve_listing(
    intent: &ListingIntent,
    categories: &[Category],
    subcategories: &[SubCategory],
) -> Result<ListingCall, StaleSelection> {
    let query = intent.query();

    if let Some(name) = &intent.subcategory {
        let id = subcategories
            .iter()
            .find(|s| &s.name == name)
            .map(|s| s.id.clone())
            .ok_or_else(|| StaleSelection::Subcategory(name.clone()))?;
        return Ok(ListingCall::BySubcategory { id, query });
    }

    if let Some(name) = &intent.category {
        let id = categories
            .iter()
            .find(|c| &c.name == name)
            .map(|c| c.id.clone())
            .ok_or_else(|| StaleSelection::Category(name.clone()))?;
        return Ok(ListingCall::ByCategory { id, query });
    }

    Ok(ListingCall::All(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryRef;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "c1".into(),
                name: "Laptop".into(),
            },
            Category {
                id: "c2".into(),
                name: "Tablet".into(),
            },
        ]
    }

    fn subcategories() -> Vec<SubCategory> {
        vec![
            SubCategory {
                id: "s1".into(),
                name: "HP".into(),
                category: CategoryRef::Id("c1".into()),
            },
            SubCategory {
                id: "s2".into(),
                name: "iPad".into(),
                category: CategoryRef::Id("c2".into()),
            },
        ]
    }

    #[test]
    fn test_category_selection_clears_subcategory_and_page() {
        let mut intent = ListingIntent::new(10);
        intent.select_subcategory(Some("HP".into()));
        intent.set_page(4);

        intent.select_category(Some("Tablet".into()));
        assert_eq!(intent.category.as_deref(), Some("Tablet"));
        assert_eq!(intent.subcategory, None);
        assert_eq!(intent.page, 1);
    }

    #[test]
    fn test_subcategory_selection_keeps_category() {
        let mut intent = ListingIntent::new(10);
        intent.select_category(Some("Laptop".into()));
        intent.set_page(3);

        intent.select_subcategory(Some("HP".into()));
        assert_eq!(intent.category.as_deref(), Some("Laptop"));
        assert_eq!(intent.subcategory.as_deref(), Some("HP"));
        assert_eq!(intent.page, 1);
    }

    #[test]
    fn test_per_page_change_resets_page() {
        let mut intent = ListingIntent::new(10);
        intent.set_page(5);
        intent.set_per_page(25);
        assert_eq!(intent.page, 1);
        assert_eq!(intent.per_page, 25);
    }

    #[test]
    fn test_search_resets_page() {
        let mut intent = ListingIntent::new(10);
        intent.set_page(7);
        intent.set_search("hp");
        assert_eq!(intent.page, 1);

        intent.set_page(2);
        intent.clear_search();
        assert_eq!(intent.page, 1);
        assert!(intent.search.is_empty());
    }

    #[test]
    fn test_resolve_no_filter_is_global() {
        let intent = ListingIntent::new(10);
        let call = resolve_listing(&intent, &categories(), &subcategories()).unwrap();
        assert_eq!(call, ListingCall::All(ListingQuery::new(1, 10)));
    }

    #[test]
    fn test_resolve_category_scope() {
        let mut intent = ListingIntent::new(10);
        intent.select_category(Some("Laptop".into()));
        let call = resolve_listing(&intent, &categories(), &subcategories()).unwrap();
        assert_eq!(
            call,
            ListingCall::ByCategory {
                id: "c1".into(),
                query: ListingQuery::new(1, 10),
            }
        );
    }

    #[test]
    fn test_subcategory_takes_precedence_over_category() {
        // Subcategory under a different category than the selected one:
        // the by-subcategory call wins and uses the subcategory's id.
        let mut intent = ListingIntent::new(10);
        intent.select_category(Some("Laptop".into()));
        intent.select_subcategory(Some("iPad".into()));

        let call = resolve_listing(&intent, &categories(), &subcategories()).unwrap();
        assert_eq!(
            call,
            ListingCall::BySubcategory {
                id: "s2".into(),
                query: ListingQuery::new(1, 10),
            }
        );
    }

    #[test]
    fn test_search_layers_onto_scope() {
        let mut intent = ListingIntent::new(10);
        intent.select_category(Some("Laptop".into()));
        intent.set_search("hp");

        let call = resolve_listing(&intent, &categories(), &subcategories()).unwrap();
        let expected_query = ListingQuery::new(1, 10).with_search("hp");
        assert_eq!(
            call,
            ListingCall::ByCategory {
                id: "c1".into(),
                query: expected_query,
            }
        );
    }

    #[test]
    fn test_stale_selection_fails_locally() {
        let mut intent = ListingIntent::new(10);
        intent.select_category(Some("Ghost".into()));
        let err = resolve_listing(&intent, &categories(), &subcategories()).unwrap_err();
        assert_eq!(err, StaleSelection::Category("Ghost".into()));

        intent.select_subcategory(Some("Phantom".into()));
        let err = resolve_listing(&intent, &categories(), &subcategories()).unwrap_err();
        assert_eq!(err, StaleSelection::Subcategory("Phantom".into()));
    }

    #[test]
    fn test_same_intent_resolves_identically() {
        let mut intent = ListingIntent::new(10);
        intent.select_category(Some("Laptop".into()));
        let first = resolve_listing(&intent, &categories(), &subcategories()).unwrap();
        let second = resolve_listing(&intent, &categories(), &subcategories()).unwrap();
        assert_eq!(first, second);
    }
}
