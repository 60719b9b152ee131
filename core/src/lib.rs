//! Core types for the product catalog.
//!
//! This crate provides the shared data types used by both the catalog
//! front-end and any client that talks to the product API directly.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`Product`] - A catalog entry as exchanged with the API
//! - [`ProductStats`] - Aggregate numbers derived from a product collection
//! - [`CategoryCount`] - One bar of the category distribution
//! - [`Page`] - One page of a filtered and sorted listing
//! - [`SortKey`] / [`SortDirection`] - Column ordering for listings
//!
//! # Example
//!
//! Fetching products from the API and summarising them:
//!
//! ```ignore
//! use catalog_core::{Product, ProductStats};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//!
//! let products: Vec<Product> = client
//!     .get("http://localhost:3000/products")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//!
//! let stats = ProductStats::from_products(&products);
//! println!("{} products worth {:.2}", stats.total_products, stats.total_value);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The fixed set of categories a product may belong to.
pub const CATEGORIES: [&str; 8] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home & Garden",
    "Sports",
    "Toys",
    "Automotive",
    "Health & Beauty",
];

/// Returns `true` if `category` is one of [`CATEGORIES`] (exact match).
///
/// ```
/// assert!(catalog_core::is_known_category("Home & Garden"));
/// assert!(!catalog_core::is_known_category("home & garden"));
/// ```
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// A catalog entry.
///
/// The `id` is assigned by the server; a product that has not been created
/// yet has no id. On the wire the id travels as `idProduct`. Servers that
/// send `id` instead, or both keys, are accepted; `idProduct` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProductRecord")]
pub struct Product {
    /// Server-assigned identifier.
    #[serde(rename = "idProduct", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name, at least 3 characters.
    pub name: String,
    /// One of [`CATEGORIES`].
    pub category: String,
    /// Unit price, never negative.
    pub price: f64,
    /// Set by the client when the product is first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Set by the client on every save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Product {
    /// Creates a product that has not been persisted yet.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            price,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the server id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The id, or `""` for a product that was never saved.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// Product as decoded from the service, before the two id keys are merged.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    #[serde(default)]
    id_product: Option<RecordId>,
    #[serde(default)]
    id: Option<RecordId>,
    name: String,
    category: String,
    price: f64,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

/// Ids arrive as strings or, from some backends, as plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(u64),
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Text(text) => text,
            RecordId::Number(n) => n.to_string(),
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id_product.or(record.id).map(String::from),
            name: record.name,
            category: record.category,
            price: record.price,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Number of products in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Aggregate statistics over a product collection.
///
/// Recomputed from scratch on every load; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    /// Number of products.
    pub total_products: usize,
    /// `total_value / total_products`, or `0` when there are no products.
    pub average_price: f64,
    /// Sum of all prices.
    pub total_value: f64,
    /// One entry per distinct category, in first-seen order.
    pub category_distribution: Vec<CategoryCount>,
}

impl ProductStats {
    /// Computes statistics in a single pass over `products`.
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_core::{Product, ProductStats};
    ///
    /// let products = vec![
    ///     Product::new("Dune", "Books", 10.0),
    ///     Product::new("Emma", "Books", 20.0),
    ///     Product::new("Yo-yo", "Toys", 5.0),
    /// ];
    /// let stats = ProductStats::from_products(&products);
    ///
    /// assert_eq!(stats.total_products, 3);
    /// assert_eq!(stats.total_value, 35.0);
    /// assert_eq!(stats.category_distribution[0].category, "Books");
    /// assert_eq!(stats.category_distribution[0].count, 2);
    /// ```
    pub fn from_products(products: &[Product]) -> Self {
        let mut total_value = 0.0;
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut category_distribution: Vec<CategoryCount> = Vec::new();

        for product in products {
            total_value += product.price;
            match positions.get(product.category.as_str()) {
                Some(&pos) => category_distribution[pos].count += 1,
                None => {
                    positions.insert(&product.category, category_distribution.len());
                    category_distribution.push(CategoryCount {
                        category: product.category.clone(),
                        count: 1,
                    });
                }
            }
        }

        let total_products = products.len();
        // Zero products would otherwise divide 0 by 0.
        let average_price = if total_products == 0 {
            0.0
        } else {
            total_value / total_products as f64
        };

        Self {
            total_products,
            average_price,
            total_value,
            category_distribution,
        }
    }
}

/// One page of a listing.
///
/// # Example
///
/// ```
/// use catalog_core::Page;
///
/// let items = vec!["a", "b", "c"];
/// let page = Page::new(items, 12, 0, 5);
///
/// assert_eq!(page.total, 12);
/// assert_eq!(page.total_pages, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: usize,
    /// Current page (0-indexed).
    pub page_index: usize,
    /// Maximum number of items per page.
    pub page_size: usize,
    /// Total number of pages; 1 for an empty listing.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Creates a page, deriving `total_pages` from `total` and `page_size`.
    pub fn new(items: Vec<T>, total: usize, page_index: usize, page_size: usize) -> Self {
        Self {
            items,
            total,
            page_index,
            page_size,
            total_pages: page_count(total, page_size),
        }
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }
}

/// Number of pages needed for `total` items; never less than 1.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Category,
    Price,
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Error returned when parsing a [`SortKey`] or [`SortDirection`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortError(String);

impl fmt::Display for ParseSortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort value: {}", self.0)
    }
}

impl std::error::Error for ParseSortError {}

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            "price" => Ok(SortKey::Price),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Name => "name",
            SortKey::Category => "category",
            SortKey::Price => "price",
        })
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(category: &str, price: f64) -> Product {
        Product::new(format!("{category} item"), category, price)
    }

    #[test]
    fn stats_for_books_and_toys() {
        let products = vec![
            product("Books", 10.0),
            product("Books", 20.0),
            product("Toys", 5.0),
        ];
        let stats = ProductStats::from_products(&products);

        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_value, 35.0);
        assert!((stats.average_price - 35.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            stats.category_distribution,
            vec![
                CategoryCount { category: "Books".into(), count: 2 },
                CategoryCount { category: "Toys".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn stats_for_empty_collection_are_zero() {
        let stats = ProductStats::from_products(&[]);

        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_value, 0.0);
        assert_eq!(stats.average_price, 0.0);
        assert!(stats.category_distribution.is_empty());
    }

    #[test]
    fn distribution_keeps_first_seen_order_and_sums_to_total() {
        let products = vec![
            product("Toys", 1.0),
            product("Sports", 2.0),
            product("Toys", 3.0),
            product("Books", 4.0),
            product("Sports", 5.0),
        ];
        let stats = ProductStats::from_products(&products);

        let order: Vec<_> = stats
            .category_distribution
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(order, ["Toys", "Sports", "Books"]);

        let counted: usize = stats.category_distribution.iter().map(|c| c.count).sum();
        assert_eq!(counted, stats.total_products);
        assert_eq!(stats.average_price, stats.total_value / 5.0);
    }

    #[test]
    fn product_wire_format_uses_id_product() {
        let json = concat!(
            r#"{"idProduct":"42","name":"Lamp","category":"Home & Garden","price":19.5,"#,
            r#""createdAt":"2024-03-01T10:00:00Z"}"#,
        );
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_deref(), Some("42"));
        assert_eq!(product.price, 19.5);
        assert!(product.created_at.is_some());
        assert!(product.updated_at.is_none());

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["idProduct"], "42");
        assert!(value.get("updatedAt").is_none());
    }

    #[test]
    fn product_with_both_id_keys_prefers_id_product() {
        let json = r#"[{"id":"7","idProduct":"1","name":"Dune","category":"Books","price":10}]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();

        assert_eq!(products[0].id_str(), "1");
        let value = serde_json::to_value(&products[0]).unwrap();
        assert_eq!(value["idProduct"], "1");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn numeric_ids_are_read_as_text() {
        let json = r#"{"idProduct":12,"name":"Kite","category":"Toys","price":5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id_str(), "12");

        let unsaved: Product =
            serde_json::from_str(r#"{"name":"Kite","category":"Toys","price":5}"#).unwrap();
        assert!(unsaved.id.is_none());
    }

    #[test]
    fn product_accepts_plain_id_and_omits_missing_one() {
        let product: Product =
            serde_json::from_str(r#"{"id":"7","name":"Ball","category":"Sports","price":3}"#)
                .unwrap();
        assert_eq!(product.id_str(), "7");

        let draft = serde_json::to_value(Product::new("Ball", "Sports", 3.0)).unwrap();
        assert!(draft.get("idProduct").is_none());
    }

    #[test]
    fn stats_serialize_with_camel_case_names() {
        let stats = ProductStats::from_products(&[product("Books", 4.0)]);
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["totalProducts"], 1);
        assert_eq!(value["averagePrice"], 4.0);
        assert_eq!(value["categoryDistribution"][0]["category"], "Books");
    }

    #[test]
    fn page_counts() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);

        let page = Page::new(vec![1, 2], 7, 1, 5);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn sort_values_parse() {
        assert_eq!("Price".parse::<SortKey>(), Ok(SortKey::Price));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert!("weight".parse::<SortKey>().is_err());
    }
}
