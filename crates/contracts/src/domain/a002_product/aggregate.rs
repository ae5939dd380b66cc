use crate::domain::a001_category::CategoryId;
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    pub stock: u32,
    pub price: f64,
    pub metadata: EntityMetadata,
}

impl Product {
    pub fn new_for_insert(
        name: String,
        description: String,
        category_id: CategoryId,
        stock: u32,
        price: f64,
    ) -> Self {
        Self {
            id: ProductId::new_v4(),
            name,
            description,
            category_id,
            stock,
            price,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Applies the fields present in the patch. The category is resolved by
    /// the caller and passed separately.
    pub fn apply(&mut self, patch: &ProductPatch, category_id: CategoryId) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.category_id = category_id;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name cannot be empty".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }

    pub fn to_view(&self, category: Option<CategoryRef>) -> ProductView {
        ProductView {
            id: self.to_string_id(),
            name: self.name.clone(),
            description: self.description.clone(),
            category,
            stock: self.stock,
            price: self.price,
        }
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "product"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Create request. `category` is the category *name*.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    pub price: f64,
}

/// Partial update; only present fields overwrite.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub price: Option<f64>,
}

/// Populated category reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub name: String,
}

/// Product as returned by the API (status hidden, category populated)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Option<CategoryRef>,
    pub stock: u32,
    pub price: f64,
}

/// A page of products. `total` and `products` are fetched independently;
/// either is `null` when its fetch failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub total: Option<u64>,
    pub page: u64,
    pub products: Option<Vec<ProductView>>,
}
