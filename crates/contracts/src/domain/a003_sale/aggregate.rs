use crate::domain::a002_product::ProductId;
use crate::domain::common::AggregateId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub Uuid);

impl SaleId {
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

impl AggregateId for SaleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SaleId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// One line item of a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product: ProductId,
    pub quantity: u32,
}

/// A recorded sale. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub products: Vec<SaleLine>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Sale {
    pub fn new_for_insert(products: Vec<SaleLine>) -> Self {
        Self {
            id: SaleId::new_v4(),
            products,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.products.is_empty() {
            return Err("Sale must contain at least one product".into());
        }
        if let Some(line) = self.products.iter().find(|line| line.quantity == 0) {
            return Err(format!(
                "Quantity must be positive for product {}",
                line.product.as_string()
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SaleLineDto {
    /// Product id
    pub product: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SaleDto {
    pub products: Vec<SaleLineDto>,
}
