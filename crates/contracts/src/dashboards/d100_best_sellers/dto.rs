use serde::{Deserialize, Serialize};

/// Total quantity sold of one product within the requested sales window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSellerRow {
    /// Product display name
    pub product: String,
    pub quantity: u64,
}

/// Best-selling products, ordered by descending quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestSellersResponse {
    pub products: Vec<BestSellerRow>,
}
