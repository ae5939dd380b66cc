use async_trait::async_trait;

/// Product fields read by the statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ProductProjection {
    pub name: String,
    pub price: f64,
    /// Only present when loaded alongside a sale line
    pub stock: Option<u32>,
}

/// Sale line with its product resolved when the product still exists
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedLine {
    pub product_id: String,
    pub quantity: u64,
    pub product: Option<ProductProjection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleWindowItem {
    pub sale_id: String,
    pub lines: Vec<PopulatedLine>,
}

/// Read access to sales and products needed by the best-sellers report.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Sales in insertion order, skipping `skip` and returning at most `limit`
    async fn fetch_sales_window(&self, skip: u64, limit: u64) -> anyhow::Result<Vec<SaleWindowItem>>;

    /// Product by id regardless of its status
    async fn find_product_by_id(&self, id: &str) -> anyhow::Result<Option<ProductProjection>>;
}
