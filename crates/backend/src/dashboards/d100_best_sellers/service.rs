use std::collections::HashMap;

use contracts::dashboards::d100_best_sellers::{BestSellerRow, BestSellersResponse};

use super::store::{SaleWindowItem, SalesStore};
use crate::shared::pagination::Pagination;

/// Totals per product id over the window, in order of first appearance.
/// Every line counts; repeated products within a sale add up.
pub fn tally_quantities(sales: &[SaleWindowItem]) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for line in sales.iter().flat_map(|s| s.lines.iter()) {
        match index.get(line.product_id.as_str()) {
            Some(&i) => totals[i].1 += line.quantity,
            None => {
                index.insert(line.product_id.as_str(), totals.len());
                totals.push((line.product_id.clone(), line.quantity));
            }
        }
    }
    totals
}

/// Orders totals by descending quantity. Stable, so ties keep first-encounter order.
pub fn rank(mut totals: Vec<(String, u64)>) -> Vec<(String, u64)> {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Best-selling products within the sales window selected by `pagination`.
///
/// Products are named by re-reading them by id with no status filter.
/// Ids that no longer resolve are left out.
pub async fn get_best_sellers(
    store: &dyn SalesStore,
    pagination: Pagination,
) -> anyhow::Result<BestSellersResponse> {
    let sales = store
        .fetch_sales_window(pagination.skip(), pagination.limit)
        .await?;
    if sales.is_empty() {
        return Ok(BestSellersResponse::default());
    }

    let ranked = rank(tally_quantities(&sales));

    let mut products = Vec::with_capacity(ranked.len());
    for (product_id, quantity) in ranked {
        match store.find_product_by_id(&product_id).await? {
            Some(product) => products.push(BestSellerRow {
                product: product.name,
                quantity,
            }),
            None => tracing::debug!(%product_id, "Skipping sold product that no longer exists"),
        }
    }

    Ok(BestSellersResponse { products })
}
