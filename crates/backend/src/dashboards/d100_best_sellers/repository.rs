use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::store::{PopulatedLine, ProductProjection, SaleWindowItem, SalesStore};
use crate::domain::a002_product::repository as product_repository;
use crate::domain::a003_sale::repository as sale_repository;

/// `SalesStore` backed by the application database
pub struct SeaOrmSalesStore {
    db: DatabaseConnection,
}

impl SeaOrmSalesStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn projection(m: &product_repository::Model, with_stock: bool) -> ProductProjection {
    ProductProjection {
        name: m.name.clone(),
        price: m.price,
        stock: with_stock.then(|| u32::try_from(m.stock).unwrap_or(0)),
    }
}

#[async_trait]
impl SalesStore for SeaOrmSalesStore {
    async fn fetch_sales_window(&self, skip: u64, limit: u64) -> anyhow::Result<Vec<SaleWindowItem>> {
        let records = sale_repository::list_window(&self.db, skip, limit).await?;

        let mut ids: Vec<String> = records
            .iter()
            .flat_map(|r| r.lines.iter().map(|l| l.product_id.clone()))
            .collect();
        ids.sort();
        ids.dedup();

        let products: HashMap<String, ProductProjection> =
            product_repository::find_by_ids(&self.db, &ids)
                .await?
                .iter()
                .map(|m| (m.id.clone(), projection(m, true)))
                .collect();

        records
            .into_iter()
            .map(|record| {
                let lines = record
                    .lines
                    .into_iter()
                    .map(|l| {
                        let quantity = u64::try_from(l.quantity).map_err(|_| {
                            anyhow::anyhow!("a003_sale_line row {} has invalid quantity {}", l.id, l.quantity)
                        })?;
                        Ok(PopulatedLine {
                            product: products.get(&l.product_id).cloned(),
                            product_id: l.product_id,
                            quantity,
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(SaleWindowItem {
                    sale_id: record.header.id,
                    lines,
                })
            })
            .collect()
    }

    async fn find_product_by_id(&self, id: &str) -> anyhow::Result<Option<ProductProjection>> {
        Ok(product_repository::find_by_id(&self.db, id)
            .await?
            .map(|m| projection(&m, false)))
    }
}
