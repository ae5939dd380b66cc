use std::collections::HashSet;

use contracts::domain::a002_product::ProductId;
use contracts::domain::a003_sale::{Sale, SaleDto, SaleLine};
use contracts::domain::common::AggregateId;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::shared::id::parse_id;
use crate::domain::a002_product::repository as product_repository;
use crate::shared::error::ApiError;

/// Records a sale. Every referenced product must be active. Stock is not
/// touched.
pub async fn create(db: &DatabaseConnection, dto: SaleDto) -> Result<Sale, ApiError> {
    let lines = dto
        .products
        .into_iter()
        .map(|line| {
            let product = ProductId::from_string(&line.product)
                .map_err(|_| ApiError::bad_request(format!("Product not found: {}", line.product)))?;
            Ok(SaleLine {
                product,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let sale = Sale::new_for_insert(lines);
    sale.validate().map_err(ApiError::BadRequest)?;

    let mut referenced: Vec<String> = sale
        .products
        .iter()
        .map(|l| l.product.as_string())
        .collect();
    referenced.sort();
    referenced.dedup();

    let active: HashSet<String> = product_repository::get_active_by_ids(db, &referenced)
        .await?
        .into_iter()
        .map(|p| p.to_string_id())
        .collect();
    if let Some(missing) = referenced.iter().find(|id| !active.contains(*id)) {
        return Err(ApiError::bad_request(format!("Product not found: {}", missing)));
    }

    let txn = db.begin().await?;
    repository::insert(&txn, &sale).await?;
    txn.commit().await?;

    tracing::info!(sale_id = %sale.to_string_id(), lines = sale.products.len(), "Sale recorded");
    Ok(sale)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Sale, ApiError> {
    let record = repository::get_by_id(db, parse_id(id)?)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale not found"))?;
    Ok(Sale::try_from(record)?)
}
