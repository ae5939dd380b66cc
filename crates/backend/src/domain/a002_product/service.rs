use std::collections::HashMap;

use contracts::domain::a001_category::Category;
use contracts::domain::a002_product::{
    CategoryRef, Product, ProductDto, ProductListResponse, ProductPatch, ProductView,
};
use contracts::domain::common::AggregateId;
use sea_orm::DatabaseConnection;

use super::repository::{self, ProductFilter};
use crate::domain::a001_category::repository as category_repository;
use crate::shared::id::parse_id;
use crate::shared::error::ApiError;
use crate::shared::pagination::{settled, Pagination};

fn category_not_found() -> ApiError {
    ApiError::bad_request("Category not found")
}

fn product_not_found() -> ApiError {
    ApiError::not_found("Product not found")
}

/// Resolves the category reference of each product to `{id, name}`.
/// Status is not checked, as with any populated reference.
async fn populate(db: &DatabaseConnection, products: &[Product]) -> anyhow::Result<Vec<ProductView>> {
    let mut ids: Vec<String> = products
        .iter()
        .map(|p| p.category_id.as_string())
        .collect();
    ids.sort();
    ids.dedup();

    let categories: HashMap<String, Category> = category_repository::get_by_ids(db, &ids)
        .await?
        .into_iter()
        .map(|c| (c.to_string_id(), c))
        .collect();

    Ok(products
        .iter()
        .map(|p| {
            let category = categories.get(&p.category_id.as_string()).map(|c| CategoryRef {
                id: Some(c.to_string_id()),
                name: c.name.clone(),
            });
            p.to_view(category)
        })
        .collect())
}

async fn list_filtered(
    db: &DatabaseConnection,
    pagination: Pagination,
    filter: &ProductFilter,
) -> Result<ProductListResponse, ApiError> {
    let (total, products) = tokio::join!(
        repository::count_active(db, filter),
        repository::list_active_page(db, filter, pagination.limit, pagination.skip()),
    );

    if let (Err(e), Err(_)) = (&total, &products) {
        return Err(ApiError::Internal(anyhow::anyhow!("{:#}", e)));
    }

    let products = match settled("page", products) {
        Some(products) => Some(populate(db, &products).await?),
        None => None,
    };

    Ok(ProductListResponse {
        total: settled("count", total),
        page: pagination.page,
        products,
    })
}

/// Active products, restricted to `category` when it names an active
/// category. An unknown category name lists every active product.
pub async fn list(
    db: &DatabaseConnection,
    pagination: Pagination,
    category: Option<&str>,
) -> Result<ProductListResponse, ApiError> {
    let category = match category.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => category_repository::find_active_by_name(db, name).await?,
        None => None,
    };
    let filter = ProductFilter {
        category_id: category.map(|c| c.id),
        out_of_stock: false,
    };
    list_filtered(db, pagination, &filter).await
}

pub async fn list_out_of_stock(
    db: &DatabaseConnection,
    pagination: Pagination,
) -> Result<ProductListResponse, ApiError> {
    let filter = ProductFilter {
        category_id: None,
        out_of_stock: true,
    };
    list_filtered(db, pagination, &filter).await
}

pub async fn create(db: &DatabaseConnection, dto: ProductDto) -> Result<ProductView, ApiError> {
    let category = category_repository::find_active_by_name(db, &dto.category)
        .await?
        .ok_or_else(category_not_found)?;

    let mut aggregate =
        Product::new_for_insert(dto.name, dto.description, category.id, dto.stock, dto.price);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    aggregate.before_write();

    repository::insert(db, &aggregate).await?;
    tracing::info!(product_id = %aggregate.to_string_id(), category = %category.name, "Product created");

    Ok(aggregate.to_view(Some(CategoryRef {
        id: None,
        name: category.name,
    })))
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<ProductView, ApiError> {
    let product = repository::get_active_by_id(db, parse_id(id)?)
        .await?
        .ok_or_else(product_not_found)?;
    let mut views = populate(db, std::slice::from_ref(&product)).await?;
    views.pop().ok_or_else(product_not_found)
}

/// Partial update. The category (given or current) must be active.
pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    patch: ProductPatch,
) -> Result<ProductView, ApiError> {
    let uuid = parse_id(id)?;

    let requested_category = match &patch.category {
        Some(name) => Some(
            category_repository::find_active_by_name(db, name)
                .await?
                .ok_or_else(category_not_found)?,
        ),
        None => None,
    };

    let mut aggregate = repository::get_active_by_id(db, uuid)
        .await?
        .ok_or_else(product_not_found)?;

    let category = match requested_category {
        Some(category) => category,
        None => category_repository::get_active_by_id(db, aggregate.category_id.value())
            .await?
            .ok_or_else(category_not_found)?,
    };

    aggregate.apply(&patch, category.id);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    aggregate.before_write();
    repository::update(db, &aggregate).await?;
    tracing::debug!(product_id = %aggregate.to_string_id(), "Product updated");

    Ok(aggregate.to_view(Some(CategoryRef {
        id: None,
        name: category.name,
    })))
}

/// Soft delete; returns the product as it was before deletion
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<ProductView, ApiError> {
    let uuid = parse_id(id)?;
    let product = repository::get_active_by_id(db, uuid)
        .await?
        .ok_or_else(product_not_found)?;

    if !repository::soft_delete(db, uuid).await? {
        return Err(product_not_found());
    }
    tracing::info!(product_id = %product.to_string_id(), "Product deleted");

    let mut views = populate(db, std::slice::from_ref(&product)).await?;
    views.pop().ok_or_else(product_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_category::service as category_service;
    use crate::shared::data::db::test_support;
    use contracts::domain::a001_category::CategoryDto;

    async fn seed_category(db: &DatabaseConnection, name: &str) -> Category {
        category_service::create(
            db,
            CategoryDto {
                name: name.into(),
                description: None,
            },
        )
        .await
        .unwrap()
    }

    fn dto(name: &str, category: &str, stock: u32) -> ProductDto {
        ProductDto {
            name: name.into(),
            description: format!("{} description", name),
            category: category.into(),
            stock,
            price: 10.0,
        }
    }

    #[tokio::test]
    async fn test_create_requires_active_category() {
        let db = test_support::open().await;
        let err = create(&db.conn, dto("lamp", "Home", 1)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Category not found"));

        seed_category(&db.conn, "Home").await;
        let view = create(&db.conn, dto("lamp", "Home", 1)).await.unwrap();
        assert_eq!(view.name, "lamp");
        assert_eq!(
            view.category,
            Some(CategoryRef {
                id: None,
                name: "Home".into()
            })
        );
    }

    #[tokio::test]
    async fn test_get_populates_category() {
        let db = test_support::open().await;
        let home = seed_category(&db.conn, "Home").await;
        let created = create(&db.conn, dto("lamp", "Home", 1)).await.unwrap();

        let view = get_by_id(&db.conn, &created.id).await.unwrap();
        assert_eq!(
            view.category,
            Some(CategoryRef {
                id: Some(home.to_string_id()),
                name: "Home".into()
            })
        );

        let err = get_by_id(&db.conn, "not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err = get_by_id(&db.conn, &uuid::Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_by_category_name() {
        let db = test_support::open().await;
        seed_category(&db.conn, "Home").await;
        seed_category(&db.conn, "Garden").await;
        create(&db.conn, dto("lamp", "Home", 1)).await.unwrap();
        create(&db.conn, dto("rake", "Garden", 1)).await.unwrap();
        create(&db.conn, dto("chair", "Home", 1)).await.unwrap();

        let home = list(&db.conn, Pagination::new(5, 0), Some("Home"))
            .await
            .unwrap();
        assert_eq!(home.total, Some(2));
        let names: Vec<_> = home.products.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["lamp", "chair"]);

        // Unknown category lists everything
        let all = list(&db.conn, Pagination::new(2, 1), Some("Toys"))
            .await
            .unwrap();
        assert_eq!(all.total, Some(3));
        assert_eq!(all.page, 1);
        let names: Vec<_> = all.products.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["chair"]);
    }

    #[tokio::test]
    async fn test_out_of_stock_excludes_deleted() {
        let db = test_support::open().await;
        seed_category(&db.conn, "Home").await;
        let lamp = create(&db.conn, dto("lamp", "Home", 0)).await.unwrap();
        create(&db.conn, dto("vase", "Home", 0)).await.unwrap();
        create(&db.conn, dto("chair", "Home", 3)).await.unwrap();
        delete(&db.conn, &lamp.id).await.unwrap();

        let page = list_out_of_stock(&db.conn, Pagination::new(5, 0))
            .await
            .unwrap();
        assert_eq!(page.total, Some(1));
        assert_eq!(page.products.unwrap()[0].name, "vase");
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let db = test_support::open().await;
        seed_category(&db.conn, "Home").await;
        seed_category(&db.conn, "Office").await;
        let lamp = create(&db.conn, dto("lamp", "Home", 4)).await.unwrap();

        let updated = update(
            &db.conn,
            &lamp.id,
            ProductPatch {
                category: Some("Office".into()),
                price: Some(25.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "lamp");
        assert_eq!(updated.stock, 4);
        assert_eq!(updated.price, 25.0);
        assert_eq!(updated.category.unwrap().name, "Office");

        let stored = get_by_id(&db.conn, &lamp.id).await.unwrap();
        assert_eq!(stored.price, 25.0);
        assert_eq!(stored.category.unwrap().name, "Office");
    }

    #[tokio::test]
    async fn test_update_rejects_missing_category_before_lookup() {
        let db = test_support::open().await;
        let err = update(
            &db.conn,
            &uuid::Uuid::new_v4().to_string(),
            ProductPatch {
                category: Some("Nowhere".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_without_category_needs_active_current_category() {
        let db = test_support::open().await;
        let home = seed_category(&db.conn, "Home").await;
        let lamp = create(&db.conn, dto("lamp", "Home", 4)).await.unwrap();
        category_service::delete(&db.conn, &home.to_string_id())
            .await
            .unwrap();

        let err = update(
            &db.conn,
            &lamp.id,
            ProductPatch {
                stock: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let db = test_support::open().await;
        seed_category(&db.conn, "Home").await;
        let lamp = create(&db.conn, dto("lamp", "Home", 4)).await.unwrap();

        let deleted = delete(&db.conn, &lamp.id).await.unwrap();
        assert_eq!(deleted.name, "lamp");
        assert_eq!(deleted.category.unwrap().name, "Home");

        let err = delete(&db.conn, &lamp.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
