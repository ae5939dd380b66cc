use contracts::domain::a001_category::{Category, CategoryDto, CategoryListResponse, CategoryPatch};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;
use crate::shared::id::parse_id;
use crate::shared::pagination::{settled, Pagination};

/// Page of active categories; count and page are fetched concurrently
pub async fn list(
    db: &DatabaseConnection,
    pagination: Pagination,
) -> Result<CategoryListResponse, ApiError> {
    let (total, categories) = tokio::join!(
        repository::count_active(db),
        repository::list_active_page(db, pagination.limit, pagination.skip()),
    );

    if let (Err(e), Err(_)) = (&total, &categories) {
        return Err(ApiError::Internal(anyhow::anyhow!("{:#}", e)));
    }

    Ok(CategoryListResponse {
        total: settled("count", total),
        page: pagination.page,
        categories: settled("page", categories),
    })
}

pub async fn create(db: &DatabaseConnection, dto: CategoryDto) -> Result<Category, ApiError> {
    let mut aggregate = Category::new_for_insert(dto.name, dto.description);
    aggregate.validate().map_err(ApiError::BadRequest)?;

    if repository::find_active_by_name(db, &aggregate.name)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Category already exists"));
    }

    aggregate.before_write();
    repository::insert(db, &aggregate).await?;
    tracing::info!(category_id = %aggregate.to_string_id(), name = %aggregate.name, "Category created");
    Ok(aggregate)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Category, ApiError> {
    repository::get_active_by_id(db, parse_id(id)?)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))
}

pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    patch: CategoryPatch,
) -> Result<Category, ApiError> {
    let mut aggregate = get_by_id(db, id).await?;

    if let Some(name) = &patch.name {
        if let Some(existing) = repository::find_active_by_name(db, name).await? {
            if existing.id != aggregate.id {
                return Err(ApiError::conflict("Category already exists"));
            }
        }
    }

    aggregate.apply(&patch);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    aggregate.before_write();
    repository::update(db, &aggregate).await?;
    Ok(aggregate)
}

/// Soft delete; returns the category as it was before deletion
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<Category, ApiError> {
    let aggregate = get_by_id(db, id).await?;
    if !repository::soft_delete(db, aggregate.id.value()).await? {
        return Err(ApiError::not_found("Category not found"));
    }
    tracing::info!(category_id = %aggregate.to_string_id(), "Category deleted");
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support;

    fn dto(name: &str) -> CategoryDto {
        CategoryDto {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_active_name_conflicts() {
        let db = test_support::open().await;
        create(&db.conn, dto("Toys")).await.unwrap();
        let err = create(&db.conn, dto("Toys")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_name_is_reusable_after_delete() {
        let db = test_support::open().await;
        let toys = create(&db.conn, dto("Toys")).await.unwrap();
        delete(&db.conn, &toys.to_string_id()).await.unwrap();
        assert!(create(&db.conn, dto("Toys")).await.is_ok());

        let err = get_by_id(&db.conn, &toys.to_string_id()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rename_collision_conflicts() {
        let db = test_support::open().await;
        create(&db.conn, dto("Toys")).await.unwrap();
        let games = create(&db.conn, dto("Games")).await.unwrap();

        let err = update(
            &db.conn,
            &games.to_string_id(),
            CategoryPatch {
                name: Some("Toys".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let renamed = update(
            &db.conn,
            &games.to_string_id(),
            CategoryPatch {
                name: Some("Board games".into()),
                description: Some("Tabletop".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Board games");
        assert_eq!(renamed.description.as_deref(), Some("Tabletop"));
    }

    #[tokio::test]
    async fn test_list_reports_total_and_page() {
        let db = test_support::open().await;
        for name in ["a", "b", "c"] {
            create(&db.conn, dto(name)).await.unwrap();
        }
        let page = list(&db.conn, Pagination::new(2, 1)).await.unwrap();
        assert_eq!(page.total, Some(3));
        assert_eq!(page.page, 1);
        assert_eq!(page.categories.unwrap().len(), 1);
    }
}
