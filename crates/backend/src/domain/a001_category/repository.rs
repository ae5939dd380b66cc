use chrono::Utc;
use contracts::domain::a001_category::{Category, CategoryId};
use contracts::domain::common::{AggregateRoot, EntityMetadata, RecordStatus};
use uuid::Uuid;

use crate::shared::data::db::{sql_int, IN_LIST_CHUNK};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tp_status: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)
            .map_err(|e| anyhow::anyhow!("{} row {} has invalid id: {}", Category::full_name(), m.id, e))?;
        Ok(Category {
            id: CategoryId(uuid),
            name: m.name,
            description: m.description,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                status: RecordStatus::from_tp_status(m.tp_status),
            },
        })
    }
}

fn into_categories(models: Vec<Model>) -> anyhow::Result<Vec<Category>> {
    models.into_iter().map(Category::try_from).collect()
}

fn active_query() -> Select<Entity> {
    Entity::find().filter(Column::TpStatus.eq(true))
}

pub async fn count_active(db: &DatabaseConnection) -> anyhow::Result<u64> {
    Ok(active_query().count(db).await?)
}

/// Active categories in insertion order
pub async fn list_active_page(
    db: &DatabaseConnection,
    limit: u64,
    offset: u64,
) -> anyhow::Result<Vec<Category>> {
    let models = active_query()
        .order_by(Expr::cust("rowid"), Order::Asc)
        .offset(sql_int(offset))
        .limit(sql_int(limit))
        .all(db)
        .await?;
    into_categories(models)
}

pub async fn get_active_by_id(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<Category>> {
    active_query()
        .filter(Column::Id.eq(id.to_string()))
        .one(db)
        .await?
        .map(Category::try_from)
        .transpose()
}

pub async fn find_active_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> anyhow::Result<Option<Category>> {
    active_query()
        .filter(Column::Name.eq(name))
        .one(db)
        .await?
        .map(Category::try_from)
        .transpose()
}

/// Categories by id regardless of status, for populating references
pub async fn get_by_ids(db: &DatabaseConnection, ids: &[String]) -> anyhow::Result<Vec<Category>> {
    let mut models = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(IN_LIST_CHUNK) {
        models.extend(
            Entity::find()
                .filter(Column::Id.is_in(chunk.iter().cloned()))
                .all(db)
                .await?,
        );
    }
    into_categories(models)
}

pub async fn insert(db: &DatabaseConnection, aggregate: &Category) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        tp_status: Set(aggregate.metadata.status.tp_status()),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
    };
    active.insert(db).await?;
    Ok(uuid)
}

pub async fn update(db: &DatabaseConnection, aggregate: &Category) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        tp_status: Set(aggregate.metadata.status.tp_status()),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(())
}

/// Flips `tp_status` of an active category. Returns false if none matched.
pub async fn soft_delete(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::TpStatus, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::TpStatus.eq(true))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support;

    #[tokio::test]
    async fn test_find_by_name_ignores_deleted() {
        let db = test_support::open().await;
        let books = Category::new_for_insert("Books".into(), None);
        insert(&db.conn, &books).await.unwrap();

        let found = find_active_by_name(&db.conn, "Books").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(books.id));

        assert!(soft_delete(&db.conn, books.id.value()).await.unwrap());
        assert!(find_active_by_name(&db.conn, "Books").await.unwrap().is_none());
        // Second delete matches nothing
        assert!(!soft_delete(&db.conn, books.id.value()).await.unwrap());

        // Populate lookups still see it
        let populated = get_by_ids(&db.conn, &[books.to_string_id()]).await.unwrap();
        assert_eq!(populated.len(), 1);
        assert_eq!(populated[0].metadata.status, RecordStatus::Deleted);
    }

    #[tokio::test]
    async fn test_page_keeps_insertion_order() {
        let db = test_support::open().await;
        for name in ["c", "a", "b"] {
            insert(&db.conn, &Category::new_for_insert(name.into(), None))
                .await
                .unwrap();
        }
        let page = list_active_page(&db.conn, 2, 1).await.unwrap();
        let names: Vec<_> = page.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(count_active(&db.conn).await.unwrap(), 3);
    }
}
