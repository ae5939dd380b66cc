use chrono::Utc;
use contracts::domain::a001_category::CategoryId;
use contracts::domain::a002_product::{Product, ProductId};
use contracts::domain::common::{AggregateRoot, EntityMetadata, RecordStatus};
use uuid::Uuid;

use crate::shared::data::db::{sql_int, IN_LIST_CHUNK};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub stock: i64,
    pub price: f64,
    pub tp_status: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&m.id)
            .map_err(|e| anyhow::anyhow!("{} row {} has invalid id: {}", Product::full_name(), m.id, e))?;
        let category_id = Uuid::parse_str(&m.category_id).map_err(|e| {
            anyhow::anyhow!("{} row {} has invalid category: {}", Product::full_name(), m.id, e)
        })?;
        let stock = u32::try_from(m.stock)
            .map_err(|_| anyhow::anyhow!("{} row {} has invalid stock {}", Product::full_name(), m.id, m.stock))?;

        Ok(Product {
            id: ProductId(id),
            name: m.name,
            description: m.description,
            category_id: CategoryId(category_id),
            stock,
            price: m.price,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                status: RecordStatus::from_tp_status(m.tp_status),
            },
        })
    }
}

fn into_products(models: Vec<Model>) -> anyhow::Result<Vec<Product>> {
    models.into_iter().map(Product::try_from).collect()
}

/// Read-path filter over active products
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub out_of_stock: bool,
}

fn active_query(filter: &ProductFilter) -> Select<Entity> {
    let mut query = Entity::find().filter(Column::TpStatus.eq(true));
    if let Some(category_id) = filter.category_id {
        query = query.filter(Column::CategoryId.eq(category_id.value().to_string()));
    }
    if filter.out_of_stock {
        query = query.filter(Column::Stock.eq(0));
    }
    query
}

pub async fn count_active(db: &DatabaseConnection, filter: &ProductFilter) -> anyhow::Result<u64> {
    Ok(active_query(filter).count(db).await?)
}

/// Active products in insertion order
pub async fn list_active_page(
    db: &DatabaseConnection,
    filter: &ProductFilter,
    limit: u64,
    offset: u64,
) -> anyhow::Result<Vec<Product>> {
    let models = active_query(filter)
        .order_by(Expr::cust("rowid"), Order::Asc)
        .offset(sql_int(offset))
        .limit(sql_int(limit))
        .all(db)
        .await?;
    into_products(models)
}

pub async fn get_active_by_id(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<Product>> {
    active_query(&ProductFilter::default())
        .filter(Column::Id.eq(id.to_string()))
        .one(db)
        .await?
        .map(Product::try_from)
        .transpose()
}

/// Raw row by id with no status filter
pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id.to_string()).one(db).await?)
}

/// Raw rows by id with no status filter, for populating references
pub async fn find_by_ids(db: &DatabaseConnection, ids: &[String]) -> anyhow::Result<Vec<Model>> {
    let mut models = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(IN_LIST_CHUNK) {
        models.extend(
            Entity::find()
                .filter(Column::Id.is_in(chunk.iter().cloned()))
                .all(db)
                .await?,
        );
    }
    Ok(models)
}

/// Active products among `ids`
pub async fn get_active_by_ids(
    db: &DatabaseConnection,
    ids: &[String],
) -> anyhow::Result<Vec<Product>> {
    let mut models = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(IN_LIST_CHUNK) {
        models.extend(
            active_query(&ProductFilter::default())
                .filter(Column::Id.is_in(chunk.iter().cloned()))
                .all(db)
                .await?,
        );
    }
    into_products(models)
}

fn to_active_model(aggregate: &Product) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        category_id: Set(aggregate.category_id.value().to_string()),
        stock: Set(i64::from(aggregate.stock)),
        price: Set(aggregate.price),
        tp_status: Set(aggregate.metadata.status.tp_status()),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
    }
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Product) -> anyhow::Result<Uuid> {
    to_active_model(aggregate).insert(db).await?;
    Ok(aggregate.id.value())
}

pub async fn update(db: &DatabaseConnection, aggregate: &Product) -> anyhow::Result<()> {
    let mut active = to_active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(db).await?;
    Ok(())
}

/// Flips `tp_status` of an active product. Returns false if none matched.
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

/// Physically removes a product row. Not reachable from the API; used to
/// exercise dangling sale references.
#[cfg(test)]
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<()> {
    Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support;

    fn product(name: &str, category: CategoryId, stock: u32) -> Product {
        Product::new_for_insert(name.into(), String::new(), category, stock, 1.0)
    }

    #[tokio::test]
    async fn test_filters_by_category_and_stock() {
        let db = test_support::open().await;
        let home = CategoryId::new_v4();
        let garden = CategoryId::new_v4();
        insert(&db.conn, &product("lamp", home, 0)).await.unwrap();
        insert(&db.conn, &product("chair", home, 4)).await.unwrap();
        insert(&db.conn, &product("rake", garden, 0)).await.unwrap();

        let by_home = ProductFilter {
            category_id: Some(home),
            out_of_stock: false,
        };
        assert_eq!(count_active(&db.conn, &by_home).await.unwrap(), 2);

        let out_of_stock = ProductFilter {
            category_id: None,
            out_of_stock: true,
        };
        let names: Vec<_> = list_active_page(&db.conn, &out_of_stock, 10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["lamp", "rake"]);
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_stay_resolvable_by_raw_lookup() {
        let db = test_support::open().await;
        let lamp = product("lamp", CategoryId::new_v4(), 1);
        insert(&db.conn, &lamp).await.unwrap();

        assert!(soft_delete(&db.conn, lamp.id.value()).await.unwrap());
        assert!(get_active_by_id(&db.conn, lamp.id.value())
            .await
            .unwrap()
            .is_none());
        let raw = find_by_id(&db.conn, &lamp.to_string_id()).await.unwrap();
        assert_eq!(raw.map(|m| m.tp_status), Some(false));

        hard_delete(&db.conn, lamp.id.value()).await.unwrap();
        assert!(find_by_id(&db.conn, &lamp.to_string_id())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let db = test_support::open().await;
        let mut lamp = product("lamp", CategoryId::new_v4(), 1);
        insert(&db.conn, &lamp).await.unwrap();

        lamp.stock = 0;
        lamp.price = 12.25;
        update(&db.conn, &lamp).await.unwrap();

        let stored = get_active_by_id(&db.conn, lamp.id.value())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.stock, 0);
        assert_eq!(stored.price, 12.25);
    }
}
