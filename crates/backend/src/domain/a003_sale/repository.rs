use std::collections::HashMap;

use chrono::Utc;
use contracts::domain::a002_product::ProductId;
use contracts::domain::a003_sale::{Sale, SaleId, SaleLine};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::shared::data::db::{sql_int, IN_LIST_CHUNK};

/// Sale header, one row per sale
pub mod header {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_sale")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Sale line items
pub mod line {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_sale_line")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub sale_id: String,
        pub line_no: i32,
        pub product_id: String,
        pub quantity: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Sale row together with its line rows, as stored
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub header: header::Model,
    pub lines: Vec<line::Model>,
}

impl TryFrom<SaleRecord> for Sale {
    type Error = anyhow::Error;

    fn try_from(record: SaleRecord) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&record.header.id).map_err(|e| {
            anyhow::anyhow!("a003_sale row {} has invalid id: {}", record.header.id, e)
        })?;
        let products = record
            .lines
            .into_iter()
            .map(|l| {
                let product = Uuid::parse_str(&l.product_id).map_err(|e| {
                    anyhow::anyhow!("a003_sale_line row {} has invalid product: {}", l.id, e)
                })?;
                let quantity = u32::try_from(l.quantity).map_err(|_| {
                    anyhow::anyhow!("a003_sale_line row {} has invalid quantity {}", l.id, l.quantity)
                })?;
                Ok(SaleLine {
                    product: ProductId(product),
                    quantity,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Sale {
            id: SaleId(id),
            products,
            created_at: record.header.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Stores the header and every line through `conn`, which may be a
/// transaction.
pub async fn insert<C: ConnectionTrait>(conn: &C, sale: &Sale) -> anyhow::Result<Uuid> {
    let uuid = sale.id.value();
    header::ActiveModel {
        id: Set(uuid.to_string()),
        created_at: Set(Some(sale.created_at)),
    }
    .insert(conn)
    .await?;

    for (line_no, l) in sale.products.iter().enumerate() {
        line::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            sale_id: Set(uuid.to_string()),
            line_no: Set(i32::try_from(line_no)?),
            product_id: Set(l.product.value().to_string()),
            quantity: Set(i64::from(l.quantity)),
        }
        .insert(conn)
        .await?;
    }
    Ok(uuid)
}

async fn lines_of<C: ConnectionTrait>(
    conn: &C,
    sale_ids: &[String],
) -> anyhow::Result<HashMap<String, Vec<line::Model>>> {
    let mut grouped: HashMap<String, Vec<line::Model>> = HashMap::new();
    // A sale's lines all land in the chunk holding its id
    for chunk in sale_ids.chunks(IN_LIST_CHUNK) {
        let lines = line::Entity::find()
            .filter(line::Column::SaleId.is_in(chunk.iter().cloned()))
            .order_by_asc(line::Column::SaleId)
            .order_by_asc(line::Column::LineNo)
            .all(conn)
            .await?;
        for l in lines {
            grouped.entry(l.sale_id.clone()).or_default().push(l);
        }
    }
    Ok(grouped)
}

pub async fn get_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> anyhow::Result<Option<SaleRecord>> {
    let Some(header) = header::Entity::find_by_id(id.to_string()).one(conn).await? else {
        return Ok(None);
    };
    let mut lines = lines_of(conn, std::slice::from_ref(&header.id)).await?;
    let lines = lines.remove(&header.id).unwrap_or_default();
    Ok(Some(SaleRecord { header, lines }))
}

/// Sales in insertion order, skipping `offset` and returning at most `limit`
pub async fn list_window<C: ConnectionTrait>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> anyhow::Result<Vec<SaleRecord>> {
    let headers = header::Entity::find()
        .order_by(Expr::cust("rowid"), Order::Asc)
        .offset(sql_int(offset))
        .limit(sql_int(limit))
        .all(conn)
        .await?;

    let ids: Vec<String> = headers.iter().map(|h| h.id.clone()).collect();
    let mut lines = lines_of(conn, &ids).await?;

    Ok(headers
        .into_iter()
        .map(|header| {
            let lines = lines.remove(&header.id).unwrap_or_default();
            SaleRecord { header, lines }
        })
        .collect())
}
