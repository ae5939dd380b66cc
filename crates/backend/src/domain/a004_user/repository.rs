use chrono::Utc;
use contracts::domain::a004_user::{User, UserId};
use contracts::domain::common::{AggregateRoot, EntityMetadata, RecordStatus};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub tp_status: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)
            .map_err(|e| anyhow::anyhow!("{} row {} has invalid id: {}", User::full_name(), m.id, e))?;
        Ok(User {
            id: UserId(uuid),
            username: m.username,
            email: m.email,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                status: RecordStatus::from_tp_status(m.tp_status),
            },
        })
    }
}

fn active_query() -> Select<Entity> {
    Entity::find().filter(Column::TpStatus.eq(true))
}

/// First active user whose username or email matches
pub async fn find_active_by_username_or_email(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
) -> anyhow::Result<Option<User>> {
    active_query()
        .filter(
            Condition::any()
                .add(Column::Username.eq(username))
                .add(Column::Email.eq(email)),
        )
        .order_by(Expr::cust("rowid"), sea_orm::Order::Asc)
        .one(db)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn get_active_by_id(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<User>> {
    active_query()
        .filter(Column::Id.eq(id.to_string()))
        .one(db)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn get_password_hash(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<String>> {
    Ok(Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(|m| m.password_hash))
}

pub async fn insert(
    db: &DatabaseConnection,
    aggregate: &User,
    password_hash: &str,
) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        username: Set(aggregate.username.clone()),
        email: Set(aggregate.email.clone()),
        password_hash: Set(password_hash.to_string()),
        tp_status: Set(aggregate.metadata.status.tp_status()),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
    };
    active.insert(db).await?;
    Ok(uuid)
}

/// Flips `tp_status` of an active user. Returns false if none matched.
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
    async fn test_lookup_matches_either_field() {
        let db = test_support::open().await;
        let ann = User::new_for_insert("ann".into(), "ann@example.com".into());
        insert(&db.conn, &ann, "hash").await.unwrap();

        let by_name = find_active_by_username_or_email(&db.conn, "ann", "x@example.com")
            .await
            .unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(ann.id));

        let by_email = find_active_by_username_or_email(&db.conn, "bob", "ann@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(ann.id));

        assert!(find_active_by_username_or_email(&db.conn, "bob", "bob@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_deleted_user_is_invisible() {
        let db = test_support::open().await;
        let ann = User::new_for_insert("ann".into(), "ann@example.com".into());
        insert(&db.conn, &ann, "hash").await.unwrap();

        assert!(soft_delete(&db.conn, ann.id.value()).await.unwrap());
        assert!(get_active_by_id(&db.conn, ann.id.value()).await.unwrap().is_none());
        assert!(find_active_by_username_or_email(&db.conn, "ann", "ann@example.com")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            get_password_hash(&db.conn, ann.id.value()).await.unwrap().as_deref(),
            Some("hash")
        );
    }
}
