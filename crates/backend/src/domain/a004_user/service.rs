use contracts::domain::a004_user::{CreateUserDto, User};
use sea_orm::DatabaseConnection;

use super::{password, repository};
use crate::shared::id::parse_id;
use crate::shared::error::ApiError;

/// Decides whether a registration may proceed given the active user, if
/// any, that matched on username or email.
pub fn check_unique(found: Option<&User>, username: &str, email: &str) -> Result<(), ApiError> {
    let Some(existing) = found else {
        return Ok(());
    };
    match (existing.username == username, existing.email == email) {
        (true, true) => Err(ApiError::conflict("This user already exists, try login in")),
        (true, false) => Err(ApiError::conflict("Username already exists")),
        (false, true) => Err(ApiError::conflict("Email already exists")),
        // Lookup matched on neither field; nothing conflicts
        (false, false) => Ok(()),
    }
}

pub async fn create(db: &DatabaseConnection, dto: CreateUserDto) -> Result<User, ApiError> {
    let user = User::new_for_insert(dto.username.trim().to_string(), dto.email.trim().to_string());
    user.validate().map_err(ApiError::BadRequest)?;
    if dto.password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }

    let found =
        repository::find_active_by_username_or_email(db, &user.username, &user.email).await?;
    check_unique(found.as_ref(), &user.username, &user.email)?;

    let password_hash = password::hash_password(&dto.password)?;
    repository::insert(db, &user, &password_hash).await?;

    tracing::info!(user_id = %user.to_string_id(), username = %user.username, "User registered");
    Ok(user)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<User, ApiError> {
    repository::get_active_by_id(db, parse_id(id)?)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<User, ApiError> {
    let uuid = parse_id(id)?;
    let user = repository::get_active_by_id(db, uuid)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    if !repository::soft_delete(db, uuid).await? {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support;

    fn dto(username: &str, email: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.into(),
            email: email.into(),
            password: "s3cret".into(),
        }
    }

    fn message(result: Result<(), ApiError>) -> String {
        match result {
            Err(ApiError::Conflict(m)) => m,
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_check_unique_messages() {
        let ann = User::new_for_insert("ann".into(), "ann@example.com".into());

        assert!(check_unique(None, "ann", "ann@example.com").is_ok());
        assert_eq!(
            message(check_unique(Some(&ann), "ann", "ann@example.com")),
            "This user already exists, try login in"
        );
        assert_eq!(
            message(check_unique(Some(&ann), "ann", "other@example.com")),
            "Username already exists"
        );
        assert_eq!(
            message(check_unique(Some(&ann), "bob", "ann@example.com")),
            "Email already exists"
        );
    }

    #[tokio::test]
    async fn test_create_stores_hash_and_rejects_duplicates() {
        let db = test_support::open().await;
        let ann = create(&db.conn, dto("ann", "ann@example.com")).await.unwrap();

        let hash = repository::get_password_hash(&db.conn, ann.id.value())
            .await
            .unwrap()
            .unwrap();
        assert!(password::verify_password("s3cret", &hash).unwrap());

        let err = create(&db.conn, dto("ann", "new@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Username already exists"));

        let err = create(&db.conn, dto("bob", "ann@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Email already exists"));
    }

    #[tokio::test]
    async fn test_deleted_user_frees_username() {
        let db = test_support::open().await;
        let ann = create(&db.conn, dto("ann", "ann@example.com")).await.unwrap();

        let deleted = delete(&db.conn, &ann.to_string_id()).await.unwrap();
        assert_eq!(deleted.username, "ann");
        assert!(matches!(
            get_by_id(&db.conn, &ann.to_string_id()).await,
            Err(ApiError::NotFound(_))
        ));

        assert!(create(&db.conn, dto("ann", "ann@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_email_is_bad_request() {
        let db = test_support::open().await;
        let err = create(&db.conn, dto("ann", "nope")).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
