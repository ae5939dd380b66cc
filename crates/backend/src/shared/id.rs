use uuid::Uuid;

use super::error::ApiError;

/// Parses a path or body id; malformed ids are a bad request
pub fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request(format!("Invalid id: {}", id)))
}
