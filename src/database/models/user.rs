use serde::Serialize;
use sqlx::FromRow;

/// Administrator account. Only superusers may mutate the catalog.
///
/// Admin accounts are provisioned from the CLI, never through the HTTP
/// API, so this stays outside the generic entity store.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_superuser: bool,
}
