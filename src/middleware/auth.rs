use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};

use crate::auth;
use crate::database::models::User;
use crate::database::{DatabaseManager, UserStore};
use crate::error::ApiError;

/// Authenticated admin account, resolved from the request's bearer token.
///
/// Handlers take this as an extractor; requests without a valid token are
/// rejected with 401 before the handler body runs.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;
        let claims = auth::validate_token(&token)?;

        // Tokens outlive account changes, so the account is re-resolved on
        // every request; a deleted admin loses access immediately
        let pool = DatabaseManager::pool().await?;
        let user = UserStore::new(pool)
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;

        Ok(CurrentUser(user))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Catalog mutations are restricted to superuser accounts.
pub fn require_superuser(user: &User) -> Result<(), ApiError> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(ApiError::forbidden("The user doesn't have enough privileges"))
    }
}
