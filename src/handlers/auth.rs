use axum::response::Json;
use axum::Form;
use serde::{Deserialize, Serialize};

use crate::auth::{self, Claims};
use crate::database::{DatabaseManager, UserStore};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /api/auth/login - Exchange admin credentials for a bearer token
pub async fn login(Form(form): Form<LoginForm>) -> Result<Json<Token>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let user = UserStore::new(pool)
        .authenticate(&form.username, &form.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Incorrect username or password"))?;

    let token = auth::generate_token(&Claims::new(&user.username))?;

    Ok(Json(Token {
        access_token: token,
        token_type: "bearer",
    }))
}
