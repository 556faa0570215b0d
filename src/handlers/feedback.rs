use axum::response::Json;
use serde::Deserialize;
use std::collections::HashMap;

use crate::database::models::Feedback;
use crate::database::{DatabaseManager, FeedbackStore};
use crate::error::ApiError;
use crate::services::notify;

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub user_name: String,
    pub phone_number: String,
    pub painting_id: i32,
}

/// POST /api/feedback - Record a purchase enquiry for a painting
pub async fn submit(Json(form): Json<FeedbackForm>) -> Result<Json<Feedback>, ApiError> {
    validate(&form)?;

    let pool = DatabaseManager::pool().await?;
    let feedback = FeedbackStore::new(pool)
        .submit(form.painting_id, form.user_name.trim(), form.phone_number.trim())
        .await?;

    // Fire-and-forget: the response never waits on Telegram
    tokio::spawn(notify::send_feedback_notification(feedback.id));

    Ok(Json(feedback))
}

fn validate(form: &FeedbackForm) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if form.user_name.trim().is_empty() {
        field_errors.insert("user_name".to_string(), "This field is required".to_string());
    }
    if form.phone_number.trim().is_empty() {
        field_errors.insert("phone_number".to_string(), "This field is required".to_string());
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Missing required fields", Some(field_errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name_and_phone() {
        let form = FeedbackForm {
            user_name: "  ".to_string(),
            phone_number: String::new(),
            painting_id: 1,
        };

        let err = validate(&form).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(errors), .. } => {
                assert!(errors.contains_key("user_name"));
                assert!(errors.contains_key("phone_number"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_filled_form() {
        let form = FeedbackForm {
            user_name: "Jane Doe".to_string(),
            phone_number: "+1 555 0100".to_string(),
            painting_id: 7,
        };

        assert!(validate(&form).is_ok());
    }
}
