use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::store::{Entity, PgQueryAs};

/// A purchase enquiry for one painting, tied 1:1 to the session that
/// submitted it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i32,
    pub user_name: String,
    pub phone_number: String,
    pub submitted_at: DateTime<Utc>,
    pub painting_id: i32,
    pub user_session_id: i32,
}

#[derive(Debug, Clone)]
pub struct FeedbackCreate {
    pub user_name: String,
    pub phone_number: String,
    pub painting_id: i32,
    pub user_session_id: i32,
}

impl Entity for Feedback {
    const TABLE: &'static str = "feedbacks";

    type Create = FeedbackCreate;
    // Feedback rows are immutable once submitted
    type Patch = ();

    fn id(&self) -> i32 {
        self.id
    }

    fn insert_columns() -> &'static [&'static str] {
        &["user_name", "phone_number", "painting_id", "user_session_id"]
    }

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, input: &'q FeedbackCreate) -> PgQueryAs<'q, Self> {
        query
            .bind(&input.user_name)
            .bind(&input.phone_number)
            .bind(input.painting_id)
            .bind(input.user_session_id)
    }

    fn patch_columns(_patch: &()) -> Vec<&'static str> {
        Vec::new()
    }

    fn bind_patch<'q>(query: PgQueryAs<'q, Self>, _patch: &'q ()) -> PgQueryAs<'q, Self> {
        query
    }
}
