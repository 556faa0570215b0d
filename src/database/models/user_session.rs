use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::store::{Entity, PgQueryAs};

/// Anonymous browsing session. Rows carry no client data; one is created
/// implicitly for each submitted feedback.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

impl Entity for UserSession {
    const TABLE: &'static str = "usersessions";

    // Every column is database-generated, so there is nothing to bind
    type Create = ();
    type Patch = ();

    fn id(&self) -> i32 {
        self.id
    }

    fn insert_columns() -> &'static [&'static str] {
        &[]
    }

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, _input: &'q ()) -> PgQueryAs<'q, Self> {
        query
    }

    fn patch_columns(_patch: &()) -> Vec<&'static str> {
        Vec::new()
    }

    fn bind_patch<'q>(query: PgQueryAs<'q, Self>, _patch: &'q ()) -> PgQueryAs<'q, Self> {
        query
    }
}
