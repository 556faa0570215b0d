use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Feedback, FeedbackCreate, Painting, UserSession};
use crate::database::store::Store;

/// Session and feedback persistence.
///
/// A feedback row never exists without its own session row; `submit`
/// creates the pair in one transaction.
pub struct FeedbackStore {
    pool: PgPool,
}

impl FeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an enquiry for a painting. The backing session is created
    /// here; callers never supply one.
    pub async fn submit(
        &self,
        painting_id: i32,
        user_name: &str,
        phone_number: &str,
    ) -> Result<Feedback, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Check the painting inside the transaction so a concurrent delete
        // cannot leave an orphaned session behind
        if Store::<Painting>::get_in(&mut *tx, painting_id).await?.is_none() {
            return Err(DatabaseError::NotFound("Painting not found".to_string()));
        }

        let session = Store::<UserSession>::create_in(&mut *tx, &()).await?;
        let feedback = Store::<Feedback>::create_in(
            &mut *tx,
            &FeedbackCreate {
                user_name: user_name.to_string(),
                phone_number: phone_number.to_string(),
                painting_id,
                user_session_id: session.id,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(feedback)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Feedback>, DatabaseError> {
        Store::<Feedback>::get_in(&self.pool, id).await
    }

    /// Delete a session and the feedback tied to it, if any.
    pub async fn remove_session(&self, session_id: i32) -> Result<Option<UserSession>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM \"feedbacks\" WHERE \"user_session_id\" = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        let removed = Store::<UserSession>::remove_in(&mut *tx, session_id).await?;

        tx.commit().await?;
        Ok(removed)
    }
}
