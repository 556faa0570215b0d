use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Painting, PaintingCreate, PaintingPatch};
use crate::database::store::{Entity, Store};
use crate::filter::{bind_params_as, bind_params_scalar, FilterBuilder, PaintingFilter};

/// Catalog access: generic row CRUD plus the filtered browse queries.
pub struct PaintingStore {
    pool: PgPool,
    store: Store<Painting>,
}

impl PaintingStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: Store::new(pool.clone()),
            pool,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Painting>, DatabaseError> {
        self.store.get(id).await
    }

    pub async fn get_404(&self, id: i32) -> Result<Painting, DatabaseError> {
        self.get(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Painting not found".to_string()))
    }

    /// Page through paintings matching the filter, in ascending id order.
    pub async fn list(
        &self,
        filter: &PaintingFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Painting>, DatabaseError> {
        if filter.is_empty() {
            return self.store.list(offset, limit).await;
        }

        let query = FilterBuilder::from_filter(filter).to_select_sql(Painting::TABLE, limit, offset);
        let paintings = bind_params_as(sqlx::query_as::<_, Painting>(&query.sql), &query.params)
            .fetch_all(&self.pool)
            .await?;

        Ok(paintings)
    }

    pub async fn count(&self, filter: &PaintingFilter) -> Result<i64, DatabaseError> {
        if filter.is_empty() {
            return self.store.count().await;
        }

        let query = FilterBuilder::from_filter(filter).to_count_sql(Painting::TABLE);
        let total = bind_params_scalar(sqlx::query_scalar::<_, i64>(&query.sql), &query.params)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// Every tag in use across the catalog, sorted and deduplicated.
    pub async fn distinct_tags(&self) -> Result<Vec<String>, DatabaseError> {
        let tags = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT unnest(\"tags\") AS tag FROM \"paintings\" ORDER BY tag",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Number of catalog pages at the given page size.
    pub async fn total_pages(&self, page_size: i64) -> Result<i64, DatabaseError> {
        let total = self.store.count().await?;
        Ok(pages_for(total, page_size))
    }

    pub async fn create(&self, input: &PaintingCreate) -> Result<Painting, DatabaseError> {
        self.store.create(input).await
    }

    pub async fn update(
        &self,
        existing: &Painting,
        patch: &PaintingPatch,
    ) -> Result<Painting, DatabaseError> {
        self.store.update(existing, patch).await
    }

    /// Delete a painting together with any feedback that references it.
    pub async fn remove_cascade(&self, id: i32) -> Result<Option<Painting>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM \"feedbacks\" WHERE \"painting_id\" = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let removed = Store::<Painting>::remove_in(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(removed)
    }
}

fn pages_for(total: i64, page_size: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}
