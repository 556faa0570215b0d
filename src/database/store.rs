// Generic persistence for catalog entities over fixed table shapes.
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres};
use std::marker::PhantomData;

use crate::database::manager::DatabaseError;

pub type PgQueryAs<'q, T> = sqlx::query::QueryAs<'q, Postgres, T, PgArguments>;

/// Table metadata and parameter binding for a stored entity.
///
/// `bind_create` must bind values in the exact order `insert_columns`
/// lists them; `bind_patch` must follow the order of `patch_columns`.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;

    /// Input shape for INSERT.
    type Create: Send + Sync;
    /// Partial input shape for UPDATE; absent fields are left untouched.
    type Patch: Send + Sync;

    fn id(&self) -> i32;

    fn insert_columns() -> &'static [&'static str];

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, input: &'q Self::Create) -> PgQueryAs<'q, Self>
    where
        Self: Sized;

    /// Columns actually present in the patch, in binding order.
    fn patch_columns(patch: &Self::Patch) -> Vec<&'static str>;

    fn bind_patch<'q>(query: PgQueryAs<'q, Self>, patch: &'q Self::Patch) -> PgQueryAs<'q, Self>
    where
        Self: Sized;
}

/// CRUD operations shared by every entity table.
///
/// Row-level reads and writes go through the pool held here; the `_in`
/// variants take an explicit executor so callers can compose several
/// operations inside one transaction.
pub struct Store<E> {
    pool: PgPool,
    _phantom: PhantomData<E>,
}

impl<E: Entity> Store<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<E>, DatabaseError> {
        Self::get_in(&self.pool, id).await
    }

    pub async fn get_in<'e>(
        executor: impl PgExecutor<'e>,
        id: i32,
    ) -> Result<Option<E>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE \"id\" = $1", E::TABLE);

        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Page through all rows in ascending id order.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<E>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM \"{}\" ORDER BY \"id\" ASC LIMIT $1 OFFSET $2",
            E::TABLE
        );

        sqlx::query_as::<_, E>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", E::TABLE);

        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(&self, input: &E::Create) -> Result<E, DatabaseError> {
        Self::create_in(&self.pool, input).await
    }

    pub async fn create_in<'e>(
        executor: impl PgExecutor<'e>,
        input: &E::Create,
    ) -> Result<E, DatabaseError> {
        let sql = insert_sql(E::TABLE, E::insert_columns());
        let query = sqlx::query_as::<_, E>(&sql);

        E::bind_create(query, input)
            .fetch_one(executor)
            .await
            .map_err(Into::into)
    }

    /// Apply the fields present in `patch` to an existing row.
    ///
    /// An empty patch leaves the row untouched and returns its current state.
    pub async fn update(&self, existing: &E, patch: &E::Patch) -> Result<E, DatabaseError> {
        let columns = E::patch_columns(patch);

        if columns.is_empty() {
            return self
                .get(existing.id())
                .await?
                .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()));
        }

        let sql = update_sql(E::TABLE, &columns);
        let query = sqlx::query_as::<_, E>(&sql);

        E::bind_patch(query, patch)
            .bind(existing.id())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()))
    }

    pub async fn remove(&self, id: i32) -> Result<Option<E>, DatabaseError> {
        Self::remove_in(&self.pool, id).await
    }

    pub async fn remove_in<'e>(
        executor: impl PgExecutor<'e>,
        id: i32,
    ) -> Result<Option<E>, DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = $1 RETURNING *", E::TABLE);

        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }
}

/// Build a parameterized INSERT returning the stored row.
fn insert_sql(table: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        // Identity-only tables still need a row created
        return format!("INSERT INTO \"{}\" DEFAULT VALUES RETURNING *", table);
    }

    let field_list = columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");

    let placeholders = (1..=columns.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
        table, field_list, placeholders
    )
}

/// Build a parameterized UPDATE over the given columns; the id parameter
/// comes last.
fn update_sql(table: &str, columns: &[&str]) -> String {
    let set_clauses = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("\"{}\" = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = ${} RETURNING *",
        table,
        set_clauses,
        columns.len() + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_insert_sql() {
        let sql = insert_sql("paintings", &["title", "width", "height"]);
        assert_eq!(
            sql,
            "INSERT INTO \"paintings\" (\"title\", \"width\", \"height\") VALUES ($1, $2, $3) RETURNING *"
        );
    }

    #[test]
    fn builds_default_values_insert_for_empty_column_list() {
        let sql = insert_sql("usersessions", &[]);
        assert_eq!(sql, "INSERT INTO \"usersessions\" DEFAULT VALUES RETURNING *");
    }

    #[test]
    fn builds_update_sql_with_trailing_id_param() {
        let sql = update_sql("paintings", &["title", "tags"]);
        assert_eq!(
            sql,
            "UPDATE \"paintings\" SET \"title\" = $1, \"tags\" = $2 WHERE \"id\" = $3 RETURNING *"
        );
    }
}
