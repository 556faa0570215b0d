use sqlx::postgres::PgArguments;
use sqlx::Postgres;

use super::types::{FilterParam, PaintingFilter, SqlQuery};

/// Composes a parameterized WHERE clause from a `PaintingFilter`.
///
/// Placeholders are numbered in condition order, so params line up with
/// `$1..$N` when bound sequentially.
pub struct FilterBuilder {
    conditions: Vec<String>,
    params: Vec<FilterParam>,
}

impl FilterBuilder {
    pub fn from_filter(filter: &PaintingFilter) -> Self {
        let mut builder = Self {
            conditions: vec![],
            params: vec![],
        };

        if let Some(title) = filter.title.as_deref() {
            if !title.is_empty() {
                let pattern = format!("%{}%", escape_like(title));
                let placeholder = builder.param(FilterParam::Text(pattern));
                builder.conditions.push(format!("\"title\" ILIKE {}", placeholder));
            }
        }

        if !filter.tags.is_empty() {
            // Overlap: any shared tag qualifies
            let placeholder = builder.param(FilterParam::TextArray(filter.tags.clone()));
            builder.conditions.push(format!("\"tags\" && {}", placeholder));
        }

        if let Some(width_min) = filter.width_min {
            let placeholder = builder.param(FilterParam::Number(width_min));
            builder.conditions.push(format!("\"width\" >= {}", placeholder));
        }
        if let Some(width_max) = filter.width_max {
            let placeholder = builder.param(FilterParam::Number(width_max));
            builder.conditions.push(format!("\"width\" <= {}", placeholder));
        }
        if let Some(height_min) = filter.height_min {
            let placeholder = builder.param(FilterParam::Number(height_min));
            builder.conditions.push(format!("\"height\" >= {}", placeholder));
        }
        if let Some(height_max) = filter.height_max {
            let placeholder = builder.param(FilterParam::Number(height_max));
            builder.conditions.push(format!("\"height\" <= {}", placeholder));
        }

        builder
    }

    fn param(&mut self, value: FilterParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            "1=1".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    /// Paged SELECT in ascending id order. `limit` and `offset` are typed
    /// integers, so they are inlined rather than bound.
    pub fn to_select_sql(&self, table: &str, limit: i64, offset: i64) -> SqlQuery {
        SqlQuery {
            sql: format!(
                "SELECT * FROM \"{}\" WHERE {} ORDER BY \"id\" ASC LIMIT {} OFFSET {}",
                table,
                self.where_clause(),
                limit,
                offset
            ),
            params: self.params.clone(),
        }
    }

    pub fn to_count_sql(&self, table: &str) -> SqlQuery {
        SqlQuery {
            sql: format!("SELECT COUNT(*) FROM \"{}\" WHERE {}", table, self.where_clause()),
            params: self.params.clone(),
        }
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Bind collected params onto a typed row query, in placeholder order.
pub fn bind_params_as<'q, T>(
    mut query: sqlx::query::QueryAs<'q, Postgres, T, PgArguments>,
    params: &'q [FilterParam],
) -> sqlx::query::QueryAs<'q, Postgres, T, PgArguments> {
    for param in params {
        query = match param {
            FilterParam::Text(value) => query.bind(value),
            FilterParam::TextArray(values) => query.bind(values),
            FilterParam::Number(value) => query.bind(value),
        };
    }
    query
}

/// Bind collected params onto a scalar query, in placeholder order.
pub fn bind_params_scalar<'q, T>(
    mut query: sqlx::query::QueryScalar<'q, Postgres, T, PgArguments>,
    params: &'q [FilterParam],
) -> sqlx::query::QueryScalar<'q, Postgres, T, PgArguments> {
    for param in params {
        query = match param {
            FilterParam::Text(value) => query.bind(value),
            FilterParam::TextArray(values) => query.bind(values),
            FilterParam::Number(value) => query.bind(value),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn empty_filter_matches_everything() {
        let builder = FilterBuilder::from_filter(&PaintingFilter::default());
        let query = builder.to_select_sql("paintings", 12, 0);

        assert_eq!(
            query.sql,
            "SELECT * FROM \"paintings\" WHERE 1=1 ORDER BY \"id\" ASC LIMIT 12 OFFSET 0"
        );
        assert!(query.params.is_empty());
    }

    #[test]
    fn conditions_and_params_stay_aligned() {
        let filter = PaintingFilter {
            title: Some("sunset".to_string()),
            tags: vec!["oil".to_string(), "landscape".to_string()],
            width_min: Some(Decimal::new(1050, 1)), // 105.0
            ..Default::default()
        };

        let builder = FilterBuilder::from_filter(&filter);
        let query = builder.to_count_sql("paintings");

        assert_eq!(
            query.sql,
            "SELECT COUNT(*) FROM \"paintings\" WHERE \"title\" ILIKE $1 AND \"tags\" && $2 AND \"width\" >= $3"
        );
        assert_eq!(
            query.params,
            vec![
                FilterParam::Text("%sunset%".to_string()),
                FilterParam::TextArray(vec!["oil".to_string(), "landscape".to_string()]),
                FilterParam::Number(Decimal::new(1050, 1)),
            ]
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let filter = PaintingFilter {
            height_min: Some(Decimal::new(30, 0)),
            height_max: Some(Decimal::new(60, 0)),
            ..Default::default()
        };

        let builder = FilterBuilder::from_filter(&filter);
        let query = builder.to_count_sql("paintings");

        assert_eq!(
            query.sql,
            "SELECT COUNT(*) FROM \"paintings\" WHERE \"height\" >= $1 AND \"height\" <= $2"
        );
    }

    #[test]
    fn like_wildcards_in_titles_match_literally() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");

        let filter = PaintingFilter {
            title: Some("100%".to_string()),
            ..Default::default()
        };
        let builder = FilterBuilder::from_filter(&filter);

        assert_eq!(
            builder.params,
            vec![FilterParam::Text("%100\\%%".to_string())]
        );
    }

    #[test]
    fn blank_title_and_empty_tags_add_no_conditions() {
        let filter = PaintingFilter {
            title: Some(String::new()),
            tags: vec![],
            ..Default::default()
        };

        assert!(filter.is_empty());

        let builder = FilterBuilder::from_filter(&filter);
        assert_eq!(builder.to_count_sql("paintings").sql, "SELECT COUNT(*) FROM \"paintings\" WHERE 1=1");
    }
}
