use rust_decimal::Decimal;

/// Catalog search criteria. All fields are optional and combine with AND;
/// a default filter matches every painting.
#[derive(Debug, Clone, Default)]
pub struct PaintingFilter {
    /// Case-insensitive substring match against the title.
    pub title: Option<String>,
    /// Match paintings carrying at least one of these tags. Empty means
    /// no tag constraint.
    pub tags: Vec<String>,
    pub width_min: Option<Decimal>,
    pub width_max: Option<Decimal>,
    pub height_min: Option<Decimal>,
    pub height_max: Option<Decimal>,
}

impl PaintingFilter {
    pub fn is_empty(&self) -> bool {
        self.title.as_deref().map_or(true, str::is_empty)
            && self.tags.is_empty()
            && self.width_min.is_none()
            && self.width_max.is_none()
            && self.height_min.is_none()
            && self.height_max.is_none()
    }
}

/// A value destined for a `$N` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    Text(String),
    TextArray(Vec<String>),
    Number(Decimal),
}

/// Finished SQL plus its positional parameters, ready to bind.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<FilterParam>,
}
