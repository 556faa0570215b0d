use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::store::{Entity, PgQueryAs};

/// A catalog entry. `width` and `height` are centimetres with two
/// fractional digits; `photo_filenames` are basenames under the media root.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Painting {
    pub id: i32,
    pub title: String,
    pub width: Decimal,
    pub height: Decimal,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub photo_filenames: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PaintingCreate {
    pub title: String,
    pub width: Decimal,
    pub height: Decimal,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub photo_filenames: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PaintingPatch {
    pub title: Option<String>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub photo_filenames: Option<Vec<String>>,
}

impl Entity for Painting {
    const TABLE: &'static str = "paintings";

    type Create = PaintingCreate;
    type Patch = PaintingPatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn insert_columns() -> &'static [&'static str] {
        &["title", "width", "height", "tags", "description", "photo_filenames"]
    }

    fn bind_create<'q>(query: PgQueryAs<'q, Self>, input: &'q PaintingCreate) -> PgQueryAs<'q, Self> {
        query
            .bind(&input.title)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.tags)
            .bind(&input.description)
            .bind(&input.photo_filenames)
    }

    fn patch_columns(patch: &PaintingPatch) -> Vec<&'static str> {
        let mut columns = Vec::new();

        if patch.title.is_some() {
            columns.push("title");
        }
        if patch.width.is_some() {
            columns.push("width");
        }
        if patch.height.is_some() {
            columns.push("height");
        }
        if patch.tags.is_some() {
            columns.push("tags");
        }
        if patch.description.is_some() {
            columns.push("description");
        }
        if patch.photo_filenames.is_some() {
            columns.push("photo_filenames");
        }

        columns
    }

    fn bind_patch<'q>(mut query: PgQueryAs<'q, Self>, patch: &'q PaintingPatch) -> PgQueryAs<'q, Self> {
        if let Some(title) = &patch.title {
            query = query.bind(title);
        }
        if let Some(width) = &patch.width {
            query = query.bind(width);
        }
        if let Some(height) = &patch.height {
            query = query.bind(height);
        }
        if let Some(tags) = &patch.tags {
            query = query.bind(tags);
        }
        if let Some(description) = &patch.description {
            query = query.bind(description);
        }
        if let Some(photo_filenames) = &patch.photo_filenames {
            query = query.bind(photo_filenames);
        }

        query
    }
}
