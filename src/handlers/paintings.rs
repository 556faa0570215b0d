use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::Query;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config;
use crate::database::models::{Painting, PaintingCreate, PaintingPatch};
use crate::database::{DatabaseManager, PaintingStore};
use crate::error::ApiError;
use crate::filter::PaintingFilter;
use crate::middleware::{require_superuser, CurrentUser};
use crate::services::media;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Pagination (optional)
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Repeatable: ?tags=oil&tags=landscape
    #[serde(default)]
    pub tags: Vec<String>,
    pub width_min: Option<Decimal>,
    pub width_max: Option<Decimal>,
    pub height_min: Option<Decimal>,
    pub height_max: Option<Decimal>,
}

impl ListQuery {
    fn filter(&self) -> PaintingFilter {
        PaintingFilter {
            title: self.title.clone(),
            tags: self.tags.clone(),
            width_min: self.width_min,
            width_max: self.width_max,
            height_min: self.height_min,
            height_max: self.height_max,
        }
    }

    fn page(&self) -> Result<(i64, i64), ApiError> {
        let skip = self.skip.unwrap_or(0);
        let api = &config::config().api;
        let limit = self.limit.unwrap_or(api.page_size);

        if skip < 0 || limit < 0 {
            return Err(ApiError::bad_request("skip and limit must not be negative"));
        }

        Ok((skip, limit.min(api.max_limit)))
    }
}

/// GET /api/paintings - Browse the catalog with optional filters
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<Vec<Painting>>, ApiError> {
    let (skip, limit) = query.page()?;

    let pool = DatabaseManager::pool().await?;
    let paintings = PaintingStore::new(pool).list(&query.filter(), skip, limit).await?;

    Ok(Json(paintings))
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: i64,
}

/// GET /api/paintings/count - Number of paintings matching the filters
pub async fn count(Query(query): Query<ListQuery>) -> Result<Json<CountResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let total = PaintingStore::new(pool).count(&query.filter()).await?;

    Ok(Json(CountResponse { total }))
}

#[derive(Debug, Serialize)]
pub struct TotalPagesResponse {
    pub total_pages: i64,
}

/// GET /api/paintings/pages/total - Catalog page count at the default page size
pub async fn total_pages() -> Result<Json<TotalPagesResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let total_pages = PaintingStore::new(pool)
        .total_pages(config::config().api.page_size)
        .await?;

    Ok(Json(TotalPagesResponse { total_pages }))
}

/// GET /api/paintings/tags/all - Every tag in use, sorted
pub async fn all_tags() -> Result<Json<Vec<String>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let tags = PaintingStore::new(pool).distinct_tags().await?;

    Ok(Json(tags))
}

/// GET /api/paintings/:id - Fetch one painting
pub async fn get(Path(id): Path<i32>) -> Result<Json<Painting>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let painting = PaintingStore::new(pool).get_404(id).await?;

    Ok(Json(painting))
}

/// POST /api/paintings - Add a painting with at least one image (superuser only)
pub async fn create(
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Painting>), ApiError> {
    require_superuser(&user)?;

    let form = read_painting_form(multipart).await?;

    let input = match create_input(&form) {
        Ok(input) => input,
        Err(e) => {
            media::delete_images(&form.images).await;
            return Err(e);
        }
    };

    match persist_new(&input).await {
        Ok(painting) => Ok((StatusCode::CREATED, Json(painting))),
        Err(e) => {
            // The row never landed, so the stored files must not either
            media::delete_images(&form.images).await;
            Err(e)
        }
    }
}

async fn persist_new(input: &PaintingCreate) -> Result<Painting, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(PaintingStore::new(pool).create(input).await?)
}

/// PUT /api/paintings/:id - Update fields; uploaded images replace the old set (superuser only)
pub async fn update(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<Painting>, ApiError> {
    require_superuser(&user)?;

    let form = read_painting_form(multipart).await?;

    match apply_update(id, &form).await {
        Ok((painting, replaced)) => {
            if let Some(old_files) = replaced {
                media::delete_images(&old_files).await;
            }
            Ok(Json(painting))
        }
        Err(e) => {
            media::delete_images(&form.images).await;
            Err(e)
        }
    }
}

async fn apply_update(
    id: i32,
    form: &PaintingForm,
) -> Result<(Painting, Option<Vec<String>>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let store = PaintingStore::new(pool);
    let existing = store.get_404(id).await?;

    let patch = update_patch(form)?;
    // Old files go only after the row update commits
    let replaced = patch
        .photo_filenames
        .is_some()
        .then(|| existing.photo_filenames.clone());

    let painting = store.update(&existing, &patch).await?;
    Ok((painting, replaced))
}

/// DELETE /api/paintings/:id - Remove a painting, its feedback and its files (superuser only)
pub async fn remove(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Painting>, ApiError> {
    require_superuser(&user)?;

    let pool = DatabaseManager::pool().await?;
    let painting = PaintingStore::new(pool)
        .remove_cascade(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Painting not found"))?;

    media::delete_images(&painting.photo_filenames).await;

    Ok(Json(painting))
}

/// Multipart fields shared by the create and update forms. `images` holds
/// the storage names of files already written to the media root.
#[derive(Debug, Default)]
struct PaintingForm {
    title: Option<String>,
    width: Option<Decimal>,
    height: Option<Decimal>,
    tags: Option<Vec<String>>,
    description: Option<String>,
    images: Vec<String>,
}

async fn read_painting_form(mut multipart: Multipart) -> Result<PaintingForm, ApiError> {
    let mut form = PaintingForm::default();

    let outcome: Result<(), ApiError> = async {
        while let Some(mut field) = multipart.next_field().await? {
            // Owned copy of the part name; `text` consumes the field
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("title") => form.title = Some(field.text().await?),
                Some("width") => form.width = Some(parse_dimension("width", &field.text().await?)?),
                Some("height") => {
                    form.height = Some(parse_dimension("height", &field.text().await?)?)
                }
                Some("tags") => form.tags = Some(parse_tags(&field.text().await?)),
                Some("description") => form.description = Some(field.text().await?),
                Some("images") => {
                    // Browsers send an empty part for an empty file input
                    if field.file_name().map_or(false, |name| !name.is_empty()) {
                        form.images.push(store_image_field(&mut field).await?);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
    .await;

    if let Err(e) = outcome {
        // Rejected request must not leave files behind
        media::delete_images(&form.images).await;
        return Err(e);
    }

    Ok(form)
}

/// Stream one uploaded image to the media root, enforcing the size cap.
async fn store_image_field(field: &mut Field<'_>) -> Result<String, ApiError> {
    let max_bytes = config::config().api.max_upload_bytes;
    let filename = media::unique_filename(field.file_name());
    let path = media::media_path(&filename);

    media::ensure_media_root().await.map_err(store_failed)?;
    let mut file = File::create(&path).await.map_err(store_failed)?;
    let mut written = 0usize;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                remove_partial(&path).await;
                return Err(e.into());
            }
        };

        written += chunk.len();
        if written > max_bytes {
            remove_partial(&path).await;
            return Err(ApiError::validation_error("Uploaded image is too large", None));
        }

        if let Err(e) = file.write_all(&chunk).await {
            remove_partial(&path).await;
            return Err(store_failed(e));
        }
    }

    if let Err(e) = file.flush().await {
        remove_partial(&path).await;
        return Err(store_failed(e));
    }

    Ok(filename)
}

fn store_failed(e: std::io::Error) -> ApiError {
    tracing::error!("Media write failed: {}", e);
    ApiError::internal_server_error("Could not store uploaded image")
}

async fn remove_partial(path: &std::path::Path) {
    let _ = tokio::fs::remove_file(path).await;
}

fn parse_dimension(field: &'static str, raw: &str) -> Result<Decimal, ApiError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| field_validation(field, "must be a decimal number"))?;

    if value <= Decimal::ZERO {
        return Err(field_validation(field, "must be positive"));
    }

    // Dimensions are stored with two fractional digits
    Ok(value.round_dp(2))
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn field_validation(field: &str, problem: &str) -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert(field.to_string(), problem.to_string());
    ApiError::validation_error("Invalid painting data", Some(field_errors))
}

fn create_input(form: &PaintingForm) -> Result<PaintingCreate, ApiError> {
    let mut field_errors = HashMap::new();

    let title = form.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    if title.is_none() {
        field_errors.insert("title".to_string(), "This field is required".to_string());
    }
    if form.width.is_none() {
        field_errors.insert("width".to_string(), "This field is required".to_string());
    }
    if form.height.is_none() {
        field_errors.insert("height".to_string(), "This field is required".to_string());
    }
    if form.images.is_empty() {
        field_errors.insert("images".to_string(), "At least one image is required".to_string());
    }

    match (title, form.width, form.height) {
        (Some(title), Some(width), Some(height)) if field_errors.is_empty() => Ok(PaintingCreate {
            title: title.to_string(),
            width,
            height,
            tags: form.tags.clone().unwrap_or_default(),
            description: form.description.clone(),
            photo_filenames: form.images.clone(),
        }),
        _ => Err(ApiError::validation_error("Missing required fields", Some(field_errors))),
    }
}

fn update_patch(form: &PaintingForm) -> Result<PaintingPatch, ApiError> {
    // A title field that was sent but blank is invalid on update too
    if form.title.as_deref().map_or(false, |t| t.trim().is_empty()) {
        return Err(field_validation("title", "must not be empty"));
    }

    Ok(PaintingPatch {
        title: form.title.as_deref().map(|t| t.trim().to_string()),
        width: form.width,
        height: form.height,
        tags: form.tags.clone(),
        description: form.description.clone(),
        photo_filenames: (!form.images.is_empty()).then(|| form.images.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_tags() {
        assert_eq!(parse_tags("oil, landscape ,,  portrait"), vec!["oil", "landscape", "portrait"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn parses_dimensions_to_two_decimals() {
        assert_eq!(parse_dimension("width", " 3.14159 ").unwrap(), Decimal::from_str("3.14").unwrap());
        assert_eq!(parse_dimension("width", "70").unwrap(), Decimal::from_str("70").unwrap());
        assert!(parse_dimension("width", "abc").is_err());
        assert!(parse_dimension("width", "-5").is_err());
        assert!(parse_dimension("width", "0").is_err());
    }

    #[test]
    fn create_requires_title_dimensions_and_images() {
        let form = PaintingForm::default();
        let err = create_input(&form).unwrap_err();

        match err {
            ApiError::ValidationError { field_errors: Some(errors), .. } => {
                assert!(errors.contains_key("title"));
                assert!(errors.contains_key("width"));
                assert!(errors.contains_key("height"));
                assert!(errors.contains_key("images"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_input_accepts_complete_form() {
        let form = PaintingForm {
            title: Some("  Sunset  ".to_string()),
            width: Some(Decimal::from_str("100.50").unwrap()),
            height: Some(Decimal::from_str("70").unwrap()),
            tags: Some(vec!["oil".to_string()]),
            description: None,
            images: vec!["abc.jpg".to_string()],
        };

        let input = create_input(&form).unwrap();
        assert_eq!(input.title, "Sunset");
        assert_eq!(input.photo_filenames, vec!["abc.jpg"]);
    }

    #[test]
    fn update_patch_only_touches_sent_fields() {
        let form = PaintingForm {
            tags: Some(vec![]),
            ..Default::default()
        };

        let patch = update_patch(&form).unwrap();
        assert!(patch.title.is_none());
        assert!(patch.width.is_none());
        assert_eq!(patch.tags, Some(vec![]));
        assert!(patch.photo_filenames.is_none());
    }

    #[test]
    fn update_patch_rejects_blank_title() {
        let form = PaintingForm {
            title: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(update_patch(&form).is_err());
    }
}
