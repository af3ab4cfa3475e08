//! Handlers for `/faculties` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/faculties` | |
//! | `POST`   | `/faculties` | Body: `{"name":"...","image":"<base64>"}`; image optional |
//! | `GET`    | `/faculties/:id` | 404 if not found |
//! | `PUT`    | `/faculties/:id` | Overwrites the name; omitting `image` keeps the stored one |
//! | `DELETE` | `/faculties/:id` | Majors are not deleted |
//! | `GET`    | `/faculties/:id/majors` | In major-list order |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use catalog_core::{
  ObjectId,
  faculty::{Faculty, FacultyUpdate, NewFaculty},
  major::Major,
};
use serde::{Deserialize, Serialize};

use crate::{Catalog, CatalogStore, error::ApiError};

// ─── Wire form ────────────────────────────────────────────────────────────────

/// A faculty as served over JSON; the image is base64 text.
#[derive(Debug, Serialize, Deserialize)]
pub struct FacultyBody {
  pub faculty_id: ObjectId,
  pub name:       String,
  pub image:      String,
  pub major_ids:  Vec<ObjectId>,
}

impl From<Faculty> for FacultyBody {
  fn from(f: Faculty) -> Self {
    Self {
      faculty_id: f.faculty_id,
      name:       f.name,
      image:      B64.encode(&f.image),
      major_ids:  f.major_ids,
    }
  }
}

fn decode_image(image: Option<String>) -> Result<Option<Vec<u8>>, ApiError> {
  image
    .map(|s| {
      B64
        .decode(s.as_bytes())
        .map_err(|e| ApiError::BadRequest(format!("image is not valid base64: {e}")))
    })
    .transpose()
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /faculties`
pub async fn list<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
) -> Result<Json<Vec<FacultyBody>>, ApiError> {
  let faculties = catalog.list_faculties().await?;
  Ok(Json(faculties.into_iter().map(FacultyBody::from).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FacultyInput {
  pub name:  String,
  pub image: Option<String>,
}

/// `POST /faculties`
pub async fn create<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Json(body): Json<FacultyInput>,
) -> Result<impl IntoResponse, ApiError> {
  let image = decode_image(body.image)?.unwrap_or_default();
  let faculty = catalog
    .create_faculty(NewFaculty { name: body.name, image })
    .await?;
  Ok((StatusCode::CREATED, Json(FacultyBody::from(faculty))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /faculties/:id`
pub async fn get_one<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<Json<FacultyBody>, ApiError> {
  let faculty = catalog.get_faculty(&id).await?;
  Ok(Json(faculty.into()))
}

/// `GET /faculties/:id/majors`
pub async fn majors<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Major>>, ApiError> {
  Ok(Json(catalog.majors_of_faculty(&id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /faculties/:id`
pub async fn update<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
  Json(body): Json<FacultyInput>,
) -> Result<Json<FacultyBody>, ApiError> {
  let image = decode_image(body.image)?;
  let faculty = catalog
    .update_faculty(&id, FacultyUpdate { name: body.name }, image)
    .await?;
  Ok(Json(faculty.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /faculties/:id`
pub async fn delete<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_faculty(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
