//! Handlers for `/majors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/majors` | |
//! | `POST`   | `/majors` | Body: `{"name":"...","faculty_id":"..."}`; 201 + major |
//! | `GET`    | `/majors/:id` | 404 if not found |
//! | `PUT`    | `/majors/:id` | Body: `{"name"?,"faculty_id"?}`; empty strings are ignored |
//! | `DELETE` | `/majors/:id` | Also unlinks it from its faculty |
//! | `GET`    | `/majors/:id/subjects` | In subject-list order |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use catalog_core::{major::Major, subject::Subject};
use serde::Deserialize;

use crate::{Catalog, CatalogStore, error::ApiError};

/// `GET /majors`
pub async fn list<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
) -> Result<Json<Vec<Major>>, ApiError> {
  Ok(Json(catalog.list_majors().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       String,
  pub faculty_id: String,
}

/// `POST /majors`
pub async fn create<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let major = catalog.create_major(&body.name, &body.faculty_id).await?;
  Ok((StatusCode::CREATED, Json(major)))
}

/// `GET /majors/:id`
pub async fn get_one<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<Json<Major>, ApiError> {
  Ok(Json(catalog.get_major(&id).await?))
}

/// `GET /majors/:id/subjects`
pub async fn subjects<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Subject>>, ApiError> {
  Ok(Json(catalog.subjects_of_major(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:       Option<String>,
  pub faculty_id: Option<String>,
}

/// `PUT /majors/:id`. Returns the major as stored after the update.
pub async fn update<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Major>, ApiError> {
  catalog
    .update_major(&id, body.name.as_deref(), body.faculty_id.as_deref())
    .await?;
  Ok(Json(catalog.get_major(&id).await?))
}

/// `DELETE /majors/:id`
pub async fn delete<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_major(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
