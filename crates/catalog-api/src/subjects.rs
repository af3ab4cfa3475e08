//! Handlers for `/subjects` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/subjects` | |
//! | `POST`   | `/subjects` | Body: [`CreateBody`]; 201 + subject |
//! | `GET`    | `/subjects/:id` | 404 if not found |
//! | `PUT`    | `/subjects/:id` | Body: [`UpdateBody`]; only the fields present are written |
//! | `DELETE` | `/subjects/:id` | Also unlinks it from every major listing it |
//! | `POST`   | `/subjects/:id/likes` | Body: `{"email":"..."}` |
//! | `PUT`    | `/subjects/:id/likes` | Body: `{"likes":n}`; the like list is untouched |

use std::{collections::BTreeSet, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use catalog_core::{
  patch::{FieldUpdate, SubjectPatch},
  subject::{NewSubject, Subject},
};
use serde::{Deserialize, Serialize};

use crate::{Catalog, CatalogStore, error::ApiError};

// ─── List / get ───────────────────────────────────────────────────────────────

/// `GET /subjects`
pub async fn list<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
) -> Result<Json<Vec<Subject>>, ApiError> {
  Ok(Json(catalog.list_subjects().await?))
}

/// `GET /subjects/:id`
pub async fn get_one<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<Json<Subject>, ApiError> {
  Ok(Json(catalog.get_subject(&id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Subject fields plus the major to link it under.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub major_id:           String,
  pub code:               String,
  pub name:               String,
  #[serde(default)]
  pub description:        String,
  #[serde(default)]
  pub campus:             String,
  #[serde(default)]
  pub credit:             u32,
  #[serde(default)]
  pub prerequisites:      BTreeSet<String>,
  #[serde(default)]
  pub corequisites:       BTreeSet<String>,
  pub status:             Option<String>,
  #[serde(default)]
  pub available_duration: u32,
}

/// `POST /subjects`
pub async fn create<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewSubject {
    code:               body.code,
    name:               body.name,
    description:        body.description,
    campus:             body.campus,
    credit:             body.credit,
    prerequisites:      body.prerequisites,
    corequisites:       body.corequisites,
    status:             body.status,
    available_duration: body.available_duration,
  };
  let subject = catalog.create_subject(input, &body.major_id).await?;
  Ok((StatusCode::CREATED, Json(subject)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Sparse update. Absent fields are left alone; for text fields an empty
/// string also means "leave alone". A present `credit` of `0` is written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub major_id:           Option<String>,
  pub code:               Option<String>,
  pub name:               Option<String>,
  pub description:        Option<String>,
  pub campus:             Option<String>,
  pub credit:             Option<u32>,
  pub prerequisites:      Option<BTreeSet<String>>,
  pub corequisites:       Option<BTreeSet<String>>,
  pub status:             Option<String>,
  pub available_duration: Option<u32>,
}

impl UpdateBody {
  /// Split into the field patch and the optional new parent major.
  fn into_parts(self) -> (SubjectPatch, Option<String>) {
    let patch = SubjectPatch {
      code:               FieldUpdate::non_empty(self.code),
      name:               FieldUpdate::non_empty(self.name),
      description:        FieldUpdate::non_empty(self.description),
      campus:             FieldUpdate::non_empty(self.campus),
      credit:             self.credit.into(),
      prerequisites:      self.prerequisites.into(),
      corequisites:       self.corequisites.into(),
      status:             FieldUpdate::non_empty(self.status),
      available_duration: self.available_duration.into(),
    };
    (patch, self.major_id)
  }
}

/// `PUT /subjects/:id`. Returns the subject as stored after the update.
pub async fn update<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Subject>, ApiError> {
  let (patch, major_id) = body.into_parts();
  catalog
    .update_subject(&id, patch, major_id.as_deref())
    .await?;
  Ok(Json(catalog.get_subject(&id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /subjects/:id`
pub async fn delete<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_subject(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Likes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LikeBody {
  pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeOutcome {
  /// `false` if this email had already liked the subject.
  pub added: bool,
}

/// `POST /subjects/:id/likes`
pub async fn like<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
  Json(body): Json<LikeBody>,
) -> Result<Json<LikeOutcome>, ApiError> {
  if body.email.is_empty() {
    return Err(ApiError::BadRequest("email must not be empty".into()));
  }
  let added = catalog.add_like(&id, &body.email).await?;
  Ok(Json(LikeOutcome { added }))
}

#[derive(Debug, Deserialize)]
pub struct SetLikesBody {
  pub likes: u64,
}

/// `PUT /subjects/:id/likes`
pub async fn set_likes<B: CatalogStore>(
  State(catalog): State<Arc<Catalog<B>>>,
  Path(id): Path<String>,
  Json(body): Json<SetLikesBody>,
) -> Result<StatusCode, ApiError> {
  // Counters are stored as signed 64-bit integers.
  if i64::try_from(body.likes).is_err() {
    return Err(ApiError::BadRequest(format!(
      "likes must not exceed {}",
      i64::MAX
    )));
  }
  catalog.set_likes(&id, body.likes).await?;
  Ok(StatusCode::NO_CONTENT)
}
