//! JSON REST API for the course catalog.
//!
//! Exposes an axum [`Router`] over a [`Coordinator`] whose three tiers share
//! one backend. Every write that touches the hierarchy goes through the
//! coordinator, never straight to a store. Transport concerns (timeouts,
//! tracing, TLS) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", catalog_api::api_router(Arc::new(coordinator)))
//! ```

pub mod error;
pub mod faculties;
pub mod majors;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use catalog_core::{
  Coordinator,
  store::{FacultyStore, MajorStore, SubjectStore},
};

pub use error::ApiError;

/// A backend that stores all three tiers.
pub trait CatalogStore:
  FacultyStore + MajorStore + SubjectStore + Send + Sync + 'static
{
}

impl<T> CatalogStore for T where
  T: FacultyStore + MajorStore + SubjectStore + Send + Sync + 'static
{
}

/// The coordinator shape served by the API.
pub type Catalog<B> = Coordinator<B, B, B>;

/// Build a fully-materialised API router for `catalog`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<B: CatalogStore>(catalog: Arc<Catalog<B>>) -> Router<()> {
  Router::new()
    // Faculties
    .route("/faculties", get(faculties::list::<B>).post(faculties::create::<B>))
    .route(
      "/faculties/{id}",
      get(faculties::get_one::<B>)
        .put(faculties::update::<B>)
        .delete(faculties::delete::<B>),
    )
    .route("/faculties/{id}/majors", get(faculties::majors::<B>))
    // Majors
    .route("/majors", get(majors::list::<B>).post(majors::create::<B>))
    .route(
      "/majors/{id}",
      get(majors::get_one::<B>)
        .put(majors::update::<B>)
        .delete(majors::delete::<B>),
    )
    .route("/majors/{id}/subjects", get(majors::subjects::<B>))
    // Subjects
    .route("/subjects", get(subjects::list::<B>).post(subjects::create::<B>))
    .route(
      "/subjects/{id}",
      get(subjects::get_one::<B>)
        .put(subjects::update::<B>)
        .delete(subjects::delete::<B>),
    )
    .route(
      "/subjects/{id}/likes",
      post(subjects::like::<B>).put(subjects::set_likes::<B>),
    )
    .with_state(catalog)
}

#[cfg(test)]
mod tests;
