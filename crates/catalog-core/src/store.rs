//! The store traits, one per tier of the hierarchy.
//!
//! Stores own their documents and never call each other; the
//! [`Coordinator`](crate::Coordinator) is the only place that knows how the
//! tiers relate. Every method is a single logical datastore operation unless
//! documented otherwise, and single-document updates are atomic.
//!
//! Identifiers arrive already decoded. All methods return `Send` futures so
//! the traits can be used from multi-threaded runtimes (e.g. tokio with
//! `axum`).

use std::future::Future;

use crate::{
  Result,
  faculty::{Faculty, FacultyUpdate, NewFaculty},
  id::ObjectId,
  major::Major,
  patch::SubjectPatch,
  subject::{NewSubject, Subject},
};

// ─── Faculties ───────────────────────────────────────────────────────────────

pub trait FacultyStore: Send + Sync {
  fn list_faculties(
    &self,
  ) -> impl Future<Output = Result<Vec<Faculty>>> + Send + '_;

  /// Returns `None` if no faculty has this id.
  fn get_faculty(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<Option<Faculty>>> + Send + '_;

  /// Persist a new faculty with an empty major list.
  fn create_faculty(
    &self,
    input: NewFaculty,
  ) -> impl Future<Output = Result<Faculty>> + Send + '_;

  /// Overwrite the faculty's name. `image: None` keeps the stored image,
  /// `Some` always replaces it. The major list is never touched here.
  ///
  /// Fails with `NotFound` if the faculty does not exist.
  fn update_faculty(
    &self,
    id: ObjectId,
    update: FacultyUpdate,
    image: Option<Vec<u8>>,
  ) -> impl Future<Output = Result<Faculty>> + Send + '_;

  /// Delete the faculty document. Its majors are not deleted.
  fn delete_faculty(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Add-to-set `major_id` on the faculty's major list. Adding an id that
  /// is already present is a no-op. Fails with `NotFound` if no faculty
  /// has `faculty_id`.
  fn add_major(
    &self,
    faculty_id: ObjectId,
    major_id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Pull `major_id` from every faculty whose major list contains it.
  /// Fails with `NoMatch` if none does.
  fn remove_major(
    &self,
    major_id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// The faculty whose major list contains `major_id`, or `NoMatch`.
  fn find_by_major(
    &self,
    major_id: ObjectId,
  ) -> impl Future<Output = Result<Faculty>> + Send + '_;

  /// Pull from `from`, then add-to-set on `to`. The two updates are
  /// independent: if the second fails the major is left unlinked.
  fn move_major(
    &self,
    major_id: ObjectId,
    from: ObjectId,
    to: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── Majors ──────────────────────────────────────────────────────────────────

pub trait MajorStore: Send + Sync {
  fn list_majors(&self) -> impl Future<Output = Result<Vec<Major>>> + Send + '_;

  fn get_major(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<Option<Major>>> + Send + '_;

  /// Resolve a list of ids, preserving the order of `ids`. Ids with no
  /// document are skipped.
  fn find_majors(
    &self,
    ids: Vec<ObjectId>,
  ) -> impl Future<Output = Result<Vec<Major>>> + Send + '_;

  /// Persist a new major with an empty subject list.
  fn create_major(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Major>> + Send + '_;

  fn delete_major(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  fn rename_major(
    &self,
    id: ObjectId,
    name: String,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Add-to-set; `NotFound` if no major has `major_id`.
  fn add_subject(
    &self,
    major_id: ObjectId,
    subject_id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Pull `subject_id` from every major that lists it; `NoMatch` if none.
  fn remove_subject(
    &self,
    subject_id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  fn find_by_subject(
    &self,
    subject_id: ObjectId,
  ) -> impl Future<Output = Result<Major>> + Send + '_;

  /// Pull from `from`, then add-to-set on `to`; not atomic.
  fn move_subject(
    &self,
    subject_id: ObjectId,
    from: ObjectId,
    to: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── Subjects ────────────────────────────────────────────────────────────────

pub trait SubjectStore: Send + Sync {
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>>> + Send + '_;

  fn get_subject(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<Option<Subject>>> + Send + '_;

  /// Resolve a list of ids, preserving the order of `ids`.
  fn find_subjects(
    &self,
    ids: Vec<ObjectId>,
  ) -> impl Future<Output = Result<Vec<Subject>>> + Send + '_;

  fn create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject>> + Send + '_;

  fn delete_subject(
    &self,
    id: ObjectId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Write only the `SetTo` fields of `patch` (and `last_updated`) in one
  /// update.
  fn update_subject(
    &self,
    id: ObjectId,
    patch: SubjectPatch,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Record a like from `email` as a single atomic upsert.
  ///
  /// The email is set-inserted into the like list and the counter is
  /// incremented only if the email was not already present, so the counter
  /// equals the list size for any sequence of likes. If no subject has this
  /// id a bare document is created holding just the like.
  ///
  /// Returns `true` if the email was newly added.
  fn add_like(
    &self,
    id: ObjectId,
    email: String,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Overwrite the like counter without touching the like list.
  fn set_likes(
    &self,
    id: ObjectId,
    likes: u64,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}
