//! [`Coordinator`] sequences writes across the stores so parent lists
//! follow their children.
//!
//! Each hierarchical edit touches two documents in two independent updates.
//! There is no transaction around the pair and no compensation: if the
//! second step fails, its error is returned unchanged and the first step
//! stays in effect (a created-but-unlinked child, or a parent still listing
//! a deleted child). [`Coordinator::check_consistency`] and
//! [`Coordinator::repair_dangling`] exist to find and clean up after that.
//!
//! Every identifier is decoded before the first store call, so a malformed
//! id never reaches the datastore.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::{
  EntityKind, Error, Result,
  consistency::ConsistencyReport,
  faculty::{Faculty, FacultyUpdate, NewFaculty},
  id::ObjectId,
  major::Major,
  patch::SubjectPatch,
  store::{FacultyStore, MajorStore, SubjectStore},
  subject::{NewSubject, Subject},
};

/// Relationship coordinator over one store per tier.
///
/// Holds no state of its own; every call goes straight to the stores.
pub struct Coordinator<F, M, S> {
  faculties: F,
  majors:    M,
  subjects:  S,
}

/// Treat an empty optional string as absent.
fn present(value: Option<&str>) -> Option<&str> {
  value.filter(|s| !s.is_empty())
}

impl<F, M, S> Coordinator<F, M, S>
where
  F: FacultyStore,
  M: MajorStore,
  S: SubjectStore,
{
  pub fn new(faculties: F, majors: M, subjects: S) -> Self {
    Self { faculties, majors, subjects }
  }

  // ── Faculties ─────────────────────────────────────────────────────────────

  pub async fn list_faculties(&self) -> Result<Vec<Faculty>> {
    self.faculties.list_faculties().await
  }

  pub async fn get_faculty(&self, faculty_id: &str) -> Result<Faculty> {
    let id = ObjectId::parse_str(faculty_id)?;
    self
      .faculties
      .get_faculty(id)
      .await?
      .ok_or(Error::NotFound { kind: EntityKind::Faculty, id })
  }

  /// The faculty's majors, in the order of its major list.
  pub async fn majors_of_faculty(&self, faculty_id: &str) -> Result<Vec<Major>> {
    let faculty = self.get_faculty(faculty_id).await?;
    self.majors.find_majors(faculty.major_ids).await
  }

  pub async fn create_faculty(&self, input: NewFaculty) -> Result<Faculty> {
    self.faculties.create_faculty(input).await
  }

  pub async fn update_faculty(
    &self,
    faculty_id: &str,
    update: FacultyUpdate,
    image: Option<Vec<u8>>,
  ) -> Result<Faculty> {
    let id = ObjectId::parse_str(faculty_id)?;
    self.faculties.update_faculty(id, update, image).await
  }

  /// Deletes the faculty only; its majors are left in place.
  pub async fn delete_faculty(&self, faculty_id: &str) -> Result<()> {
    let id = ObjectId::parse_str(faculty_id)?;
    self.faculties.delete_faculty(id).await
  }

  // ── Majors ────────────────────────────────────────────────────────────────

  pub async fn list_majors(&self) -> Result<Vec<Major>> {
    self.majors.list_majors().await
  }

  pub async fn get_major(&self, major_id: &str) -> Result<Major> {
    let id = ObjectId::parse_str(major_id)?;
    self
      .majors
      .get_major(id)
      .await?
      .ok_or(Error::NotFound { kind: EntityKind::Major, id })
  }

  /// The major's subjects, in the order of its subject list.
  pub async fn subjects_of_major(&self, major_id: &str) -> Result<Vec<Subject>> {
    let major = self.get_major(major_id).await?;
    self.subjects.find_subjects(major.subject_ids).await
  }

  /// Create an empty major, then link it to `faculty_id`.
  pub async fn create_major(&self, name: &str, faculty_id: &str) -> Result<Major> {
    let faculty_id = ObjectId::parse_str(faculty_id)?;

    let major = self.majors.create_major(name.to_owned()).await?;
    self
      .faculties
      .add_major(faculty_id, major.major_id)
      .await
      .inspect_err(|e| {
        warn!(
          major_id = %major.major_id, %faculty_id, error = %e,
          "major created but not linked to a faculty"
        )
      })?;

    Ok(major)
  }

  /// Delete the major, then pull it from the faculty that lists it. A major
  /// no faculty lists is simply deleted.
  pub async fn delete_major(&self, major_id: &str) -> Result<()> {
    let id = ObjectId::parse_str(major_id)?;

    self.majors.delete_major(id).await?;
    match self.faculties.remove_major(id).await {
      Ok(()) | Err(Error::NoMatch { .. }) => Ok(()),
      Err(e) => {
        warn!(major_id = %id, error = %e, "major deleted but still referenced");
        Err(e)
      }
    }
  }

  /// Rename and/or reparent a major. Empty strings count as absent.
  ///
  /// The move is skipped when the major already belongs to the target
  /// faculty, so no faculty document is written in that case.
  pub async fn update_major(
    &self,
    major_id: &str,
    new_name: Option<&str>,
    new_faculty_id: Option<&str>,
  ) -> Result<()> {
    let id = ObjectId::parse_str(major_id)?;
    let target = present(new_faculty_id)
      .map(ObjectId::parse_str)
      .transpose()?;

    if let Some(name) = present(new_name) {
      self.majors.rename_major(id, name.to_owned()).await?;
    }

    if let Some(target) = target {
      let current = self.faculties.find_by_major(id).await?;
      if current.faculty_id != target {
        debug!(major_id = %id, from = %current.faculty_id, to = %target, "moving major");
        self
          .faculties
          .move_major(id, current.faculty_id, target)
          .await?;
      }
    }

    Ok(())
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
    self.subjects.list_subjects().await
  }

  pub async fn get_subject(&self, subject_id: &str) -> Result<Subject> {
    let id = ObjectId::parse_str(subject_id)?;
    self
      .subjects
      .get_subject(id)
      .await?
      .ok_or(Error::NotFound { kind: EntityKind::Subject, id })
  }

  /// Create a subject, then link it to `major_id`.
  pub async fn create_subject(
    &self,
    input: NewSubject,
    major_id: &str,
  ) -> Result<Subject> {
    let major_id = ObjectId::parse_str(major_id)?;

    let subject = self.subjects.create_subject(input).await?;
    self
      .majors
      .add_subject(major_id, subject.subject_id)
      .await
      .inspect_err(|e| {
        warn!(
          subject_id = %subject.subject_id, %major_id, error = %e,
          "subject created but not linked to a major"
        )
      })?;

    Ok(subject)
  }

  /// Delete the subject, then pull it from every major that lists it. A
  /// subject no major lists is simply deleted.
  pub async fn delete_subject(&self, subject_id: &str) -> Result<()> {
    let id = ObjectId::parse_str(subject_id)?;

    self.subjects.delete_subject(id).await?;
    match self.majors.remove_subject(id).await {
      Ok(()) | Err(Error::NoMatch { .. }) => Ok(()),
      Err(e) => {
        warn!(subject_id = %id, error = %e, "subject deleted but still referenced");
        Err(e)
      }
    }
  }

  /// Apply a sparse field patch and/or reparent a subject.
  ///
  /// An empty patch issues no subject write; the move follows the same
  /// skip-if-already-there rule as [`Self::update_major`].
  pub async fn update_subject(
    &self,
    subject_id: &str,
    patch: SubjectPatch,
    new_major_id: Option<&str>,
  ) -> Result<()> {
    let id = ObjectId::parse_str(subject_id)?;
    let target = present(new_major_id)
      .map(ObjectId::parse_str)
      .transpose()?;

    if !patch.is_empty() {
      self.subjects.update_subject(id, patch).await?;
    }

    if let Some(target) = target {
      let current = self.majors.find_by_subject(id).await?;
      if current.major_id != target {
        debug!(subject_id = %id, from = %current.major_id, to = %target, "moving subject");
        self
          .majors
          .move_subject(id, current.major_id, target)
          .await?;
      }
    }

    Ok(())
  }

  /// Record a like. Returns `true` if `email` had not liked it before.
  pub async fn add_like(&self, subject_id: &str, email: &str) -> Result<bool> {
    let id = ObjectId::parse_str(subject_id)?;
    self.subjects.add_like(id, email.to_owned()).await
  }

  /// Administrative counter overwrite; the like list is left as is.
  pub async fn set_likes(&self, subject_id: &str, likes: u64) -> Result<()> {
    let id = ObjectId::parse_str(subject_id)?;
    self.subjects.set_likes(id, likes).await
  }

  // ── Consistency ───────────────────────────────────────────────────────────

  /// Scan all three collections and report every violation of the
  /// single-parent and no-dangling-child rules. Read-only.
  pub async fn check_consistency(&self) -> Result<ConsistencyReport> {
    // Parents are read before children: a child linked while the scan runs
    // was created before it was linked and so is seen by the later read.
    let faculties = self.faculties.list_faculties().await?;
    let majors = self.majors.list_majors().await?;
    let subjects = self.subjects.list_subjects().await?;
    Ok(ConsistencyReport::derive(&faculties, &majors, &subjects))
  }

  /// Pull every dangling child id out of its parents, then return the
  /// report the repair was based on. Orphaned and multiply-owned children
  /// are only reported.
  pub async fn repair_dangling(&self) -> Result<ConsistencyReport> {
    let report = self.check_consistency().await?;

    let majors: BTreeSet<ObjectId> =
      report.dangling_major_refs.iter().map(|r| r.child).collect();
    for major_id in majors {
      match self.faculties.remove_major(major_id).await {
        Ok(()) | Err(Error::NoMatch { .. }) => {}
        Err(e) => return Err(e),
      }
    }

    let subjects: BTreeSet<ObjectId> =
      report.dangling_subject_refs.iter().map(|r| r.child).collect();
    for subject_id in subjects {
      match self.majors.remove_subject(subject_id).await {
        Ok(()) | Err(Error::NoMatch { .. }) => {}
        Err(e) => return Err(e),
      }
    }

    Ok(report)
  }
}
