//! Field-level partial updates.
//!
//! Every patchable attribute is a [`FieldUpdate`], so "leave alone" and
//! "set to zero/empty" are distinct values rather than a zero-value
//! convention.

use std::collections::BTreeSet;

use crate::subject::Subject;

/// The update to apply to a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
  Unchanged,
  SetTo(T),
}

impl<T> Default for FieldUpdate<T> {
  fn default() -> Self { Self::Unchanged }
}

impl<T> FieldUpdate<T> {
  pub fn is_unchanged(&self) -> bool { matches!(self, Self::Unchanged) }

  pub fn into_option(self) -> Option<T> {
    match self {
      Self::Unchanged => None,
      Self::SetTo(v) => Some(v),
    }
  }

  /// Overwrite `target` if this is `SetTo`.
  pub fn apply(self, target: &mut T) {
    if let Self::SetTo(v) = self {
      *target = v;
    }
  }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
  fn from(value: Option<T>) -> Self {
    value.map_or(Self::Unchanged, Self::SetTo)
  }
}

impl FieldUpdate<String> {
  /// Inbound string convention: absent and empty both mean "no change".
  pub fn non_empty(value: Option<String>) -> Self {
    value.filter(|s| !s.is_empty()).into()
  }
}

/// A sparse update to a [`Subject`]. Only `SetTo` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPatch {
  pub code:               FieldUpdate<String>,
  pub name:               FieldUpdate<String>,
  pub description:        FieldUpdate<String>,
  pub campus:             FieldUpdate<String>,
  pub credit:             FieldUpdate<u32>,
  pub prerequisites:      FieldUpdate<BTreeSet<String>>,
  pub corequisites:       FieldUpdate<BTreeSet<String>>,
  pub status:             FieldUpdate<String>,
  pub available_duration: FieldUpdate<u32>,
}

impl SubjectPatch {
  /// `true` if applying the patch would change nothing.
  pub fn is_empty(&self) -> bool {
    self.code.is_unchanged()
      && self.name.is_unchanged()
      && self.description.is_unchanged()
      && self.campus.is_unchanged()
      && self.credit.is_unchanged()
      && self.prerequisites.is_unchanged()
      && self.corequisites.is_unchanged()
      && self.status.is_unchanged()
      && self.available_duration.is_unchanged()
  }

  /// In-memory projection of the patch onto a loaded document. Does not
  /// touch `last_updated`; stores stamp that themselves.
  pub fn apply_to(self, subject: &mut Subject) {
    self.code.apply(&mut subject.code);
    self.name.apply(&mut subject.name);
    self.description.apply(&mut subject.description);
    self.campus.apply(&mut subject.campus);
    self.credit.apply(&mut subject.credit);
    self.prerequisites.apply(&mut subject.prerequisites);
    self.corequisites.apply(&mut subject.corequisites);
    self.status.apply(&mut subject.status);
    self.available_duration.apply(&mut subject.available_duration);
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{id::ObjectId, subject::NewSubject};

  fn subject() -> Subject {
    let mut input = NewSubject::new("CS101", "Intro");
    input.credit = 3;
    input.available_duration = 12;
    input.into_subject(ObjectId::generate(), Utc::now())
  }

  #[test]
  fn empty_patch_changes_nothing() {
    let patch = SubjectPatch::default();
    assert!(patch.is_empty());

    let mut s = subject();
    let before = s.clone();
    patch.apply_to(&mut s);
    assert_eq!(s, before);
  }

  #[test]
  fn name_only_patch_preserves_credit() {
    let mut s = subject();
    let patch = SubjectPatch {
      name: FieldUpdate::SetTo("Programming I".into()),
      ..SubjectPatch::default()
    };
    assert!(!patch.is_empty());

    patch.apply_to(&mut s);
    assert_eq!(s.name, "Programming I");
    assert_eq!(s.credit, 3);
    assert_eq!(s.code, "CS101");
  }

  #[test]
  fn zero_is_a_real_value() {
    let mut s = subject();
    SubjectPatch {
      credit: FieldUpdate::SetTo(0),
      available_duration: FieldUpdate::SetTo(0),
      ..SubjectPatch::default()
    }
    .apply_to(&mut s);
    assert_eq!(s.credit, 0);
    assert_eq!(s.available_duration, 0);
  }

  #[test]
  fn empty_strings_are_absent() {
    assert!(FieldUpdate::non_empty(Some(String::new())).is_unchanged());
    assert!(FieldUpdate::non_empty(None).is_unchanged());
    assert_eq!(
      FieldUpdate::non_empty(Some("x".into())),
      FieldUpdate::SetTo("x".to_owned())
    );
  }
}
