//! Subject: the leaf tier, plus the like ledger it carries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// Status given to subjects created without one.
pub const DEFAULT_SUBJECT_STATUS: &str = "AVAILABLE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub subject_id:         ObjectId,
  pub code:               String,
  pub name:               String,
  pub description:        String,
  pub campus:             String,
  pub credit:             u32,
  pub prerequisites:      BTreeSet<String>,
  pub corequisites:       BTreeSet<String>,
  /// Free-form label, e.g. `"AVAILABLE"`.
  pub status:             String,
  /// Like counter. Equals `like_list.len()` unless overwritten through
  /// [`crate::store::SubjectStore::set_likes`].
  pub likes:              u64,
  /// Emails of users who liked the subject.
  pub like_list:          BTreeSet<String>,
  /// Stamped by the store on create and on every patch.
  pub last_updated:       DateTime<Utc>,
  pub available_duration: u32,
}

/// Input to [`crate::store::SubjectStore::create_subject`].
#[derive(Debug, Clone, Default)]
pub struct NewSubject {
  pub code:               String,
  pub name:               String,
  pub description:        String,
  pub campus:             String,
  pub credit:             u32,
  pub prerequisites:      BTreeSet<String>,
  pub corequisites:       BTreeSet<String>,
  /// `None` or empty stores [`DEFAULT_SUBJECT_STATUS`].
  pub status:             Option<String>,
  pub available_duration: u32,
}

impl NewSubject {
  /// Convenience constructor with every other field defaulted.
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into(), ..Self::default() }
  }

  /// Build the stored document. The like ledger always starts empty.
  pub fn into_subject(self, subject_id: ObjectId, now: DateTime<Utc>) -> Subject {
    let status = self
      .status
      .filter(|s| !s.is_empty())
      .unwrap_or_else(|| DEFAULT_SUBJECT_STATUS.to_owned());

    Subject {
      subject_id,
      code: self.code,
      name: self.name,
      description: self.description,
      campus: self.campus,
      credit: self.credit,
      prerequisites: self.prerequisites,
      corequisites: self.corequisites,
      status,
      likes: 0,
      like_list: BTreeSet::new(),
      last_updated: now,
      available_duration: self.available_duration,
    }
  }
}
