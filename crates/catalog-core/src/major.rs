//! Major: the middle tier; owned by exactly one faculty.

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// A major document. Its parent faculty is not stored here and is found by
/// searching faculties whose `major_ids` contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Major {
  pub major_id:    ObjectId,
  pub name:        String,
  /// Ordered, duplicate-free.
  pub subject_ids: Vec<ObjectId>,
}

impl Major {
  pub fn lists_subject(&self, subject_id: ObjectId) -> bool {
    self.subject_ids.contains(&subject_id)
  }
}
