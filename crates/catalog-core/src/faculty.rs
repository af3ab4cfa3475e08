//! Faculty: the top tier of the hierarchy.

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// A faculty document. `major_ids` is the only record of which majors it
/// owns; majors carry no back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
  pub faculty_id: ObjectId,
  pub name:       String,
  #[serde(default)]
  pub image:      Vec<u8>,
  /// Ordered, duplicate-free.
  pub major_ids:  Vec<ObjectId>,
}

impl Faculty {
  pub fn lists_major(&self, major_id: ObjectId) -> bool {
    self.major_ids.contains(&major_id)
  }
}

/// Input to [`crate::store::FacultyStore::create_faculty`]. New faculties
/// always start with no majors.
#[derive(Debug, Clone, Default)]
pub struct NewFaculty {
  pub name:  String,
  pub image: Vec<u8>,
}

/// Full overwrite of a faculty's scalar fields. The image is passed
/// separately so that "keep the current image" can be expressed.
#[derive(Debug, Clone)]
pub struct FacultyUpdate {
  pub name: String,
}
