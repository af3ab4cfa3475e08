//! Out-of-band consistency sweep.
//!
//! Re-derives the parent/child relation by scanning every document and
//! lists the places where it is not a strict one-to-many tree.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{faculty::Faculty, id::ObjectId, major::Major, subject::Subject};

/// A parent listing a child id that has no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
  pub parent: ObjectId,
  pub child:  ObjectId,
}

/// A child listed by more than one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedChild {
  pub child:   ObjectId,
  pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
  /// Majors no faculty lists.
  pub orphaned_majors:       Vec<ObjectId>,
  pub shared_majors:         Vec<SharedChild>,
  pub dangling_major_refs:   Vec<DanglingRef>,
  /// Subjects no major lists.
  pub orphaned_subjects:     Vec<ObjectId>,
  pub shared_subjects:       Vec<SharedChild>,
  pub dangling_subject_refs: Vec<DanglingRef>,
}

struct TierSweep {
  orphaned: Vec<ObjectId>,
  shared:   Vec<SharedChild>,
  dangling: Vec<DanglingRef>,
}

fn sweep<'a>(
  parents: impl Iterator<Item = (ObjectId, &'a [ObjectId])>,
  children: impl Iterator<Item = ObjectId>,
) -> TierSweep {
  let existing: BTreeSet<ObjectId> = children.collect();
  let mut owners: BTreeMap<ObjectId, Vec<ObjectId>> = BTreeMap::new();
  let mut dangling = Vec::new();

  for (parent, child_ids) in parents {
    for &child in child_ids {
      if existing.contains(&child) {
        owners.entry(child).or_default().push(parent);
      } else {
        dangling.push(DanglingRef { parent, child });
      }
    }
  }

  let orphaned = existing
    .iter()
    .filter(|id| !owners.contains_key(id))
    .copied()
    .collect();
  let shared = owners
    .into_iter()
    .filter(|(_, parents)| parents.len() > 1)
    .map(|(child, parents)| SharedChild { child, parents })
    .collect();

  TierSweep { orphaned, shared, dangling }
}

impl ConsistencyReport {
  pub fn derive(
    faculties: &[Faculty],
    majors: &[Major],
    subjects: &[Subject],
  ) -> Self {
    let major_tier = sweep(
      faculties.iter().map(|f| (f.faculty_id, f.major_ids.as_slice())),
      majors.iter().map(|m| m.major_id),
    );
    let subject_tier = sweep(
      majors.iter().map(|m| (m.major_id, m.subject_ids.as_slice())),
      subjects.iter().map(|s| s.subject_id),
    );

    Self {
      orphaned_majors:       major_tier.orphaned,
      shared_majors:         major_tier.shared,
      dangling_major_refs:   major_tier.dangling,
      orphaned_subjects:     subject_tier.orphaned,
      shared_subjects:       subject_tier.shared,
      dangling_subject_refs: subject_tier.dangling,
    }
  }

  pub fn is_consistent(&self) -> bool {
    self.orphaned_majors.is_empty()
      && self.shared_majors.is_empty()
      && self.dangling_major_refs.is_empty()
      && self.orphaned_subjects.is_empty()
      && self.shared_subjects.is_empty()
      && self.dangling_subject_refs.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn faculty(major_ids: Vec<ObjectId>) -> Faculty {
    Faculty {
      faculty_id: ObjectId::generate(),
      name: "F".into(),
      image: Vec::new(),
      major_ids,
    }
  }

  fn major(subject_ids: Vec<ObjectId>) -> Major {
    Major { major_id: ObjectId::generate(), name: "M".into(), subject_ids }
  }

  #[test]
  fn tree_is_consistent() {
    let m = major(vec![]);
    let f = faculty(vec![m.major_id]);
    let report = ConsistencyReport::derive(&[f], &[m], &[]);
    assert!(report.is_consistent(), "{report:?}");
  }

  #[test]
  fn detects_orphans_shares_and_dangling_refs() {
    let linked = major(vec![]);
    let orphan = major(vec![]);
    let ghost = ObjectId::generate();
    let f1 = faculty(vec![linked.major_id, ghost]);
    let f2 = faculty(vec![linked.major_id]);

    let report = ConsistencyReport::derive(
      &[f1.clone(), f2.clone()],
      &[linked.clone(), orphan.clone()],
      &[],
    );

    assert!(!report.is_consistent());
    assert_eq!(report.orphaned_majors, vec![orphan.major_id]);
    assert_eq!(report.shared_majors, vec![SharedChild {
      child:   linked.major_id,
      parents: vec![f1.faculty_id, f2.faculty_id],
    }]);
    assert_eq!(report.dangling_major_refs, vec![DanglingRef {
      parent: f1.faculty_id,
      child:  ghost,
    }]);
  }
}
