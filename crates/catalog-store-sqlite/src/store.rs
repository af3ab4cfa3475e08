//! [`SqliteStore`] and the membership updates shared by the faculty and
//! major tiers.

use std::path::Path;

use catalog_core::{EntityKind, ObjectId};

use crate::{Result, encode::encode_id, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog store backed by a single SQLite file. Implements all three
/// store traits.
///
/// Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Membership lists ────────────────────────────────────────────────────────

/// Where a parent tier keeps its child-id list.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Membership {
  pub table:  &'static str,
  pub key:    &'static str,
  pub list:   &'static str,
  pub parent: EntityKind,
}

pub(crate) const FACULTY_MAJORS: Membership = Membership {
  table:  "faculties",
  key:    "faculty_id",
  list:   "major_ids",
  parent: EntityKind::Faculty,
};

pub(crate) const MAJOR_SUBJECTS: Membership = Membership {
  table:  "majors",
  key:    "major_id",
  list:   "subject_ids",
  parent: EntityKind::Major,
};

impl Membership {
  /// Filter matching rows whose list contains the parameter `param`.
  pub fn contains(&self, param: &str) -> String {
    format!(
      "EXISTS (SELECT 1 FROM json_each({}.{}) WHERE json_each.value = {param})",
      self.table, self.list
    )
  }

  /// The list with the parameter `param` appended unless already present.
  fn with_added(&self, param: &str) -> String {
    format!(
      "CASE WHEN {} THEN {list} ELSE json_insert({list}, '$[#]', {param}) END",
      self.contains(param),
      list = self.list,
    )
  }

  /// The list with every occurrence of the parameter `param` removed.
  fn without(&self, param: &str) -> String {
    format!(
      "(SELECT json_group_array(json_each.value) FROM json_each({}.{}) \
       WHERE json_each.value <> {param})",
      self.table, self.list
    )
  }
}

impl SqliteStore {
  /// Add-to-set `child` on the parent with key `parent`. Returns the number
  /// of parent rows matched (0 or 1); an already-present child still
  /// counts as matched.
  pub(crate) async fn add_member(
    &self,
    m: Membership,
    parent: ObjectId,
    child: ObjectId,
  ) -> Result<usize> {
    let sql = format!(
      "UPDATE {table} SET {list} = {added} WHERE {key} = ?1",
      table = m.table,
      list = m.list,
      added = m.with_added("?2"),
      key = m.key,
    );
    let parent_str = encode_id(parent);
    let child_str = encode_id(child);

    let matched = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params![parent_str, child_str])?)
      })
      .await?;
    Ok(matched)
  }

  /// Pull `child` from the single parent with key `parent`. Returns the
  /// number of parent rows matched.
  pub(crate) async fn pull_member(
    &self,
    m: Membership,
    parent: ObjectId,
    child: ObjectId,
  ) -> Result<usize> {
    let sql = format!(
      "UPDATE {table} SET {list} = {without} WHERE {key} = ?1",
      table = m.table,
      list = m.list,
      without = m.without("?2"),
      key = m.key,
    );
    let parent_str = encode_id(parent);
    let child_str = encode_id(child);

    let matched = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params![parent_str, child_str])?)
      })
      .await?;
    Ok(matched)
  }

  /// Pull `child` from every parent whose list contains it. Returns the
  /// number of parents changed.
  pub(crate) async fn pull_member_everywhere(
    &self,
    m: Membership,
    child: ObjectId,
  ) -> Result<usize> {
    let sql = format!(
      "UPDATE {table} SET {list} = {without} WHERE {filter}",
      table = m.table,
      list = m.list,
      without = m.without("?1"),
      filter = m.contains("?1"),
    );
    let child_str = encode_id(child);

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![child_str])?))
      .await?;
    Ok(changed)
  }

  /// Reparent `child`: pull from `from`, then add-to-set on `to`, as two
  /// separate updates. A missing `to` leaves the child unlinked.
  pub(crate) async fn move_member(
    &self,
    m: Membership,
    child: ObjectId,
    from: ObjectId,
    to: ObjectId,
  ) -> catalog_core::Result<()> {
    if self.pull_member(m, from, child).await? == 0 {
      return Err(catalog_core::Error::NotFound { kind: m.parent, id: from });
    }
    if self.add_member(m, to, child).await? == 0 {
      return Err(catalog_core::Error::NotFound { kind: m.parent, id: to });
    }
    Ok(())
  }
}
