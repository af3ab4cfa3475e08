//! Encoding and decoding helpers between catalog types and the plain-text
//! representations stored in SQLite columns.
//!
//! Identifiers are stored as 24-character lowercase hex. Id lists and string
//! sets are compact JSON arrays. Timestamps are RFC 3339 strings.

use std::collections::BTreeSet;

use catalog_core::{
  ObjectId,
  faculty::Faculty,
  major::Major,
  patch::{FieldUpdate, SubjectPatch},
  subject::Subject,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── ObjectId ────────────────────────────────────────────────────────────────

pub fn encode_id(id: ObjectId) -> String { id.to_hex() }

pub fn decode_id(s: &str) -> Result<ObjectId> {
  ObjectId::parse_str(s).map_err(|_| Error::CorruptId(s.to_owned()))
}

pub fn encode_ids(ids: &[ObjectId]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_ids(s: &str) -> Result<Vec<ObjectId>> {
  let raw: Vec<String> = serde_json::from_str(s)?;
  raw.iter().map(|id| decode_id(id)).collect()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── String sets ─────────────────────────────────────────────────────────────

pub fn encode_set(set: &BTreeSet<String>) -> Result<String> {
  Ok(serde_json::to_string(set)?)
}

pub fn decode_set(s: &str) -> Result<BTreeSet<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Subject patch ───────────────────────────────────────────────────────────

fn text(update: FieldUpdate<String>) -> Option<Value> {
  update.into_option().map(Value::Text)
}

fn integer(update: FieldUpdate<u32>) -> Option<Value> {
  update.into_option().map(|n| Value::Integer(i64::from(n)))
}

fn set(update: FieldUpdate<BTreeSet<String>>) -> Result<Option<Value>> {
  update
    .into_option()
    .map(|s| encode_set(&s).map(Value::Text))
    .transpose()
}

/// The `(column, value)` pairs a patch writes, in a fixed column order.
/// `Unchanged` fields produce no pair.
pub fn patch_columns(patch: SubjectPatch) -> Result<Vec<(&'static str, Value)>> {
  let SubjectPatch {
    code,
    name,
    description,
    campus,
    credit,
    prerequisites,
    corequisites,
    status,
    available_duration,
  } = patch;

  let columns = [
    ("code", text(code)),
    ("name", text(name)),
    ("description", text(description)),
    ("campus", text(campus)),
    ("credit", integer(credit)),
    ("prerequisites", set(prerequisites)?),
    ("corequisites", set(corequisites)?),
    ("status", text(status)),
    ("available_duration", integer(available_duration)),
  ];

  Ok(
    columns
      .into_iter()
      .filter_map(|(column, value)| value.map(|v| (column, v)))
      .collect(),
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const FACULTY_COLUMNS: &str = "faculty_id, name, image, major_ids";

/// Raw values read directly from a `faculties` row.
pub struct RawFaculty {
  pub faculty_id: String,
  pub name:       String,
  pub image:      Vec<u8>,
  pub major_ids:  String,
}

impl RawFaculty {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      faculty_id: row.get(0)?,
      name:       row.get(1)?,
      image:      row.get(2)?,
      major_ids:  row.get(3)?,
    })
  }

  pub fn into_faculty(self) -> Result<Faculty> {
    Ok(Faculty {
      faculty_id: decode_id(&self.faculty_id)?,
      name:       self.name,
      image:      self.image,
      major_ids:  decode_ids(&self.major_ids)?,
    })
  }
}

pub const MAJOR_COLUMNS: &str = "major_id, name, subject_ids";

/// Raw values read directly from a `majors` row.
pub struct RawMajor {
  pub major_id:    String,
  pub name:        String,
  pub subject_ids: String,
}

impl RawMajor {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      major_id:    row.get(0)?,
      name:        row.get(1)?,
      subject_ids: row.get(2)?,
    })
  }

  pub fn into_major(self) -> Result<Major> {
    Ok(Major {
      major_id:    decode_id(&self.major_id)?,
      name:        self.name,
      subject_ids: decode_ids(&self.subject_ids)?,
    })
  }
}

pub const SUBJECT_COLUMNS: &str = "subject_id, code, name, description, campus, \
  credit, prerequisites, corequisites, status, likes, like_list, last_updated, \
  available_duration";

/// Raw values read directly from a `subjects` row.
pub struct RawSubject {
  pub subject_id:         String,
  pub code:               String,
  pub name:               String,
  pub description:        String,
  pub campus:             String,
  pub credit:             u32,
  pub prerequisites:      String,
  pub corequisites:       String,
  pub status:             String,
  pub likes:              u64,
  pub like_list:          String,
  pub last_updated:       String,
  pub available_duration: u32,
}

impl RawSubject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subject_id:         row.get(0)?,
      code:               row.get(1)?,
      name:               row.get(2)?,
      description:        row.get(3)?,
      campus:             row.get(4)?,
      credit:             row.get(5)?,
      prerequisites:      row.get(6)?,
      corequisites:       row.get(7)?,
      status:             row.get(8)?,
      likes:              row.get(9)?,
      like_list:          row.get(10)?,
      last_updated:       row.get(11)?,
      available_duration: row.get(12)?,
    })
  }

  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      subject_id:         decode_id(&self.subject_id)?,
      code:               self.code,
      name:               self.name,
      description:        self.description,
      campus:             self.campus,
      credit:             self.credit,
      prerequisites:      decode_set(&self.prerequisites)?,
      corequisites:       decode_set(&self.corequisites)?,
      status:             self.status,
      likes:              self.likes,
      like_list:          decode_set(&self.like_list)?,
      last_updated:       decode_dt(&self.last_updated)?,
      available_duration: self.available_duration,
    })
  }
}

/// Reorder `items` to follow `ids`, dropping ids with no item.
pub fn in_request_order<T>(
  ids: &[ObjectId],
  items: Vec<T>,
  key: impl Fn(&T) -> ObjectId,
) -> Vec<T> {
  let mut by_id: std::collections::HashMap<ObjectId, T> =
    items.into_iter().map(|item| (key(&item), item)).collect();
  ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
