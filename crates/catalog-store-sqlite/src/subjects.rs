//! [`SubjectStore`] for [`SqliteStore`], including the like ledger.

use catalog_core::{
  EntityKind, Error as CoreError, ObjectId, Result as CoreResult,
  patch::SubjectPatch,
  store::SubjectStore,
  subject::{NewSubject, Subject},
};
use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  encode::{
    RawSubject, SUBJECT_COLUMNS, encode_dt, encode_id, encode_ids, encode_set,
    in_request_order, patch_columns,
  },
  store::SqliteStore,
};

fn not_found(id: ObjectId) -> CoreError {
  CoreError::NotFound { kind: EntityKind::Subject, id }
}

fn decode_all(raws: Vec<RawSubject>) -> crate::Result<Vec<Subject>> {
  raws.into_iter().map(RawSubject::into_subject).collect()
}

impl SubjectStore for SqliteStore {
  async fn list_subjects(&self) -> CoreResult<Vec<Subject>> {
    let raws: Vec<RawSubject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(decode_all(raws)?)
  }

  async fn get_subject(&self, id: ObjectId) -> CoreResult<Option<Subject>> {
    let id_str = encode_id(id);

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = ?1"),
              rusqlite::params![id_str],
              RawSubject::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(raw.map(RawSubject::into_subject).transpose()?)
  }

  async fn find_subjects(&self, ids: Vec<ObjectId>) -> CoreResult<Vec<Subject>> {
    let ids_json = encode_ids(&ids)?;

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects
           WHERE subject_id IN (SELECT value FROM json_each(?1))"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ids_json], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(in_request_order(&ids, decode_all(raws)?, |s| s.subject_id))
  }

  async fn create_subject(&self, input: NewSubject) -> CoreResult<Subject> {
    let subject = input.into_subject(ObjectId::generate(), Utc::now());

    let id_str        = encode_id(subject.subject_id);
    let code          = subject.code.clone();
    let name          = subject.name.clone();
    let description   = subject.description.clone();
    let campus        = subject.campus.clone();
    let credit        = subject.credit;
    let prerequisites = encode_set(&subject.prerequisites)?;
    let corequisites  = encode_set(&subject.corequisites)?;
    let status        = subject.status.clone();
    let likes         = subject.likes;
    let like_list     = encode_set(&subject.like_list)?;
    let last_updated  = encode_dt(subject.last_updated);
    let duration      = subject.available_duration;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO subjects ({SUBJECT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
          ),
          rusqlite::params![
            id_str,
            code,
            name,
            description,
            campus,
            credit,
            prerequisites,
            corequisites,
            status,
            likes,
            like_list,
            last_updated,
            duration,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(subject)
  }

  async fn delete_subject(&self, id: ObjectId) -> CoreResult<()> {
    let id_str = encode_id(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM subjects WHERE subject_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(crate::Error::from)?;

    if deleted == 0 {
      return Err(not_found(id));
    }
    Ok(())
  }

  async fn update_subject(&self, id: ObjectId, patch: SubjectPatch) -> CoreResult<()> {
    let columns = patch_columns(patch)?;

    // ?1 is the key; patched columns follow, then last_updated.
    let mut assignments = Vec::with_capacity(columns.len() + 1);
    let mut values = vec![Value::Text(encode_id(id))];
    for (column, value) in columns {
      values.push(value);
      assignments.push(format!("{column} = ?{}", values.len()));
    }
    values.push(Value::Text(encode_dt(Utc::now())));
    assignments.push(format!("last_updated = ?{}", values.len()));

    let sql = format!(
      "UPDATE subjects SET {} WHERE subject_id = ?1",
      assignments.join(", ")
    );

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await
      .map_err(crate::Error::from)?;

    if updated == 0 {
      return Err(not_found(id));
    }
    Ok(())
  }

  async fn add_like(&self, id: ObjectId, email: String) -> CoreResult<bool> {
    let id_str = encode_id(id);
    let now = encode_dt(Utc::now());

    let added = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let already: bool = tx.query_row(
          "SELECT EXISTS (
             SELECT 1 FROM subjects, json_each(subjects.like_list)
             WHERE subjects.subject_id = ?1 AND json_each.value = ?2
           )",
          rusqlite::params![id_str, email],
          |row| row.get(0),
        )?;

        if !already {
          // A missing subject becomes a bare document holding just the like.
          tx.execute(
            "INSERT INTO subjects (subject_id, likes, like_list, last_updated)
             VALUES (?1, 1, json_array(?2), ?3)
             ON CONFLICT (subject_id) DO UPDATE SET
               like_list = json_insert(subjects.like_list, '$[#]', ?2),
               likes     = subjects.likes + 1",
            rusqlite::params![id_str, email, now],
          )?;
        }

        tx.commit()?;
        Ok(!already)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(added)
  }

  async fn set_likes(&self, id: ObjectId, likes: u64) -> CoreResult<()> {
    let id_str = encode_id(id);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE subjects SET likes = ?2 WHERE subject_id = ?1",
          rusqlite::params![id_str, likes],
        )?)
      })
      .await
      .map_err(crate::Error::from)?;

    if updated == 0 {
      return Err(not_found(id));
    }
    Ok(())
  }
}
