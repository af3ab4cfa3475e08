//! [`MajorStore`] for [`SqliteStore`].

use catalog_core::{
  EntityKind, Error as CoreError, ObjectId, Result as CoreResult,
  major::Major,
  store::MajorStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{MAJOR_COLUMNS, RawMajor, encode_id, encode_ids, in_request_order},
  store::{MAJOR_SUBJECTS, SqliteStore},
};

fn not_found(id: ObjectId) -> CoreError {
  CoreError::NotFound { kind: EntityKind::Major, id }
}

fn decode_all(raws: Vec<RawMajor>) -> crate::Result<Vec<Major>> {
  raws.into_iter().map(RawMajor::into_major).collect()
}

impl MajorStore for SqliteStore {
  async fn list_majors(&self) -> CoreResult<Vec<Major>> {
    let raws: Vec<RawMajor> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {MAJOR_COLUMNS} FROM majors ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawMajor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(decode_all(raws)?)
  }

  async fn get_major(&self, id: ObjectId) -> CoreResult<Option<Major>> {
    let id_str = encode_id(id);

    let raw: Option<RawMajor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {MAJOR_COLUMNS} FROM majors WHERE major_id = ?1"),
              rusqlite::params![id_str],
              RawMajor::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(raw.map(RawMajor::into_major).transpose()?)
  }

  async fn find_majors(&self, ids: Vec<ObjectId>) -> CoreResult<Vec<Major>> {
    let ids_json = encode_ids(&ids)?;

    let raws: Vec<RawMajor> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MAJOR_COLUMNS} FROM majors
           WHERE major_id IN (SELECT value FROM json_each(?1))"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ids_json], RawMajor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(in_request_order(&ids, decode_all(raws)?, |m| m.major_id))
  }

  async fn create_major(&self, name: String) -> CoreResult<Major> {
    let major = Major {
      major_id:    ObjectId::generate(),
      name,
      subject_ids: Vec::new(),
    };

    let id_str      = encode_id(major.major_id);
    let name        = major.name.clone();
    let subject_ids = encode_ids(&major.subject_ids)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO majors (major_id, name, subject_ids) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, subject_ids],
        )?;
        Ok(())
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(major)
  }

  async fn delete_major(&self, id: ObjectId) -> CoreResult<()> {
    let id_str = encode_id(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM majors WHERE major_id = ?1",
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

  async fn rename_major(&self, id: ObjectId, name: String) -> CoreResult<()> {
    let id_str = encode_id(id);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE majors SET name = ?2 WHERE major_id = ?1",
          rusqlite::params![id_str, name],
        )?)
      })
      .await
      .map_err(crate::Error::from)?;

    if updated == 0 {
      return Err(not_found(id));
    }
    Ok(())
  }

  async fn add_subject(&self, major_id: ObjectId, subject_id: ObjectId) -> CoreResult<()> {
    if self.add_member(MAJOR_SUBJECTS, major_id, subject_id).await? == 0 {
      return Err(not_found(major_id));
    }
    Ok(())
  }

  async fn remove_subject(&self, subject_id: ObjectId) -> CoreResult<()> {
    if self.pull_member_everywhere(MAJOR_SUBJECTS, subject_id).await? == 0 {
      return Err(CoreError::NoMatch { kind: EntityKind::Major, member: subject_id });
    }
    Ok(())
  }

  async fn find_by_subject(&self, subject_id: ObjectId) -> CoreResult<Major> {
    let sql = format!(
      "SELECT {MAJOR_COLUMNS} FROM majors WHERE {} ORDER BY rowid LIMIT 1",
      MAJOR_SUBJECTS.contains("?1"),
    );
    let subject_str = encode_id(subject_id);

    let raw: Option<RawMajor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![subject_str], RawMajor::from_row)
            .optional()?,
        )
      })
      .await
      .map_err(crate::Error::from)?;

    match raw {
      Some(raw) => Ok(raw.into_major()?),
      None => Err(CoreError::NoMatch { kind: EntityKind::Major, member: subject_id }),
    }
  }

  async fn move_subject(
    &self,
    subject_id: ObjectId,
    from: ObjectId,
    to: ObjectId,
  ) -> CoreResult<()> {
    self.move_member(MAJOR_SUBJECTS, subject_id, from, to).await
  }
}
