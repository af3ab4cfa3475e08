//! [`FacultyStore`] for [`SqliteStore`].

use catalog_core::{
  EntityKind, Error as CoreError, ObjectId, Result as CoreResult,
  faculty::{Faculty, FacultyUpdate, NewFaculty},
  store::FacultyStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{FACULTY_COLUMNS, RawFaculty, encode_id, encode_ids},
  store::{FACULTY_MAJORS, SqliteStore},
};

fn not_found(id: ObjectId) -> CoreError {
  CoreError::NotFound { kind: EntityKind::Faculty, id }
}

impl FacultyStore for SqliteStore {
  async fn list_faculties(&self) -> CoreResult<Vec<Faculty>> {
    let raws: Vec<RawFaculty> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACULTY_COLUMNS} FROM faculties ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawFaculty::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(
      raws
        .into_iter()
        .map(RawFaculty::into_faculty)
        .collect::<crate::Result<_>>()?,
    )
  }

  async fn get_faculty(&self, id: ObjectId) -> CoreResult<Option<Faculty>> {
    let id_str = encode_id(id);

    let raw: Option<RawFaculty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {FACULTY_COLUMNS} FROM faculties WHERE faculty_id = ?1"),
              rusqlite::params![id_str],
              RawFaculty::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(raw.map(RawFaculty::into_faculty).transpose()?)
  }

  async fn create_faculty(&self, input: NewFaculty) -> CoreResult<Faculty> {
    let faculty = Faculty {
      faculty_id: ObjectId::generate(),
      name:       input.name,
      image:      input.image,
      major_ids:  Vec::new(),
    };

    let id_str    = encode_id(faculty.faculty_id);
    let name      = faculty.name.clone();
    let image     = faculty.image.clone();
    let major_ids = encode_ids(&faculty.major_ids)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO faculties (faculty_id, name, image, major_ids)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, image, major_ids],
        )?;
        Ok(())
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(faculty)
  }

  async fn update_faculty(
    &self,
    id: ObjectId,
    update: FacultyUpdate,
    image: Option<Vec<u8>>,
  ) -> CoreResult<Faculty> {
    let id_str = encode_id(id);

    let raw: Option<RawFaculty> = self
      .conn
      .call(move |conn| {
        let returning = format!("RETURNING {FACULTY_COLUMNS}");
        let row = match image {
          Some(image) => conn.query_row(
            &format!("UPDATE faculties SET name = ?2, image = ?3 WHERE faculty_id = ?1 {returning}"),
            rusqlite::params![id_str, update.name, image],
            RawFaculty::from_row,
          ),
          None => conn.query_row(
            &format!("UPDATE faculties SET name = ?2 WHERE faculty_id = ?1 {returning}"),
            rusqlite::params![id_str, update.name],
            RawFaculty::from_row,
          ),
        };
        Ok(row.optional()?)
      })
      .await
      .map_err(crate::Error::from)?;

    match raw {
      Some(raw) => Ok(raw.into_faculty()?),
      None => Err(not_found(id)),
    }
  }

  async fn delete_faculty(&self, id: ObjectId) -> CoreResult<()> {
    let id_str = encode_id(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM faculties WHERE faculty_id = ?1",
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

  async fn add_major(&self, faculty_id: ObjectId, major_id: ObjectId) -> CoreResult<()> {
    if self.add_member(FACULTY_MAJORS, faculty_id, major_id).await? == 0 {
      return Err(not_found(faculty_id));
    }
    Ok(())
  }

  async fn remove_major(&self, major_id: ObjectId) -> CoreResult<()> {
    if self.pull_member_everywhere(FACULTY_MAJORS, major_id).await? == 0 {
      return Err(CoreError::NoMatch { kind: EntityKind::Faculty, member: major_id });
    }
    Ok(())
  }

  async fn find_by_major(&self, major_id: ObjectId) -> CoreResult<Faculty> {
    let sql = format!(
      "SELECT {FACULTY_COLUMNS} FROM faculties WHERE {} ORDER BY rowid LIMIT 1",
      FACULTY_MAJORS.contains("?1"),
    );
    let major_str = encode_id(major_id);

    let raw: Option<RawFaculty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![major_str], RawFaculty::from_row)
            .optional()?,
        )
      })
      .await
      .map_err(crate::Error::from)?;

    match raw {
      Some(raw) => Ok(raw.into_faculty()?),
      None => Err(CoreError::NoMatch { kind: EntityKind::Faculty, member: major_id }),
    }
  }

  async fn move_major(
    &self,
    major_id: ObjectId,
    from: ObjectId,
    to: ObjectId,
  ) -> CoreResult<()> {
    self.move_member(FACULTY_MAJORS, major_id, from, to).await
  }
}
