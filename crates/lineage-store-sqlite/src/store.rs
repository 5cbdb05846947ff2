//! [`SqliteStore`]: the SQLite implementation of [`FamilyStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use lineage_core::{
  model::{
    NewParentChild, NewPerson, NewRelationship, ParentChild, Person, PersonId,
    Relationship,
  },
  store::FamilyStore,
};

use crate::{
  Error, Result,
  encode::{
    PARENT_CHILD_COLUMNS, PERSON_COLUMNS, RELATIONSHIP_COLUMNS, RawParentChild,
    RawPerson, RawRelationship, encode_date, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lineage family store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column values of a [`NewPerson`], encoded and owned so they can move into
/// a connection closure.
struct PersonParams {
  first_name:    String,
  last_name:     String,
  gender:        Option<String>,
  date_of_birth: Option<String>,
  date_of_death: Option<String>,
  notes:         Option<String>,
  photo_url:     Option<String>,
}

impl From<&NewPerson> for PersonParams {
  fn from(p: &NewPerson) -> Self {
    Self {
      first_name:    p.first_name.clone(),
      last_name:     p.last_name.clone(),
      gender:        p.gender.map(|g| g.to_string()),
      date_of_birth: p.date_of_birth.map(encode_date),
      date_of_death: p.date_of_death.map(encode_date),
      notes:         p.notes.clone(),
      photo_url:     p.photo_url.clone(),
    }
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
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

  /// Return the first of `ids` that has no `persons` row, if any.
  async fn first_missing_person(&self, ids: [PersonId; 2]) -> Result<Option<PersonId>> {
    let missing = self
      .conn
      .call(move |conn| {
        for id in ids {
          let exists = conn
            .query_row(
              "SELECT 1 FROM persons WHERE id = ?1",
              rusqlite::params![id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !exists {
            return Ok(Some(id));
          }
        }
        Ok(None)
      })
      .await?;
    Ok(missing)
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = Error;

  // ── Raw collections ───────────────────────────────────────────────────────

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn list_relationships(&self) -> Result<Vec<Relationship>> {
    let raws: Vec<RawRelationship> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawRelationship::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRelationship::into_relationship)
      .collect()
  }

  async fn list_parent_child_links(&self) -> Result<Vec<ParentChild>> {
    let raws: Vec<RawParentChild> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PARENT_CHILD_COLUMNS} FROM parent_child ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawParentChild::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawParentChild::into_parent_child)
      .collect()
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
              rusqlite::params![id],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let p          = PersonParams::from(&input);

    let id: PersonId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (
             first_name, last_name, gender, date_of_birth, date_of_death,
             notes, photo_url, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            p.first_name,
            p.last_name,
            p.gender,
            p.date_of_birth,
            p.date_of_death,
            p.notes,
            p.photo_url,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(person_id = id, "created person");

    Ok(Person {
      id,
      first_name: input.first_name,
      last_name: input.last_name,
      gender: input.gender,
      date_of_birth: input.date_of_birth,
      date_of_death: input.date_of_death,
      notes: input.notes,
      photo_url: input.photo_url,
      created_at: Some(created_at),
    })
  }

  async fn update_person(
    &self,
    id:    PersonId,
    input: NewPerson,
  ) -> Result<Option<Person>> {
    let p = PersonParams::from(&input);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons SET
             first_name = ?1, last_name = ?2, gender = ?3,
             date_of_birth = ?4, date_of_death = ?5, notes = ?6, photo_url = ?7
           WHERE id = ?8",
          rusqlite::params![
            p.first_name,
            p.last_name,
            p.gender,
            p.date_of_birth,
            p.date_of_death,
            p.notes,
            p.photo_url,
            id,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_person(id).await
  }

  async fn delete_person(&self, id: PersonId) -> Result<bool> {
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM persons WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Edges ─────────────────────────────────────────────────────────────────

  async fn create_relationship(&self, input: NewRelationship) -> Result<Relationship> {
    if let Some(missing) =
      self.first_missing_person([input.person1_id, input.person2_id]).await?
    {
      return Err(Error::PersonNotFound(missing));
    }

    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let kind_str   = input.kind.to_string();
    let (p1, p2)   = (input.person1_id, input.person2_id);
    let (start, end) = (input.start_year, input.end_year);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO relationships (
             person1_id, person2_id, kind, start_year, end_year, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![p1, p2, kind_str, start, end, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Relationship {
      id,
      person1_id: input.person1_id,
      person2_id: input.person2_id,
      kind: input.kind,
      start_year: input.start_year,
      end_year: input.end_year,
      created_at: Some(created_at),
    })
  }

  async fn create_parent_child(&self, input: NewParentChild) -> Result<ParentChild> {
    if let Some(missing) =
      self.first_missing_person([input.parent_id, input.child_id]).await?
    {
      return Err(Error::PersonNotFound(missing));
    }

    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let kind_str   = input.kind.to_string();
    let (parent, child) = (input.parent_id, input.child_id);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO parent_child (parent_id, child_id, kind, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![parent, child, kind_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ParentChild {
      id,
      parent_id: input.parent_id,
      child_id: input.child_id,
      kind: input.kind,
      created_at: Some(created_at),
    })
  }
}
