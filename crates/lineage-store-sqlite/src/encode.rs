//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! enums as their SCREAMING_SNAKE_CASE names.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use lineage_core::model::{
  Gender, ParentChild, ParentChildKind, Person, PersonId, Relationship,
  RelationshipKind,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

fn decode_variant<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| {
    Error::Core(lineage_core::Error::UnknownVariant {
      kind,
      value: s.to_owned(),
    })
  })
}

pub fn decode_gender(s: &str) -> Result<Gender> { decode_variant("gender", s) }

pub fn decode_relationship_kind(s: &str) -> Result<RelationshipKind> {
  decode_variant("relationship kind", s)
}

pub fn decode_parent_child_kind(s: &str) -> Result<ParentChildKind> {
  decode_variant("parent-child kind", s)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "id, first_name, last_name, gender, \
                                  date_of_birth, date_of_death, notes, \
                                  photo_url, created_at";

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub id:            PersonId,
  pub first_name:    String,
  pub last_name:     String,
  pub gender:        Option<String>,
  pub date_of_birth: Option<String>,
  pub date_of_death: Option<String>,
  pub notes:         Option<String>,
  pub photo_url:     Option<String>,
  pub created_at:    String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      gender:        row.get(3)?,
      date_of_birth: row.get(4)?,
      date_of_death: row.get(5)?,
      notes:         row.get(6)?,
      photo_url:     row.get(7)?,
      created_at:    row.get(8)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:            self.id,
      first_name:    self.first_name,
      last_name:     self.last_name,
      gender:        self.gender.as_deref().map(decode_gender).transpose()?,
      date_of_birth: self.date_of_birth.as_deref().map(decode_date).transpose()?,
      date_of_death: self.date_of_death.as_deref().map(decode_date).transpose()?,
      notes:         self.notes,
      photo_url:     self.photo_url,
      created_at:    Some(decode_dt(&self.created_at)?),
    })
  }
}

/// Column list matching [`RawRelationship::from_row`].
pub const RELATIONSHIP_COLUMNS: &str =
  "id, person1_id, person2_id, kind, start_year, end_year, created_at";

/// Raw values read directly from a `relationships` row.
pub struct RawRelationship {
  pub id:         i64,
  pub person1_id: PersonId,
  pub person2_id: PersonId,
  pub kind:       String,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub created_at: String,
}

impl RawRelationship {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      person1_id: row.get(1)?,
      person2_id: row.get(2)?,
      kind:       row.get(3)?,
      start_year: row.get(4)?,
      end_year:   row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      id:         self.id,
      person1_id: self.person1_id,
      person2_id: self.person2_id,
      kind:       decode_relationship_kind(&self.kind)?,
      start_year: self.start_year,
      end_year:   self.end_year,
      created_at: Some(decode_dt(&self.created_at)?),
    })
  }
}

/// Column list matching [`RawParentChild::from_row`].
pub const PARENT_CHILD_COLUMNS: &str =
  "id, parent_id, child_id, kind, created_at";

/// Raw values read directly from a `parent_child` row.
pub struct RawParentChild {
  pub id:         i64,
  pub parent_id:  PersonId,
  pub child_id:   PersonId,
  pub kind:       String,
  pub created_at: String,
}

impl RawParentChild {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      parent_id:  row.get(1)?,
      child_id:   row.get(2)?,
      kind:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_parent_child(self) -> Result<ParentChild> {
    Ok(ParentChild {
      id:         self.id,
      parent_id:  self.parent_id,
      child_id:   self.child_id,
      kind:       decode_parent_child_kind(&self.kind)?,
      created_at: Some(decode_dt(&self.created_at)?),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_roundtrip_is_iso() {
    let d = NaiveDate::from_ymd_opt(1948, 7, 2).unwrap();
    assert_eq!(encode_date(d), "1948-07-02");
    assert_eq!(decode_date("1948-07-02").unwrap(), d);
    assert!(decode_date("02/07/1948").is_err());
  }

  #[test]
  fn unknown_enum_text_is_a_core_error() {
    let err = decode_relationship_kind("ENGAGED").unwrap_err();
    assert!(matches!(
      err,
      Error::Core(lineage_core::Error::UnknownVariant { kind: "relationship kind", .. })
    ));
    assert_eq!(decode_gender("NON_BINARY").unwrap(), Gender::NonBinary);
  }
}
