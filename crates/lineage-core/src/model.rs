//! Record types: the three raw relation collections and their inputs.
//!
//! Persons, partner relationships and parent-child links are stored and
//! fetched independently. Nothing here knows about generations or adjacency;
//! that is computed by [`crate::tree`] on every build.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable integer identity of a [`Person`].
pub type PersonId = i64;

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
  Male,
  Female,
  NonBinary,
  Unknown,
}

/// The nature of a partner edge. Carried through to storage and display; the
/// tree builder treats every kind identically.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
  Married,
  Divorced,
  Partnered,
  Separated,
  Widowed,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ParentChildKind {
  #[default]
  Biological,
  Adoptive,
  Step,
  Foster,
  Unknown,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// The canonical record for an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:            PersonId,
  pub first_name:    String,
  pub last_name:     String,
  #[serde(default)]
  pub gender:        Option<Gender>,
  #[serde(default)]
  pub date_of_birth: Option<NaiveDate>,
  #[serde(default)]
  pub date_of_death: Option<NaiveDate>,
  #[serde(default)]
  pub notes:         Option<String>,
  #[serde(default)]
  pub photo_url:     Option<String>,
  /// Store-assigned; absent for records that never went through a store.
  #[serde(default)]
  pub created_at:    Option<DateTime<Utc>>,
}

impl Person {
  /// A person with only identity and name set.
  pub fn new(
    id: PersonId,
    first_name: impl Into<String>,
    last_name: impl Into<String>,
  ) -> Self {
    Self {
      id,
      first_name: first_name.into(),
      last_name: last_name.into(),
      gender: None,
      date_of_birth: None,
      date_of_death: None,
      notes: None,
      photo_url: None,
      created_at: None,
    }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// Input to [`crate::store::FamilyStore::create_person`] and
/// [`crate::store::FamilyStore::update_person`]. An update replaces every
/// attribute; `id` and `created_at` are never accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub first_name:    String,
  pub last_name:     String,
  #[serde(default)]
  pub gender:        Option<Gender>,
  #[serde(default)]
  pub date_of_birth: Option<NaiveDate>,
  #[serde(default)]
  pub date_of_death: Option<NaiveDate>,
  #[serde(default)]
  pub notes:         Option<String>,
  #[serde(default)]
  pub photo_url:     Option<String>,
}

impl NewPerson {
  pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
    Self {
      first_name:    first_name.into(),
      last_name:     last_name.into(),
      gender:        None,
      date_of_birth: None,
      date_of_death: None,
      notes:         None,
      photo_url:     None,
    }
  }
}

// ─── Relationship ────────────────────────────────────────────────────────────

/// An undirected partner edge. `person1_id` and `person2_id` are an unordered
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
  pub id:         i64,
  pub person1_id: PersonId,
  pub person2_id: PersonId,
  pub kind:       RelationshipKind,
  #[serde(default)]
  pub start_year: Option<i32>,
  #[serde(default)]
  pub end_year:   Option<i32>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

impl Relationship {
  pub fn new(
    id: i64,
    person1_id: PersonId,
    person2_id: PersonId,
    kind: RelationshipKind,
  ) -> Self {
    Self {
      id,
      person1_id,
      person2_id,
      kind,
      start_year: None,
      end_year: None,
      created_at: None,
    }
  }
}

/// Input to [`crate::store::FamilyStore::create_relationship`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelationship {
  pub person1_id: PersonId,
  pub person2_id: PersonId,
  pub kind:       RelationshipKind,
  #[serde(default)]
  pub start_year: Option<i32>,
  #[serde(default)]
  pub end_year:   Option<i32>,
}

// ─── ParentChild ─────────────────────────────────────────────────────────────

/// A directed parentage edge from `parent_id` to `child_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentChild {
  pub id:         i64,
  pub parent_id:  PersonId,
  pub child_id:   PersonId,
  #[serde(default)]
  pub kind:       ParentChildKind,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

impl ParentChild {
  pub fn new(id: i64, parent_id: PersonId, child_id: PersonId) -> Self {
    Self {
      id,
      parent_id,
      child_id,
      kind: ParentChildKind::default(),
      created_at: None,
    }
  }
}

/// Input to [`crate::store::FamilyStore::create_parent_child`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParentChild {
  pub parent_id: PersonId,
  pub child_id:  PersonId,
  #[serde(default)]
  pub kind:      ParentChildKind,
}
