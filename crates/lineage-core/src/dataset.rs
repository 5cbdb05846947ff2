//! [`RawData`] holds one batch of the three raw collections, plus the canned
//! sample family used when a fetch fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  family::FamilyTree,
  model::{Gender, ParentChild, Person, PersonId, Relationship, RelationshipKind},
  tree::build_tree,
};

/// Persons, relationships and parent-child links as fetched, before any
/// assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawData {
  #[serde(default)]
  pub persons:       Vec<Person>,
  #[serde(default)]
  pub relationships: Vec<Relationship>,
  #[serde(default)]
  pub links:         Vec<ParentChild>,
}

impl RawData {
  pub fn build(&self) -> FamilyTree {
    build_tree(&self.persons, &self.relationships, &self.links)
  }

  /// True when all three collections are empty.
  pub fn is_empty(&self) -> bool {
    self.persons.is_empty() && self.relationships.is_empty() && self.links.is_empty()
  }

  /// Parse a dataset file. Missing collections default to empty.
  pub fn from_json(input: &str) -> Result<Self> {
    Ok(serde_json::from_str(input)?)
  }

  /// Four generations of the Johnson family: two grandparent couples' worth
  /// of descendants, two marriages, and a shared pair of grandchildren.
  pub fn sample() -> Self {
    let persons = vec![
      sample_person(1, "George", "Johnson Sr.", Gender::Male, (1945, 3, 15)),
      sample_person(2, "Margaret", "Johnson", Gender::Female, (1948, 7, 22)),
      sample_person(3, "Robert", "Johnson", Gender::Male, (1970, 5, 10)),
      sample_person(4, "Susan", "Johnson", Gender::Female, (1972, 11, 3)),
      sample_person(5, "Michael", "Johnson", Gender::Male, (1975, 2, 14)),
      sample_person(6, "Jennifer", "Johnson", Gender::Female, (1973, 8, 25)),
      sample_person(7, "David", "Johnson", Gender::Male, (1995, 12, 20)),
      sample_person(8, "Emily", "Johnson", Gender::Female, (1998, 6, 8)),
      sample_person(9, "Thomas", "Johnson", Gender::Male, (1997, 9, 12)),
      sample_person(10, "Sarah", "Johnson", Gender::Female, (2000, 1, 30)),
      sample_person(11, "Lucas", "Johnson", Gender::Male, (2022, 4, 15)),
      sample_person(12, "Olivia", "Johnson", Gender::Female, (2023, 10, 22)),
    ];

    let mut george_and_margaret =
      Relationship::new(1, 1, 2, RelationshipKind::Married);
    george_and_margaret.start_year = Some(1968);
    let mut robert_and_susan =
      Relationship::new(2, 3, 4, RelationshipKind::Married);
    robert_and_susan.start_year = Some(1994);

    let links = [
      (1, 3),
      (1, 5),
      (2, 4),
      (2, 6),
      (3, 7),
      (3, 8),
      (4, 7),
      (4, 8),
      (5, 9),
      (5, 10),
      (7, 11),
      (7, 12),
    ]
    .into_iter()
    .zip(1..)
    .map(|((parent, child), id)| ParentChild::new(id, parent, child))
    .collect();

    Self {
      persons,
      relationships: vec![george_and_margaret, robert_and_susan],
      links,
    }
  }
}

fn sample_person(
  id: PersonId,
  first: &str,
  last: &str,
  gender: Gender,
  (year, month, day): (i32, u32, u32),
) -> Person {
  Person {
    gender: Some(gender),
    date_of_birth: NaiveDate::from_ymd_opt(year, month, day),
    photo_url: Some(format!("https://i.pravatar.cc/150?img={id}")),
    ..Person::new(id, first, last)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_builds_four_generations() {
    let tree = RawData::sample().build();
    assert_eq!(tree.members.len(), 12);
    assert_eq!(tree.root_member.as_ref().map(|m| m.id()), Some(1));

    let groups = tree.by_generation();
    let sizes: Vec<usize> = groups.values().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 4, 4, 2]);

    let david = tree.member(7).unwrap();
    assert_eq!(david.parents, vec![3, 4]);
    assert_eq!(david.generation, 2);
    assert_eq!(tree.spouse_of(3).map(|m| m.id()), Some(4));
  }

  #[test]
  fn from_json_defaults_missing_collections() {
    let raw = RawData::from_json(
      r#"{"persons": [{"id": 1, "first_name": "Ada", "last_name": "King"}]}"#,
    )
    .unwrap();
    assert_eq!(raw.persons.len(), 1);
    assert!(raw.relationships.is_empty());
    assert!(raw.links.is_empty());
  }

  #[test]
  fn from_json_rejects_malformed_input() {
    assert!(RawData::from_json("{\"persons\": 3}").is_err());
  }
}
