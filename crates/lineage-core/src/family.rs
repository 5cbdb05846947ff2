//! The computed read model: a built [`FamilyTree`] and its members.
//!
//! Never stored, never patched in place: every tree is produced whole by
//! [`crate::tree::build_tree`] from the three raw collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Person, PersonId};

// ─── FamilyMember ────────────────────────────────────────────────────────────

/// A [`Person`] augmented with computed adjacency and generation depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
  #[serde(flatten)]
  pub person:     Person,
  /// Depth from the root ancestor that reached this member first; 0-based.
  pub generation: u32,
  /// Parent ids in edge-processing order. Duplicate edges repeat here.
  pub parents:    Vec<PersonId>,
  /// Child ids in edge-processing order. Duplicate edges repeat here.
  pub children:   Vec<PersonId>,
  /// The partner from the last relationship edge processed, if any.
  pub spouse_id:  Option<PersonId>,
}

impl FamilyMember {
  pub fn id(&self) -> PersonId { self.person.id }
}

// ─── FamilyTree ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FamilyTree {
  /// The member with the lowest generation; the first one in `members` order
  /// when several share it. `None` only for an empty tree.
  pub root_member: Option<FamilyMember>,
  /// Every member, in first-occurrence order of the input persons.
  pub members:     Vec<FamilyMember>,
}

impl FamilyTree {
  pub fn is_empty(&self) -> bool { self.members.is_empty() }

  pub fn member(&self, id: PersonId) -> Option<&FamilyMember> {
    self.members.iter().find(|m| m.id() == id)
  }

  /// Resolve a member's `children` ids. A child listed twice is returned
  /// twice.
  pub fn children_of(&self, id: PersonId) -> Vec<&FamilyMember> {
    self.resolve(self.member(id).map(|m| m.children.as_slice()))
  }

  pub fn parents_of(&self, id: PersonId) -> Vec<&FamilyMember> {
    self.resolve(self.member(id).map(|m| m.parents.as_slice()))
  }

  pub fn spouse_of(&self, id: PersonId) -> Option<&FamilyMember> {
    self
      .member(id)
      .and_then(|m| m.spouse_id)
      .and_then(|spouse| self.member(spouse))
  }

  /// Group members by generation, ascending. Within a group members keep
  /// tree order.
  pub fn by_generation(&self) -> BTreeMap<u32, Vec<&FamilyMember>> {
    let mut groups: BTreeMap<u32, Vec<&FamilyMember>> = BTreeMap::new();
    for member in &self.members {
      groups.entry(member.generation).or_default().push(member);
    }
    groups
  }

  fn resolve(&self, ids: Option<&[PersonId]>) -> Vec<&FamilyMember> {
    ids
      .unwrap_or_default()
      .iter()
      .filter_map(|id| self.member(*id))
      .collect()
  }
}

/// Human-readable heading for a generation row.
pub fn generation_label(generation: u32) -> String {
  match generation {
    0 => "Grandparents".to_string(),
    1 => "Parents".to_string(),
    2 => "Your Generation".to_string(),
    3 => "Children".to_string(),
    4 => "Grandchildren".to_string(),
    n => format!("Generation {n}"),
  }
}
