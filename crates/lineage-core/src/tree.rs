//! The tree builder: flat relation rows in, one [`FamilyTree`] out.
//!
//! A build runs three stages in order:
//!
//! 1. [`assemble`] turns persons and edges into a [`MemberArena`] with
//!    parent/child adjacency and spouse pairing.
//! 2. [`assign_generations`] gives every member a depth.
//! 3. [`select_root`] picks the member with the lowest generation.
//!
//! Malformed input never fails a build. Edges that point at unknown persons
//! are dropped, duplicate person ids keep their first occurrence, and cycles
//! terminate at already-visited members.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
  family::{FamilyMember, FamilyTree},
  model::{ParentChild, Person, PersonId, Relationship},
};

// ─── Arena ───────────────────────────────────────────────────────────────────

/// A member under construction. `generation` stays `None` until
/// [`assign_generations`] reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMember {
  pub person:     Person,
  pub generation: Option<u32>,
  pub parents:    Vec<PersonId>,
  pub children:   Vec<PersonId>,
  pub spouse_id:  Option<PersonId>,
}

impl PendingMember {
  fn new(person: Person) -> Self {
    Self {
      person,
      generation: None,
      parents: Vec::new(),
      children: Vec::new(),
      spouse_id: None,
    }
  }
}

/// Members of a single build, stored in first-occurrence order with an
/// id → slot index. Owned by one build and dropped with it.
#[derive(Debug, Default)]
pub struct MemberArena {
  members: Vec<PendingMember>,
  index:   HashMap<PersonId, usize>,
}

impl MemberArena {
  pub fn len(&self) -> usize { self.members.len() }

  pub fn is_empty(&self) -> bool { self.members.is_empty() }

  pub fn get(&self, id: PersonId) -> Option<&PendingMember> {
    self.index.get(&id).map(|&slot| &self.members[slot])
  }

  pub fn iter(&self) -> impl Iterator<Item = &PendingMember> {
    self.members.iter()
  }

  /// Finish the build. Members [`assign_generations`] has not run over come
  /// out at generation 0.
  pub fn into_members(self) -> Vec<FamilyMember> {
    self
      .members
      .into_iter()
      .map(|m| FamilyMember {
        person:     m.person,
        generation: m.generation.unwrap_or(0),
        parents:    m.parents,
        children:   m.children,
        spouse_id:  m.spouse_id,
      })
      .collect()
  }
}

// ─── Stage 1: assembly ───────────────────────────────────────────────────────

/// Build the member arena from the three raw collections.
///
/// Parent-child edges are applied before relationship edges. Every edge whose
/// endpoints do not both resolve is skipped. Duplicate edges are kept and show
/// up as repeated ids. For spouses the last relationship processed wins,
/// whatever its kind or year.
pub fn assemble(
  persons: &[Person],
  relationships: &[Relationship],
  links: &[ParentChild],
) -> MemberArena {
  let mut arena = MemberArena {
    members: Vec::with_capacity(persons.len()),
    index:   HashMap::with_capacity(persons.len()),
  };

  for person in persons {
    if arena.index.contains_key(&person.id) {
      debug!(person_id = person.id, "skipping duplicate person");
      continue;
    }
    arena.index.insert(person.id, arena.members.len());
    arena.members.push(PendingMember::new(person.clone()));
  }

  for link in links {
    let (Some(&parent), Some(&child)) =
      (arena.index.get(&link.parent_id), arena.index.get(&link.child_id))
    else {
      debug!(
        link_id = link.id,
        parent_id = link.parent_id,
        child_id = link.child_id,
        "dropping parent-child link with unknown endpoint"
      );
      continue;
    };
    arena.members[parent].children.push(link.child_id);
    arena.members[child].parents.push(link.parent_id);
  }

  for rel in relationships {
    let (Some(&first), Some(&second)) =
      (arena.index.get(&rel.person1_id), arena.index.get(&rel.person2_id))
    else {
      debug!(
        relationship_id = rel.id,
        person1_id = rel.person1_id,
        person2_id = rel.person2_id,
        "dropping relationship with unknown endpoint"
      );
      continue;
    };
    arena.members[first].spouse_id = Some(rel.person2_id);
    arena.members[second].spouse_id = Some(rel.person1_id);
  }

  arena
}

// ─── Stage 2: generations ────────────────────────────────────────────────────

/// Assign a generation to every member of `arena`.
///
/// Pass 1 walks depth-first from every member without parents, in arena
/// order, giving each reached member the depth of the path that reached it.
/// The visited set is global to the build, so a member reachable along two
/// paths keeps the depth of whichever path got there first, not the minimum.
///
/// Pass 2 covers members pass 1 never reached (only cycles or similar
/// anomalies produce these). Each takes its first parent's generation plus
/// one, reading the parent as it stands at that moment and treating an
/// unassigned parent as 0. Parentless leftovers get 0.
pub fn assign_generations(arena: &mut MemberArena) {
  let mut visited: HashSet<PersonId> = HashSet::with_capacity(arena.len());
  let mut stack: Vec<(usize, u32)> = Vec::new();

  let roots: Vec<usize> = arena
    .members
    .iter()
    .enumerate()
    .filter(|(_, m)| m.parents.is_empty())
    .map(|(slot, _)| slot)
    .collect();

  for root in roots {
    stack.push((root, 0));
    while let Some((slot, depth)) = stack.pop() {
      let member = &mut arena.members[slot];
      if !visited.insert(member.person.id) {
        continue;
      }
      member.generation = Some(depth);
      // Reversed so the first child is popped first (recursive pre-order).
      for child in member.children.iter().rev() {
        if let Some(&child_slot) = arena.index.get(child) {
          stack.push((child_slot, depth.saturating_add(1)));
        }
      }
    }
  }

  for slot in 0..arena.members.len() {
    if arena.members[slot].generation.is_some() {
      continue;
    }
    let generation = match arena.members[slot].parents.first() {
      Some(parent) => arena
        .index
        .get(parent)
        .and_then(|&p| arena.members[p].generation)
        .unwrap_or(0)
        .saturating_add(1),
      None => 0,
    };
    debug!(
      person_id = arena.members[slot].person.id,
      generation, "member unreachable from any root; using fallback generation"
    );
    arena.members[slot].generation = Some(generation);
  }
}

// ─── Stage 3: root ───────────────────────────────────────────────────────────

/// The member with the numerically smallest generation. Ties go to the
/// earliest member in `members`.
pub fn select_root(members: &[FamilyMember]) -> Option<&FamilyMember> {
  // `min_by_key` returns the first of several equal minima.
  members.iter().min_by_key(|m| m.generation)
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Build a [`FamilyTree`] from the three raw collections.
///
/// Pure and deterministic: identical inputs, in identical order, always give
/// value-equal trees.
pub fn build_tree(
  persons: &[Person],
  relationships: &[Relationship],
  links: &[ParentChild],
) -> FamilyTree {
  let mut arena = assemble(persons, relationships, links);
  assign_generations(&mut arena);

  let members = arena.into_members();
  let root_member = select_root(&members).cloned();

  debug!(
    members = members.len(),
    root = root_member.as_ref().map(FamilyMember::id),
    "built family tree"
  );

  FamilyTree { root_member, members }
}
