//! The `FamilyStore` trait: raw-data provider and persistence layer.
//!
//! The trait is implemented by storage backends (e.g. `lineage-store-sqlite`).
//! The tree store in `lineage-api` depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::model::{
  NewParentChild, NewPerson, NewRelationship, ParentChild, Person, PersonId,
  Relationship,
};

/// Error type of a [`FamilyStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The person id a failed write referenced but the store does not hold.
  fn missing_person(&self) -> Option<PersonId> { None }
}

/// Abstraction over a Lineage storage backend.
///
/// The three `list_*` methods supply the raw collections the tree builder
/// consumes. They are independent of each other and may be called
/// concurrently.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FamilyStore: Send + Sync {
  type Error: StoreError;

  // ── Raw collections ───────────────────────────────────────────────────

  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn list_relationships(
    &self,
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + '_;

  fn list_parent_child_links(
    &self,
  ) -> impl Future<Output = Result<Vec<ParentChild>, Self::Error>> + Send + '_;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Persist a new person. The id and `created_at` are assigned by the store.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Replace every attribute of an existing person. Returns `None` if no
  /// person has this id.
  fn update_person(
    &self,
    id: PersonId,
    input: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person. Returns `false` if no person has this id.
  ///
  /// Edges referencing the person are left in place; the tree builder drops
  /// them on the next build.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Edges ─────────────────────────────────────────────────────────────

  /// Persist a partner edge. Fails if either person does not exist, with an
  /// error whose [`StoreError::missing_person`] names the absent id.
  fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  /// Persist a parent-child edge. Fails like
  /// [`create_relationship`](Self::create_relationship) on an absent person.
  fn create_parent_child(
    &self,
    input: NewParentChild,
  ) -> impl Future<Output = Result<ParentChild, Self::Error>> + Send + '_;
}
