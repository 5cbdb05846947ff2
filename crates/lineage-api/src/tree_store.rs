//! [`TreeStore`] caches and publishes the most recently built tree.
//!
//! The tree is always a pure function of the store's current raw state: every
//! successful mutation is followed by a full fetch and rebuild, never by an
//! incremental patch of the cached tree.

use std::sync::Arc;

use lineage_core::{
  FamilyTree, RawData,
  model::{
    NewParentChild, NewPerson, NewRelationship, ParentChild, Person, PersonId,
    Relationship,
  },
  store::FamilyStore,
};
use tokio::sync::watch;
use tracing::{info, warn};

/// Shared handle to the last published tree.
pub type Published = Option<Arc<FamilyTree>>;

pub struct TreeStore<S> {
  store:     S,
  /// Replaces the whole fetched batch when any fetch fails, unless empty.
  fallback:  RawData,
  published: watch::Sender<Published>,
}

impl<S: FamilyStore> TreeStore<S> {
  pub fn new(store: S, fallback: RawData) -> Self {
    let (published, _) = watch::channel(None);
    Self { store, fallback, published }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Fetch & build ─────────────────────────────────────────────────────────

  /// Fetch the three raw collections concurrently; this never fails.
  ///
  /// Failed fetches are logged. If any fetch failed and the fallback dataset
  /// is non-empty, the whole fallback replaces the fetched data; its ids are
  /// unrelated to the store's and are never mixed with live rows. With an
  /// empty fallback each failed collection is read as empty and the others
  /// are kept.
  pub async fn fetch(&self) -> RawData {
    let (persons, relationships, links) = tokio::join!(
      self.store.list_persons(),
      self.store.list_relationships(),
      self.store.list_parent_child_links(),
    );

    let persons = logged("persons", persons);
    let relationships = logged("relationships", relationships);
    let links = logged("parent_child", links);

    match (persons, relationships, links) {
      (Some(persons), Some(relationships), Some(links)) => {
        RawData { persons, relationships, links }
      }
      _ if !self.fallback.is_empty() => {
        warn!(
          persons = self.fallback.persons.len(),
          "fetch incomplete; using the fallback dataset"
        );
        self.fallback.clone()
      }
      (persons, relationships, links) => RawData {
        persons:       persons.unwrap_or_default(),
        relationships: relationships.unwrap_or_default(),
        links:         links.unwrap_or_default(),
      },
    }
  }

  /// Fetch, build and publish a fresh tree.
  ///
  /// Concurrent refreshes are not coalesced; whichever finishes last is the
  /// one left published.
  pub async fn refresh(&self) -> Arc<FamilyTree> {
    let raw = self.fetch().await;
    let tree = Arc::new(raw.build());
    info!(
      members = tree.members.len(),
      root = tree.root_member.as_ref().map(|m| m.id()),
      "rebuilt family tree"
    );
    self.published.send_replace(Some(Arc::clone(&tree)));
    tree
  }

  /// The last published tree, if any build has completed.
  pub fn current(&self) -> Published { self.published.borrow().clone() }

  /// The last published tree, building one first if none exists yet.
  pub async fn tree(&self) -> Arc<FamilyTree> {
    match self.current() {
      Some(tree) => tree,
      None => self.refresh().await,
    }
  }

  /// Receive every tree published from now on.
  pub fn subscribe(&self) -> watch::Receiver<Published> {
    self.published.subscribe()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get_person(&self, id: PersonId) -> Result<Option<Person>, S::Error> {
    self.store.get_person(id).await
  }

  pub async fn list_persons(&self) -> Result<Vec<Person>, S::Error> {
    self.store.list_persons().await
  }

  pub async fn list_relationships(&self) -> Result<Vec<Relationship>, S::Error> {
    self.store.list_relationships().await
  }

  pub async fn list_parent_child_links(&self) -> Result<Vec<ParentChild>, S::Error> {
    self.store.list_parent_child_links().await
  }

  // ── Mutations ─────────────────────────────────────────────────────────────
  //
  // Each persists first and rebuilds only on success. A failed write returns
  // its error and leaves the published tree as it was.

  pub async fn create_person(&self, input: NewPerson) -> Result<Person, S::Error> {
    let person = self.store.create_person(input).await?;
    self.refresh().await;
    Ok(person)
  }

  /// `Ok(None)` when the person does not exist; nothing is rebuilt.
  pub async fn update_person(
    &self,
    id: PersonId,
    input: NewPerson,
  ) -> Result<Option<Person>, S::Error> {
    let updated = self.store.update_person(id, input).await?;
    if updated.is_some() {
      self.refresh().await;
    }
    Ok(updated)
  }

  /// `Ok(false)` when the person does not exist; nothing is rebuilt.
  pub async fn delete_person(&self, id: PersonId) -> Result<bool, S::Error> {
    let deleted = self.store.delete_person(id).await?;
    if deleted {
      self.refresh().await;
    }
    Ok(deleted)
  }

  pub async fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> Result<Relationship, S::Error> {
    let relationship = self.store.create_relationship(input).await?;
    self.refresh().await;
    Ok(relationship)
  }

  pub async fn create_parent_child(
    &self,
    input: NewParentChild,
  ) -> Result<ParentChild, S::Error> {
    let link = self.store.create_parent_child(input).await?;
    self.refresh().await;
    Ok(link)
  }
}

fn logged<T, E: std::error::Error>(
  collection: &'static str,
  fetched: Result<Vec<T>, E>,
) -> Option<Vec<T>> {
  match fetched {
    Ok(rows) => Some(rows),
    Err(e) => {
      warn!(collection, error = %e, "fetch failed");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use lineage_core::{model::RelationshipKind, store::StoreError};

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("backend unavailable: {0}")]
  struct Unavailable(&'static str);

  impl StoreError for Unavailable {}

  /// In-memory store whose reads and writes can be made to fail.
  #[derive(Default)]
  struct FlakyStore {
    data:               Mutex<RawData>,
    fail_persons:       bool,
    fail_relationships: bool,
    fail_links:         bool,
    fail_writes:        bool,
  }

  impl FlakyStore {
    fn with(data: RawData) -> Self {
      Self { data: Mutex::new(data), ..Self::default() }
    }

    fn write<T>(
      &self,
      op: impl FnOnce(&mut RawData) -> T,
    ) -> Result<T, Unavailable> {
      if self.fail_writes {
        return Err(Unavailable("write"));
      }
      Ok(op(&mut self.data.lock().unwrap()))
    }
  }

  impl FamilyStore for FlakyStore {
    type Error = Unavailable;

    async fn list_persons(&self) -> Result<Vec<Person>, Unavailable> {
      if self.fail_persons {
        return Err(Unavailable("persons"));
      }
      Ok(self.data.lock().unwrap().persons.clone())
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, Unavailable> {
      if self.fail_relationships {
        return Err(Unavailable("relationships"));
      }
      Ok(self.data.lock().unwrap().relationships.clone())
    }

    async fn list_parent_child_links(&self) -> Result<Vec<ParentChild>, Unavailable> {
      if self.fail_links {
        return Err(Unavailable("links"));
      }
      Ok(self.data.lock().unwrap().links.clone())
    }

    async fn get_person(&self, id: PersonId) -> Result<Option<Person>, Unavailable> {
      Ok(self.data.lock().unwrap().persons.iter().find(|p| p.id == id).cloned())
    }

    async fn create_person(&self, input: NewPerson) -> Result<Person, Unavailable> {
      self.write(|data| {
        let id = data.persons.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let person = Person {
          gender: input.gender,
          date_of_birth: input.date_of_birth,
          date_of_death: input.date_of_death,
          notes: input.notes,
          photo_url: input.photo_url,
          ..Person::new(id, input.first_name, input.last_name)
        };
        data.persons.push(person.clone());
        person
      })
    }

    async fn update_person(
      &self,
      id: PersonId,
      input: NewPerson,
    ) -> Result<Option<Person>, Unavailable> {
      self.write(|data| {
        let person = data.persons.iter_mut().find(|p| p.id == id)?;
        person.first_name = input.first_name;
        person.last_name = input.last_name;
        Some(person.clone())
      })
    }

    async fn delete_person(&self, id: PersonId) -> Result<bool, Unavailable> {
      self.write(|data| {
        let before = data.persons.len();
        data.persons.retain(|p| p.id != id);
        data.persons.len() != before
      })
    }

    async fn create_relationship(
      &self,
      input: NewRelationship,
    ) -> Result<Relationship, Unavailable> {
      self.write(|data| {
        let rel = Relationship::new(
          data.relationships.len() as i64 + 1,
          input.person1_id,
          input.person2_id,
          input.kind,
        );
        data.relationships.push(rel.clone());
        rel
      })
    }

    async fn create_parent_child(
      &self,
      input: NewParentChild,
    ) -> Result<ParentChild, Unavailable> {
      self.write(|data| {
        let link = ParentChild::new(
          data.links.len() as i64 + 1,
          input.parent_id,
          input.child_id,
        );
        data.links.push(link.clone());
        link
      })
    }
  }

  fn family() -> RawData {
    RawData {
      persons:       vec![
        Person::new(1, "George", "Johnson"),
        Person::new(2, "Margaret", "Johnson"),
        Person::new(3, "Robert", "Johnson"),
      ],
      relationships: vec![Relationship::new(1, 1, 2, RelationshipKind::Married)],
      links:         vec![ParentChild::new(1, 1, 3), ParentChild::new(2, 2, 3)],
    }
  }

  #[tokio::test]
  async fn nothing_is_published_before_the_first_build() {
    let trees = TreeStore::new(FlakyStore::with(family()), RawData::default());
    assert!(trees.current().is_none());

    let tree = trees.tree().await;
    assert_eq!(tree.members.len(), 3);
    assert_eq!(trees.current().unwrap(), tree);
  }

  #[tokio::test]
  async fn failed_relationship_fetch_still_builds() {
    let store = FlakyStore { fail_relationships: true, ..FlakyStore::with(family()) };
    let trees = TreeStore::new(store, RawData::default());

    let tree = trees.refresh().await;
    assert_eq!(tree.members.len(), 3);
    assert!(tree.members.iter().all(|m| m.spouse_id.is_none()));
    assert_eq!(tree.member(3).unwrap().generation, 1);
  }

  #[tokio::test]
  async fn failed_fetches_take_the_fallback_dataset() {
    let store = FlakyStore {
      fail_persons: true,
      fail_relationships: true,
      fail_links: true,
      ..FlakyStore::default()
    };
    let trees = TreeStore::new(store, RawData::sample());

    let tree = trees.refresh().await;
    assert_eq!(tree.members.len(), 12);
    assert_eq!(tree.root_member.as_ref().map(|m| m.id()), Some(1));
  }

  #[tokio::test]
  async fn everything_failing_with_empty_fallback_gives_empty_tree() {
    let store = FlakyStore {
      fail_persons: true,
      fail_relationships: true,
      fail_links: true,
      ..FlakyStore::with(family())
    };
    let trees = TreeStore::new(store, RawData::default());

    let tree = trees.refresh().await;
    assert!(tree.root_member.is_none());
    assert!(tree.members.is_empty());
  }

  #[tokio::test]
  async fn failed_person_fetch_with_empty_fallback_keeps_no_members() {
    let store = FlakyStore { fail_persons: true, ..FlakyStore::with(family()) };
    let trees = TreeStore::new(store, RawData::default());

    let tree = trees.refresh().await;
    assert!(tree.root_member.is_none());
    assert!(tree.members.is_empty());
  }

  #[tokio::test]
  async fn partial_failure_never_mixes_fallback_with_live_rows() {
    // Live ids overlap the sample's: Alice(1) -> Bob(2), a link 12 -> 1 and a
    // marriage 1-12 that would attach to the sample's Olivia if mixed.
    let live = RawData {
      persons:       vec![Person::new(1, "Alice", "Smith"), Person::new(2, "Bob", "Smith")],
      relationships: vec![Relationship::new(1, 1, 12, RelationshipKind::Married)],
      links:         vec![ParentChild::new(1, 1, 2), ParentChild::new(2, 12, 1)],
    };
    let store = FlakyStore { fail_persons: true, ..FlakyStore::with(live) };
    let trees = TreeStore::new(store, RawData::sample());

    let tree = trees.refresh().await;
    assert_eq!(*tree, RawData::sample().build());

    let george = tree.member(1).unwrap();
    assert_eq!(george.generation, 0);
    assert_eq!(george.parents, Vec::<PersonId>::new());
    assert_eq!(george.spouse_id, Some(2));
    assert_eq!(tree.root_member.as_ref().map(|m| m.id()), Some(1));
  }

  #[tokio::test]
  async fn mutations_rebuild_and_publish() {
    let trees = TreeStore::new(FlakyStore::with(family()), RawData::default());
    let mut updates = trees.subscribe();
    trees.refresh().await;

    let david = trees.create_person(NewPerson::new("David", "Johnson")).await.unwrap();
    assert!(trees.current().unwrap().member(david.id).is_some());

    trees
      .create_parent_child(NewParentChild {
        parent_id: 3,
        child_id:  david.id,
        kind:      Default::default(),
      })
      .await
      .unwrap();
    let tree = trees.current().unwrap();
    assert_eq!(tree.member(david.id).unwrap().generation, 2);

    trees
      .create_relationship(NewRelationship {
        person1_id: 3,
        person2_id: david.id,
        kind:       RelationshipKind::Partnered,
        start_year: None,
        end_year:   None,
      })
      .await
      .unwrap();
    assert_eq!(trees.current().unwrap().member(3).unwrap().spouse_id, Some(david.id));

    assert!(updates.has_changed().unwrap());
    let seen = updates.borrow_and_update().clone().unwrap();
    assert_eq!(seen, trees.current().unwrap());
  }

  #[tokio::test]
  async fn update_and_delete_of_missing_person_do_not_rebuild() {
    let trees = TreeStore::new(FlakyStore::with(family()), RawData::default());

    assert!(trees.update_person(42, NewPerson::new("No", "One")).await.unwrap().is_none());
    assert!(!trees.delete_person(42).await.unwrap());
    assert!(trees.current().is_none());
  }

  #[tokio::test]
  async fn delete_rebuilds_without_the_person_or_their_edges() {
    let trees = TreeStore::new(FlakyStore::with(family()), RawData::default());
    assert!(trees.delete_person(1).await.unwrap());

    let tree = trees.current().unwrap();
    assert!(tree.member(1).is_none());
    assert_eq!(tree.member(3).unwrap().parents, vec![2]);
    assert_eq!(tree.member(2).unwrap().spouse_id, None);
  }

  #[tokio::test]
  async fn failed_write_leaves_the_published_tree_untouched() {
    let store = FlakyStore { fail_writes: true, ..FlakyStore::with(family()) };
    let trees = TreeStore::new(store, RawData::default());
    let before = trees.refresh().await;

    let err = trees.create_person(NewPerson::new("Ghost", "Writer")).await.unwrap_err();
    assert_eq!(err.to_string(), "backend unavailable: write");
    assert!(Arc::ptr_eq(&trees.current().unwrap(), &before));

    assert!(trees.delete_person(1).await.is_err());
    assert!(Arc::ptr_eq(&trees.current().unwrap(), &before));
  }
}
