//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use lineage_core::{
  build_tree,
  model::{
    Gender, NewParentChild, NewPerson, NewRelationship, ParentChildKind,
    RelationshipKind,
  },
  store::{FamilyStore, StoreError},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn margaret() -> NewPerson {
  NewPerson {
    gender: Some(Gender::Female),
    date_of_birth: NaiveDate::from_ymd_opt(1948, 7, 22),
    notes: Some("Grandmother".into()),
    ..NewPerson::new("Margaret", "Johnson")
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;

  let created = s.create_person(margaret()).await.unwrap();
  assert!(created.created_at.is_some());

  let fetched = s.get_person(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.first_name, "Margaret");
  assert_eq!(fetched.gender, Some(Gender::Female));
  assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1948, 7, 22));
  assert_eq!(fetched.notes.as_deref(), Some("Grandmother"));
  assert_eq!(fetched.date_of_death, None);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(12345).await.unwrap().is_none());
}

#[tokio::test]
async fn list_persons_in_id_order() {
  let s = store().await;
  let a = s.create_person(NewPerson::new("George", "Johnson")).await.unwrap();
  let b = s.create_person(NewPerson::new("Robert", "Johnson")).await.unwrap();
  let c = s.create_person(NewPerson::new("David", "Johnson")).await.unwrap();

  let ids: Vec<_> = s.list_persons().await.unwrap().iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn update_replaces_all_attributes() {
  let s = store().await;
  let created = s.create_person(margaret()).await.unwrap();

  let mut replacement = NewPerson::new("Margaret", "Smith");
  replacement.date_of_death = NaiveDate::from_ymd_opt(2020, 1, 1);

  let updated = s
    .update_person(created.id, replacement)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.id, created.id);
  assert_eq!(updated.last_name, "Smith");
  assert_eq!(updated.gender, None);
  assert_eq!(updated.notes, None);
  assert_eq!(updated.date_of_death, NaiveDate::from_ymd_opt(2020, 1, 1));
}

#[tokio::test]
async fn update_missing_person_returns_none() {
  let s = store().await;
  let result = s.update_person(99, NewPerson::new("No", "One")).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_person_reports_whether_it_existed() {
  let s = store().await;
  let p = s.create_person(margaret()).await.unwrap();

  assert!(s.delete_person(p.id).await.unwrap());
  assert!(!s.delete_person(p.id).await.unwrap());
  assert!(s.get_person(p.id).await.unwrap().is_none());
}

// ─── Edges ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_relationship_roundtrip() {
  let s = store().await;
  let a = s.create_person(NewPerson::new("George", "Johnson")).await.unwrap();
  let b = s.create_person(margaret()).await.unwrap();

  let rel = s
    .create_relationship(NewRelationship {
      person1_id: a.id,
      person2_id: b.id,
      kind:       RelationshipKind::Widowed,
      start_year: Some(1968),
      end_year:   Some(2019),
    })
    .await
    .unwrap();

  let listed = s.list_relationships().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, rel.id);
  assert_eq!(listed[0].kind, RelationshipKind::Widowed);
  assert_eq!(listed[0].start_year, Some(1968));
  assert_eq!(listed[0].end_year, Some(2019));
}

#[tokio::test]
async fn create_edge_with_unknown_person_errors() {
  let s = store().await;
  let a = s.create_person(NewPerson::new("George", "Johnson")).await.unwrap();

  let err = s
    .create_parent_child(NewParentChild {
      parent_id: a.id,
      child_id:  a.id + 100,
      kind:      ParentChildKind::Adoptive,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::PersonNotFound(id) if id == a.id + 100));

  let err = s
    .create_relationship(NewRelationship {
      person1_id: 500,
      person2_id: a.id,
      kind:       RelationshipKind::Married,
      start_year: None,
      end_year:   None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::PersonNotFound(500)));
  assert_eq!(err.missing_person(), Some(500));
  assert!(s.list_relationships().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_parent_leaves_a_stale_link_the_builder_drops() {
  let s = store().await;
  let parent = s.create_person(NewPerson::new("Robert", "Johnson")).await.unwrap();
  let child = s.create_person(NewPerson::new("David", "Johnson")).await.unwrap();
  let link = s
    .create_parent_child(NewParentChild {
      parent_id: parent.id,
      child_id:  child.id,
      kind:      ParentChildKind::Biological,
    })
    .await
    .unwrap();
  assert_eq!(link.kind, ParentChildKind::Biological);

  s.delete_person(parent.id).await.unwrap();

  let links = s.list_parent_child_links().await.unwrap();
  assert_eq!(links.len(), 1);

  let persons = s.list_persons().await.unwrap();
  let tree = build_tree(&persons, &s.list_relationships().await.unwrap(), &links);
  let david = tree.member(child.id).unwrap();
  assert!(david.parents.is_empty());
  assert_eq!(david.generation, 0);
}
