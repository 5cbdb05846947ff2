//! Handlers for `/relationships` and `/parent-child` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/relationships` | All partner edges |
//! | `POST` | `/relationships` | Body: [`NewRelationship`]; 201 |
//! | `GET`  | `/parent-child` | All parent-child edges |
//! | `POST` | `/parent-child` | Body: [`NewParentChild`]; 201 |
//!
//! Both endpoints reject edges whose persons do not exist with 404, and
//! rebuild the cached tree after a successful write. A person deleted between
//! the pre-check and the write is reported by the store and still gives 404.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use lineage_core::{
  model::{NewParentChild, NewRelationship, ParentChild, PersonId, Relationship},
  store::FamilyStore,
};

use crate::{error::ApiError, tree_store::TreeStore};

async fn require_persons<S>(
  trees: &TreeStore<S>,
  ids: [PersonId; 2],
) -> Result<(), ApiError>
where
  S: FamilyStore,
{
  for id in ids {
    trees
      .get_person(id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  }
  Ok(())
}

// ─── Relationships ────────────────────────────────────────────────────────────

/// `GET /relationships`
pub async fn list_relationships<S>(
  State(trees): State<Arc<TreeStore<S>>>,
) -> Result<Json<Vec<Relationship>>, ApiError>
where
  S: FamilyStore,
{
  let relationships = trees
    .list_relationships()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(relationships))
}

/// `POST /relationships`
pub async fn create_relationship<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Json(body): Json<NewRelationship>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  require_persons(&trees, [body.person1_id, body.person2_id]).await?;
  let relationship = trees
    .create_relationship(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(relationship)))
}

// ─── Parent-child ─────────────────────────────────────────────────────────────

/// `GET /parent-child`
pub async fn list_parent_child<S>(
  State(trees): State<Arc<TreeStore<S>>>,
) -> Result<Json<Vec<ParentChild>>, ApiError>
where
  S: FamilyStore,
{
  let links = trees
    .list_parent_child_links()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(links))
}

/// `POST /parent-child`
pub async fn create_parent_child<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Json(body): Json<NewParentChild>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  require_persons(&trees, [body.parent_id, body.child_id]).await?;
  let link = trees
    .create_parent_child(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(link)))
}
