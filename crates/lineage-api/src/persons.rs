//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | All persons, id order |
//! | `POST`   | `/persons` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `PUT`    | `/persons/:id` | Body: [`NewPerson`]; replaces every attribute |
//! | `DELETE` | `/persons/:id` | 204; 404 if not found |
//!
//! Successful writes rebuild the cached tree before responding.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lineage_core::{
  model::{NewPerson, Person, PersonId},
  store::FamilyStore,
};

use crate::{error::ApiError, tree_store::TreeStore};

/// First and last name are the only required attributes.
fn validate(input: &NewPerson) -> Result<(), ApiError> {
  if input.first_name.trim().is_empty() {
    return Err(ApiError::BadRequest("first_name is required".into()));
  }
  if input.last_name.trim().is_empty() {
    return Err(ApiError::BadRequest("last_name is required".into()));
  }
  Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S>(
  State(trees): State<Arc<TreeStore<S>>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: FamilyStore,
{
  let persons = trees
    .list_persons()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(persons))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  validate(&body)?;
  let person = trees
    .create_person(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: FamilyStore,
{
  let person = trees
    .get_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/:id`
pub async fn update<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Path(id): Path<PersonId>,
  Json(body): Json<NewPerson>,
) -> Result<Json<Person>, ApiError>
where
  S: FamilyStore,
{
  validate(&body)?;
  let person = trees
    .update_person(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id`
pub async fn delete<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Path(id): Path<PersonId>,
) -> Result<StatusCode, ApiError>
where
  S: FamilyStore,
{
  let deleted = trees
    .delete_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("person {id} not found")))
  }
}
