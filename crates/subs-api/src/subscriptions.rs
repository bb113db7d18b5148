//! Handlers for the subscription endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/` | Liveness greeting |
//! | `POST`   | `/add_sub` | Body: [`AddSubscription`] |
//! | `GET`    | `/get_sub_by_id/{id}` | Single record |
//! | `GET`    | `/get_list` | Every record |
//! | `GET`    | `/get_list_by_user/{uuid}` | Records owned by one user |
//! | `GET`    | `/get_list_by_user/` | Always rejected: empty user ID |
//! | `GET`    | `/get_price_subs` | `?serv&uuid&sdate&edate`, all required |
//! | `PATCH`  | `/update_sub` | Body: [`UpdateSubscription`] |
//! | `DELETE` | `/delete_sub/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
};
use subs_core::{
  input::{AddSubscription, PriceQuery, UpdateSubscription},
  service::SubscriptionService,
  subscription::{PriceTotal, Subscription},
};

use crate::{
  envelope::{Envelope, ok},
  error::ApiError,
};

type Reply<T> = Result<Json<Envelope<T>>, ApiError>;

/// `GET /`
pub async fn hello() -> Json<Envelope<&'static str>> {
  Json(Envelope::new("Hello, World!"))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /add_sub`
pub async fn add<S>(
  State(service): State<Arc<S>>,
  body: Result<Json<AddSubscription>, JsonRejection>,
) -> Reply<&'static str>
where
  S: SubscriptionService,
{
  let Json(input) = body?;
  let service_name = input.service_name.clone();
  service.add(input).await?;
  tracing::info!(%service_name, "subscription added");
  Ok(Json(ok()))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /get_sub_by_id/{id}`
pub async fn get_by_id<S>(
  State(service): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Reply<Subscription>
where
  S: SubscriptionService,
{
  let Path(id) = id?;
  Ok(Json(Envelope::new(service.get(id).await?)))
}

/// `GET /get_list`
pub async fn list<S>(State(service): State<Arc<S>>) -> Reply<Vec<Subscription>>
where
  S: SubscriptionService,
{
  Ok(Json(Envelope::new(service.list().await?)))
}

/// `GET /get_list_by_user/{uuid}`
pub async fn list_by_user<S>(
  State(service): State<Arc<S>>,
  user_id: Result<Path<String>, PathRejection>,
) -> Reply<Vec<Subscription>>
where
  S: SubscriptionService,
{
  let Path(user_id) = user_id?;
  Ok(Json(Envelope::new(service.list_by_user(user_id).await?)))
}

/// `GET /get_list_by_user/`
pub async fn list_by_empty_user<S>(
  State(service): State<Arc<S>>,
) -> Reply<Vec<Subscription>>
where
  S: SubscriptionService,
{
  Ok(Json(Envelope::new(service.list_by_user(String::new()).await?)))
}

/// `GET /get_price_subs?serv=...&uuid=...&sdate=MM-YYYY&edate=MM-YYYY`
pub async fn price<S>(
  State(service): State<Arc<S>>,
  query: Result<Query<PriceQuery>, QueryRejection>,
) -> Reply<PriceTotal>
where
  S: SubscriptionService,
{
  let Query(query) = query?;
  Ok(Json(Envelope::new(service.price_by_filter(query).await?)))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `PATCH /update_sub`
pub async fn update<S>(
  State(service): State<Arc<S>>,
  body: Result<Json<UpdateSubscription>, JsonRejection>,
) -> Reply<&'static str>
where
  S: SubscriptionService,
{
  let Json(input) = body?;
  let id = input.id;
  service.update(input).await?;
  tracing::info!(id, "subscription updated");
  Ok(Json(ok()))
}

/// `DELETE /delete_sub/{id}`
pub async fn delete<S>(
  State(service): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Reply<&'static str>
where
  S: SubscriptionService,
{
  let Path(id) = id?;
  service.delete(id).await?;
  tracing::info!(id, "subscription deleted");
  Ok(Json(ok()))
}
