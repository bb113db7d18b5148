//! JSON REST API for the subscription records service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`subs_core::service::SubscriptionService`]. Every response body is a
//! `{"data": ...}` envelope; every failure is a `400`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = subs_api::api_router(Arc::new(Subscriptions::new(store)));
//! ```

pub mod envelope;
pub mod error;
pub mod subscriptions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use subs_core::service::SubscriptionService;

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<S>) -> Router<()>
where
  S: SubscriptionService + 'static,
{
  Router::new()
    .route("/", get(subscriptions::hello))
    .route("/add_sub", post(subscriptions::add::<S>))
    .route("/get_sub_by_id/{id}", get(subscriptions::get_by_id::<S>))
    .route("/get_list", get(subscriptions::list::<S>))
    .route("/get_list_by_user/", get(subscriptions::list_by_empty_user::<S>))
    .route("/get_list_by_user/{uuid}", get(subscriptions::list_by_user::<S>))
    .route("/get_price_subs", get(subscriptions::price::<S>))
    .route("/update_sub", patch(subscriptions::update::<S>))
    .route("/delete_sub/{id}", delete(subscriptions::delete::<S>))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use subs_core::{
    Error, Result,
    input::{AddSubscription, PriceQuery, UpdateSubscription},
    service::Subscriptions,
    subscription::{PriceTotal, Subscription},
  };
  use subs_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(Subscriptions::new(store)))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  fn new_sub(service: &str, price: i64, user: &str, start: &str, month: i32) -> Value {
    json!({
      "service_name": service,
      "price": price,
      "user_id": user,
      "start_date": start,
      "month": month
    })
  }

  // ── Hello ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_says_hello() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": "Hello, World!" }));
  }

  // ── Create / read ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_then_get_by_id() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/add_sub", Some(new_sub("X", 100, "u1", "01-2023", 3))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": "OK" }));

    let (status, body) = send(&app, "GET", "/get_sub_by_id/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!({ "data": {
        "id": 1,
        "service_name": "X",
        "price": 100,
        "user_id": "u1",
        "start_date": "2023-01-01",
        "end_date": "2023-04-01"
      }})
    );
  }

  #[tokio::test]
  async fn add_with_bad_date_is_400() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/add_sub", Some(new_sub("X", 1, "u1", "13-2022", 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].as_str().unwrap().contains("invalid date"), "{body}");
  }

  #[tokio::test]
  async fn add_with_malformed_json_is_400_envelope() {
    let app = app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/add_sub")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["data"].is_string());
  }

  #[tokio::test]
  async fn get_by_id_non_integer_is_400() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/get_sub_by_id/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_string());
  }

  #[tokio::test]
  async fn get_by_id_missing_is_flattened_to_400() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/get_sub_by_id/5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "sub with id 5 not found" }));

    let (status, _) = send(&app, "GET", "/get_sub_by_id/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn list_and_list_by_user() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/get_list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [] }));

    send(&app, "POST", "/add_sub", Some(new_sub("A", 1, "u1", "01-2023", 1))).await;
    send(&app, "POST", "/add_sub", Some(new_sub("B", 2, "u2", "01-2023", 1))).await;
    send(&app, "POST", "/add_sub", Some(new_sub("C", 3, "u1", "01-2023", 1))).await;

    let (_, body) = send(&app, "GET", "/get_list", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/get_list_by_user/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["data"]
      .as_array()
      .unwrap()
      .iter()
      .map(|s| s["service_name"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(names, ["A", "C"]);
  }

  #[tokio::test]
  async fn list_by_user_with_empty_segment_is_400() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/get_list_by_user/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "invalid argument: invalid user ID: empty" }));
  }

  // ── Price ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn price_sums_and_defaults_to_zero() {
    let app = app().await;
    send(&app, "POST", "/add_sub", Some(new_sub("N", 100, "u1", "01-2023", 1))).await;
    send(&app, "POST", "/add_sub", Some(new_sub("N", 200, "u1", "03-2023", 1))).await;

    let (status, body) = send(
      &app,
      "GET",
      "/get_price_subs?serv=N&uuid=u1&sdate=01-2023&edate=06-2023",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "price": 300 } }));

    let (_, body) = send(
      &app,
      "GET",
      "/get_price_subs?serv=N&uuid=u2&sdate=01-2023&edate=06-2023",
      None,
    )
    .await;
    assert_eq!(body, json!({ "data": { "price": 0 } }));
  }

  #[tokio::test]
  async fn price_requires_every_parameter() {
    let app = app().await;
    let (status, body) =
      send(&app, "GET", "/get_price_subs?serv=N&uuid=u1&sdate=01-2023", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "missing required field: edate" }));
  }

  // ── Update / delete ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_price_only() {
    let app = app().await;
    send(&app, "POST", "/add_sub", Some(new_sub("X", 100, "u1", "01-2023", 3))).await;

    let (status, body) =
      send(&app, "PATCH", "/update_sub", Some(json!({ "id": 1, "price": 150 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": "OK" }));

    let (_, body) = send(&app, "GET", "/get_sub_by_id/1", None).await;
    assert_eq!(body["data"]["price"], 150);
    assert_eq!(body["data"]["service_name"], "X");
    assert_eq!(body["data"]["end_date"], "2023-04-01");
  }

  #[tokio::test]
  async fn patch_with_nothing_to_set_is_400() {
    let app = app().await;
    send(&app, "POST", "/add_sub", Some(new_sub("X", 100, "u1", "01-2023", 3))).await;

    let (status, body) = send(&app, "PATCH", "/update_sub", Some(json!({ "id": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "no fields to update for sub with id 1" }));
  }

  #[tokio::test]
  async fn delete_then_get_is_400() {
    let app = app().await;
    send(&app, "POST", "/add_sub", Some(new_sub("X", 100, "u1", "01-2023", 3))).await;

    let (status, body) = send(&app, "DELETE", "/delete_sub/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": "OK" }));

    let (status, _) = send(&app, "GET", "/get_sub_by_id/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "DELETE", "/delete_sub/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "sub with id 1 not found" }));
  }

  // ── Backend failures ────────────────────────────────────────────────────────

  /// A service whose backend is always gone.
  struct Unavailable;

  impl SubscriptionService for Unavailable {
    async fn add(&self, _input: AddSubscription) -> Result<()> { Err(Error::Cancelled) }

    async fn get(&self, _id: i64) -> Result<Subscription> {
      Err(Error::Persistence("connection refused".into()))
    }

    async fn list(&self) -> Result<Vec<Subscription>> {
      Err(Error::Persistence("connection refused".into()))
    }

    async fn list_by_user(&self, _user_id: String) -> Result<Vec<Subscription>> {
      Err(Error::Persistence("connection refused".into()))
    }

    async fn price_by_filter(&self, _query: PriceQuery) -> Result<PriceTotal> {
      Err(Error::Persistence("connection refused".into()))
    }

    async fn update(&self, _input: UpdateSubscription) -> Result<()> {
      Err(Error::Cancelled)
    }

    async fn delete(&self, _id: i64) -> Result<()> { Err(Error::Cancelled) }
  }

  #[tokio::test]
  async fn backend_failures_are_400_with_message() {
    let app = api_router(Arc::new(Unavailable));

    let (status, body) = send(&app, "GET", "/get_list", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "persistence error: connection refused" }));

    let (status, body) = send(&app, "DELETE", "/delete_sub/3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "data": "operation cancelled" }));
  }
}
