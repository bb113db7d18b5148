//! The `SubscriptionService` trait and its default implementation.
//!
//! The service is what the HTTP dispatcher talks to: it accepts raw web input,
//! runs the matching normalizer and hands the canonical record to a
//! [`SubscriptionStore`].

use std::future::Future;

use crate::{
  Result,
  input::{AddSubscription, PriceQuery, UpdateSubscription},
  normalize::{normalize_create, normalize_filter, normalize_update},
  store::SubscriptionStore,
  subscription::{PriceTotal, Subscription},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The capability set exposed to the request dispatcher.
pub trait SubscriptionService: Send + Sync {
  fn add(
    &self,
    input: AddSubscription,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  fn get(&self, id: i64) -> impl Future<Output = Result<Subscription>> + Send + '_;

  fn list(&self) -> impl Future<Output = Result<Vec<Subscription>>> + Send + '_;

  fn list_by_user(
    &self,
    user_id: String,
  ) -> impl Future<Output = Result<Vec<Subscription>>> + Send + '_;

  fn price_by_filter(
    &self,
    query: PriceQuery,
  ) -> impl Future<Output = Result<PriceTotal>> + Send + '_;

  fn update(
    &self,
    input: UpdateSubscription,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── Default implementation ──────────────────────────────────────────────────

/// Normalizer + store, composed.
#[derive(Debug, Clone)]
pub struct Subscriptions<S> {
  store: S,
}

impl<S: SubscriptionStore> Subscriptions<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }
}

impl<S: SubscriptionStore> SubscriptionService for Subscriptions<S> {
  async fn add(&self, input: AddSubscription) -> Result<()> {
    let record = normalize_create(input)?;
    self.store.insert(record).await
  }

  async fn get(&self, id: i64) -> Result<Subscription> {
    self.store.find_by_id(id).await
  }

  async fn list(&self) -> Result<Vec<Subscription>> { self.store.find_all().await }

  async fn list_by_user(&self, user_id: String) -> Result<Vec<Subscription>> {
    self.store.find_by_user(&user_id).await
  }

  async fn price_by_filter(&self, query: PriceQuery) -> Result<PriceTotal> {
    let filter = normalize_filter(query)?;
    self.store.sum_price(&filter).await
  }

  async fn update(&self, input: UpdateSubscription) -> Result<()> {
    let patch = normalize_update(input)?;
    self.store.update_by_id(patch).await
  }

  async fn delete(&self, id: i64) -> Result<()> {
    self.store.delete_by_id(id).await
  }
}
