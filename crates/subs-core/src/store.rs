//! The `SubscriptionStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `subs-store-sqlite`).
//! The service layer depends on this abstraction, not on any concrete
//! backend, so a test double can stand in for the database.

use std::future::Future;

use crate::{
  Result,
  subscription::{
    NewSubscription, PriceFilter, PriceTotal, Subscription, SubscriptionPatch,
  },
};

/// Abstraction over the persistence backend for subscription records.
///
/// Every method issues at most one SQL statement, so each operation is atomic
/// on its own. Backend failures surface as [`crate::Error::Persistence`],
/// an elapsed deadline as [`crate::Error::Cancelled`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SubscriptionStore: Send + Sync {
  /// Persist a new record. The id is assigned by the backend.
  fn insert(
    &self,
    record: NewSubscription,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Fetch one record.
  ///
  /// Fails with `InvalidArgument` for `id <= 0` (without querying) and with
  /// `NotFound` when no row matches.
  fn find_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Subscription>> + Send + '_;

  /// Every record. An empty table is a successful empty list.
  fn find_all(&self) -> impl Future<Output = Result<Vec<Subscription>>> + Send + '_;

  /// Every record owned by `user_id`; an empty `user_id` is `InvalidArgument`.
  fn find_by_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Subscription>>> + Send + 'a;

  /// Sum of `price` over the records matching `filter`. No match sums to 0.
  fn sum_price<'a>(
    &'a self,
    filter: &'a PriceFilter,
  ) -> impl Future<Output = Result<PriceTotal>> + Send + 'a;

  /// Write only the columns present in `patch`.
  ///
  /// Fails with `NoFields` (and writes nothing) if the patch is empty, and
  /// with `NotFound` if no row has `patch.id`.
  fn update_by_id(
    &self,
    patch: SubscriptionPatch,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Permanently remove a record; `NotFound` if nothing was deleted.
  fn delete_by_id(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;
}
