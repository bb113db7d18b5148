//! Core types and trait definitions for the subscription records service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the canonical records, the error taxonomy, the input normalizer that turns
//! loosely-typed web input into those records, and the two seams the other
//! crates plug into: [`store::SubscriptionStore`] and
//! [`service::SubscriptionService`].

pub mod error;
pub mod input;
pub mod normalize;
pub mod service;
pub mod store;
pub mod subscription;

pub use error::{Error, Result};
