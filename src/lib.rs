//! NeoWs Aggregator - sorted near-earth object feed over arbitrary date ranges
//!
//! NASA's NeoWs feed answers at most 7 days per query. This library splits a
//! longer range into feed-sized sub-ranges, fetches them concurrently, merges
//! every day's objects and ranks them by closest approach distance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{partition::partition, AggregateError, Aggregator, ValidationError};
pub use models::{DateRange, FeedPage, NearEarthObject, SpaceObject, SpaceObjectsQuery, SpanLimits};
pub use services::{FeedSource, NeoWsClient, NeoWsError};
