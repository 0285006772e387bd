// Service exports
pub mod neows;

pub use neows::{FeedSource, NeoWsClient, NeoWsError};
