// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CloseApproach, DataShapePolicy, DateRange, FeedPage, NearEarthObject, SpaceObject, SpanLimits};
pub use requests::SpaceObjectsQuery;
pub use responses::{
    ErrorResponse, HealthResponse, DROPPED_ENTRIES_HEADER, EFFECTIVE_END_DATE_HEADER, SPAN_TRUNCATED_HEADER,
};
