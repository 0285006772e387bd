// Core pipeline exports
pub mod aggregator;
pub mod dates;
pub mod flatten;
pub mod partition;
pub mod ranking;

pub use aggregator::{AggregateError, AggregateOutcome, Aggregator};
pub use dates::{parse_date, validate_range, ValidationError, DATE_FORMAT};
pub use flatten::flatten_pages;
pub use partition::{partition, Partition};
pub use ranking::{project, rank_by_miss_distance, DataShapeError, Ranking};
