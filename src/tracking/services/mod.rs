//! Application services for work-item tracking.

mod aggregator;
mod config;
mod error;
mod requests;
mod work_items;

pub use aggregator::TrackingAggregator;
pub use config::TrackingConfig;
pub use error::{Denial, ErrorKind, TrackingError, TrackingResult};
pub use requests::{CreateWorkItemRequest, UpdateWorkItemRequest};
pub use work_items::{AUDIT_TARGET, WorkItemListing, WorkItemService};
