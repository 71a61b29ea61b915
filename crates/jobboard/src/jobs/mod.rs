pub mod listing;
pub mod model;

pub use listing::{collect_jobs, summarize, ListingContext, MAX_FAILED_JOBS};
pub use model::{JobStatus, JobSummary, RawJob};
