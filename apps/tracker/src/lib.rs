//! Resume intake job tracker.
//!
//! Two halves: `jobs` watches a document-processing job on the backend until it
//! completes or fails, and `normalizer` turns its loosely shaped result into a
//! stable set of display sections.

pub mod config;
pub mod errors;
pub mod jobs;
pub mod normalizer;

pub use errors::FetchError;
pub use jobs::{JobPhase, JobRecord, JobStatus, JobsClient, PollHandle, Poller, ResultDocument};
pub use normalizer::{build_view_model, ViewModel};
