// Job tracking: wire models, the backend client and the status poller.

pub mod client;
pub mod models;
pub mod poller;

pub use client::{JobSource, JobsClient};
pub use models::{JobPhase, JobRecord, JobStatus, ResultDocument, UploadReceipt};
pub use poller::{CloseReason, PollHandle, PollSnapshot, Poller};
