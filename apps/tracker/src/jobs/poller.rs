//! Job poller — watches one job per subscription until it reaches a terminal state.
//!
//! Each subscription is a spawned task that fetches the status immediately, then
//! re-fetches on a fixed interval while the job is `pending` or `processing`.
//! `completed` triggers exactly one successful result fetch, `failed` stops.
//! Fetch errors are recorded on the handle and retried on the next tick.
//!
//! Every fetch is issued with a sequence number. A response is applied only if
//! its number is still the latest issued and the subscription is still open; the
//! check and the write happen under the watch channel's lock, so `unsubscribe`
//! can never be overtaken by a response that was already in flight.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::FetchError;
use crate::jobs::client::JobSource;
use crate::jobs::models::{JobPhase, JobRecord, JobStatus, ResultDocument};

/// Why a subscription stopped fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `failed` was observed, or the result of a `completed` job was stored.
    Terminal,
    Unsubscribed,
}

/// Everything a handle has observed so far.
#[derive(Debug, Clone, Default)]
pub struct PollSnapshot {
    pub job: Option<JobRecord>,
    pub result: Option<Arc<ResultDocument>>,
    /// Last fetch error; cleared by the next successful fetch.
    pub error: Option<FetchError>,
    /// Sequence number of the last applied response.
    pub last_seq: u64,
    pub status_fetches: u32,
    pub result_fetches: u32,
    pub closed: Option<CloseReason>,
}

impl PollSnapshot {
    pub fn phase(&self) -> JobPhase<'_> {
        let Some(job) = &self.job else {
            return JobPhase::Unknown;
        };
        match job.status {
            JobStatus::Pending => JobPhase::Pending,
            JobStatus::Processing => JobPhase::Processing,
            JobStatus::Completed => JobPhase::Completed {
                result: self.result.as_deref(),
            },
            JobStatus::Failed => JobPhase::Failed {
                error: job.error.as_deref(),
            },
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Status,
    Result,
}

/// What happened to a response handed to the subscription.
#[derive(Debug, PartialEq)]
enum Outcome<T> {
    Applied(T),
    Errored(FetchError),
    /// Cancelled, superseded by a newer fetch, or older than what is already applied.
    Discarded,
}

struct Subscription {
    job_id: String,
    issued: AtomicU64,
    state: watch::Sender<PollSnapshot>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Subscription {
    fn new(job_id: String) -> Arc<Self> {
        let (state, _) = watch::channel(PollSnapshot::default());
        Arc::new(Self {
            job_id,
            issued: AtomicU64::new(0),
            state,
            task: Mutex::new(None),
        })
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().is_closed()
    }

    /// Hands out the next sequence number; it becomes the only one whose response applies.
    fn issue(&self, kind: FetchKind) -> u64 {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|snap| match kind {
            FetchKind::Status => snap.status_fetches += 1,
            FetchKind::Result => snap.result_fetches += 1,
        });
        seq
    }

    fn accepts(&self, snap: &PollSnapshot, seq: u64) -> bool {
        snap.closed.is_none() && seq == self.issued.load(Ordering::SeqCst) && seq > snap.last_seq
    }

    fn apply_status(&self, seq: u64, fetched: Result<JobRecord, FetchError>) -> Outcome<JobStatus> {
        let mut outcome = Outcome::Discarded;
        self.state.send_if_modified(|snap| {
            if !self.accepts(snap, seq) {
                return false;
            }
            snap.last_seq = seq;
            match fetched {
                Ok(record) => {
                    let status = record.status;
                    snap.job = Some(record);
                    snap.error = None;
                    if status == JobStatus::Failed {
                        snap.closed = Some(CloseReason::Terminal);
                    }
                    outcome = Outcome::Applied(status);
                }
                Err(e) => {
                    snap.error = Some(e.clone());
                    outcome = Outcome::Errored(e);
                }
            }
            true
        });
        outcome
    }

    fn apply_result(&self, seq: u64, fetched: Result<ResultDocument, FetchError>) -> Outcome<()> {
        let mut outcome = Outcome::Discarded;
        self.state.send_if_modified(|snap| {
            if !self.accepts(snap, seq) {
                return false;
            }
            snap.last_seq = seq;
            match fetched {
                Ok(document) => {
                    snap.result = Some(Arc::new(document));
                    snap.error = None;
                    snap.closed = Some(CloseReason::Terminal);
                    outcome = Outcome::Applied(());
                }
                Err(e) => {
                    snap.error = Some(e.clone());
                    outcome = Outcome::Errored(e);
                }
            }
            true
        });
        outcome
    }

    fn attach(&self, task: JoinHandle<()>) {
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
    }

    /// Marks the subscription unsubscribed and aborts its task.
    fn cancel(&self) {
        self.state.send_if_modified(|snap| {
            if snap.closed.is_some() {
                return false;
            }
            snap.closed = Some(CloseReason::Unsubscribed);
            true
        });
        if let Some(task) = self.task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            task.abort();
        }
    }
}

/// Caller-side view of one subscription. Cheap to clone; all clones observe the same state.
#[derive(Clone)]
pub struct PollHandle {
    inner: Arc<Subscription>,
}

impl PollHandle {
    pub fn job_id(&self) -> &str {
        &self.inner.job_id
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Most recently applied job record, `None` until the first status fetch succeeds.
    pub fn job(&self) -> Option<JobRecord> {
        self.inner.state.borrow().job.clone()
    }

    pub fn result(&self) -> Option<Arc<ResultDocument>> {
        self.inner.state.borrow().result.clone()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.inner.state.borrow().error.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Receiver notified on every applied response and every issued fetch.
    pub fn changes(&self) -> watch::Receiver<PollSnapshot> {
        self.inner.state.subscribe()
    }

    /// Waits until the subscription closes, terminally or by unsubscribe.
    pub async fn settled(&self) -> PollSnapshot {
        let mut rx = self.inner.state.subscribe();
        let settled = match rx.wait_for(PollSnapshot::is_closed).await {
            Ok(snap) => (*snap).clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    pub fn same_subscription(&self, other: &PollHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollHandle")
            .field("job_id", &self.inner.job_id)
            .field("closed", &self.inner.state.borrow().closed)
            .finish()
    }
}

/// Owns the subscriptions for a set of job ids, at most one open subscription per id.
///
/// `subscribe` spawns onto the current tokio runtime and must be called from within one.
pub struct Poller<S: ?Sized> {
    source: Arc<S>,
    interval: Duration,
    subscriptions: Mutex<HashMap<String, PollHandle>>,
}

impl<S: JobSource + 'static> Poller<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self::from_shared(Arc::new(source), interval)
    }
}

impl<S: JobSource + ?Sized + 'static> Poller<S> {
    pub fn from_shared(source: Arc<S>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts watching `job_id`, or returns the open handle already watching it.
    pub fn subscribe(&self, job_id: impl Into<String>) -> PollHandle {
        let job_id = job_id.into();
        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = subscriptions.get(&job_id) {
            if !existing.is_closed() {
                debug!(job_id = %job_id, "attaching to open subscription");
                return existing.clone();
            }
            existing.inner.cancel();
        }

        let subscription = Subscription::new(job_id.clone());
        let task = tokio::spawn(run(
            Arc::clone(&self.source),
            Arc::clone(&subscription),
            self.interval,
        ));
        subscription.attach(task);

        info!(
            job_id = %job_id,
            interval_ms = self.interval.as_millis() as u64,
            "subscribed to job"
        );
        let handle = PollHandle {
            inner: subscription,
        };
        subscriptions.insert(job_id, handle.clone());
        handle
    }

    /// Stops all activity for `handle`. A response still in flight is discarded.
    pub fn unsubscribe(&self, handle: &PollHandle) {
        handle.inner.cancel();

        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if subscriptions
            .get(handle.job_id())
            .map(|current| current.same_subscription(handle))
            .unwrap_or(false)
        {
            subscriptions.remove(handle.job_id());
        }
        info!(job_id = %handle.job_id(), "unsubscribed from job");
    }

    /// Number of subscriptions still fetching.
    pub fn active_count(&self) -> usize {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|h| !h.is_closed())
            .count()
    }
}

impl<S: ?Sized> Drop for Poller<S> {
    fn drop(&mut self) {
        let subscriptions = self
            .subscriptions
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for handle in subscriptions.values() {
            handle.inner.cancel();
        }
    }
}

async fn run<S: JobSource + ?Sized>(source: Arc<S>, sub: Arc<Subscription>, interval: Duration) {
    loop {
        if sub.is_closed() {
            return;
        }

        let seq = sub.issue(FetchKind::Status);
        let fetched = source.fetch_status(&sub.job_id).await;

        match sub.apply_status(seq, fetched) {
            Outcome::Applied(JobStatus::Pending | JobStatus::Processing) => {
                debug!(job_id = %sub.job_id, seq, "job still running");
            }
            Outcome::Applied(JobStatus::Completed) => {
                info!(job_id = %sub.job_id, seq, "job completed; fetching result");
                fetch_result(source.as_ref(), &sub, interval).await;
                return;
            }
            Outcome::Applied(JobStatus::Failed) => {
                info!(job_id = %sub.job_id, seq, "job failed; polling stopped");
                return;
            }
            Outcome::Errored(e) => {
                warn!(job_id = %sub.job_id, seq, error = %e, "status fetch failed; retrying next tick");
            }
            Outcome::Discarded => {
                debug!(job_id = %sub.job_id, seq, "status response discarded");
                return;
            }
        }

        tokio::time::sleep(interval).await;
    }
}

async fn fetch_result<S: JobSource + ?Sized>(source: &S, sub: &Subscription, interval: Duration) {
    loop {
        if sub.is_closed() {
            return;
        }

        let seq = sub.issue(FetchKind::Result);
        let fetched = source.fetch_result(&sub.job_id).await;

        match sub.apply_result(seq, fetched) {
            Outcome::Applied(()) => {
                info!(job_id = %sub.job_id, seq, "result stored");
                return;
            }
            Outcome::Errored(e) => {
                warn!(job_id = %sub.job_id, seq, error = %e, "result fetch failed; retrying next tick");
            }
            Outcome::Discarded => {
                debug!(job_id = %sub.job_id, seq, "result response discarded");
                return;
            }
        }

        tokio::time::sleep(interval).await;
    }
}
