//! File-parse job poller.
//!
//! DESIGN
//! ======
//! After an upload the backend parses the file in the background and
//! flips the file's `status_cd` from pending to done or failed. There is no
//! get-by-id endpoint, so each tick lists the whole business scope and
//! looks for the watched `file_id`.
//!
//! The poller is a state machine over [`PollPhase`]:
//!
//! ```text
//!   Idle --start--> Polling(id) --done--> Done
//!                     |   ^  |
//!                     |   +--+ pending / no match / query error
//!                     +--failed--> Failed
//!   Polling --stop--> Idle
//! ```
//!
//! One background task runs per `start`. It sleeps for the interval, runs
//! one query, applies the outcome, and only then sleeps again, so ticks
//! never overlap. Every `start`/`stop` bumps a generation counter and the
//! task applies an outcome only while its own generation is current. The
//! check happens under the watch channel's lock, so a response that lands
//! after `stop()` or after a newer `start()` is dropped.

#[cfg(test)]
#[path = "file_parse_test.rs"]
mod file_parse_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::api::files::{FileListQuery, FileRecord, JobStatus};
use crate::error::ApiError;

/// Reason reported when the backend marks a file as failed.
pub const PARSE_FAILED_MESSAGE: &str = "file parsing failed";

// =============================================================================
// JOB SOURCE
// =============================================================================

/// Where the poller reads job records from. Enables fakes in tests.
#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    /// Every job record currently visible in the poller's scope.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; the poller records it and retries next tick.
    async fn list_jobs(&self) -> Result<Vec<FileRecord>, ApiError>;
}

/// Lists the files of one business id through the quiet file-list call.
pub struct FileListSource {
    client: Arc<ApiClient>,
    busi_id: String,
}

impl FileListSource {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, busi_id: impl Into<String>) -> Self {
        Self { client, busi_id: busi_id.into() }
    }
}

#[async_trait::async_trait]
impl JobSource for FileListSource {
    async fn list_jobs(&self) -> Result<Vec<FileRecord>, ApiError> {
        let query = FileListQuery::all(self.busi_id.clone());
        let list = self.client.files().list_quiet(&query).await?;
        Ok(list.file_list)
    }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling(i64),
    /// `result` is `None` when the payload was missing or not valid JSON.
    Done { job_id: i64, result: Option<Value> },
    Failed { job_id: i64, reason: String },
}

impl PollPhase {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }

    #[must_use]
    pub fn job_id(&self) -> Option<i64> {
        match self {
            Self::Idle => None,
            Self::Polling(id) | Self::Done { job_id: id, .. } | Self::Failed { job_id: id, .. } => Some(*id),
        }
    }
}

/// Everything an observer of the poller can see.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PollSnapshot {
    pub phase: PollPhase,
    /// Last status observed for the job; `Pending` from `start` until the
    /// backend reports otherwise.
    pub status: JobStatus,
    /// Most recent query failure or the failure reason.
    pub last_error: Option<String>,
}

impl PollSnapshot {
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        match &self.phase {
            PollPhase::Done { result, .. } => result.as_ref(),
            _ => None,
        }
    }
}

/// What one tick did to the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    Unchanged,
    Updated,
    Finished,
}

/// Decode a done job's `title_data`: the `data` member when it is truthy,
/// otherwise the whole document. Invalid JSON and a bare `null` yield `None`.
#[must_use]
pub fn parse_result(title_data: Option<&str>) -> Option<Value> {
    let text = title_data?;
    let document = match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => return None,
        Ok(document) => document,
        Err(e) => {
            debug!(error = %e, "unparsable job payload");
            return None;
        }
    };
    match document.get("data") {
        Some(data) if is_truthy(data) => Some(data.clone()),
        _ => Some(document),
    }
}

/// `false`, `0`, `""` and `null` count as "no data member".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn apply_outcome(snapshot: &mut PollSnapshot, job_id: i64, outcome: Result<Vec<FileRecord>, ApiError>) -> Transition {
    let records = match outcome {
        Ok(records) => records,
        Err(e) => {
            warn!(job_id, error = %e, "job status query failed");
            snapshot.last_error = Some(e.to_string());
            return Transition::Updated;
        }
    };

    let Some(record) = records.into_iter().find(|r| r.file_id == job_id) else {
        return Transition::Unchanged;
    };

    let status = record.status();
    match status {
        JobStatus::Done => {
            let result = parse_result(record.title_data.as_deref());
            snapshot.status = status;
            snapshot.phase = PollPhase::Done { job_id, result };
            info!(job_id, "job finished");
            Transition::Finished
        }
        JobStatus::Failed => {
            snapshot.status = status;
            snapshot.last_error = Some(PARSE_FAILED_MESSAGE.to_owned());
            snapshot.phase = PollPhase::Failed { job_id, reason: PARSE_FAILED_MESSAGE.to_owned() };
            info!(job_id, "job failed");
            Transition::Finished
        }
        JobStatus::Pending | JobStatus::Unknown => {
            if snapshot.status == status {
                Transition::Unchanged
            } else {
                snapshot.status = status;
                Transition::Updated
            }
        }
    }
}

// =============================================================================
// POLLER
// =============================================================================

/// Watches one job at a time until it reaches a terminal status.
///
/// Must be started from inside a Tokio runtime. Dropping the poller stops it.
pub struct FileParsePoller {
    source: Arc<dyn JobSource>,
    interval: Duration,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<PollSnapshot>>,
    task: Option<JoinHandle<()>>,
}

impl FileParsePoller {
    #[must_use]
    pub fn new(source: Arc<dyn JobSource>, interval: Duration) -> Self {
        let (state, _) = watch::channel(PollSnapshot::default());
        Self { source, interval, generation: Arc::new(AtomicU64::new(0)), state: Arc::new(state), task: None }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PollSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        matches!(self.state.borrow().phase, PollPhase::Polling(_))
    }

    /// Begin watching `job_id`, cancelling any previous watch.
    ///
    /// Status reads `Pending` as soon as this returns; the first query runs
    /// one interval later.
    pub fn start(&mut self, job_id: i64) {
        self.cancel_task();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(PollSnapshot {
            phase: PollPhase::Polling(job_id),
            status: JobStatus::Pending,
            last_error: None,
        });
        debug!(job_id, generation, "job poll started");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let outcome = source.list_jobs().await;

                let mut transition = Transition::Unchanged;
                let mut stale = false;
                state.send_if_modified(|snapshot| {
                    if current.load(Ordering::SeqCst) != generation {
                        stale = true;
                        return false;
                    }
                    transition = apply_outcome(snapshot, job_id, outcome);
                    transition != Transition::Unchanged
                });

                if stale {
                    debug!(job_id, generation, "discarding stale job status");
                    return;
                }
                if transition == Transition::Finished {
                    return;
                }
            }
        }));
    }

    /// Stop watching. Safe to call at any time; a terminal snapshot is kept
    /// so its result stays readable.
    pub fn stop(&mut self) {
        self.cancel_task();
        self.state.send_if_modified(|snapshot| {
            if matches!(snapshot.phase, PollPhase::Polling(_)) {
                snapshot.phase = PollPhase::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Wait until the current watch leaves `Polling` and return the final
    /// snapshot. Returns immediately when nothing is being polled.
    pub async fn finished(&self) -> PollSnapshot {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|snapshot| !matches!(snapshot.phase, PollPhase::Polling(_))).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    fn cancel_task(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FileParsePoller {
    fn drop(&mut self) {
        self.cancel_task();
    }
}
