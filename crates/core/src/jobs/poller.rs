//! Job state machine: `SUBMITTED → POLLING → {COMPLETED | TIMED_OUT}`
//!
//! A `failed` status from the service stops polling and surfaces as
//! [`ProbeError::RemoteJobFailure`]; running out of attempts is not an error
//! and returns whatever rows arrived, tagged [`JobCompletion::TimedOut`].

use std::sync::Arc;
use std::time::Duration;

use agentprobe_domain::{
    AccessToken, JobCompletion, JobHandle, JobOutcome, JobStatus, PollingConfig, ProbeError,
    Result, SqlJobRequest,
};
use tracing::{debug, info, warn};

use super::accumulator::Accumulator;
use crate::ports::SqlJobService;

/// Progress reported after every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProgress {
    /// 1-based poll number.
    pub attempt: u32,
    /// Status the poll reported.
    pub status: JobStatus,
    /// Rows gathered across all polls so far.
    pub rows_total: usize,
}

/// Callback invoked with the progress of each poll.
pub type PollObserver = Arc<dyn Fn(&PollProgress) + Send + Sync>;

/// Runs one SQL job at a time against a [`SqlJobService`].
#[derive(Clone)]
pub struct JobPoller {
    service: Arc<dyn SqlJobService>,
    max_attempts: u32,
    interval: Duration,
    observer: Option<PollObserver>,
}

impl JobPoller {
    /// `max_attempts` below 1 is raised to 1.
    pub fn new(service: Arc<dyn SqlJobService>, max_attempts: u32, interval: Duration) -> Self {
        Self { service, max_attempts: max_attempts.max(1), interval, observer: None }
    }

    /// Poller using the attempt ceiling and interval of `config`.
    pub fn from_config(service: Arc<dyn SqlJobService>, config: &PollingConfig) -> Self {
        Self::new(service, config.max_attempts, Duration::from_millis(config.interval_ms))
    }

    /// Call `observer` after every poll.
    pub fn with_observer(mut self, observer: PollObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Poll ceiling.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sleep before each poll.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Submit a job without waiting for it.
    ///
    /// # Errors
    /// Any failure is reported as `ProbeError::Submission`.
    pub async fn submit(&self, token: &AccessToken, request: &SqlJobRequest) -> Result<JobHandle> {
        match self.service.submit(token, request).await {
            Ok(handle) => {
                info!(job_id = %handle, "SQL job submitted");
                Ok(handle)
            }
            Err(err) => {
                warn!(error = %err, "SQL job submission failed");
                Err(match err {
                    ProbeError::Submission(message) => ProbeError::Submission(message),
                    other => ProbeError::Submission(other.to_string()),
                })
            }
        }
    }

    /// Submit `request` and poll it until it completes, fails, or the attempt
    /// ceiling is reached. The interval is slept before every poll,
    /// including the first.
    ///
    /// # Errors
    /// - `ProbeError::Submission` when the job could not be started; no poll
    ///   is issued.
    /// - `ProbeError::Poll` when a status request fails.
    /// - `ProbeError::RemoteJobFailure` when the service reports `failed`.
    pub async fn run(&self, token: &AccessToken, request: &SqlJobRequest) -> Result<JobOutcome> {
        let handle = self.submit(token, request).await?;
        self.wait(token, &handle).await
    }

    /// Poll an already submitted job until it completes, fails, or the
    /// attempt ceiling is reached.
    ///
    /// # Errors
    /// `ProbeError::Poll` and `ProbeError::RemoteJobFailure` as for [`run`](Self::run).
    pub async fn wait(&self, token: &AccessToken, handle: &JobHandle) -> Result<JobOutcome> {
        let mut accumulator = Accumulator::new();

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.service.poll(token, handle).await.map_err(|err| {
                warn!(job_id = %handle, attempt, error = %err, "SQL job poll failed");
                match err {
                    ProbeError::Poll(message) => ProbeError::Poll(message),
                    other => ProbeError::Poll(other.to_string()),
                }
            })?;

            let status = snapshot.status;
            let failure_detail = snapshot.failure_detail();
            accumulator.absorb(snapshot.chunks);

            let progress =
                PollProgress { attempt, status, rows_total: accumulator.row_count() };
            debug!(
                job_id = %handle,
                attempt,
                max_attempts = self.max_attempts,
                status = %status,
                rows = progress.rows_total,
                "SQL job polled"
            );
            if let Some(observer) = &self.observer {
                observer(&progress);
            }

            match status {
                // A statement error can arrive with a `completed` job status.
                JobStatus::Completed if failure_detail.is_some() => {
                    let detail = failure_detail.unwrap_or_default();
                    warn!(job_id = %handle, polls = attempt, detail = %detail, "SQL job completed with a statement error");
                    return Err(ProbeError::RemoteJobFailure {
                        detail,
                        rows_accumulated: accumulator.row_count(),
                    });
                }
                JobStatus::Completed => {
                    info!(job_id = %handle, polls = attempt, rows = progress.rows_total, "SQL job completed");
                    return Ok(finish(accumulator, JobCompletion::Completed, attempt));
                }
                JobStatus::Failed => {
                    let detail = failure_detail
                        .unwrap_or_else(|| "job reported failed status".to_string());
                    warn!(job_id = %handle, polls = attempt, detail = %detail, "SQL job failed");
                    return Err(ProbeError::RemoteJobFailure {
                        detail,
                        rows_accumulated: accumulator.row_count(),
                    });
                }
                JobStatus::Pending | JobStatus::Running => {}
            }
        }

        warn!(
            job_id = %handle,
            polls = self.max_attempts,
            rows = accumulator.row_count(),
            "SQL job still running after last poll, returning partial result"
        );
        Ok(finish(accumulator, JobCompletion::TimedOut, self.max_attempts))
    }
}

fn finish(accumulator: Accumulator, completion: JobCompletion, polls: u32) -> JobOutcome {
    let (columns, rows) = accumulator.into_parts();
    JobOutcome { columns, rows, completion, polls }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use agentprobe_domain::{JobSnapshot, ResultChunk};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(1000);

    #[derive(Default)]
    struct ScriptedJobs {
        submit_error: Option<ProbeError>,
        polls: Mutex<VecDeque<Result<JobSnapshot>>>,
        submit_calls: AtomicUsize,
        poll_calls: AtomicUsize,
    }

    impl ScriptedJobs {
        fn with_polls(polls: Vec<Result<JobSnapshot>>) -> Arc<Self> {
            Arc::new(Self { polls: Mutex::new(polls.into()), ..Self::default() })
        }

        fn polls_made(&self) -> usize {
            self.poll_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SqlJobService for ScriptedJobs {
        async fn submit(&self, _token: &AccessToken, _request: &SqlJobRequest) -> Result<JobHandle> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            match &self.submit_error {
                Some(err) => Err(err.clone()),
                None => Ok(JobHandle::new("job-1")),
            }
        }

        async fn poll(&self, _token: &AccessToken, handle: &JobHandle) -> Result<JobSnapshot> {
            assert_eq!(handle.as_str(), "job-1");
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(JobSnapshot::new(JobStatus::Running, Vec::new())))
        }
    }

    fn snapshot(status: JobStatus, columns: Option<&[&str]>, rows: Vec<Vec<Value>>) -> JobSnapshot {
        JobSnapshot::new(
            status,
            vec![ResultChunk {
                column_names: columns.map(|names| names.iter().map(|n| n.to_string()).collect()),
                rows,
                error: None,
            }],
        )
    }

    fn token() -> AccessToken {
        AccessToken::new("token")
    }

    fn request() -> SqlJobRequest {
        SqlJobRequest::new("SELECT 1", 10)
    }

    #[tokio::test(start_paused = true)]
    async fn accumulates_across_polls_until_completed() {
        let jobs = ScriptedJobs::with_polls(vec![
            Ok(snapshot(JobStatus::Running, Some(&["A", "B"]), vec![vec![json!(1), json!(2)]])),
            Ok(snapshot(JobStatus::Completed, None, vec![vec![json!(3), json!(4)]])),
        ]);
        let poller = JobPoller::new(jobs.clone(), 10, INTERVAL);

        let started = tokio::time::Instant::now();
        let outcome = poller.run(&token(), &request()).await.unwrap();

        assert_eq!(outcome.columns, vec!["A", "B"]);
        assert_eq!(outcome.rows, vec![vec![json!(1), json!(2)], vec![json!(3), json!(4)]]);
        assert_eq!(outcome.completion, JobCompletion::Completed);
        assert_eq!(outcome.polls, 2);
        assert_eq!(jobs.polls_made(), 2);
        assert!(started.elapsed() >= INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_before_the_first_poll() {
        let jobs = ScriptedJobs::with_polls(vec![Ok(snapshot(JobStatus::Completed, None, vec![]))]);
        let poller = JobPoller::new(jobs, 3, INTERVAL);

        let started = tokio::time::Instant::now();
        poller.run(&token(), &request()).await.unwrap();

        assert!(started.elapsed() >= INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_with_partial_rows() {
        let jobs = ScriptedJobs::with_polls(vec![
            Ok(snapshot(JobStatus::Pending, None, vec![])),
            Ok(snapshot(JobStatus::Running, Some(&["n"]), vec![vec![json!(1)]])),
        ]);
        let poller = JobPoller::new(jobs.clone(), 4, INTERVAL);

        let outcome = poller.run(&token(), &request()).await.unwrap();

        assert_eq!(outcome.completion, JobCompletion::TimedOut);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.rows, vec![vec![json!(1)]]);
        assert_eq!(outcome.polls, 4);
        assert_eq!(jobs.polls_made(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_polls_once() {
        let jobs = ScriptedJobs::with_polls(Vec::new());
        let poller = JobPoller::new(jobs.clone(), 0, INTERVAL);

        let outcome = poller.run(&token(), &request()).await.unwrap();

        assert_eq!(poller.max_attempts(), 1);
        assert_eq!(jobs.polls_made(), 1);
        assert_eq!(outcome.completion, JobCompletion::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_stops_polling_with_detail() {
        let mut failed = snapshot(JobStatus::Failed, None, vec![]);
        failed.chunks[0].error = Some("SQL0204N \"WXO_LOG\" is an undefined name".into());
        let jobs = ScriptedJobs::with_polls(vec![
            Ok(snapshot(JobStatus::Running, Some(&["A"]), vec![vec![json!("x")]])),
            Ok(failed),
            Ok(snapshot(JobStatus::Completed, None, vec![])),
        ]);
        let poller = JobPoller::new(jobs.clone(), 10, INTERVAL);

        let err = poller.run(&token(), &request()).await.unwrap_err();

        assert_eq!(
            err,
            ProbeError::RemoteJobFailure {
                detail: "SQL0204N \"WXO_LOG\" is an undefined name".into(),
                rows_accumulated: 1,
            }
        );
        assert_eq!(jobs.polls_made(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_without_detail_gets_generic_message() {
        let jobs = ScriptedJobs::with_polls(vec![Ok(JobSnapshot::new(JobStatus::Failed, vec![]))]);
        let poller = JobPoller::new(jobs, 10, INTERVAL);

        match poller.run(&token(), &request()).await.unwrap_err() {
            ProbeError::RemoteJobFailure { detail, rows_accumulated } => {
                assert_eq!(detail, "job reported failed status");
                assert_eq!(rows_accumulated, 0);
            }
            other => panic!("expected remote job failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn statement_error_on_completed_job_is_a_failure() {
        let mut completed = snapshot(JobStatus::Completed, None, vec![]);
        completed.chunks[0].error = Some("SQL0407N assignment of NULL".into());
        let jobs = ScriptedJobs::with_polls(vec![Ok(completed)]);
        let poller = JobPoller::new(jobs, 5, INTERVAL);

        let err = poller.run(&token(), &request()).await.unwrap_err();

        assert!(matches!(
            err,
            ProbeError::RemoteJobFailure { ref detail, rows_accumulated: 0 } if detail.starts_with("SQL0407N")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn submission_failure_means_no_polls() {
        let jobs = Arc::new(ScriptedJobs {
            submit_error: Some(ProbeError::Remote { status: 401, message: "unauthorized".into() }),
            ..ScriptedJobs::default()
        });
        let poller = JobPoller::new(jobs.clone(), 10, INTERVAL);

        let err = poller.run(&token(), &request()).await.unwrap_err();

        match err {
            ProbeError::Submission(message) => assert!(message.contains("401")),
            other => panic!("expected submission error, got {other:?}"),
        }
        assert_eq!(jobs.submit_calls.load(Ordering::SeqCst), 1);
        assert_eq!(jobs.polls_made(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_transport_failure_aborts_the_job() {
        let jobs = ScriptedJobs::with_polls(vec![Err(ProbeError::Network("connection reset".into()))]);
        let poller = JobPoller::new(jobs, 10, INTERVAL);

        let err = poller.run(&token(), &request()).await.unwrap_err();

        assert!(matches!(err, ProbeError::Poll(message) if message.contains("connection reset")));
    }

    #[tokio::test(start_paused = true)]
    async fn observed_row_totals_never_decrease() {
        let jobs = ScriptedJobs::with_polls(vec![
            Ok(snapshot(JobStatus::Running, Some(&["n"]), vec![vec![json!(1)], vec![json!(2)]])),
            Ok(JobSnapshot::new(JobStatus::Running, Vec::new())),
            Ok(snapshot(JobStatus::Running, None, vec![vec![json!(3)]])),
            Ok(snapshot(JobStatus::Completed, None, vec![])),
        ]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let poller = JobPoller::new(jobs, 10, INTERVAL).with_observer(Arc::new(move |progress| {
            sink.lock().unwrap().push((progress.attempt, progress.rows_total));
        }));

        poller.run(&token(), &request()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(1, 2), (2, 2), (3, 3), (4, 3)]);
        assert!(seen.windows(2).all(|pair| pair[0].1 <= pair[1].1));
    }
}
