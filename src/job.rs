//! Job definition and the per-job run loop.

use crate::error::CronResult;
use crate::expression::CronExpression;
use crate::tick;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Job execution function type.
pub type JobFn =
    Arc<dyn Fn(JobContext) -> Pin<Box<dyn Future<Output = CronResult<()>> + Send>> + Send + Sync>;

/// Job execution context, passed to every invocation.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// Job name
    pub name: String,

    /// Scheduled execution time
    pub scheduled_time: DateTime<Utc>,

    /// Actual execution time
    pub execution_time: DateTime<Utc>,

    /// Completed executions before this one
    pub execution_count: u64,
}

impl JobContext {
    /// Create a new job context.
    pub fn new(name: String, scheduled_time: DateTime<Utc>, execution_count: u64) -> Self {
        Self {
            name,
            scheduled_time,
            execution_time: Utc::now(),
            execution_count,
        }
    }

    /// Get the delay between scheduled and actual execution time.
    pub fn delay(&self) -> chrono::Duration {
        self.execution_time - self.scheduled_time
    }
}

/// Job status.
///
/// Written only by the job's own task. Reads through [`Job::status`] or the
/// scheduler are best-effort snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Waiting for its next tick
    Sleeping,

    /// Callable currently executing
    Running,

    /// Callable failed; this job is no longer scheduled
    Failed(String),
}

/// Observable scheduling state, owned by the job's run loop.
#[derive(Debug)]
struct JobState {
    status: JobStatus,
    last_run: Option<DateTime<Utc>>,
    execution_count: u64,
}

/// A scheduled job: a cron expression, a callable and its observable state.
///
/// Arguments for the callable are whatever the closure captures. Cloning a
/// `Job` clones handles to the same shared state, which is how the run loop
/// and the scheduler observe one job together.
#[derive(Clone)]
pub struct Job {
    name: String,
    expression: CronExpression,
    function: JobFn,
    state: Arc<RwLock<JobState>>,
}

impl Job {
    /// Create a new job.
    pub fn new<F, Fut>(name: impl Into<String>, expression: CronExpression, function: F) -> Self
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CronResult<()>> + Send + 'static,
    {
        let wrapped: JobFn = Arc::new(
            move |ctx: JobContext| -> Pin<Box<dyn Future<Output = CronResult<()>> + Send>> {
                Box::pin(function(ctx))
            },
        );

        Self {
            name: name.into(),
            expression,
            function: wrapped,
            state: Arc::new(RwLock::new(JobState {
                status: JobStatus::Sleeping,
                last_run: None,
                execution_count: 0,
            })),
        }
    }

    /// Job name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The job's schedule.
    pub fn expression(&self) -> &CronExpression {
        &self.expression
    }

    /// Snapshot of the current status.
    pub async fn status(&self) -> JobStatus {
        self.state.read().await.status.clone()
    }

    /// Timestamp of the last successful run, truncated to the minute.
    pub async fn last_run(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_run
    }

    /// Number of completed executions.
    pub async fn execution_count(&self) -> u64 {
        self.state.read().await.execution_count
    }

    /// The scheduling loop: sleep until the next tick, run the callable,
    /// repeat. A callable error is terminal for this job only; sibling jobs
    /// are unaffected.
    pub(crate) async fn run_loop(self) {
        loop {
            let now = tick::truncate_to_minute(Utc::now());
            let next = self.expression.next_after(now);

            self.state.write().await.status = JobStatus::Sleeping;
            // Re-sample the clock so tick computation time is not slept twice
            let wait = tick::sleep_interval(next, Utc::now());
            debug!("job '{}' sleeping {:?} until {}", self.name, wait, next);
            tokio::time::sleep(wait).await;

            if self.execute_once(next).await.is_err() {
                return;
            }
        }
    }

    /// Run the callable once and apply the status transition.
    pub(crate) async fn execute_once(&self, scheduled_time: DateTime<Utc>) -> CronResult<()> {
        let execution_count = {
            let mut state = self.state.write().await;
            state.status = JobStatus::Running;
            state.execution_count
        };

        let context = JobContext::new(self.name.clone(), scheduled_time, execution_count);
        match (self.function)(context).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.status = JobStatus::Sleeping;
                state.last_run = Some(tick::truncate_to_minute(Utc::now()));
                state.execution_count += 1;
                debug!("job '{}' completed run #{}", self.name, execution_count + 1);
                Ok(())
            }
            Err(e) => {
                warn!("job '{}' failed and is no longer scheduled: {}", self.name, e);
                self.state.write().await.status = JobStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("expression", &self.expression.expression())
            .finish_non_exhaustive()
    }
}
