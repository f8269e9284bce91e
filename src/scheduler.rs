//! Job registry and lifecycle management.

use crate::error::{CronError, CronResult};
use crate::expression::CronExpression;
use crate::job::{Job, JobContext, JobStatus};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Registry of scheduled jobs.
///
/// Every started job runs on its own tokio task; jobs share no state with
/// one another. The scheduler owns the task handles and aborts them on
/// [`stop`](CronScheduler::stop) or [`remove_job`](CronScheduler::remove_job),
/// so task lifetime is always explicit.
pub struct CronScheduler {
    jobs: HashMap<String, Job>,
    handles: HashMap<String, JoinHandle<()>>,
    running: bool,
}

impl CronScheduler {
    /// Create a new scheduler.
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
            handles: HashMap::new(),
            running: false,
        }
    }

    /// Register a job.
    ///
    /// The expression is parsed here so a malformed schedule fails at
    /// registration, never at the first tick. If the scheduler is already
    /// running the job's task starts immediately.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cronloop::*;
    ///
    /// # fn main() -> Result<(), CronError> {
    /// let mut scheduler = CronScheduler::new();
    ///
    /// scheduler.add_job("cleanup", "0 0 * * *", |ctx| async move {
    ///     println!("running cleanup, {} runs so far", ctx.execution_count);
    ///     Ok(())
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_job<F, Fut>(
        &mut self,
        name: impl Into<String>,
        expression: &str,
        function: F,
    ) -> CronResult<()>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CronResult<()>> + Send + 'static,
    {
        let name = name.into();
        let expr = CronExpression::parse(expression)?;
        if self.jobs.contains_key(&name) {
            return Err(CronError::JobAlreadyExists(name));
        }

        info!("registered job '{}' with schedule '{}'", name, expr.expression());
        let job = Job::new(name.clone(), expr, function);
        if self.running {
            self.handles.insert(name.clone(), tokio::spawn(job.clone().run_loop()));
        }
        self.jobs.insert(name, job);
        Ok(())
    }

    /// Remove a job, aborting its task if one is running.
    pub fn remove_job(&mut self, name: &str) -> CronResult<()> {
        self.jobs
            .remove(name)
            .ok_or_else(|| CronError::JobNotFound(name.to_string()))?;
        if let Some(handle) = self.handles.remove(name) {
            handle.abort();
        }
        debug!("removed job '{}'", name);
        Ok(())
    }

    /// Get a list of all registered job names.
    pub fn list_jobs(&self) -> Vec<String> {
        self.jobs.keys().cloned().collect()
    }

    /// Start the scheduler, spawning one task per registered job.
    pub fn start(&mut self) -> CronResult<()> {
        if self.running {
            return Err(CronError::SchedulerAlreadyRunning);
        }
        self.running = true;

        info!("starting {} cron job(s)", self.jobs.len());
        for (name, job) in &self.jobs {
            self.handles.insert(name.clone(), tokio::spawn(job.clone().run_loop()));
        }
        Ok(())
    }

    /// Stop the scheduler, aborting every job task.
    pub fn stop(&mut self) -> CronResult<()> {
        if !self.running {
            return Err(CronError::SchedulerNotRunning);
        }
        self.running = false;

        info!("stopping {} cron job task(s)", self.handles.len());
        for (name, handle) in self.handles.drain() {
            handle.abort();
            debug!("aborted job task '{}'", name);
        }
        Ok(())
    }

    /// Check if the scheduler is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Snapshot of a job's status.
    pub async fn job_status(&self, name: &str) -> CronResult<JobStatus> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| CronError::JobNotFound(name.to_string()))?;
        Ok(job.status().await)
    }

    /// Snapshot of a job's scheduling statistics.
    pub async fn stats(&self, name: &str) -> CronResult<JobStats> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| CronError::JobNotFound(name.to_string()))?;

        Ok(JobStats {
            name: job.name().to_string(),
            status: job.status().await,
            last_run: job.last_run().await,
            next_run: job.expression().next_after(Utc::now()),
            execution_count: job.execution_count().await,
        })
    }
}

impl Default for CronScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of one job's scheduling state.
#[derive(Debug, Clone)]
pub struct JobStats {
    pub name: String,
    pub status: JobStatus,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: DateTime<Utc>,
    pub execution_count: u64,
}
