//! Minimal per-job cron scheduling for Tokio applications.
//!
//! Jobs are registered against a 5-field cron expression (minute, hour, day
//! of month, month, day of week) or one of the `@`-prefixed aliases. Every
//! started job runs on its own tokio task that sleeps until the next
//! matching minute, invokes the job's callable, and repeats. A failing
//! callable stops only its own job; sibling jobs keep running.
//!
//! Expressions accept bare integers and the `*` wildcard. Ranges, steps and
//! comma lists are deliberately unsupported; register one job per concrete
//! schedule instead.
//!
//! ## Quick Start - Cron Expressions
//!
//! ```
//! use cronloop::CronExpression;
//! use chrono::{TimeZone, Utc};
//!
//! // 23:30 on the 1st of every month
//! let expr = CronExpression::parse("30 23 1 * *").unwrap();
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
//! let next = expr.next_after(now);
//!
//! assert_eq!(next, Utc.with_ymd_and_hms(2024, 4, 1, 23, 30, 0).unwrap());
//! assert!(next > now);
//! ```
//!
//! ## Schedule Aliases
//!
//! ```
//! use cronloop::CronExpression;
//!
//! let daily = CronExpression::parse("@daily").unwrap();
//! assert_eq!(daily.expression(), "0 0 * * *");
//!
//! let hourly = CronExpression::parse("@hourly").unwrap();
//! assert_eq!(hourly.expression(), "0 * * * *");
//! ```
//!
//! ## Complete Example
//!
//! ```no_run
//! use cronloop::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CronError> {
//!     let mut scheduler = CronScheduler::new();
//!
//!     // Run every night at 03:00
//!     scheduler.add_job("cleanup", "0 3 * * *", |ctx| async move {
//!         println!("nightly cleanup, {} previous runs", ctx.execution_count);
//!         Ok(())
//!     })?;
//!
//!     scheduler.start()?;
//!     tokio::signal::ctrl_c().await.ok();
//!     scheduler.stop()?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod expression;
pub mod job;
pub mod scheduler;
pub mod tick;

pub use error::{CronError, CronResult};
pub use expression::{CronExpression, CronField};
pub use job::{Job, JobContext, JobFn, JobStatus};
pub use scheduler::{CronScheduler, JobStats};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{CronError, CronResult};
    pub use crate::expression::{CronExpression, CronField};
    pub use crate::job::{Job, JobContext, JobFn, JobStatus};
    pub use crate::scheduler::{CronScheduler, JobStats};
}
