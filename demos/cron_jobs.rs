//! Cron job scheduling demo.
//!
//! Registers a few minute-granularity jobs, lets them run for three
//! minutes, then reports per-job statistics.

use cronloop::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::Duration;

#[tokio::main]
async fn main() -> Result<(), CronError> {
    env_logger::init();

    let mut scheduler = CronScheduler::new();

    // Example 1: simple job using an alias
    scheduler.add_job("heartbeat", "@minutely", |ctx| async move {
        println!(
            "heartbeat #{} (scheduled {}, delayed {:?})",
            ctx.execution_count + 1,
            ctx.scheduled_time.format("%H:%M"),
            ctx.delay()
        );
        Ok(())
    })?;

    // Example 2: job with shared state
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    scheduler.add_job("counter", "* * * * *", move |_ctx| {
        let counter = counter_clone.clone();
        async move {
            let value = counter.fetch_add(1, Ordering::SeqCst) + 1;
            println!("counter job - count: {}", value);
            Ok(())
        }
    })?;

    // Example 3: a job whose second run fails and stops it for good
    scheduler.add_job("flaky", "* * * * *", |ctx| async move {
        if ctx.execution_count >= 1 {
            println!("flaky job failing");
            Err(CronError::ExecutionFailed("simulated failure".to_string()))
        } else {
            println!("flaky job succeeded");
            Ok(())
        }
    })?;

    println!("registered jobs: {:?}", scheduler.list_jobs());

    scheduler.start()?;
    println!("running for three minutes...\n");
    tokio::time::sleep(Duration::from_secs(3 * 60 + 5)).await;

    println!("\njob statistics:");
    for name in scheduler.list_jobs() {
        let stats = scheduler.stats(&name).await?;
        println!(
            "  {}: status {:?}, {} run(s), last run {:?}, next tick {}",
            stats.name, stats.status, stats.execution_count, stats.last_run, stats.next_run
        );
    }

    scheduler.stop()?;
    println!("\nfinal counter value: {}", counter.load(Ordering::SeqCst));

    Ok(())
}
