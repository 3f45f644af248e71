//! Scheduled Publisher Background Job
//!
//! Promotes posts whose scheduled date has arrived to `published`, on a
//! fixed server-side interval. Publication no longer depends on anyone
//! having the site open in a browser; the HTTP trigger endpoint remains
//! available for manual runs and external schedulers.

use crate::services::publisher;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tokio::time::interval;

pub async fn start_scheduled_publisher(db: PgPool, interval_secs: u64) {
    tracing::info!(
        interval_secs = interval_secs,
        "Starting scheduled publisher background job"
    );

    let mut ticker = interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; posts already due at startup are
    // promoted without waiting a full interval.
    loop {
        ticker.tick().await;

        let cycle_start = Instant::now();
        match publisher::sweep_due_posts(&db).await {
            Ok(report) if report.published_count > 0 => {
                tracing::info!(
                    published_count = report.published_count,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Scheduled publish cycle promoted posts"
                );
            }
            Ok(_) => {
                tracing::debug!("Scheduled publish cycle found nothing due");
            }
            Err(e) => {
                // Transient failures are retried on the next tick.
                tracing::error!(error = %e, "Scheduled publish cycle failed");
            }
        }
    }
}
