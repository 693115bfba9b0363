//! Background task that completes finished stays.
//!
//! Runs in a tokio::spawn loop and moves checked-out reservations whose
//! check-out date has passed to `completed`.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::{info, warn};

use super::booking::BookingService;
use crate::shared::shutdown::ShutdownSignal;

/// Start the stay completion background task.
///
/// Returns the task handle; the loop exits when `shutdown` fires.
pub fn start_stay_completion_task(
    service: Arc<BookingService>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(check_interval = check_interval_secs, "Stay completion task started");

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match service.complete_finished_stays(Utc::now()).await {
                        Ok(0) => {}
                        Ok(n) => info!(count = n, "Completed finished stays"),
                        Err(e) => warn!(error = %e, "Stay completion check error"),
                    }
                }
                _ = shutdown.wait() => {
                    info!("Stay completion task shutting down");
                    break;
                }
            }
        }

        info!("Stay completion task stopped");
    })
}
