use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};
use crate::error::AppError;
use crate::state::AppState;

pub struct SweepReport {
    pub expired: usize,
    pub failed: usize,
}

/// Handle to the running reaper task. Dropping it does not stop the task;
/// call `stop` for a clean shutdown.
pub struct ReaperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReaperHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

pub fn start_expiry_reaper(state: Arc<AppState>) -> ReaperHandle {
    let (shutdown, mut watcher) = watch::channel(false);
    let interval = Duration::from_secs(state.config.reaper_interval_secs);

    let handle = tokio::spawn(async move {
        info!(
            "Starting expiry reaper (interval {}s, grace period {}min)...",
            state.config.reaper_interval_secs, state.config.payment_grace_minutes
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = watcher.changed() => {
                    info!("Expiry reaper shutting down");
                    return;
                }
            }

            let span = info_span!("expiry_sweep");
            async {
                match run_expiry_sweep(&state).await {
                    Ok(report) if report.expired > 0 || report.failed > 0 => {
                        info!("Expiry sweep finished: {} expired, {} failed", report.expired, report.failed);
                    }
                    Ok(_) => {}
                    Err(e) => error!("Expiry sweep could not scan for stale bookings: {:?}", e),
                }
            }
                .instrument(span)
                .await;
        }
    });

    ReaperHandle { shutdown, handle }
}

/// One pass over stale pending payments. A failure on one booking is
/// reported and counted, never fatal to the rest of the sweep.
pub async fn run_expiry_sweep(state: &AppState) -> Result<SweepReport, AppError> {
    let cutoff = Utc::now() - chrono::Duration::minutes(state.config.payment_grace_minutes);
    let stale = state.booking_repo.find_stale_pending(cutoff).await?;

    let mut report = SweepReport { expired: 0, failed: 0 };
    for booking in stale {
        match state.booking_engine.expire_booking(&booking).await {
            Ok(true) => report.expired += 1,
            Ok(false) => {} // confirmed or cancelled since the scan
            Err(e) => {
                report.failed += 1;
                error!("Failed to expire booking {}: {:?}", booking.id, e);
            }
        }
    }

    Ok(report)
}
