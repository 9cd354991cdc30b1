//! Background maintenance scheduler.
//!
//! Runs the overdue-fine scan and the waitlist promotion scan on a fixed
//! cadence, off the request path. Both scans are idempotent, so an overlap
//! with request traffic or a second instance only costs wasted work. A
//! failed run is logged and retried at the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::{config::SchedulerConfig, services::Services};

pub struct Scheduler {
    services: Arc<Services>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(services: Arc<Services>, config: SchedulerConfig) -> Self {
        Self { services, config }
    }

    /// Spawn the maintenance loop: one delayed run shortly after boot, then
    /// one run per configured interval.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(self.config.startup_delay_secs)).await;

            let mut ticker =
                tokio::time::interval(Duration::from_secs(self.config.scan_interval_secs));
            loop {
                // First tick completes immediately: boot run, then steady cadence
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    /// One maintenance pass. Scan-level failures are logged, never fatal.
    pub async fn run_once(&self) {
        let now = Utc::now();

        // Lapsed reservations release their held capacity before the
        // waitlist pass looks for free units
        match self.services.reservations.expire_lapsed(now).await {
            Ok(expired) if expired > 0 => {
                tracing::info!(expired, "lapsed reservations expired");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "reservation expiry failed");
            }
        }

        match self.services.fines.run_overdue_scan(now).await {
            Ok(outcome) => {
                tracing::info!(
                    examined = outcome.examined,
                    fines_created = outcome.fines_created,
                    fines_adjusted = outcome.fines_adjusted,
                    errors = outcome.errors,
                    "overdue scan complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "overdue scan failed");
            }
        }

        match self.services.waitlist.run_promotion_scan(now).await {
            Ok(outcome) => {
                tracing::info!(
                    expired = outcome.expired,
                    notified = outcome.notified,
                    errors = outcome.errors,
                    "waitlist scan complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "waitlist scan failed");
            }
        }
    }
}
